//! RIFF/WAV container items

pub(crate) mod chunk;
pub mod wav;

pub use chunk::RiffChunk;
pub use wav::{RiffScan, WavFormat, scan_chunks};
