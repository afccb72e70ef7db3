//! Accurate playback durations for WAV and MP3 files.
//!
//! Generic tag readers tend to estimate durations loosely, especially for WAV files and VBR MP3s.
//! Instead, durations are computed from the files' own structure:
//!
//! * **WAV**: The `data` chunk is located by walking the RIFF chunks, and its size is divided
//!   by the byte rate.
//! * **MP3**: The first audio frame is located and checked for a Xing/Info header. If one with a
//!   frame count exists, it is used. Otherwise, the frame count is estimated from the positions of
//!   the first and last frames, assuming a constant bitrate.
//!
//! Everything else (bitrate, sample rate, tag fields) is passed through from [`lofty`].
//!
//! # Examples
//!
//! ## Opening a file
//!
//! ```rust,no_run
//! # fn main() -> sound_duration::error::Result<()> {
//! use sound_duration::SoundFile;
//! use sound_duration::config::OpenOptions;
//!
//! // The container is determined by the extension
//! let mut file = SoundFile::open("sound/music/intro.wav", &OpenOptions::new())?;
//!
//! // Whole seconds, rounded up
//! let seconds = file.duration();
//!
//! // Sub-second precision
//! let precise = file.precise_duration();
//! # Ok(())
//! # }
//! ```
//!
//! ## Using an existing reader
//!
//! ```rust
//! # fn main() -> sound_duration::error::Result<()> {
//! use sound_duration::ContainerKind;
//! use sound_duration::duration::{DurationMethod, estimate};
//! use sound_duration::io::ByteReader;
//! use std::io::Cursor;
//!
//! // 1000 frames of silence, MPEG-1 Layer III, 128 kbps, 44.1 kHz
//! let mut frame = vec![0; 417];
//! frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
//! let stream = frame.repeat(1000);
//!
//! let mut reader = ByteReader::new(Cursor::new(stream))?;
//!
//! // No Xing header, so this assumes a constant bitrate
//! let duration = estimate(ContainerKind::Mpeg, &mut reader, 0);
//! assert_eq!(duration.method(), DurationMethod::ConstantBitrateFallback);
//! assert_eq!(duration.seconds(), Some(26.0625));
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod container;
pub mod duration;
pub mod error;
pub mod host;
pub mod iff;
pub(crate) mod macros;
pub mod metadata;
pub mod mpeg;
mod sound_file;
mod util;

pub use crate::container::ContainerKind;
pub use crate::sound_file::SoundFile;

pub use util::io;
