//! MPEG audio (MP3) frame items

mod constants;
pub(crate) mod header;
pub(crate) mod read;
pub(crate) mod xing;

pub use header::{ChannelMode, FrameHeader, Layer, MpegVersion};
pub use read::{MpegScan, scan_frames};
pub use xing::{XingHeader, XingHeaderType};
