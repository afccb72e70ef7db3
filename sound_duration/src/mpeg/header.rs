use super::constants::{BITRATES, PADDING_SIZES, SAMPLE_RATES, SAMPLES, SIDE_INFORMATION_SIZES};
use crate::error::Result;
use crate::util::io::ByteReader;

use std::io::{Read, Seek};

pub(crate) fn verify_frame_sync(frame_sync: [u8; 2]) -> bool {
	frame_sync[0] == 0xFF && frame_sync[1] >> 5 == 0b111
}

// Searches for a frame sync (11 set bits) in the reader.
// The search starts at the current position of the reader and returns the index relative to it.
// This will return the first match, if one is found.
//
// Note that the search searches in 8 bit steps, i.e. the first 8 bits need to be byte aligned.
pub(crate) fn search_for_frame_sync<R>(input: &mut R) -> std::io::Result<Option<u64>>
where
	R: Read,
{
	let mut iterator = input.bytes();
	let mut buffer = [0u8; 2];
	// Read the first byte, as each iteration expects that buffer 0 was set from a previous
	// iteration.
	// This is not the case in the first iteration, which is therefore a special case.
	if let Some(byte) = iterator.next() {
		buffer[0] = byte?;
	}
	// Create a stream of overlapping 2 byte pairs
	//
	// Example:
	// [0x01, 0x02, 0x03, 0x04] should be analyzed as
	// [0x01, 0x02], [0x02, 0x03], [0x03, 0x04]
	for (index, byte) in iterator.enumerate() {
		buffer[1] = byte?;
		if verify_frame_sync(buffer) {
			return Ok(Some(index as u64));
		}
		buffer[0] = buffer[1];
	}
	Ok(None)
}

// Used when the stream has no usable Xing header, and the CBR estimate needs the last frame.
//
// This searches backwards from `end`, 1024 bytes at a time, for a frame header that
// matches `first_frame` (see `FrameHeader::cmp`). The search never goes below `floor`.
const REV_FRAME_SEARCH_BOUNDS: u64 = 1024;
pub(super) fn rev_search_for_frame_header<R>(
	data: &mut ByteReader<R>,
	first_frame: &FrameHeader,
	floor: u64,
	end: u64,
) -> Result<Option<u64>>
where
	R: Read + Seek,
{
	let mut window_start = end;
	while window_start > floor {
		let window_end = std::cmp::min(window_start + 3, end);
		window_start = window_start
			.saturating_sub(REV_FRAME_SEARCH_BOUNDS)
			.max(floor);

		let buf = data.read_bytes_at(window_start, (window_end - window_start) as usize)?;

		for relative_frame_start in (0..buf.len().saturating_sub(3)).rev() {
			let header_bytes = [
				buf[relative_frame_start],
				buf[relative_frame_start + 1],
				buf[relative_frame_start + 2],
				buf[relative_frame_start + 3],
			];

			// We need to check if the header is actually valid. For
			// all we know, we could be in some junk (ex. 0xFF_FF_FF_FF).
			let Some(header) = FrameHeader::from_bytes(header_bytes) else {
				continue;
			};

			if header.cmp(first_frame) {
				return Ok(Some(window_start + relative_frame_start as u64));
			}
		}
	}

	Ok(None)
}

/// MPEG Audio version
#[derive(Default, PartialEq, Eq, Copy, Clone, Debug)]
#[allow(missing_docs)]
pub enum MpegVersion {
	#[default]
	V1,
	V2,
	V2_5,
}

impl MpegVersion {
	// Index into the tables shared by MPEG-2 and MPEG-2.5
	fn table_index(self) -> usize {
		if self == MpegVersion::V1 { 0 } else { 1 }
	}
}

/// MPEG layer
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Layer {
	Layer1 = 1,
	Layer2 = 2,
	#[default]
	Layer3 = 3,
}

/// Channel mode
#[derive(Default, Copy, Clone, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum ChannelMode {
	#[default]
	Stereo = 0,
	JointStereo = 1,
	/// Two independent mono channels
	DualChannel = 2,
	SingleChannel = 3,
}

/// A decoded MPEG audio frame header
///
/// The raw fields are taken directly from the 4 header bytes, everything else is looked up
/// in the ISO/IEC 11172-3 and 13818-3 tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameHeader {
	pub(crate) version: MpegVersion,
	pub(crate) layer: Layer,
	pub(crate) protected: bool,
	pub(crate) bitrate_index: u8,
	pub(crate) sample_rate_index: u8,
	pub(crate) padding: bool,
	pub(crate) channel_mode: ChannelMode,

	pub(crate) bitrate: u32,
	pub(crate) sample_rate: u32,
	pub(crate) samples: u16,
	pub(crate) len: u32,
}

impl FrameHeader {
	/// Decode a frame header from its 4 bytes
	///
	/// This returns `None` if the frame sync doesn't match, or if the version, layer, or sample
	/// rate index are reserved values.
	///
	/// A header with a "free format" or "bad" bitrate index is still decoded, see
	/// [`FrameHeader::is_usable`].
	///
	/// # Examples
	///
	/// ```rust
	/// use sound_duration::mpeg::{ChannelMode, FrameHeader, Layer, MpegVersion};
	///
	/// // MPEG-1 Layer III, 128 kbps, 44.1 kHz, stereo
	/// let header = FrameHeader::from_bytes([0xFF, 0xFB, 0x90, 0x00]).unwrap();
	///
	/// assert_eq!(header.version(), MpegVersion::V1);
	/// assert_eq!(header.layer(), Layer::Layer3);
	/// assert_eq!(header.bitrate(), 128);
	/// assert_eq!(header.sample_rate(), 44100);
	/// assert_eq!(header.channel_mode(), ChannelMode::Stereo);
	/// assert_eq!(header.len(), 417);
	/// ```
	pub fn from_bytes(bytes: [u8; 4]) -> Option<Self> {
		Self::read(u32::from_be_bytes(bytes))
	}

	pub(crate) fn read(data: u32) -> Option<Self> {
		if (data >> 21) & 0x7FF != 0x7FF {
			return None;
		}

		let version = match (data >> 19) & 0b11 {
			0b00 => MpegVersion::V2_5,
			0b10 => MpegVersion::V2,
			0b11 => MpegVersion::V1,
			_ => return None,
		};

		let layer = match (data >> 17) & 0b11 {
			0b01 => Layer::Layer3,
			0b10 => Layer::Layer2,
			0b11 => Layer::Layer1,
			_ => {
				log::debug!("MPEG: Frame header uses a reserved layer");
				return None;
			},
		};

		let version_index = version.table_index();
		let layer_index = (layer as usize).saturating_sub(1);

		// A set bit means there is *no* CRC
		let protected = (data >> 16) & 1 == 0;

		let bitrate_index = ((data >> 12) & 0xF) as u8;
		let bitrate = BITRATES[version_index][layer_index][bitrate_index as usize];

		let sample_rate_index = ((data >> 10) & 0b11) as u8;
		let sample_rate = match sample_rate_index {
			// This is invalid
			0b11 => return None,
			_ => SAMPLE_RATES[version as usize][sample_rate_index as usize],
		};

		let padding = (data >> 9) & 1 == 1;

		let channel_mode = match (data >> 6) & 0b11 {
			0b00 => ChannelMode::Stereo,
			0b01 => ChannelMode::JointStereo,
			0b10 => ChannelMode::DualChannel,
			_ => ChannelMode::SingleChannel,
		};

		let samples = SAMPLES[layer_index][version_index];

		let mut len = 0;
		if bitrate > 0 {
			let padding_size = if padding {
				u32::from(PADDING_SIZES[layer_index])
			} else {
				0
			};

			len = (u32::from(samples) * bitrate * 125 / sample_rate) + padding_size;
		}

		Some(Self {
			version,
			layer,
			protected,
			bitrate_index,
			sample_rate_index,
			padding,
			channel_mode,
			bitrate,
			sample_rate,
			samples,
			len,
		})
	}

	/// Compares the versions, layers, and sample rates of two frame headers
	///
	/// These never change within a stream. If they aren't equal, something is broken.
	pub(crate) fn cmp(&self, other: &Self) -> bool {
		self.version == other.version
			&& self.layer == other.layer
			&& self.sample_rate == other.sample_rate
	}

	/// MPEG version
	pub fn version(&self) -> MpegVersion {
		self.version
	}

	/// MPEG layer
	pub fn layer(&self) -> Layer {
		self.layer
	}

	/// Whether the frame is followed by a CRC
	pub fn is_protected(&self) -> bool {
		self.protected
	}

	/// The raw bitrate index
	pub fn bitrate_index(&self) -> u8 {
		self.bitrate_index
	}

	/// The raw sample rate index
	pub fn sample_rate_index(&self) -> u8 {
		self.sample_rate_index
	}

	/// Whether the frame contains a padding slot
	pub fn has_padding(&self) -> bool {
		self.padding
	}

	/// MPEG channel mode
	pub fn channel_mode(&self) -> ChannelMode {
		self.channel_mode
	}

	/// Bitrate (kbps), 0 for "free format" and "bad" indices
	pub fn bitrate(&self) -> u32 {
		self.bitrate
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// The number of samples in each frame
	pub fn samples_per_frame(&self) -> u16 {
		self.samples
	}

	/// The length of the frame in bytes, including the header and padding
	pub fn len(&self) -> u32 {
		self.len
	}

	/// Whether the header can be used to step between frames and estimate a duration
	pub fn is_usable(&self) -> bool {
		self.bitrate > 0 && self.len > 0
	}

	/// The offset of a Xing/Info header, relative to the end of this 4 byte header
	///
	/// This only depends on the version and channel mode.
	pub fn xing_offset(&self) -> u32 {
		SIDE_INFORMATION_SIZES[self.version.table_index()][self.channel_mode as usize]
	}
}
