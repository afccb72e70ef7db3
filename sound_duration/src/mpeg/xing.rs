use super::header::FrameHeader;
use crate::duration::Measurement;
use crate::error::Result;
use crate::util::io::ByteReader;

use std::io::{Read, Seek};

use byteorder::{BigEndian, ReadBytesExt};

const FRAMES_FLAG: u32 = 0x0001;
const BYTES_FLAG: u32 = 0x0002;
const TOC_FLAG: u32 = 0x0004;
const QUALITY_FLAG: u32 = 0x0008;

const TOC_SIZE: usize = 100;

// Magic (4) + flags (4) + frames (4) + bytes (4) + TOC (100) + quality (4)
const MAX_XING_HEADER_SIZE: u64 = 120;

/// The identifier of a [`XingHeader`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum XingHeaderType {
	/// "Xing", written for VBR streams
	Xing,
	/// "Info", written by LAME for CBR streams
	Info,
}

/// A Xing/Info VBR header
///
/// This is stored in place of the audio data of the first frame, after its side information.
/// See [`FrameHeader::xing_offset`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XingHeader {
	pub(crate) ty: XingHeaderType,
	pub(crate) flags: u32,
	pub(crate) frames: Option<u32>,
	pub(crate) bytes: Option<u32>,
	pub(crate) toc: Option<[u8; TOC_SIZE]>,
	pub(crate) quality: Option<u32>,
}

impl XingHeader {
	/// Parse a Xing/Info header from the start of `reader`
	///
	/// This returns `Ok(None)` if the magic is neither "Xing" nor "Info".
	///
	/// # Errors
	///
	/// `reader` is too short to contain the fields its flags announce.
	///
	/// # Examples
	///
	/// ```rust
	/// use sound_duration::mpeg::XingHeader;
	///
	/// # fn main() -> sound_duration::error::Result<()> {
	/// let mut data = Vec::new();
	/// data.extend_from_slice(b"Xing");
	/// data.extend_from_slice(&1_u32.to_be_bytes()); // Frame count only
	/// data.extend_from_slice(&5000_u32.to_be_bytes());
	///
	/// let header = XingHeader::read(&mut &data[..])?.unwrap();
	/// assert_eq!(header.frames(), Some(5000));
	/// assert_eq!(header.bytes(), None);
	/// assert!(header.is_valid());
	/// # Ok(()) }
	/// ```
	pub fn read(reader: &mut &[u8]) -> Result<Option<Self>> {
		let mut magic = [0; 4];
		reader.read_exact(&mut magic)?;

		let ty = match &magic {
			b"Xing" => XingHeaderType::Xing,
			b"Info" => XingHeaderType::Info,
			_ => return Ok(None),
		};

		let flags = reader.read_u32::<BigEndian>()?;

		let frames = if flags & FRAMES_FLAG == 0 {
			None
		} else {
			Some(reader.read_u32::<BigEndian>()?)
		};

		let bytes = if flags & BYTES_FLAG == 0 {
			None
		} else {
			Some(reader.read_u32::<BigEndian>()?)
		};

		let toc = if flags & TOC_FLAG == 0 {
			None
		} else {
			let mut toc = [0; TOC_SIZE];
			reader.read_exact(&mut toc)?;
			Some(toc)
		};

		let quality = if flags & QUALITY_FLAG == 0 {
			None
		} else {
			Some(reader.read_u32::<BigEndian>()?)
		};

		Ok(Some(Self {
			ty,
			flags,
			frames,
			bytes,
			toc,
			quality,
		}))
	}

	/// Whether this is a "Xing" or "Info" header
	pub fn ty(&self) -> XingHeaderType {
		self.ty
	}

	/// The raw flags
	pub fn flags(&self) -> u32 {
		self.flags
	}

	/// The total number of frames in the stream
	pub fn frames(&self) -> Option<u32> {
		self.frames
	}

	/// The total size of the stream in bytes
	pub fn bytes(&self) -> Option<u32> {
		self.bytes
	}

	/// The seek table of contents
	pub fn toc(&self) -> Option<&[u8; TOC_SIZE]> {
		self.toc.as_ref()
	}

	/// The encoder's quality indicator (0 best - 100 worst)
	pub fn quality(&self) -> Option<u32> {
		self.quality
	}

	/// Whether the header contains a usable frame count
	pub fn is_valid(&self) -> bool {
		self.frames.is_some_and(|frames| frames > 0)
	}

	pub(crate) fn measure(&self, first_frame: &FrameHeader) -> Option<Measurement> {
		let frames = self.frames.filter(|frames| *frames > 0)?;
		if first_frame.sample_rate == 0 {
			return None;
		}

		Some(Measurement::XingVbr {
			samples_per_frame: first_frame.samples,
			sample_rate: first_frame.sample_rate,
			frames,
		})
	}
}

/// Read the Xing/Info header following the first frame, if there is one
///
/// A truncated or unrecognized header is not an error, it simply doesn't exist.
pub(super) fn read_xing_header<R>(
	data: &mut ByteReader<R>,
	first_frame: &FrameHeader,
	first_frame_offset: u64,
) -> Result<Option<XingHeader>>
where
	R: Read + Seek,
{
	let xing_header_location = first_frame_offset + 4 + u64::from(first_frame.xing_offset());
	if xing_header_location >= data.len() {
		log::debug!("MPEG: Stream ends before a Xing header could start");
		return Ok(None);
	}

	let available = std::cmp::min(data.len() - xing_header_location, MAX_XING_HEADER_SIZE);
	let content = data.read_bytes_at(xing_header_location, available as usize)?;

	match XingHeader::read(&mut &content[..]) {
		Ok(Some(header)) => Ok(Some(header)),
		Ok(None) => {
			log::debug!("MPEG: No Xing/Info header found");
			Ok(None)
		},
		Err(e) => {
			log::debug!("MPEG: Xing header is truncated: {e}");
			Ok(None)
		},
	}
}
