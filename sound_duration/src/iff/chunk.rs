use crate::error::Result;
use crate::util::io::ByteReader;

use std::io::{Read, Seek};

use byteorder::LittleEndian;

const RIFF_CHUNK_HEADER_SIZE: u64 = 8;

/// A chunk discovered while walking a RIFF file
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RiffChunk {
	pub(crate) fourcc: [u8; 4],
	pub(crate) data_offset: u64,
	pub(crate) size: u32,
}

impl RiffChunk {
	/// The chunk's 4 byte identifier, ex. `b"data"`
	pub fn fourcc(&self) -> [u8; 4] {
		self.fourcc
	}

	/// The absolute offset of the chunk's content, immediately following its header
	pub fn data_offset(&self) -> u64 {
		self.data_offset
	}

	/// The size of the chunk's content, as written in its header
	pub fn size(&self) -> u32 {
		self.size
	}

	// Chunks are expected to start on even boundaries, and are padded
	// with a 0 if necessary. The pad byte is NOT included in the chunk's size.
	fn next_chunk_offset(&self) -> u64 {
		self.data_offset + u64::from(self.size) + u64::from(self.size % 2)
	}
}

/// Walks chunk headers sequentially, starting at a fixed offset
///
/// The walk ends once there is no room left for a complete chunk header. A chunk whose content
/// claims to extend past the end of the stream is still yielded, the walk simply ends after it.
pub(crate) struct Chunks {
	next_offset: u64,
}

impl Chunks {
	#[must_use]
	pub const fn new(start: u64) -> Self {
		Self { next_offset: start }
	}

	pub fn next<R>(&mut self, data: &mut ByteReader<R>) -> Result<Option<RiffChunk>>
	where
		R: Read + Seek,
	{
		if data.len().saturating_sub(self.next_offset) < RIFF_CHUNK_HEADER_SIZE {
			return Ok(None);
		}

		data.seek_to(self.next_offset)?;

		let fourcc = data.read_array::<4>()?;
		let size = data.read_u32::<LittleEndian>()?;

		let chunk = RiffChunk {
			fourcc,
			data_offset: self.next_offset + RIFF_CHUNK_HEADER_SIZE,
			size,
		};

		self.next_offset = chunk.next_chunk_offset();
		Ok(Some(chunk))
	}

	pub fn content<R>(chunk: &RiffChunk, data: &mut ByteReader<R>) -> Result<Vec<u8>>
	where
		R: Read + Seek,
	{
		data.read_bytes_at(chunk.data_offset, chunk.size as usize)
	}
}
