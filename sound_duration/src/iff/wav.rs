//! WAV specific items

use super::chunk::{Chunks, RiffChunk};
use crate::duration::Measurement;
use crate::error::Result;
use crate::macros::decode_err;
use crate::util::io::ByteReader;

use std::io::{Read, Seek};

use byteorder::{LittleEndian, ReadBytesExt};

/// Chunks start immediately after the `RIFF....WAVE` preamble
const FIRST_CHUNK_OFFSET: u64 = 12;

const PCM: u16 = 0x0001;
const IEEE_FLOAT: u16 = 0x0003;
const EXTENSIBLE: u16 = 0xFFFE;

/// The contents of a WAV file's `fmt ` chunk
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WavFormat {
	pub(crate) format_tag: u16,
	pub(crate) channels: u16,
	pub(crate) sample_rate: u32,
	pub(crate) bytes_per_second: u32,
	pub(crate) block_align: u16,
	pub(crate) bits_per_sample: u16,
}

impl WavFormat {
	/// The format tag, ex. `0x0001` for PCM
	pub fn format_tag(&self) -> u16 {
		self.format_tag
	}

	/// Whether the samples are uncompressed (integer or float PCM, or the extensible equivalent)
	pub fn is_pcm(&self) -> bool {
		matches!(self.format_tag, PCM | IEEE_FLOAT | EXTENSIBLE)
	}

	/// Channel count
	pub fn channels(&self) -> u16 {
		self.channels
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// Average bytes per second, as written in the chunk
	pub fn bytes_per_second(&self) -> u32 {
		self.bytes_per_second
	}

	/// The number of bytes in a single sample frame, across all channels
	pub fn block_align(&self) -> u16 {
		self.block_align
	}

	/// Bits per sample
	pub fn bits_per_sample(&self) -> u16 {
		self.bits_per_sample
	}
}

fn read_fmt_chunk(mut fmt: &[u8]) -> Result<WavFormat> {
	if fmt.len() < 16 {
		decode_err!(@BAIL Wave, "Found an invalid \"fmt \" chunk size (< 16)");
	}

	Ok(WavFormat {
		format_tag: fmt.read_u16::<LittleEndian>()?,
		channels: fmt.read_u16::<LittleEndian>()?,
		sample_rate: fmt.read_u32::<LittleEndian>()?,
		bytes_per_second: fmt.read_u32::<LittleEndian>()?,
		block_align: fmt.read_u16::<LittleEndian>()?,
		bits_per_sample: fmt.read_u16::<LittleEndian>()?,
	})
}

/// The result of walking a WAV file's chunks
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RiffScan {
	pub(crate) format: Option<WavFormat>,
	pub(crate) stream_len: Option<u32>,
	pub(crate) chunks: Vec<RiffChunk>,
}

impl RiffScan {
	/// The decoded `fmt ` chunk, if one was found
	pub fn format(&self) -> Option<WavFormat> {
		self.format
	}

	/// The size of the audio data in bytes
	///
	/// If the file contains multiple `data` chunks, this is the size of the **last** one.
	pub fn stream_len(&self) -> Option<u32> {
		self.stream_len
	}

	/// Every chunk encountered, in file order
	pub fn chunks(&self) -> &[RiffChunk] {
		&self.chunks
	}

	/// Measure the duration of the audio data, given a bitrate in kbit/s
	///
	/// The byte rate is derived from `bitrate`, NOT from the `fmt ` chunk.
	pub(crate) fn measure(&self, bitrate: u32) -> Measurement {
		let Some(stream_len) = self.stream_len else {
			log::warn!("WAV: No \"data\" chunk found, unable to calculate duration");
			return Measurement::Unavailable;
		};

		if bitrate == 0 {
			log::warn!("WAV: Bitrate is 0, duration will be 0");
		}

		Measurement::RiffByteRate {
			stream_len: u64::from(stream_len),
			bitrate,
		}
	}
}

/// Verifies that the stream is a WAV file and returns the size from the RIFF header
pub(crate) fn verify_wav<R>(data: &mut ByteReader<R>) -> Result<u32>
where
	R: Read + Seek,
{
	data.seek_to(0)?;
	let id = data.read_array::<12>()?;

	if &id[..4] != b"RIFF" {
		decode_err!(@BAIL Wave, "WAV file doesn't contain a RIFF chunk");
	}

	if &id[8..] != b"WAVE" {
		decode_err!(@BAIL Wave, "Found RIFF file, format is not WAVE");
	}

	log::debug!("File verified to be WAV");
	Ok(u32::from_le_bytes([id[4], id[5], id[6], id[7]]))
}

/// Walk every chunk of a WAV file
///
/// The walk does not stop early once a `data` chunk is found, every chunk up to the end of the
/// stream is visited.
///
/// # Errors
///
/// * The stream does not start with a `RIFF....WAVE` preamble
/// * An I/O error occurs while reading a chunk header
pub fn scan_chunks<R>(data: &mut ByteReader<R>) -> Result<RiffScan>
where
	R: Read + Seek,
{
	verify_wav(data)?;

	let mut scan = RiffScan::default();
	let mut chunks = Chunks::new(FIRST_CHUNK_OFFSET);

	while let Some(chunk) = chunks.next(data)? {
		match &chunk.fourcc {
			b"fmt " if scan.format.is_none() => {
				match Chunks::content(&chunk, data).and_then(|content| read_fmt_chunk(&content)) {
					Ok(format) => scan.format = Some(format),
					Err(e) => log::warn!("WAV: Skipping unreadable \"fmt \" chunk: {e}"),
				}
			},
			b"data" => {
				if scan.stream_len.is_some() {
					log::warn!("WAV: Found multiple \"data\" chunks, using the last one");
				}

				scan.stream_len = Some(chunk.size);
			},
			_ => {},
		}

		scan.chunks.push(chunk);
	}

	Ok(scan)
}
