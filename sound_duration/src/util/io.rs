//! Bounds-checked access to a sound file's raw bytes

use crate::error::{ErrorKind, Result, SoundError};
use crate::macros::err;

use std::io::{Read, Seek, SeekFrom};

use byteorder::{ByteOrder, ReadBytesExt};

// TODO: https://github.com/rust-lang/rust/issues/59359
pub(crate) trait SeekStreamLen: Seek {
	fn stream_len_hack(&mut self) -> Result<u64> {
		let current_pos = self.stream_position()?;
		let len = self.seek(SeekFrom::End(0))?;

		self.seek(SeekFrom::Start(current_pos))?;

		Ok(len)
	}
}

impl<T> SeekStreamLen for T where T: Seek {}

fn out_of_bounds(offset: u64, len: u64) -> SoundError {
	SoundError::new(ErrorKind::OutOfBounds { offset, len })
}

/// A reader over the raw bytes of a sound file
///
/// The length of the stream is captured once, at construction. Every seek and read is checked
/// against it, so a request that would leave the stream fails with [`ErrorKind::OutOfBounds`] or
/// [`ErrorKind::Truncated`] instead of producing short reads.
///
/// This does no buffering of its own. It is up to the caller to wrap unbuffered readers in a
/// [`BufReader`](std::io::BufReader).
///
/// [`ErrorKind::OutOfBounds`]: crate::error::ErrorKind::OutOfBounds
/// [`ErrorKind::Truncated`]: crate::error::ErrorKind::Truncated
#[derive(Debug)]
pub struct ByteReader<R> {
	inner: R,
	pos: u64,
	len: u64,
}

impl<R> ByteReader<R>
where
	R: Read + Seek,
{
	/// Wrap a reader, positioning it at the start of the stream
	///
	/// # Errors
	///
	/// * The stream length cannot be determined
	/// * The reader cannot be rewound
	///
	/// # Examples
	///
	/// ```rust
	/// use sound_duration::io::ByteReader;
	/// use std::io::Cursor;
	///
	/// # fn main() -> sound_duration::error::Result<()> {
	/// let reader = ByteReader::new(Cursor::new(vec![0; 16]))?;
	/// assert_eq!(reader.len(), 16);
	/// # Ok(()) }
	/// ```
	pub fn new(mut inner: R) -> Result<Self> {
		let len = inner.stream_len_hack()?;
		inner.rewind()?;

		Ok(Self { inner, pos: 0, len })
	}

	/// The total length of the stream
	pub fn len(&self) -> u64 {
		self.len
	}

	/// The current position in the stream
	pub fn position(&self) -> u64 {
		self.pos
	}

	/// The number of bytes between the current position and the end of the stream
	pub fn remaining(&self) -> u64 {
		self.len.saturating_sub(self.pos)
	}

	/// Seek to an absolute offset
	///
	/// Seeking to exactly the end of the stream is allowed.
	///
	/// # Errors
	///
	/// * `offset` is past the end of the stream
	/// * The underlying seek fails
	pub fn seek_to(&mut self, offset: u64) -> Result<()> {
		if offset > self.len {
			return Err(out_of_bounds(offset, self.len));
		}

		self.inner.seek(SeekFrom::Start(offset))?;
		self.pos = offset;

		Ok(())
	}

	/// Skip `count` bytes forward
	///
	/// # Errors
	///
	/// See [`ByteReader::seek_to`]
	pub fn skip(&mut self, count: u64) -> Result<()> {
		let Some(offset) = self.pos.checked_add(count) else {
			return Err(out_of_bounds(u64::MAX, self.len));
		};

		self.seek_to(offset)
	}

	fn ensure_available(&self, count: u64) -> Result<()> {
		if self.remaining() < count {
			err!(Truncated);
		}

		Ok(())
	}

	/// Read exactly `N` bytes from the current position
	///
	/// # Errors
	///
	/// * Fewer than `N` bytes remain
	/// * The underlying read fails
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		self.ensure_available(N as u64)?;

		let mut buf = [0; N];
		self.inner.read_exact(&mut buf)?;
		self.pos += N as u64;

		Ok(buf)
	}

	/// Read exactly `N` bytes at an absolute offset
	///
	/// # Errors
	///
	/// See [`ByteReader::seek_to`] and [`ByteReader::read_array`]
	pub fn read_array_at<const N: usize>(&mut self, offset: u64) -> Result<[u8; N]> {
		self.seek_to(offset)?;
		self.read_array()
	}

	/// Read `count` bytes at an absolute offset
	///
	/// # Errors
	///
	/// See [`ByteReader::seek_to`] and [`ByteReader::read_array`]
	pub fn read_bytes_at(&mut self, offset: u64, count: usize) -> Result<Vec<u8>> {
		self.seek_to(offset)?;
		self.ensure_available(count as u64)?;

		let mut content = vec![0; count];
		self.inner.read_exact(&mut content)?;
		self.pos += count as u64;

		Ok(content)
	}

	/// Read a single byte
	///
	/// # Errors
	///
	/// See [`ByteReader::read_array`]
	pub fn read_u8(&mut self) -> Result<u8> {
		self.ensure_available(1)?;

		let byte = self.inner.read_u8()?;
		self.pos += 1;

		Ok(byte)
	}

	/// Read a `u16` in the byte order `B`
	///
	/// # Errors
	///
	/// See [`ByteReader::read_array`]
	pub fn read_u16<B: ByteOrder>(&mut self) -> Result<u16> {
		self.ensure_available(2)?;

		let value = self.inner.read_u16::<B>()?;
		self.pos += 2;

		Ok(value)
	}

	/// Read a `u32` in the byte order `B`
	///
	/// # Errors
	///
	/// See [`ByteReader::read_array`]
	pub fn read_u32<B: ByteOrder>(&mut self) -> Result<u32> {
		self.ensure_available(4)?;

		let value = self.inner.read_u32::<B>()?;
		self.pos += 4;

		Ok(value)
	}

	/// Unwrap the underlying reader
	pub fn into_inner(self) -> R {
		self.inner
	}
}

// Sequential byte access for sync searches, stops at the captured length
impl<R> Read for ByteReader<R>
where
	R: Read,
{
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		let remaining = self.len.saturating_sub(self.pos);
		let max = std::cmp::min(buf.len() as u64, remaining) as usize;

		let read = self.inner.read(&mut buf[..max])?;
		self.pos += read as u64;

		Ok(read)
	}
}
