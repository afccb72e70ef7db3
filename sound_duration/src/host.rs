//! Handle-based access for scripting hosts
//!
//! Scripting hosts can't hold a [`SoundFile`] directly. Instead, a [`SoundRegistry`] owns every
//! opened file and hands out opaque [`Handle`]s.
//!
//! The accessors follow the conventions of such hosts:
//!
//! * Unavailable integers are reported as `-1`
//! * Missing strings are reported as empty strings
//! * Strings are truncated to the caller's buffer size, which includes a NUL terminator
//!
//! # Examples
//!
//! ```rust,no_run
//! use sound_duration::config::OpenOptions;
//! use sound_duration::host::SoundRegistry;
//!
//! # fn main() -> sound_duration::error::Result<()> {
//! let options = OpenOptions::new().sound_directory("/srv/game/sound");
//! let mut registry: SoundRegistry = SoundRegistry::new(options);
//!
//! // Resolves to "/srv/game/sound/music/intro.mp3"
//! if let Some(handle) = registry.open_sound_file("music/intro.mp3", true)? {
//! 	println!("Length: {}", registry.length(handle)?);
//! 	println!("Artist: {}", registry.artist(handle, 64)?);
//!
//! 	registry.close(handle)?;
//! }
//! # Ok(()) }
//! ```

use crate::SoundFile;
use crate::config::OpenOptions;
use crate::error::{ErrorKind, Result, SoundError};

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::num::NonZeroU32;

// Artist, title, and album are copied through a buffer of this size, including the terminator
const SHORT_FIELD_BUFFER: usize = 128;
// Comment and genre
const LONG_FIELD_BUFFER: usize = 1024;

/// An opaque reference to a [`SoundFile`] owned by a [`SoundRegistry`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Handle(NonZeroU32);

impl Handle {
	/// Recreate a `Handle` from its raw value
	///
	/// This returns `None` for `0`, which is never a valid handle.
	pub fn from_raw(raw: u32) -> Option<Self> {
		NonZeroU32::new(raw).map(Self)
	}

	/// The raw value of the handle
	pub fn get(self) -> u32 {
		self.0.get()
	}
}

fn to_host_int<T>(value: Option<T>) -> i32
where
	T: TryInto<i32>,
{
	match value {
		Some(value) => value.try_into().unwrap_or(i32::MAX),
		None => -1,
	}
}

// Copies `value` as if through a NUL terminated buffer of `buffer_size` bytes
fn truncate_to_buffer(value: Option<&str>, buffer_size: usize) -> String {
	let Some(value) = value else {
		return String::new();
	};

	let max_len = buffer_size.saturating_sub(1);
	if value.len() <= max_len {
		return value.to_owned();
	}

	let mut end = max_len;
	while !value.is_char_boundary(end) {
		end -= 1;
	}

	value[..end].to_owned()
}

/// A collection of opened sound files, addressed by [`Handle`]
pub struct SoundRegistry<R = BufReader<File>> {
	options: OpenOptions,
	files: HashMap<Handle, SoundFile<R>>,
	next_handle: NonZeroU32,
}

impl SoundRegistry {
	/// Open a sound file by name
	///
	/// See [`OpenOptions::resolve`] for how `name` is turned into a path.
	///
	/// This returns `Ok(None)` if the file cannot be opened.
	///
	/// # Errors
	///
	/// `name` is longer than [`OpenOptions::max_path_len`]
	pub fn open_sound_file(&mut self, name: &str, relative: bool) -> Result<Option<Handle>> {
		match SoundFile::open_named(name, relative, &self.options) {
			Ok(file) => Ok(Some(self.insert(file))),
			Err(e) if matches!(e.kind(), ErrorKind::PathTooLong) => Err(e),
			Err(e) => {
				log::warn!("Failed to open \"{name}\": {e}");
				Ok(None)
			},
		}
	}
}

impl<R> SoundRegistry<R>
where
	R: Read + Seek,
{
	/// Create an empty `SoundRegistry`
	pub fn new(options: OpenOptions) -> Self {
		Self {
			options,
			files: HashMap::new(),
			next_handle: NonZeroU32::MIN,
		}
	}

	/// The options used to open files
	pub fn options(&self) -> &OpenOptions {
		&self.options
	}

	/// The number of open files
	pub fn len(&self) -> usize {
		self.files.len()
	}

	/// Whether there are no open files
	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}

	/// Take ownership of an already opened [`SoundFile`]
	pub fn insert(&mut self, file: SoundFile<R>) -> Handle {
		let mut handle = Handle(self.next_handle);
		while self.files.contains_key(&handle) {
			handle = Handle(handle.0.checked_add(1).unwrap_or(NonZeroU32::MIN));
		}

		self.next_handle = handle.0.checked_add(1).unwrap_or(NonZeroU32::MIN);
		self.files.insert(handle, file);

		handle
	}

	/// Borrow the [`SoundFile`] behind a handle
	pub fn get(&self, handle: Handle) -> Option<&SoundFile<R>> {
		self.files.get(&handle)
	}

	fn file(&self, handle: Handle) -> Result<&SoundFile<R>> {
		self.files
			.get(&handle)
			.ok_or_else(|| SoundError::new(ErrorKind::InvalidHandle(handle.get())))
	}

	fn file_mut(&mut self, handle: Handle) -> Result<&mut SoundFile<R>> {
		self.files
			.get_mut(&handle)
			.ok_or_else(|| SoundError::new(ErrorKind::InvalidHandle(handle.get())))
	}

	/// Close a file, invalidating its handle
	///
	/// # Errors
	///
	/// `handle` doesn't refer to an open file
	pub fn close(&mut self, handle: Handle) -> Result<()> {
		let Some(mut file) = self.files.remove(&handle) else {
			return Err(SoundError::new(ErrorKind::InvalidHandle(handle.get())));
		};

		file.close();
		Ok(())
	}

	/// The duration in whole seconds, rounded up, or `-1`
	///
	/// # Errors
	///
	/// `handle` doesn't refer to an open file
	pub fn length(&mut self, handle: Handle) -> Result<i32> {
		Ok(to_host_int(self.file_mut(handle)?.duration()))
	}

	/// The duration in fractional seconds, or `-1.0`
	///
	/// # Errors
	///
	/// `handle` doesn't refer to an open file
	pub fn precise_length(&mut self, handle: Handle) -> Result<f32> {
		Ok(self
			.file_mut(handle)?
			.precise_duration()
			.map_or(-1.0, |seconds| seconds as f32))
	}

	/// The bitrate (kbit/s), or `-1`
	///
	/// # Errors
	///
	/// `handle` doesn't refer to an open file
	pub fn bitrate(&self, handle: Handle) -> Result<i32> {
		Ok(to_host_int(self.file(handle)?.bitrate()))
	}

	/// The sample rate (Hz), or `-1`
	///
	/// # Errors
	///
	/// `handle` doesn't refer to an open file
	pub fn sampling_rate(&self, handle: Handle) -> Result<i32> {
		Ok(to_host_int(self.file(handle)?.sample_rate()))
	}

	/// The track number, or `-1`
	///
	/// # Errors
	///
	/// `handle` doesn't refer to an open file
	pub fn track_num(&self, handle: Handle) -> Result<i32> {
		Ok(to_host_int(self.file(handle)?.track()))
	}

	/// The year, or `-1`
	///
	/// # Errors
	///
	/// `handle` doesn't refer to an open file
	pub fn year(&self, handle: Handle) -> Result<i32> {
		Ok(to_host_int(self.file(handle)?.year()))
	}

	/// The artist, truncated to fit `max_len` bytes including a terminator
	///
	/// # Errors
	///
	/// `handle` doesn't refer to an open file
	pub fn artist(&self, handle: Handle, max_len: usize) -> Result<String> {
		let value = self.file(handle)?.artist();
		Ok(truncate_to_buffer(value, max_len.min(SHORT_FIELD_BUFFER)))
	}

	/// The title, truncated to fit `max_len` bytes including a terminator
	///
	/// # Errors
	///
	/// `handle` doesn't refer to an open file
	pub fn title(&self, handle: Handle, max_len: usize) -> Result<String> {
		let value = self.file(handle)?.title();
		Ok(truncate_to_buffer(value, max_len.min(SHORT_FIELD_BUFFER)))
	}

	/// The album, truncated to fit `max_len` bytes including a terminator
	///
	/// # Errors
	///
	/// `handle` doesn't refer to an open file
	pub fn album(&self, handle: Handle, max_len: usize) -> Result<String> {
		let value = self.file(handle)?.album();
		Ok(truncate_to_buffer(value, max_len.min(SHORT_FIELD_BUFFER)))
	}

	/// The comment, truncated to fit `max_len` bytes including a terminator
	///
	/// # Errors
	///
	/// `handle` doesn't refer to an open file
	pub fn comment(&self, handle: Handle, max_len: usize) -> Result<String> {
		let value = self.file(handle)?.comment();
		Ok(truncate_to_buffer(value, max_len.min(LONG_FIELD_BUFFER)))
	}

	/// The genre, truncated to fit `max_len` bytes including a terminator
	///
	/// # Errors
	///
	/// `handle` doesn't refer to an open file
	pub fn genre(&self, handle: Handle, max_len: usize) -> Result<String> {
		let value = self.file(handle)?.genre();
		Ok(truncate_to_buffer(value, max_len.min(LONG_FIELD_BUFFER)))
	}
}
