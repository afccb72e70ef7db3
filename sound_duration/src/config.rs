//! Options for opening sound files

use crate::container::ContainerKind;
use crate::error::Result;
use crate::macros::err;

use std::path::{Path, PathBuf};

/// Options to control how sound files are located and opened
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct OpenOptions {
	pub(crate) sound_directory: PathBuf,
	pub(crate) max_path_len: usize,
	pub(crate) read_tags: bool,
}

impl Default for OpenOptions {
	/// The default implementation for `OpenOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// OpenOptions {
	/// 	sound_directory: PathBuf::from("sound"),
	/// 	max_path_len: 253,
	/// 	read_tags: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl OpenOptions {
	/// Default directory that relative names are resolved against
	pub const DEFAULT_SOUND_DIRECTORY: &'static str = "sound";

	/// Default maximum name length, in bytes
	pub const DEFAULT_MAX_PATH_LEN: usize = 253;

	/// Creates a new `OpenOptions`, alias for `Default` implementation
	///
	/// See also: [`OpenOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use sound_duration::config::OpenOptions;
	///
	/// let open_options = OpenOptions::new();
	/// ```
	#[must_use]
	pub fn new() -> Self {
		Self {
			sound_directory: PathBuf::from(Self::DEFAULT_SOUND_DIRECTORY),
			max_path_len: Self::DEFAULT_MAX_PATH_LEN,
			read_tags: true,
		}
	}

	/// The directory that relative names are resolved against
	///
	/// # Examples
	///
	/// ```rust
	/// use sound_duration::config::OpenOptions;
	///
	/// let open_options = OpenOptions::new().sound_directory("/srv/game/sound");
	/// ```
	pub fn sound_directory<P>(mut self, sound_directory: P) -> Self
	where
		P: Into<PathBuf>,
	{
		self.sound_directory = sound_directory.into();
		self
	}

	/// The maximum length of a name, in bytes
	///
	/// Longer names are rejected with
	/// [`ErrorKind::PathTooLong`](crate::error::ErrorKind::PathTooLong) before anything is opened.
	///
	/// # Examples
	///
	/// ```rust
	/// use sound_duration::config::OpenOptions;
	///
	/// let open_options = OpenOptions::new().max_path_len(64);
	/// ```
	pub fn max_path_len(mut self, max_path_len: usize) -> Self {
		self.max_path_len = max_path_len;
		self
	}

	/// Whether or not to read the tag fields
	///
	/// The tag reader's audio properties are always read.
	///
	/// # Examples
	///
	/// ```rust
	/// use sound_duration::config::OpenOptions;
	///
	/// // By default, `read_tags` is enabled. Here, we don't want to read them.
	/// let open_options = OpenOptions::new().read_tags(false);
	/// ```
	pub fn read_tags(mut self, read_tags: bool) -> Self {
		self.read_tags = read_tags;
		self
	}

	/// Resolve a name to a path
	///
	/// If `relative` is set, `name` is joined onto the sound directory. Otherwise it is used as-is.
	///
	/// # Errors
	///
	/// * `name` is longer than [`OpenOptions::max_path_len`]
	/// * The extension of `name` doesn't map to a [`ContainerKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use sound_duration::config::OpenOptions;
	/// use std::path::Path;
	///
	/// # fn main() -> sound_duration::error::Result<()> {
	/// let path = OpenOptions::new().resolve("music/intro.mp3", true)?;
	/// assert_eq!(path, Path::new("sound/music/intro.mp3"));
	/// # Ok(()) }
	/// ```
	pub fn resolve(&self, name: &str, relative: bool) -> Result<PathBuf> {
		if name.len() > self.max_path_len {
			log::debug!(
				"Rejecting name of {} bytes (max: {})",
				name.len(),
				self.max_path_len
			);
			err!(PathTooLong);
		}

		if ContainerKind::from_path(name).is_none() {
			err!(UnsupportedFormat);
		}

		if relative {
			return Ok(self.sound_directory.join(name));
		}

		Ok(Path::new(name).to_path_buf())
	}
}

#[cfg(test)]
mod tests {
	use super::OpenOptions;
	use crate::error::ErrorKind;

	use std::path::Path;

	#[test_log::test]
	fn resolve() {
		let options = OpenOptions::new().sound_directory("base");

		assert_eq!(
			options.resolve("a/b.wav", true).unwrap(),
			Path::new("base/a/b.wav")
		);
		assert_eq!(
			options.resolve("/abs/b.MP3", false).unwrap(),
			Path::new("/abs/b.MP3")
		);
	}

	#[test_log::test]
	fn resolve_rejects() {
		let options = OpenOptions::new().max_path_len(8);

		// Exactly at the limit
		assert!(options.resolve("abcd.wav", false).is_ok());
		assert!(matches!(
			options.resolve("abcde.wav", false).unwrap_err().kind(),
			ErrorKind::PathTooLong
		));
		assert!(matches!(
			options.resolve("a.flac", false).unwrap_err().kind(),
			ErrorKind::UnsupportedFormat
		));
	}

	#[test_log::test]
	fn defaults() {
		let options = OpenOptions::default();
		assert_eq!(options, OpenOptions::new());
		assert_eq!(
			options.resolve("x.wav", true).unwrap(),
			Path::new("sound/x.wav")
		);
	}
}
