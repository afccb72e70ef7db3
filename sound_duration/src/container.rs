//! Container detection

use std::ffi::OsStr;
use std::path::Path;

/// List of extensions that can be opened
///
/// Also update [`ContainerKind::from_ext()`] when changing this.
pub const EXTENSIONS: &[&str] = &["wav", "mp3"];

/// The container of an opened sound file
///
/// This is decided once, from the extension, when a file is opened. Nothing re-detects it
/// afterwards.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum ContainerKind {
	/// A RIFF/WAVE file
	Wave,
	/// An MPEG audio stream (MP3)
	Mpeg,
}

impl ContainerKind {
	/// Attempts to determine a [`ContainerKind`] from an extension
	///
	/// # Examples
	///
	/// ```rust
	/// use sound_duration::ContainerKind;
	///
	/// assert_eq!(ContainerKind::from_ext("mp3"), Some(ContainerKind::Mpeg));
	/// assert_eq!(ContainerKind::from_ext("WAV"), Some(ContainerKind::Wave));
	/// assert_eq!(ContainerKind::from_ext("flac"), None);
	/// ```
	pub fn from_ext<E>(ext: E) -> Option<Self>
	where
		E: AsRef<OsStr>,
	{
		let ext = ext.as_ref().to_str()?.to_ascii_lowercase();

		// Also update `EXTENSIONS` above
		match ext.as_str() {
			"wav" => Some(Self::Wave),
			"mp3" => Some(Self::Mpeg),
			_ => None,
		}
	}

	/// Attempts to determine a [`ContainerKind`] from a path
	///
	/// # Examples
	///
	/// ```rust
	/// use sound_duration::ContainerKind;
	/// use std::path::Path;
	///
	/// let path = Path::new("sound/music/intro.mp3");
	/// assert_eq!(ContainerKind::from_path(path), Some(ContainerKind::Mpeg));
	/// ```
	pub fn from_path<P>(path: P) -> Option<Self>
	where
		P: AsRef<Path>,
	{
		let ext = path.as_ref().extension();
		ext.and_then(Self::from_ext)
	}
}
