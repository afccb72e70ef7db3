//! Contains the errors that can arise within sound_duration
//!
//! The primary error is [`SoundError`]. The type of error is determined by [`ErrorKind`].
//!
//! Only failures to open or understand a file at all are surfaced through these types. Anomalies
//! found while estimating a duration (bad frame headers, missing VBR headers, truncated chunks)
//! are absorbed, see [`DurationMethod`](crate::duration::DurationMethod).

use crate::container::ContainerKind;

use std::fmt::{Debug, Display, Formatter};

/// Alias for `Result<T, SoundError>`
pub type Result<T> = std::result::Result<T, SoundError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// Opening
	/// The file extension does not map to a supported [`ContainerKind`]
	UnsupportedFormat,
	/// The provided name exceeds
	/// [`OpenOptions::max_path_len`](crate::config::OpenOptions::max_path_len)
	PathTooLong,
	/// The handle does not refer to an open file in a [`SoundRegistry`](crate::host::SoundRegistry)
	InvalidHandle(u32),

	// File data related errors
	/// Fewer bytes are available than the structure being read requires
	Truncated,
	/// A seek or read was requested outside of the stream
	OutOfBounds {
		/// The requested offset
		offset: u64,
		/// The length of the stream
		len: u64,
	},
	/// Errors that occur while decoding a container
	FileDecoding(FileDecodingError),

	// Conversions for external errors
	/// Errors raised by the external tag reader
	Metadata(lofty::error::LoftyError),
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
}

/// An error that arises while decoding a file
pub struct FileDecodingError {
	format: Option<ContainerKind>,
	description: &'static str,
}

impl FileDecodingError {
	/// Create a `FileDecodingError` from a [`ContainerKind`] and description
	#[must_use]
	pub const fn new(format: ContainerKind, description: &'static str) -> Self {
		Self {
			format: Some(format),
			description,
		}
	}

	/// Create a `FileDecodingError` without binding it to a [`ContainerKind`]
	pub fn from_description(description: &'static str) -> Self {
		Self {
			format: None,
			description,
		}
	}

	/// Returns the associated [`ContainerKind`], if one exists
	pub fn format(&self) -> Option<ContainerKind> {
		self.format
	}

	/// Returns the error description
	pub fn description(&self) -> &str {
		self.description
	}
}

impl Debug for FileDecodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(format) = self.format {
			write!(f, "{:?}: {:?}", format, self.description)
		} else {
			write!(f, "{:?}", self.description)
		}
	}
}

impl Display for FileDecodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(format) = self.format {
			write!(f, "{:?}: {}", format, self.description)
		} else {
			write!(f, "{}", self.description)
		}
	}
}

/// Errors that could occur within sound_duration
pub struct SoundError {
	pub(crate) kind: ErrorKind,
}

impl SoundError {
	/// Create a `SoundError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use sound_duration::error::{ErrorKind, SoundError};
	///
	/// let unsupported = SoundError::new(ErrorKind::UnsupportedFormat);
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use sound_duration::error::{ErrorKind, SoundError};
	///
	/// let unsupported = SoundError::new(ErrorKind::UnsupportedFormat);
	/// if let ErrorKind::UnsupportedFormat = unsupported.kind() {
	/// 	println!("Only WAV and MP3 files can be opened");
	/// }
	/// ```
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}
}

impl std::error::Error for SoundError {}

impl Debug for SoundError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<FileDecodingError> for SoundError {
	fn from(input: FileDecodingError) -> Self {
		Self {
			kind: ErrorKind::FileDecoding(input),
		}
	}
}

impl From<lofty::error::LoftyError> for SoundError {
	fn from(input: lofty::error::LoftyError) -> Self {
		Self {
			kind: ErrorKind::Metadata(input),
		}
	}
}

impl From<std::io::Error> for SoundError {
	fn from(input: std::io::Error) -> Self {
		if input.kind() == std::io::ErrorKind::UnexpectedEof {
			return Self {
				kind: ErrorKind::Truncated,
			};
		}

		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl Display for SoundError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::Metadata(ref err) => write!(f, "Tag reader: {err}"),
			ErrorKind::Io(ref err) => write!(f, "{err}"),

			ErrorKind::UnsupportedFormat => write!(
				f,
				"Unsupported file extension, expected \".wav\" or \".mp3\""
			),
			ErrorKind::PathTooLong => write!(f, "Specified path is too long"),
			ErrorKind::InvalidHandle(handle) => write!(f, "Invalid sound-file handle {handle:x}"),

			// Files
			ErrorKind::Truncated => write!(
				f,
				"Encountered fewer bytes than the structure being read requires"
			),
			ErrorKind::OutOfBounds { offset, len } => write!(
				f,
				"Attempted to access offset {offset} in a stream of {len} bytes"
			),
			ErrorKind::FileDecoding(ref file_decode_err) => write!(f, "{file_decode_err}"),
		}
	}
}
