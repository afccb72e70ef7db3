use crate::config::OpenOptions;
use crate::container::ContainerKind;
use crate::duration::{Analysis, DurationResult, Scan, analyze};
use crate::error::Result;
use crate::iff::WavFormat;
use crate::macros::err;
use crate::metadata::{AudioProperties, Metadata, TagFields};
use crate::mpeg::{FrameHeader, XingHeader};
use crate::util::io::ByteReader;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug)]
struct OpenSound<R> {
	reader: ByteReader<R>,
	metadata: Metadata,
	analysis: Option<Analysis>,
}

/// A read-only view of an opened sound file
///
/// This combines the duration computed from the file's own structure with the audio properties
/// and tag fields reported by the tag reader.
///
/// The file is analyzed the first time a duration (or a structure such as
/// [`SoundFile::frame_header`]) is requested, and the result is cached for the lifetime of the
/// file.
///
/// After [`SoundFile::close`], every accessor returns `None`.
///
/// # Examples
///
/// ```rust,no_run
/// use sound_duration::SoundFile;
/// use sound_duration::config::OpenOptions;
///
/// # fn main() -> sound_duration::error::Result<()> {
/// let mut file = SoundFile::open("sound/music/intro.mp3", &OpenOptions::new())?;
///
/// if let Some(seconds) = file.duration() {
/// 	println!("Playing for {seconds} seconds");
/// }
///
/// println!("Artist: {}", file.artist().unwrap_or("Unknown"));
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct SoundFile<R = BufReader<File>> {
	kind: ContainerKind,
	path: Option<PathBuf>,
	inner: Option<OpenSound<R>>,
}

impl SoundFile {
	/// Open a sound file by path
	///
	/// The container is determined by the extension of `path`.
	///
	/// # Errors
	///
	/// * The extension is not `.wav` or `.mp3`
	/// * The file cannot be opened
	/// * The tag reader is unable to read the file
	pub fn open<P>(path: P, options: &OpenOptions) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();
		let Some(kind) = ContainerKind::from_path(path) else {
			err!(UnsupportedFormat);
		};

		log::debug!("Opening {} as {kind:?}", path.display());

		let metadata = Metadata::read_from_path(path, options.read_tags)?;
		let file = File::open(path)?;

		let mut sound_file = Self::from_reader(kind, BufReader::new(file), metadata)?;
		sound_file.path = Some(path.to_path_buf());

		Ok(sound_file)
	}

	/// Open a sound file by name
	///
	/// See [`OpenOptions::resolve`] for how `name` is turned into a path.
	///
	/// # Errors
	///
	/// See [`OpenOptions::resolve`] and [`SoundFile::open`]
	pub fn open_named(name: &str, relative: bool, options: &OpenOptions) -> Result<Self> {
		let path = options.resolve(name, relative)?;
		Self::open(path, options)
	}
}

impl<R> SoundFile<R>
where
	R: Read + Seek,
{
	/// Create a `SoundFile` from an existing reader
	///
	/// Without a path, there is nothing for the tag reader to open, so the [`Metadata`] must be
	/// provided. Note that no duration can be computed without [`AudioProperties`].
	///
	/// # Errors
	///
	/// The length of `reader` cannot be determined
	///
	/// # Examples
	///
	/// ```rust
	/// use sound_duration::metadata::{AudioProperties, Metadata};
	/// use sound_duration::{ContainerKind, SoundFile};
	/// use std::io::Cursor;
	/// use std::time::Duration;
	///
	/// # fn main() -> sound_duration::error::Result<()> {
	/// let properties = AudioProperties::new(Some(128), Some(44100), Duration::ZERO);
	/// let metadata = Metadata::new(Some(properties), None);
	///
	/// let mut file =
	/// 	SoundFile::from_reader(ContainerKind::Mpeg, Cursor::new(Vec::new()), metadata)?;
	/// assert_eq!(file.duration(), None);
	/// assert_eq!(file.bitrate(), Some(128));
	/// # Ok(()) }
	/// ```
	pub fn from_reader(kind: ContainerKind, reader: R, metadata: Metadata) -> Result<Self> {
		Ok(Self {
			kind,
			path: None,
			inner: Some(OpenSound {
				reader: ByteReader::new(reader)?,
				metadata,
				analysis: None,
			}),
		})
	}

	/// The container of the file
	pub fn kind(&self) -> ContainerKind {
		self.kind
	}

	/// The path the file was opened from, if any
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Whether the file is still open
	pub fn is_open(&self) -> bool {
		self.inner.is_some()
	}

	/// Close the file, releasing the reader
	///
	/// This is also done when the `SoundFile` is dropped.
	pub fn close(&mut self) {
		if self.inner.take().is_some() {
			log::debug!("Closed {:?} file", self.kind);
		}
	}

	fn analysis(&mut self) -> Option<&Analysis> {
		let sound = self.inner.as_mut()?;

		let Some(properties) = sound.metadata.properties else {
			log::warn!("No audio properties available, unable to calculate duration");
			return None;
		};

		if sound.analysis.is_none() {
			let bitrate = properties.bitrate.unwrap_or(0);
			sound.analysis = Some(analyze(self.kind, &mut sound.reader, bitrate));
		}

		sound.analysis.as_ref()
	}

	/// The duration of the file in whole seconds, rounded up
	///
	/// This is `None` if the file is closed, the tag reader provided no audio properties, or
	/// the file's structure couldn't be understood.
	pub fn duration(&mut self) -> Option<u64> {
		self.analysis()?.measurement.whole_seconds()
	}

	/// The duration of the file in fractional seconds
	///
	/// See [`SoundFile::duration`]
	pub fn precise_duration(&mut self) -> Option<f64> {
		self.analysis()?.measurement.precise_seconds()
	}

	/// The duration of the file and the method used to determine it
	///
	/// This is `None` if the file is closed or the tag reader provided no audio properties.
	pub fn duration_result(&mut self) -> Option<DurationResult> {
		Some(self.analysis()?.measurement.into())
	}

	/// The decoded `fmt ` chunk of a WAV file
	pub fn wav_format(&mut self) -> Option<WavFormat> {
		match &self.analysis()?.scan {
			Scan::Wave(scan) => scan.format(),
			_ => None,
		}
	}

	/// The header of the first frame of an MP3 file
	pub fn frame_header(&mut self) -> Option<FrameHeader> {
		match &self.analysis()?.scan {
			Scan::Mpeg(scan) => Some(*scan.first_frame()),
			_ => None,
		}
	}

	/// The Xing/Info header of an MP3 file
	pub fn xing_header(&mut self) -> Option<XingHeader> {
		match &self.analysis()?.scan {
			Scan::Mpeg(scan) => scan.xing_header().cloned(),
			_ => None,
		}
	}

	fn properties(&self) -> Option<&AudioProperties> {
		self.inner.as_ref()?.metadata.properties()
	}

	fn tag(&self) -> Option<&TagFields> {
		self.inner.as_ref()?.metadata.tag()
	}

	/// Audio bitrate (kbit/s), as reported by the tag reader
	pub fn bitrate(&self) -> Option<u32> {
		self.properties()?.bitrate()
	}

	/// Sample rate (Hz), as reported by the tag reader
	pub fn sample_rate(&self) -> Option<u32> {
		self.properties()?.sample_rate()
	}

	/// The duration reported by the tag reader
	///
	/// This is often inaccurate, prefer [`SoundFile::duration`].
	pub fn reported_length(&self) -> Option<Duration> {
		Some(self.properties()?.length())
	}

	/// Artist
	pub fn artist(&self) -> Option<&str> {
		self.tag()?.artist()
	}

	/// Title
	pub fn title(&self) -> Option<&str> {
		self.tag()?.title()
	}

	/// Album
	pub fn album(&self) -> Option<&str> {
		self.tag()?.album()
	}

	/// Genre
	pub fn genre(&self) -> Option<&str> {
		self.tag()?.genre()
	}

	/// Comment
	pub fn comment(&self) -> Option<&str> {
		self.tag()?.comment()
	}

	/// Track number
	pub fn track(&self) -> Option<u32> {
		self.tag()?.track()
	}

	/// Year
	pub fn year(&self) -> Option<u32> {
		self.tag()?.year()
	}
}
