//! Values provided by the external tag reader
//!
//! Tag fields and the reader's own audio properties are captured once, when a file is opened.
//! The tag reader's duration is kept for reference only, [`SoundFile`](crate::SoundFile) computes
//! its own.

use crate::error::Result;

use std::borrow::Cow;
use std::path::Path;
use std::time::Duration;

use lofty::config::ParseOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag};

/// Audio properties as reported by the tag reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudioProperties {
	pub(crate) bitrate: Option<u32>,
	pub(crate) sample_rate: Option<u32>,
	pub(crate) length: Duration,
}

impl AudioProperties {
	/// Create a new `AudioProperties`
	pub const fn new(bitrate: Option<u32>, sample_rate: Option<u32>, length: Duration) -> Self {
		Self {
			bitrate,
			sample_rate,
			length,
		}
	}

	/// Audio bitrate (kbit/s)
	pub fn bitrate(&self) -> Option<u32> {
		self.bitrate
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> Option<u32> {
		self.sample_rate
	}

	/// The duration reported by the tag reader
	pub fn length(&self) -> Duration {
		self.length
	}
}

/// Tag fields as reported by the tag reader
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagFields {
	pub(crate) artist: Option<String>,
	pub(crate) title: Option<String>,
	pub(crate) album: Option<String>,
	pub(crate) genre: Option<String>,
	pub(crate) comment: Option<String>,
	pub(crate) track: Option<u32>,
	pub(crate) year: Option<u32>,
}

macro_rules! tag_fields {
	($($name:ident, $setter:ident);+ $(;)?) => {
		$(
			#[doc = concat!("Returns the ", stringify!($name))]
			pub fn $name(&self) -> Option<&str> {
				self.$name.as_deref()
			}

			#[doc = concat!("Sets the ", stringify!($name))]
			pub fn $setter(&mut self, value: String) {
				self.$name = Some(value);
			}
		)+
	};
}

impl TagFields {
	tag_fields! {
		artist,  set_artist;
		title,   set_title;
		album,   set_album;
		genre,   set_genre;
		comment, set_comment;
	}

	/// Returns the track number
	pub fn track(&self) -> Option<u32> {
		self.track
	}

	/// Sets the track number
	pub fn set_track(&mut self, value: u32) {
		self.track = Some(value);
	}

	/// Returns the year
	pub fn year(&self) -> Option<u32> {
		self.year
	}

	/// Sets the year
	pub fn set_year(&mut self, value: u32) {
		self.year = Some(value);
	}

	fn from_tag(tag: &Tag) -> Self {
		Self {
			artist: tag.artist().map(Cow::into_owned),
			title: tag.title().map(Cow::into_owned),
			album: tag.album().map(Cow::into_owned),
			genre: tag.genre().map(Cow::into_owned),
			comment: tag.comment().map(Cow::into_owned),
			track: tag.track(),
			year: tag.year(),
		}
	}
}

/// Everything the tag reader reports about a file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
	pub(crate) properties: Option<AudioProperties>,
	pub(crate) tag: Option<TagFields>,
}

impl Metadata {
	/// Create a `Metadata` by hand
	///
	/// This is useful for readers that aren't backed by a path.
	///
	/// # Examples
	///
	/// ```rust
	/// use sound_duration::metadata::{AudioProperties, Metadata, TagFields};
	/// use std::time::Duration;
	///
	/// let mut tag = TagFields::default();
	/// tag.set_artist(String::from("Foo artist"));
	///
	/// let properties = AudioProperties::new(Some(128), Some(44100), Duration::from_secs(30));
	/// let metadata = Metadata::new(Some(properties), Some(tag));
	///
	/// assert_eq!(metadata.tag().and_then(|t| t.artist()), Some("Foo artist"));
	/// ```
	pub fn new(properties: Option<AudioProperties>, tag: Option<TagFields>) -> Self {
		Self { properties, tag }
	}

	/// Read the audio properties and, if `read_tags` is set, the tag fields of a file
	///
	/// The primary tag of the file is preferred, falling back to the first tag found.
	///
	/// # Errors
	///
	/// The tag reader is unable to open or understand the file
	pub fn read_from_path<P>(path: P, read_tags: bool) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let tagged_file = Probe::open(path)?
			.options(ParseOptions::new().read_tags(read_tags))
			.read()?;

		let file_properties = tagged_file.properties();
		let bitrate = file_properties.audio_bitrate();
		let sample_rate = file_properties.sample_rate();

		let properties = if bitrate.is_none() && sample_rate.is_none() {
			log::debug!("Tag reader provided no audio properties");
			None
		} else {
			Some(AudioProperties {
				bitrate,
				sample_rate,
				length: file_properties.duration(),
			})
		};

		let tag = tagged_file
			.primary_tag()
			.or_else(|| tagged_file.first_tag())
			.map(TagFields::from_tag);

		Ok(Self { properties, tag })
	}

	/// The audio properties, if any were available
	pub fn properties(&self) -> Option<&AudioProperties> {
		self.properties.as_ref()
	}

	/// The tag fields, if the file has a tag
	pub fn tag(&self) -> Option<&TagFields> {
		self.tag.as_ref()
	}
}
