//! Duration estimation
//!
//! Durations are computed from the container structure rather than taken from a tag reader.
//! Every estimate is available in two forms:
//!
//! * Whole seconds, rounded up (integer math)
//! * Fractional seconds (floating point math)
//!
//! The two are computed independently from the same raw quantities, neither is derived from the
//! other.

use crate::container::ContainerKind;
use crate::iff::wav::{RiffScan, scan_chunks};
use crate::mpeg::read::{MpegScan, scan_frames};
use crate::util::io::ByteReader;

use std::io::{Read, Seek};

/// How a duration was determined
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DurationMethod {
	/// WAV: size of the `data` chunk divided by the byte rate
	RiffByteRate,
	/// MP3: frame count from a Xing/Info header
	XingVbr,
	/// MP3: frame count estimated by assuming every frame matches the first
	ConstantBitrateFallback,
	/// Nothing usable was found
	Unavailable,
}

/// The raw quantities a duration is computed from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Measurement {
	RiffByteRate {
		stream_len: u64,
		// kbit/s
		bitrate: u32,
	},
	XingVbr {
		samples_per_frame: u16,
		sample_rate: u32,
		frames: u32,
	},
	ConstantBitrate {
		frame_len: u32,
		frames: u64,
		// kbit/s
		bitrate: u32,
	},
	Unavailable,
}

impl Measurement {
	pub(crate) fn method(&self) -> DurationMethod {
		match self {
			Measurement::RiffByteRate { .. } => DurationMethod::RiffByteRate,
			Measurement::XingVbr { .. } => DurationMethod::XingVbr,
			Measurement::ConstantBitrate { .. } => DurationMethod::ConstantBitrateFallback,
			Measurement::Unavailable => DurationMethod::Unavailable,
		}
	}

	/// The duration in whole seconds, rounded up
	pub(crate) fn whole_seconds(&self) -> Option<u64> {
		match *self {
			Measurement::RiffByteRate {
				stream_len,
				bitrate,
			} => {
				let byte_rate = u64::from(bitrate) * 1000 / 8;
				if byte_rate == 0 {
					return Some(0);
				}

				Some(stream_len.div_ceil(byte_rate))
			},
			Measurement::XingVbr {
				samples_per_frame,
				sample_rate,
				frames,
			} => {
				if sample_rate == 0 {
					return Some(0);
				}

				let total_samples = u64::from(samples_per_frame) * u64::from(frames);
				Some(total_samples.div_ceil(u64::from(sample_rate)))
			},
			Measurement::ConstantBitrate {
				frame_len,
				frames,
				bitrate,
			} => {
				let byte_rate = u64::from(bitrate) * 125;
				if frame_len == 0 || byte_rate == 0 {
					return Some(0);
				}

				let stream_len = u64::from(frame_len).saturating_mul(frames);
				Some(stream_len.div_ceil(byte_rate))
			},
			Measurement::Unavailable => None,
		}
	}

	/// The duration in fractional seconds
	pub(crate) fn precise_seconds(&self) -> Option<f64> {
		match *self {
			Measurement::RiffByteRate {
				stream_len,
				bitrate,
			} => {
				let byte_rate = f64::from(bitrate) * 1000.0 / 8.0;
				if byte_rate <= 0.0 {
					return Some(0.0);
				}

				Some(stream_len as f64 / byte_rate)
			},
			Measurement::XingVbr {
				samples_per_frame,
				sample_rate,
				frames,
			} => {
				if sample_rate == 0 {
					return Some(0.0);
				}

				let time_per_frame = f64::from(samples_per_frame) / f64::from(sample_rate);
				Some(time_per_frame * f64::from(frames))
			},
			Measurement::ConstantBitrate {
				frame_len,
				frames,
				bitrate,
			} => {
				let byte_rate = f64::from(bitrate) * 125.0;
				if frame_len == 0 || byte_rate <= 0.0 {
					return Some(0.0);
				}

				Some(f64::from(frame_len) * frames as f64 / byte_rate)
			},
			Measurement::Unavailable => None,
		}
	}
}

/// An estimated duration and the method used to get it
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DurationResult {
	pub(crate) seconds: f64,
	pub(crate) method: DurationMethod,
}

impl DurationResult {
	/// The duration in fractional seconds
	///
	/// This is `None` when the method is [`DurationMethod::Unavailable`]. Note that a computed
	/// duration of `0.0` is still `Some`.
	pub fn seconds(&self) -> Option<f64> {
		if self.is_available() {
			return Some(self.seconds);
		}

		None
	}

	/// How the duration was determined
	pub fn method(&self) -> DurationMethod {
		self.method
	}

	/// Whether a duration could be computed at all
	pub fn is_available(&self) -> bool {
		self.method != DurationMethod::Unavailable
	}
}

impl From<Measurement> for DurationResult {
	fn from(measurement: Measurement) -> Self {
		Self {
			seconds: measurement.precise_seconds().unwrap_or_default(),
			method: measurement.method(),
		}
	}
}

/// The structures found while measuring a stream
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Scan {
	Wave(RiffScan),
	Mpeg(MpegScan),
	Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Analysis {
	pub(crate) scan: Scan,
	pub(crate) measurement: Measurement,
}

impl Analysis {
	fn failed() -> Self {
		Self {
			scan: Scan::Failed,
			measurement: Measurement::Unavailable,
		}
	}
}

pub(crate) fn analyze<R>(kind: ContainerKind, data: &mut ByteReader<R>, bitrate: u32) -> Analysis
where
	R: Read + Seek,
{
	match kind {
		ContainerKind::Wave => match scan_chunks(data) {
			Ok(scan) => Analysis {
				measurement: scan.measure(bitrate),
				scan: Scan::Wave(scan),
			},
			Err(e) => {
				log::warn!("WAV: Unable to scan chunks: {e}");
				Analysis::failed()
			},
		},
		ContainerKind::Mpeg => match scan_frames(data) {
			Ok(Some(scan)) => Analysis {
				measurement: scan.measure(),
				scan: Scan::Mpeg(scan),
			},
			Ok(None) => {
				log::warn!("MPEG: No audio frames found");
				Analysis::failed()
			},
			Err(e) => {
				log::warn!("MPEG: Unable to scan frames: {e}");
				Analysis::failed()
			},
		},
	}
}

/// Estimate the duration of a stream
///
/// `bitrate` (kbit/s) is only used for [`ContainerKind::Wave`], where the byte rate is derived
/// from it.
/// It is expected to come from the external tag reader's audio properties, see
/// [`AudioProperties::bitrate`](crate::metadata::AudioProperties::bitrate).
///
/// Parsing errors are never returned, they result in [`DurationMethod::Unavailable`] instead.
///
/// # Examples
///
/// ```rust
/// use sound_duration::ContainerKind;
/// use sound_duration::duration::{DurationMethod, estimate};
/// use sound_duration::io::ByteReader;
/// use std::io::Cursor;
///
/// # fn main() -> sound_duration::error::Result<()> {
/// let mut reader = ByteReader::new(Cursor::new(b"not a sound file".to_vec()))?;
///
/// let duration = estimate(ContainerKind::Wave, &mut reader, 1411);
/// assert_eq!(duration.method(), DurationMethod::Unavailable);
/// assert_eq!(duration.seconds(), None);
/// # Ok(()) }
/// ```
pub fn estimate<R>(kind: ContainerKind, data: &mut ByteReader<R>, bitrate: u32) -> DurationResult
where
	R: Read + Seek,
{
	analyze(kind, data, bitrate).measurement.into()
}

#[cfg(test)]
mod tests {
	use super::{DurationMethod, DurationResult, Measurement, estimate};
	use crate::container::ContainerKind;
	use crate::util::io::ByteReader;

	use std::io::Cursor;

	fn assert_close(actual: Option<f64>, expected: f64) {
		let actual = actual.unwrap();
		assert!(
			(actual - expected).abs() < 0.01,
			"expected ~{expected}, got {actual}"
		);
	}

	#[test_log::test]
	fn wav_byte_rate() {
		// 60 seconds of 16-bit stereo at 44.1 kHz, with the bitrate truncated to 1411 kbit/s
		let measurement = Measurement::RiffByteRate {
			stream_len: 10_584_000,
			bitrate: 1411,
		};

		assert_close(measurement.precise_seconds(), 60.008);
		assert_eq!(measurement.whole_seconds(), Some(61));

		let exact = Measurement::RiffByteRate {
			stream_len: 176_375 * 3,
			bitrate: 1411,
		};
		assert_eq!(exact.whole_seconds(), Some(3));
		assert_eq!(exact.precise_seconds(), Some(3.0));
	}

	#[test_log::test]
	fn zero_bitrate() {
		let measurement = Measurement::RiffByteRate {
			stream_len: 10_584_000,
			bitrate: 0,
		};

		assert_eq!(measurement.whole_seconds(), Some(0));
		assert_eq!(measurement.precise_seconds(), Some(0.0));
		assert_eq!(measurement.method(), DurationMethod::RiffByteRate);
	}

	#[test_log::test]
	fn cbr() {
		let measurement = Measurement::ConstantBitrate {
			frame_len: 417,
			frames: 1000,
			bitrate: 128,
		};

		assert_close(measurement.precise_seconds(), 26.06);
		assert_eq!(measurement.whole_seconds(), Some(27));

		let unusable = Measurement::ConstantBitrate {
			frame_len: 0,
			frames: 0,
			bitrate: 0,
		};
		assert_eq!(unusable.whole_seconds(), Some(0));
		assert_eq!(unusable.precise_seconds(), Some(0.0));
		assert_eq!(unusable.method(), DurationMethod::ConstantBitrateFallback);
	}

	#[test_log::test]
	fn xing() {
		let measurement = Measurement::XingVbr {
			samples_per_frame: 1152,
			sample_rate: 44100,
			frames: 5000,
		};

		assert_close(measurement.precise_seconds(), 130.61);
		assert_eq!(measurement.whole_seconds(), Some(131));
	}

	#[test_log::test]
	fn unavailable() {
		assert_eq!(Measurement::Unavailable.whole_seconds(), None);
		assert_eq!(Measurement::Unavailable.precise_seconds(), None);

		let result = DurationResult::from(Measurement::Unavailable);
		assert!(!result.is_available());
		assert_eq!(result.seconds(), None);

		// A computed zero is still available
		let result = DurationResult::from(Measurement::RiffByteRate {
			stream_len: 0,
			bitrate: 1411,
		});
		assert!(result.is_available());
		assert_eq!(result.seconds(), Some(0.0));
	}

	#[test_log::test]
	fn estimate_is_idempotent() {
		let mut frame = vec![0; 417];
		frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);

		let mut reader = ByteReader::new(Cursor::new(frame.repeat(1000))).unwrap();

		let first = estimate(ContainerKind::Mpeg, &mut reader, 0);
		let second = estimate(ContainerKind::Mpeg, &mut reader, 0);

		assert_eq!(first, second);
		assert_eq!(first.method(), DurationMethod::ConstantBitrateFallback);
		assert_close(first.seconds(), 26.06);
	}

	#[test_log::test]
	fn estimate_wrong_container() {
		// An MP3 stream handed to the WAV scanner
		let mut reader = ByteReader::new(Cursor::new(vec![0xFF, 0xFB, 0x90, 0x00])).unwrap();
		let result = estimate(ContainerKind::Wave, &mut reader, 128);
		assert_eq!(result.method(), DurationMethod::Unavailable);

		let mut reader = ByteReader::new(Cursor::new(vec![0; 1024])).unwrap();
		let result = estimate(ContainerKind::Mpeg, &mut reader, 128);
		assert_eq!(result.method(), DurationMethod::Unavailable);
	}
}
