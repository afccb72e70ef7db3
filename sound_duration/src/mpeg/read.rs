use super::header::{FrameHeader, rev_search_for_frame_header, search_for_frame_sync};
use super::xing::{XingHeader, read_xing_header};
use crate::duration::Measurement;
use crate::error::Result;
use crate::util::io::ByteReader;

use std::io::{Read, Seek};

const ID3V2_HEADER_SIZE: u64 = 10;
const ID3V2_FOOTER_SIZE: u64 = 10;
const ID3V2_FOOTER_FLAG: u8 = 0x10;

const ID3V1_TAG_SIZE: u64 = 128;

const APE_FOOTER_SIZE: u64 = 32;
const APE_CONTAINS_HEADER_FLAG: u32 = 0x8000_0000;

/// The frames found in an MPEG audio stream
///
/// This is produced by [`scan_frames`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MpegScan {
	pub(crate) first_frame: FrameHeader,
	pub(crate) first_frame_offset: u64,
	pub(crate) xing: Option<XingHeader>,
	pub(crate) last_frame_offset: Option<u64>,
	pub(crate) audio_end: u64,
}

impl MpegScan {
	/// The header of the first audio frame
	pub fn first_frame(&self) -> &FrameHeader {
		&self.first_frame
	}

	/// The offset of the first audio frame
	pub fn first_frame_offset(&self) -> u64 {
		self.first_frame_offset
	}

	/// The Xing/Info header stored in the first frame, if any
	pub fn xing_header(&self) -> Option<&XingHeader> {
		self.xing.as_ref()
	}

	/// The offset of the last audio frame
	///
	/// This is only searched for when there is no valid Xing header.
	pub fn last_frame_offset(&self) -> Option<u64> {
		self.last_frame_offset
	}

	/// The offset where the audio data ends, before any trailing tags
	pub fn audio_end(&self) -> u64 {
		self.audio_end
	}

	/// Measure the duration of the stream
	///
	/// A valid Xing header always takes precedence. Otherwise, every frame is assumed to be
	/// the same length as the first.
	pub(crate) fn measure(&self) -> Measurement {
		if let Some(xing) = &self.xing {
			if let Some(measurement) = xing.measure(&self.first_frame) {
				log::debug!("MPEG: Using the Xing header frame count");
				return measurement;
			}

			log::debug!("MPEG: Xing header is unusable, falling back to a CBR estimate");
		}

		let first_frame = &self.first_frame;
		if !first_frame.is_usable() {
			log::warn!("MPEG: First frame has no usable bitrate, duration will be 0");
			return Measurement::ConstantBitrate {
				frame_len: first_frame.len,
				frames: 0,
				bitrate: first_frame.bitrate,
			};
		}

		let frame_len = u64::from(first_frame.len);
		let last_frame_offset = self.last_frame_offset.unwrap_or_else(|| {
			log::debug!("MPEG: No last frame found, estimating from the end of the audio");
			self.audio_end.saturating_sub(frame_len)
		});

		let frames = last_frame_offset.saturating_sub(self.first_frame_offset) / frame_len + 1;

		Measurement::ConstantBitrate {
			frame_len: first_frame.len,
			frames,
			bitrate: first_frame.bitrate,
		}
	}
}

// Skips any ID3v2 tags at the start of the stream, returning the offset after them
fn skip_id3v2<R>(data: &mut ByteReader<R>) -> Result<u64>
where
	R: Read + Seek,
{
	let mut offset = 0;

	while data.len() - offset >= ID3V2_HEADER_SIZE {
		// [I, D, 3, ver_major, ver_minor, flags, size (4 bytes)]
		let header = data.read_array_at::<10>(offset)?;
		if &header[..3] != b"ID3" {
			break;
		}

		let size_bytes = [header[6], header[7], header[8], header[9]];
		if size_bytes.iter().any(|b| b & 0x80 != 0) {
			log::warn!("MPEG: ID3v2 tag at {offset} has an invalid size, ignoring it");
			break;
		}

		let size = size_bytes
			.iter()
			.fold(0_u64, |size, b| (size << 7) | u64::from(*b));

		let mut tag_len = ID3V2_HEADER_SIZE + size;
		if header[5] & ID3V2_FOOTER_FLAG != 0 {
			tag_len += ID3V2_FOOTER_SIZE;
		}

		log::debug!("MPEG: Skipping ID3v2 tag at {offset} ({tag_len} bytes)");
		offset = std::cmp::min(offset + tag_len, data.len());
	}

	Ok(offset)
}

// The amount of data searched for a frame sync at once
const FRAME_SEARCH_WINDOW: u64 = 8192;

// Whether the frame at `frame_start` is followed by a matching frame, or by the end of the stream
fn is_followed_by_frame<R>(
	data: &mut ByteReader<R>,
	header: &FrameHeader,
	frame_start: u64,
) -> Result<bool>
where
	R: Read + Seek,
{
	let next_frame_start = frame_start + u64::from(header.len);
	if next_frame_start + 4 > data.len() {
		return Ok(true);
	}

	let next_header_bytes = data.read_array_at::<4>(next_frame_start)?;
	Ok(FrameHeader::from_bytes(next_header_bytes).is_some_and(|next| next.cmp(header)))
}

/// Find the first audio frame, returning its header and offset
///
/// A frame is only accepted if the frame that follows it has the same version, layer, and
/// sample rate, or if it would start past the end of the stream.
///
/// Frames without a usable bitrate are skipped. The first "free format" frame is only returned
/// if the stream has no other frames.
pub(super) fn find_first_frame<R>(data: &mut ByteReader<R>) -> Result<Option<(FrameHeader, u64)>>
where
	R: Read + Seek,
{
	let mut window_start = skip_id3v2(data)?;

	// Skip any invalid padding
	data.seek_to(window_start)?;
	while data.remaining() > 0 && data.read_u8()? == 0 {
		window_start += 1;
	}

	let mut free_format = None;
	while data.len() - window_start >= 4 {
		let window_len = std::cmp::min(FRAME_SEARCH_WINDOW, data.len() - window_start);
		let window = data.read_bytes_at(window_start, window_len as usize)?;

		let mut relative_pos = 0;
		while let Some(sync_pos) = search_for_frame_sync(&mut &window[relative_pos..])? {
			let relative_frame_start = relative_pos + sync_pos as usize;

			// Picked up by the next window
			let Some(header_bytes) = window[relative_frame_start..].first_chunk::<4>() else {
				break;
			};

			relative_pos = relative_frame_start + 1;

			let frame_start = window_start + relative_frame_start as u64;
			let Some(header) = FrameHeader::from_bytes(*header_bytes) else {
				continue;
			};

			if !header.is_usable() {
				if header.bitrate_index == 0 && free_format.is_none() {
					log::debug!("MPEG: Found a free format frame at {frame_start}");
					free_format = Some((header, frame_start));
				}

				continue;
			}

			if is_followed_by_frame(data, &header, frame_start)? {
				log::debug!("MPEG: Found first frame at {frame_start}");
				return Ok(Some((header, frame_start)));
			}

			log::debug!("MPEG: Frame at {frame_start} is not followed by a matching frame");
		}

		if window_start + window_len >= data.len() {
			break;
		}

		// The windows overlap, so a header split between them is still found
		window_start += window_len - 3;
	}

	match free_format {
		Some((_, frame_start)) => {
			log::debug!("MPEG: No frames with a known bitrate, using the frame at {frame_start}");
		},
		None => log::debug!("MPEG: No frame sync found"),
	}

	Ok(free_format)
}

/// Find where the audio data ends, excluding a trailing ID3v1 tag and APEv2 tag
///
/// The result is never less than `floor`.
pub(super) fn find_audio_end<R>(data: &mut ByteReader<R>, floor: u64) -> Result<u64>
where
	R: Read + Seek,
{
	let mut end = data.len();

	if end >= floor + ID3V1_TAG_SIZE {
		let id = data.read_array_at::<3>(end - ID3V1_TAG_SIZE)?;
		if &id == b"TAG" {
			log::debug!("MPEG: Found an ID3v1 tag");
			end -= ID3V1_TAG_SIZE;
		}
	}

	if end >= floor + APE_FOOTER_SIZE {
		let footer = data.read_array_at::<32>(end - APE_FOOTER_SIZE)?;
		if &footer[..8] == b"APETAGEX" {
			// The size includes the footer and items, but not the optional header
			let size = u32::from_le_bytes([footer[12], footer[13], footer[14], footer[15]]);
			let flags = u32::from_le_bytes([footer[20], footer[21], footer[22], footer[23]]);

			let mut tag_len = u64::from(size);
			if flags & APE_CONTAINS_HEADER_FLAG != 0 {
				tag_len += APE_FOOTER_SIZE;
			}

			if tag_len <= end - floor {
				log::debug!("MPEG: Found an APE tag ({tag_len} bytes)");
				end -= tag_len;
			} else {
				log::warn!("MPEG: APE tag size is larger than the stream, ignoring it");
			}
		}
	}

	Ok(end)
}

/// Locate the first frame, the Xing header, and the last frame of an MPEG audio stream
///
/// This returns `Ok(None)` if no frame could be found.
///
/// # Errors
///
/// An I/O error occurs while searching for the first frame. Failures after that point only
/// reduce the information available to [`MpegScan`].
pub fn scan_frames<R>(data: &mut ByteReader<R>) -> Result<Option<MpegScan>>
where
	R: Read + Seek,
{
	let Some((first_frame, first_frame_offset)) = find_first_frame(data)? else {
		return Ok(None);
	};

	let xing = match read_xing_header(data, &first_frame, first_frame_offset) {
		Ok(xing) => xing,
		Err(e) => {
			log::warn!("MPEG: Failed to read Xing header: {e}");
			None
		},
	};

	let audio_end = match find_audio_end(data, first_frame_offset) {
		Ok(end) => end,
		Err(e) => {
			log::warn!("MPEG: Failed to look for trailing tags: {e}");
			data.len()
		},
	};

	let mut last_frame_offset = None;
	if !xing.as_ref().is_some_and(XingHeader::is_valid) {
		match rev_search_for_frame_header(data, &first_frame, first_frame_offset, audio_end) {
			Ok(offset) => last_frame_offset = offset,
			Err(e) => log::warn!("MPEG: Failed to search for the last frame: {e}"),
		}
	}

	Ok(Some(MpegScan {
		first_frame,
		first_frame_offset,
		xing,
		last_frame_offset,
		audio_end,
	}))
}

#[cfg(test)]
mod tests {
	use super::{find_audio_end, find_first_frame, scan_frames};
	use crate::duration::{DurationMethod, Measurement};
	use crate::util::io::ByteReader;

	use std::io::Cursor;

	// MPEG-1 Layer III, 128 kbps, 44.1 kHz, stereo, 417 bytes
	const HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];

	fn frames(count: usize) -> Vec<u8> {
		let mut frame = vec![0; 417];
		frame[..4].copy_from_slice(&HEADER);
		frame.repeat(count)
	}

	fn reader(data: Vec<u8>) -> ByteReader<Cursor<Vec<u8>>> {
		ByteReader::new(Cursor::new(data)).unwrap()
	}

	#[test_log::test]
	fn first_frame_after_id3v2_and_padding() {
		let mut data = Vec::new();
		// ID3v2.4, footer present, 20 byte body
		data.extend_from_slice(b"ID3\x04\x00\x10\x00\x00\x00\x14");
		data.extend_from_slice(&[0xFF; 20]);
		data.extend_from_slice(b"3DI\x04\x00\x10\x00\x00\x00\x14");
		data.extend_from_slice(&[0; 5]);
		data.extend(frames(3));

		let (header, offset) = find_first_frame(&mut reader(data)).unwrap().unwrap();
		assert_eq!(offset, 45);
		assert_eq!(header.bitrate(), 128);
	}

	#[test_log::test]
	fn false_sync_is_skipped() {
		let mut data = vec![0x01, 0xFF, 0xFB, 0x90, 0x00, 0x02, 0x03];
		data.extend(frames(2));

		let (_, offset) = find_first_frame(&mut reader(data)).unwrap().unwrap();
		assert_eq!(offset, 7);
	}

	#[test_log::test]
	fn free_format_junk_is_skipped() {
		let mut data = vec![0xFF, 0xFB, 0x00, 0x00, 0x11, 0x22];
		data.extend(frames(1000));

		let scan = scan_frames(&mut reader(data)).unwrap().unwrap();
		assert_eq!(scan.first_frame_offset(), 6);
		assert_eq!(scan.first_frame().bitrate(), 128);
		assert_eq!(
			scan.measure(),
			Measurement::ConstantBitrate {
				frame_len: 417,
				frames: 1000,
				bitrate: 128,
			}
		);
	}

	#[test_log::test]
	fn sync_byte_junk_is_skipped() {
		// Ends with [FF, FF, FB, 90], which decodes with the "bad" bitrate index
		let mut data = vec![0xFF; 64 * 1024];
		data.extend(frames(100));

		let scan = scan_frames(&mut reader(data)).unwrap().unwrap();
		assert_eq!(scan.first_frame_offset(), 64 * 1024);
		assert_eq!(
			scan.measure(),
			Measurement::ConstantBitrate {
				frame_len: 417,
				frames: 100,
				bitrate: 128,
			}
		);
	}

	#[test_log::test]
	fn bad_bitrate_is_never_accepted() {
		let mut data = vec![0xFF, 0xFB, 0xF0, 0x00];
		data.extend_from_slice(&[0; 100]);

		assert!(find_first_frame(&mut reader(data)).unwrap().is_none());
	}

	#[test_log::test]
	fn frame_across_search_windows() {
		// The header starts 2 bytes before the end of the first window
		let mut data = vec![0x01; 8190];
		data.extend(frames(3));

		let (header, offset) = find_first_frame(&mut reader(data)).unwrap().unwrap();
		assert_eq!(offset, 8190);
		assert_eq!(header.len(), 417);
	}

	#[test_log::test]
	fn no_frames() {
		assert!(find_first_frame(&mut reader(vec![0; 64])).unwrap().is_none());
		assert!(find_first_frame(&mut reader(vec![0x12, 0xFF])).unwrap().is_none());
		assert!(find_first_frame(&mut reader(Vec::new())).unwrap().is_none());
	}

	#[test_log::test]
	fn trailing_tags() {
		let mut data = frames(2);
		let audio_len = data.len() as u64;

		// APEv2 footer only, 32 + 8 bytes of items
		data.extend_from_slice(&[0x20; 8]);
		data.extend_from_slice(b"APETAGEX");
		data.extend_from_slice(&2000_u32.to_le_bytes());
		data.extend_from_slice(&40_u32.to_le_bytes());
		data.extend_from_slice(&0_u32.to_le_bytes());
		data.extend_from_slice(&0_u32.to_le_bytes());
		data.extend_from_slice(&[0; 8]);

		let mut id3v1 = vec![0x20; 128];
		id3v1[..3].copy_from_slice(b"TAG");
		data.extend(id3v1);

		assert_eq!(find_audio_end(&mut reader(data), 0).unwrap(), audio_len);
	}

	#[test_log::test]
	fn cbr_scan() {
		let mut data = vec![0; 100];
		data.extend(frames(1000));

		let scan = scan_frames(&mut reader(data)).unwrap().unwrap();
		assert_eq!(scan.first_frame_offset(), 100);
		assert!(scan.xing_header().is_none());
		assert_eq!(scan.last_frame_offset(), Some(100 + 999 * 417));

		let measurement = scan.measure();
		assert_eq!(measurement.method(), DurationMethod::ConstantBitrateFallback);
		assert_eq!(
			measurement,
			Measurement::ConstantBitrate {
				frame_len: 417,
				frames: 1000,
				bitrate: 128,
			}
		);
	}

	#[test_log::test]
	fn xing_scan() {
		let mut data = frames(10);
		// Stereo MPEG-1, 32 bytes of side information
		let xing = 4 + 32;
		data[xing..xing + 4].copy_from_slice(b"Xing");
		data[xing + 4..xing + 8].copy_from_slice(&1_u32.to_be_bytes());
		data[xing + 8..xing + 12].copy_from_slice(&5000_u32.to_be_bytes());

		let scan = scan_frames(&mut reader(data)).unwrap().unwrap();
		assert_eq!(scan.xing_header().unwrap().frames(), Some(5000));
		// The Xing frame count makes the last frame irrelevant
		assert!(scan.last_frame_offset().is_none());
		assert_eq!(scan.measure().method(), DurationMethod::XingVbr);
	}

	#[test_log::test]
	fn free_format() {
		let mut data = vec![0xFF, 0xFB, 0x00, 0x00];
		data.extend_from_slice(&[0; 100]);

		let scan = scan_frames(&mut reader(data)).unwrap().unwrap();
		assert!(!scan.first_frame().is_usable());
		assert_eq!(
			scan.measure(),
			Measurement::ConstantBitrate {
				frame_len: 0,
				frames: 0,
				bitrate: 0,
			}
		);
	}
}
