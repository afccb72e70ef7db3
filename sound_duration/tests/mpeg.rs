#![allow(missing_docs)]

use sound_duration::config::OpenOptions;
use sound_duration::duration::DurationMethod;
use sound_duration::mpeg::{ChannelMode, MpegVersion, XingHeaderType};
use sound_duration::{ContainerKind, SoundFile};

use lofty::config::WriteOptions;
use lofty::tag::{Accessor, Tag, TagExt, TagType};

use std::path::Path;

// MPEG-1 Layer III, 128 kbps, 44.1 kHz, stereo, 417 bytes per frame
const HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
const FRAME_LEN: usize = 417;

fn frames(count: usize) -> Vec<u8> {
	let mut frame = vec![0; FRAME_LEN];
	frame[..4].copy_from_slice(&HEADER);
	frame.repeat(count)
}

fn assert_close(actual: Option<f64>, expected: f64) {
	let actual = actual.unwrap();
	assert!(
		(actual - expected).abs() < 0.01,
		"expected ~{expected}, got {actual}"
	);
}

#[test_log::test]
fn constant_bitrate() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("cbr.mp3");
	std::fs::write(&path, frames(1000)).unwrap();

	let mut file = SoundFile::open(&path, &OpenOptions::new()).unwrap();
	assert_eq!(file.kind(), ContainerKind::Mpeg);

	// 417 * 1000 / (128 * 125)
	assert_close(file.precise_duration(), 26.06);
	assert_eq!(file.duration(), Some(27));
	assert_eq!(
		file.duration_result().unwrap().method(),
		DurationMethod::ConstantBitrateFallback
	);

	let header = file.frame_header().unwrap();
	assert_eq!(header.version(), MpegVersion::V1);
	assert_eq!(header.channel_mode(), ChannelMode::Stereo);
	assert_eq!(header.len() as usize, FRAME_LEN);

	assert!(file.xing_header().is_none());
	assert!(file.wav_format().is_none());
	assert_eq!(file.sample_rate(), Some(44100));
}

fn write_xing(stream: &mut [u8], magic: &[u8; 4], frames: u32, bytes: u32) {
	// After the 4 byte header and 32 bytes of side information
	let xing = 4 + 32;
	stream[xing..xing + 4].copy_from_slice(magic);
	stream[xing + 4..xing + 8].copy_from_slice(&0x03_u32.to_be_bytes());
	stream[xing + 8..xing + 12].copy_from_slice(&frames.to_be_bytes());
	stream[xing + 12..xing + 16].copy_from_slice(&bytes.to_be_bytes());
}

#[test_log::test]
fn xing_takes_precedence() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("vbr.mp3");

	let mut stream = frames(20);
	write_xing(&mut stream, b"Xing", 5000, 2_000_000);
	std::fs::write(&path, stream).unwrap();

	let mut file = SoundFile::open(&path, &OpenOptions::new()).unwrap();

	// 5000 * 1152 / 44100, even though the stream only holds 20 frames
	assert_close(file.precise_duration(), 130.61);
	assert_eq!(file.duration(), Some(131));
	assert_eq!(
		file.duration_result().unwrap().method(),
		DurationMethod::XingVbr
	);

	let xing = file.xing_header().unwrap();
	assert_eq!(xing.ty(), XingHeaderType::Xing);
	assert_eq!(xing.frames(), Some(5000));
	assert_eq!(xing.bytes(), Some(2_000_000));
}

#[test_log::test]
fn zero_frame_xing_falls_back() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("info.mp3");

	let mut stream = frames(100);
	write_xing(&mut stream, b"Info", 0, 41700);
	std::fs::write(&path, stream).unwrap();

	let mut file = SoundFile::open(&path, &OpenOptions::new()).unwrap();

	assert_eq!(file.xing_header().unwrap().ty(), XingHeaderType::Info);
	assert_eq!(
		file.duration_result().unwrap().method(),
		DurationMethod::ConstantBitrateFallback
	);
	// 417 * 100 / (128 * 125)
	assert_close(file.precise_duration(), 2.606);
}

fn tag_file(path: &Path) {
	let mut tag = Tag::new(TagType::Id3v2);
	tag.set_artist(String::from("Foo artist"));
	tag.set_title(String::from("Bar title"));
	tag.set_album(String::from("Baz album"));
	tag.set_track(3);

	tag.save_to_path(path, WriteOptions::default()).unwrap();
}

#[test_log::test]
fn tagged() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("tagged.mp3");
	std::fs::write(&path, frames(1000)).unwrap();
	tag_file(&path);

	let mut file = SoundFile::open(&path, &OpenOptions::new()).unwrap();

	assert_eq!(file.artist(), Some("Foo artist"));
	assert_eq!(file.title(), Some("Bar title"));
	assert_eq!(file.album(), Some("Baz album"));
	assert_eq!(file.track(), Some(3));
	assert_eq!(file.genre(), None);

	// The ID3v2 tag is skipped, the audio is unchanged
	assert!(file.frame_header().is_some());
	assert_eq!(file.duration(), Some(27));
	assert_close(file.precise_duration(), 26.06);

	// Tags can be skipped entirely
	let file = SoundFile::open(&path, &OpenOptions::new().read_tags(false)).unwrap();
	assert_eq!(file.artist(), None);
}

#[test_log::test]
fn unsupported() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("song.flac");
	std::fs::write(&path, frames(10)).unwrap();

	let err = SoundFile::open(&path, &OpenOptions::new()).unwrap_err();
	assert!(matches!(
		err.kind(),
		sound_duration::error::ErrorKind::UnsupportedFormat
	));
}
