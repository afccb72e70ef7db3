#![allow(missing_docs)]

use sound_duration::config::OpenOptions;
use sound_duration::duration::DurationMethod;
use sound_duration::metadata::{AudioProperties, Metadata};
use sound_duration::{ContainerKind, SoundFile};

use hound::{SampleFormat, WavSpec, WavWriter};

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

fn write_wav(path: &Path, channels: u16, sample_rate: u32, frames: u32) {
	let spec = WavSpec {
		channels,
		sample_rate,
		bits_per_sample: 16,
		sample_format: SampleFormat::Int,
	};

	let mut writer = WavWriter::create(path, spec).unwrap();
	for i in 0..frames * u32::from(channels) {
		writer.write_sample((i % 64) as i16).unwrap();
	}
	writer.finalize().unwrap();
}

#[test_log::test]
fn exact_byte_rate() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("speech.wav");

	// 2.5 seconds of 16-bit mono at 8 kHz (128 kbit/s)
	write_wav(&path, 1, 8000, 20000);

	let mut file = SoundFile::open(&path, &OpenOptions::new()).unwrap();
	assert_eq!(file.kind(), ContainerKind::Wave);
	assert_eq!(file.path(), Some(path.as_path()));

	assert_eq!(file.bitrate(), Some(128));
	assert_eq!(file.sample_rate(), Some(8000));

	assert_eq!(file.precise_duration(), Some(2.5));
	assert_eq!(file.duration(), Some(3));
	assert_eq!(
		file.duration_result().unwrap().method(),
		DurationMethod::RiffByteRate
	);

	let format = file.wav_format().unwrap();
	assert_eq!(format.channels(), 1);
	assert_eq!(format.sample_rate(), 8000);
	assert_eq!(format.bits_per_sample(), 16);
	assert!(format.is_pcm());

	assert!(file.frame_header().is_none());
	assert!(file.xing_header().is_none());
}

#[test_log::test]
fn rounded_bitrate() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("cd.wav");

	// 1 second of CD audio, 176400 bytes
	write_wav(&path, 2, 44100, 44100);

	let mut file = SoundFile::open(&path, &OpenOptions::new()).unwrap();

	// The tag reader rounds the bitrate to 1411 kbit/s, so the byte rate is slightly low
	assert_eq!(file.bitrate(), Some(1411));

	let precise = file.precise_duration().unwrap();
	assert!((precise - 176_400.0 / 176_375.0).abs() < 1e-9);
	assert_eq!(file.duration(), Some(2));

	// Asking again gives the same answer
	assert_eq!(file.precise_duration(), Some(precise));
	assert_eq!(file.duration(), Some(2));
}

#[test_log::test]
fn relative_to_sound_directory() {
	let dir = tempfile::tempdir().unwrap();
	std::fs::create_dir(dir.path().join("music")).unwrap();
	write_wav(&dir.path().join("music").join("intro.wav"), 1, 8000, 8000);

	let options = OpenOptions::new().sound_directory(dir.path());
	let mut file = SoundFile::open_named("music/intro.wav", true, &options).unwrap();
	assert_eq!(file.duration(), Some(1));
	assert_eq!(file.artist(), None);

	// Not relative, so this is resolved against the working directory instead
	assert!(SoundFile::open_named("music/intro.wav", false, &options).is_err());
}

fn chunk(id: &[u8; 4], content: &[u8]) -> Vec<u8> {
	let mut chunk = Vec::new();
	chunk.extend_from_slice(id);
	chunk.extend_from_slice(&(content.len() as u32).to_le_bytes());
	chunk.extend_from_slice(content);
	if content.len() % 2 != 0 {
		chunk.push(0);
	}
	chunk
}

fn wav_from_chunks(chunks: &[Vec<u8>]) -> Vec<u8> {
	let body = chunks.concat();

	let mut file = Vec::new();
	file.extend_from_slice(b"RIFF");
	file.extend_from_slice(&(body.len() as u32 + 4).to_le_bytes());
	file.extend_from_slice(b"WAVE");
	file.extend(body);
	file
}

fn properties(bitrate: u32) -> Metadata {
	Metadata::new(
		Some(AudioProperties::new(Some(bitrate), Some(8000), Duration::ZERO)),
		None,
	)
}

#[test_log::test]
fn last_data_chunk_wins() {
	let mut fmt = Vec::new();
	fmt.extend_from_slice(&1_u16.to_le_bytes());
	fmt.extend_from_slice(&1_u16.to_le_bytes());
	fmt.extend_from_slice(&8000_u32.to_le_bytes());
	fmt.extend_from_slice(&16000_u32.to_le_bytes());
	fmt.extend_from_slice(&2_u16.to_le_bytes());
	fmt.extend_from_slice(&16_u16.to_le_bytes());

	let wav = wav_from_chunks(&[
		chunk(b"fmt ", &fmt),
		chunk(b"data", &[0; 16000]),
		chunk(b"LIST", b"INFOISFT\x03\x00\x00\x00ab\x00"),
		chunk(b"data", &[0; 48000]),
	]);

	let mut file = SoundFile::from_reader(ContainerKind::Wave, Cursor::new(wav), properties(128))
		.unwrap();

	assert_eq!(file.precise_duration(), Some(3.0));
	assert_eq!(file.duration(), Some(3));
}

#[test_log::test]
fn zero_bitrate() {
	let wav = wav_from_chunks(&[chunk(b"data", &[0; 100])]);

	let mut file =
		SoundFile::from_reader(ContainerKind::Wave, Cursor::new(wav), properties(0)).unwrap();

	// A computed zero, not an unavailable duration
	assert_eq!(file.duration(), Some(0));
	assert_eq!(file.precise_duration(), Some(0.0));
	assert!(file.duration_result().unwrap().is_available());
}

#[test_log::test]
fn no_data_chunk() {
	let wav = wav_from_chunks(&[chunk(b"LIST", b"INFO")]);

	let mut file =
		SoundFile::from_reader(ContainerKind::Wave, Cursor::new(wav), properties(128)).unwrap();

	assert_eq!(file.duration(), None);
	assert_eq!(
		file.duration_result().unwrap().method(),
		DurationMethod::Unavailable
	);
}

#[test_log::test]
fn not_riff() {
	let mut file = SoundFile::from_reader(
		ContainerKind::Wave,
		Cursor::new(b"ID3\x04\x00\x00\x00\x00\x00\x00".to_vec()),
		properties(128),
	)
	.unwrap();

	assert_eq!(file.duration(), None);
	assert!(file.wav_format().is_none());
}
