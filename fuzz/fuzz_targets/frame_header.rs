#![no_main]

use libfuzzer_sys::fuzz_target;
use sound_duration::mpeg::{FrameHeader, XingHeader};

fuzz_target!(|data: &[u8]| {
	if let Some(bytes) = data.first_chunk::<4>() {
		let _ = FrameHeader::from_bytes(*bytes);
	}

	let _ = XingHeader::read(&mut &data[..]);
});
