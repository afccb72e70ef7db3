#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use sound_duration::ContainerKind;
use sound_duration::duration::estimate;
use sound_duration::io::ByteReader;

fuzz_target!(|data: Vec<u8>| {
	if let Ok(mut reader) = ByteReader::new(Cursor::new(data)) {
		let _ = estimate(ContainerKind::Wave, &mut reader, 1411);
	}
});
