// Bitrates (kbps), indexed by [version index][layer index][bitrate index]
//
// Index 0 is "free format" and index 15 is "bad", neither can be used to calculate a frame length.
pub(super) const BITRATES: [[[u32; 16]; 3]; 2] = [
	[
		[
			0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448, 0,
		], // Layer 1
		[
			0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384, 0,
		], // Layer 2
		[
			0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0,
		], // Layer 3
	], // MPEG-1
	[
		[
			0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256, 0,
		], // Layer 1
		[
			0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0,
		], // Layer 2
		[
			0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0,
		], // Layer 3
	], // MPEG-2 & 2.5
];

// Sample rates (Hz), indexed by [version][sample rate index]
pub(super) const SAMPLE_RATES: [[u32; 3]; 3] = [
	[44100, 48000, 32000], // MPEG-1
	[22050, 24000, 16000], // MPEG-2
	[11025, 12000, 8000],  // MPEG-2.5
];

// Samples per frame, indexed by [layer index][version index]
pub(super) const SAMPLES: [[u16; 2]; 3] = [
	[384, 384],   // Layer 1
	[1152, 1152], // Layer 2
	[1152, 576],  // Layer 3
];

// Padding slot size in bytes, indexed by [layer index]
pub(super) const PADDING_SIZES: [u8; 3] = [4, 1, 1];

// Size of the Layer III side information, indexed by [version index][channel mode]
//
// A Xing/Info header is written immediately after the side information of the first frame.
pub(super) const SIDE_INFORMATION_SIZES: [[u32; 4]; 2] = [
	[32, 32, 32, 17], // MPEG-1
	[17, 17, 17, 9],  // MPEG-2 & 2.5
];
