#![allow(missing_docs)]

use sound_duration::SoundFile;
use sound_duration::config::OpenOptions;

use structopt::StructOpt;

use std::path::PathBuf;

#[derive(Debug, StructOpt)]
#[structopt(
	name = "sound_info",
	about = "Prints the duration, properties, and tags of a sound file"
)]
struct Opt {
	/// Resolve the path relative to this directory
	#[structopt(short, long, parse(from_os_str))]
	sound_directory: Option<PathBuf>,

	/// Skip reading tags
	#[structopt(long)]
	no_tags: bool,

	path: String,
}

fn main() {
	env_logger::init();

	let opt = Opt::from_args();

	let mut options = OpenOptions::new().read_tags(!opt.no_tags);
	let relative = opt.sound_directory.is_some();
	if let Some(sound_directory) = opt.sound_directory {
		options = options.sound_directory(sound_directory);
	}

	let mut file = SoundFile::open_named(&opt.path, relative, &options)
		.expect("ERROR: Failed to open file!");

	println!("--- Duration ---");
	match file.duration_result() {
		Some(result) if result.is_available() => {
			println!("Method: {:?}", result.method());
			println!("Seconds: {}", file.duration().unwrap_or(0));
			println!("Precise: {:.3}", result.seconds().unwrap_or(0.0));
		},
		_ => println!("Unavailable"),
	}

	if let Some(reported) = file.reported_length() {
		println!("Reported by tag reader: {:.3}", reported.as_secs_f64());
	}

	println!("--- Audio Properties ---");
	println!("Bitrate: {}", file.bitrate().unwrap_or(0));
	println!("Sample Rate: {}", file.sample_rate().unwrap_or(0));

	if let Some(format) = file.wav_format() {
		println!("Channels: {}", format.channels());
		println!("Bits per sample: {}", format.bits_per_sample());
	}

	if let Some(header) = file.frame_header() {
		println!("MPEG: {:?} {:?}", header.version(), header.layer());
		println!("Channel mode: {:?}", header.channel_mode());
	}

	if let Some(xing) = file.xing_header() {
		println!("{:?} header frames: {}", xing.ty(), xing.frames().unwrap_or(0));
	}

	println!("--- Tag Information ---");
	println!("Title: {}", file.title().unwrap_or("None"));
	println!("Artist: {}", file.artist().unwrap_or("None"));
	println!("Album: {}", file.album().unwrap_or("None"));
	println!("Genre: {}", file.genre().unwrap_or("None"));
	println!("Track: {}", file.track().unwrap_or(0));
	println!("Year: {}", file.year().unwrap_or(0));
}
