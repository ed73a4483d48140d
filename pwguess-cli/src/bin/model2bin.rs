//! Compiles a plaintext guessing model into binary artifacts.

use std::env;
use std::error::Error;
use std::process;

use pwguess_core::model::compiler::{CompileConfig, compile};

fn usage() -> ! {
	eprintln!(
		"Usage: model2bin -m <model-dir> -d <flagged-file> -s <out-dir> \
		 [-n <num-samples>] [--seed <seed>]"
	);
	process::exit(2);
}

fn main() -> Result<(), Box<dyn Error>> {
	let mut model_dir = None;
	let mut flagged_path = None;
	let mut out_dir = None;
	let mut num_samples = 1_000_000usize;
	let mut seed = None;

	let mut args = env::args().skip(1);
	while let Some(arg) = args.next() {
		match arg.as_str() {
			"-m" | "--model" => model_dir = Some(args.next().unwrap_or_else(|| usage())),
			"-d" | "--flagged" => flagged_path = Some(args.next().unwrap_or_else(|| usage())),
			"-s" | "--save-in-folder" => out_dir = Some(args.next().unwrap_or_else(|| usage())),
			"-n" | "--num-samples" => {
				num_samples = args
					.next()
					.and_then(|v| v.parse().ok())
					.unwrap_or_else(|| usage());
			}
			"--seed" => {
				seed = Some(
					args.next()
						.and_then(|v| v.parse().ok())
						.unwrap_or_else(|| usage()),
				);
			}
			_ => usage(),
		}
	}

	let (Some(model_dir), Some(flagged_path), Some(out_dir)) =
		(model_dir, flagged_path, out_dir)
	else {
		usage()
	};

	let mut config = CompileConfig::new(model_dir, flagged_path, out_dir);
	config.num_samples = num_samples;
	config.seed = seed;
	compile(&config)?;
	Ok(())
}
