//! Buckets password records into named strength tiers.

use std::env;
use std::error::Error;
use std::fs::File;
use std::iter::Peekable;
use std::process;

use pwguess_core::analysis::strength::{StrengthTiers, bucket_file};

fn usage() -> ! {
	eprintln!(
		"Usage: pw-strength -p <pw-file> [--strengths <name>...] \
		 [--intervals <bound>...] [-s <save-file>]"
	);
	process::exit(2);
}

/// Consumes consecutive non-flag arguments as one multi-value option.
fn take_values<I: Iterator<Item = String>>(args: &mut Peekable<I>) -> Vec<String> {
	let mut values = Vec::new();
	while let Some(next) = args.peek() {
		if next.starts_with('-') {
			break;
		}
		values.push(args.next().unwrap_or_default());
	}
	values
}

fn main() -> Result<(), Box<dyn Error>> {
	let mut pw_file = None;
	let mut names: Vec<String> = Vec::new();
	let mut intervals: Vec<f64> = Vec::new();
	let mut save = None;

	let mut args = env::args().skip(1).peekable();
	while let Some(arg) = args.next() {
		match arg.as_str() {
			"-p" | "--pw-file" => pw_file = Some(args.next().unwrap_or_else(|| usage())),
			"--strengths" => names = take_values(&mut args),
			"--intervals" => {
				for value in take_values(&mut args) {
					intervals.push(value.parse().unwrap_or_else(|_| usage()));
				}
			}
			"-s" | "--save" => save = Some(args.next().unwrap_or_else(|| usage())),
			_ => usage(),
		}
	}

	let Some(pw_file) = pw_file else { usage() };
	let tiers = if names.is_empty() && intervals.is_empty() {
		StrengthTiers::default_tiers()
	} else {
		StrengthTiers::new(&names, &intervals)?
	};

	let report = bucket_file(&pw_file, &tiers)?;
	report.print_summary();

	if let Some(save) = save {
		serde_json::to_writer_pretty(File::create(save)?, &report.tiers)?;
	}
	Ok(())
}
