//! Intersects password records that satisfy several measurement rules.

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::iter::Peekable;
use std::path::PathBuf;
use std::process;

use pwguess_core::analysis::intersect::intersect;

fn usage() -> ! {
	eprintln!("Usage: intersect-rules -f <folder> -r <rule-id>... -s <save-file>");
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
	let mut folder = None;
	let mut rules: Vec<u32> = Vec::new();
	let mut save = None;

	let mut args = env::args().skip(1).peekable();
	while let Some(arg) = args.next() {
		match arg.as_str() {
			"-f" | "--folder" => folder = Some(args.next().unwrap_or_else(|| usage())),
			"-r" | "--rule-ids" => {
				for value in take_values(&mut args) {
					rules.push(value.parse().unwrap_or_else(|_| usage()));
				}
			}
			"-s" | "--save" => save = Some(args.next().unwrap_or_else(|| usage())),
			_ => usage(),
		}
	}

	let (Some(folder), Some(save)) = (folder, save) else {
		usage()
	};
	if rules.is_empty() {
		usage()
	}

	let survivors = intersect(&PathBuf::from(folder), &rules)?;
	let mut out = BufWriter::new(File::create(save)?);
	for record in survivors {
		writeln!(out, "{}", record)?;
	}
	Ok(())
}
