use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::{fs, io};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Checks that a required input path exists.
///
/// Every input defect aborts the whole run, so a missing path is
/// reported as an error carrying the offending path.
pub(crate) fn require_path<P: AsRef<Path>>(path: P) -> io::Result<()> {
	let path = path.as_ref();
	if !path.exists() {
		return Err(io::Error::new(
			io::ErrorKind::NotFound,
			format!("{} not exists", path.display()),
		));
	}
	Ok(())
}

/// Lists all file names in a directory, sorted.
///
/// Returns file names only (no paths). Subdirectories are ignored.
/// Sorting keeps the visit order deterministic across filesystems.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}
