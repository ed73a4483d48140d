use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;

use crate::io;

/// On-disk file holding the records that satisfy one rule.
fn rule_file(folder: &Path, rule_id: u32) -> PathBuf {
	folder.join(format!("rule-{}.txt", rule_id))
}

/// Extracts the password field of one JSON record.
fn password_of<'a>(record: &'a Value, path: &Path) -> Result<&'a str, String> {
	record
		.get("pw")
		.and_then(Value::as_str)
		.ok_or_else(|| format!("Record without pw field in {}", path.display()))
}

/// Intersects password records across several rule-result files.
///
/// Each `rule-<id>.txt` file in `folder` holds JSON-lines records
/// with at least a `pw` field. Passwords are counted across all
/// selected files, smallest file first; the smallest file is then
/// re-scanned and only the records whose password appeared in every
/// selected file survive.
///
/// Returns the surviving records in the smallest file's order.
///
/// # Errors
/// Fails on an empty rule selection, a missing rule file, or any
/// line that is not a JSON object with a string `pw` field.
pub fn intersect(folder: &Path, rules: &[u32]) -> Result<Vec<Value>, Box<dyn Error>> {
	if rules.is_empty() {
		return Err("No rule ids to intersect".into());
	}

	// Visit smaller files first so the final re-scan reads the smallest.
	let mut files: Vec<(u32, PathBuf, u64)> = Vec::with_capacity(rules.len());
	for &rule_id in rules {
		let path = rule_file(folder, rule_id);
		io::require_path(&path)?;
		let size = fs::metadata(&path)?.len();
		files.push((rule_id, path, size));
	}
	files.sort_by_key(|&(_, _, size)| size);

	let mut universe: IndexMap<String, usize> = IndexMap::new();
	for (rule_id, path, _) in &files {
		let mut parsed = 0usize;
		for line in io::read_file(path)? {
			let record: Value = serde_json::from_str(&line)?;
			let pw = password_of(&record, path)?;
			*universe.entry(pw.to_owned()).or_insert(0) += 1;
			parsed += 1;
		}
		eprintln!("Rule {}: parsed {} passwords", rule_id, parsed);
	}

	let smallest = &files[0].1;
	let mut survivors = Vec::new();
	for line in io::read_file(smallest)? {
		let record: Value = serde_json::from_str(&line)?;
		let pw = password_of(&record, smallest)?;
		if universe.get(pw).copied().unwrap_or(0) == rules.len() {
			survivors.push(record);
		}
	}
	Ok(survivors)
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::*;

	#[test]
	fn test_intersect_keeps_common_passwords_only() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(
			dir.path().join("rule-1.txt"),
			"{\"pw\":\"abc\"}\n{\"pw\":\"xyz\"}\n",
		)
		.unwrap();
		fs::write(dir.path().join("rule-2.txt"), "{\"pw\":\"abc\"}\n").unwrap();

		let survivors = intersect(dir.path(), &[1, 2]).unwrap();
		assert_eq!(survivors.len(), 1);
		assert_eq!(survivors[0]["pw"], "abc");
	}

	#[test]
	fn test_intersect_preserves_record_fields() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(
			dir.path().join("rule-1.txt"),
			"{\"pw\":\"abc\",\"cnt\":3}\n",
		)
		.unwrap();
		fs::write(
			dir.path().join("rule-2.txt"),
			"{\"pw\":\"abc\",\"cnt\":3}\n{\"pw\":\"def\",\"cnt\":1}\n",
		)
		.unwrap();

		let survivors = intersect(dir.path(), &[1, 2]).unwrap();
		assert_eq!(survivors.len(), 1);
		assert_eq!(survivors[0]["cnt"], 3);
	}

	#[test]
	fn test_intersect_missing_rule_file_fails() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("rule-1.txt"), "{\"pw\":\"abc\"}\n").unwrap();
		assert!(intersect(dir.path(), &[1, 2]).is_err());
	}

	#[test]
	fn test_intersect_empty_selection_fails() {
		let dir = tempfile::tempdir().unwrap();
		assert!(intersect(dir.path(), &[]).is_err());
	}

	#[test]
	fn test_intersect_rejects_record_without_pw() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("rule-1.txt"), "{\"cnt\":1}\n").unwrap();
		assert!(intersect(dir.path(), &[1]).is_err());
	}
}
