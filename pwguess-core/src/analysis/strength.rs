use std::error::Error;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::io;

/// One password record from the guess-number pipeline.
#[derive(Deserialize, Clone, Debug)]
pub struct PasswordRecord {
	/// Password value.
	pub pw: String,
	/// Observed occurrence count.
	pub cnt: u64,
	/// Estimated guess number.
	pub guess_number: f64,
}

/// Named half-open `[lo, hi)` guess-number intervals, checked in order.
///
/// A record belongs to the first tier whose interval contains its
/// guess number. The thresholds are external policy parameters; the
/// defaults split at 10^6 and 10^14 guesses.
#[derive(Clone, Debug)]
pub struct StrengthTiers {
	tiers: Vec<(String, f64, f64)>,
}

impl StrengthTiers {
	/// Builds tiers from names and a flat `[lo, hi)` bound list.
	///
	/// # Errors
	/// Returns an error unless exactly two bounds are given per name.
	pub fn new(names: &[String], intervals: &[f64]) -> Result<Self, String> {
		if intervals.len() != 2 * names.len() {
			return Err(format!(
				"Expected {} interval bounds for {} tiers, got {}",
				2 * names.len(),
				names.len(),
				intervals.len()
			));
		}
		let tiers = names
			.iter()
			.enumerate()
			.map(|(i, name)| (name.clone(), intervals[2 * i], intervals[2 * i + 1]))
			.collect();
		Ok(Self { tiers })
	}

	/// Default weak/medium/strong tiers.
	pub fn default_tiers() -> Self {
		Self {
			tiers: vec![
				("weak".to_owned(), 1.0, 1e6),
				("medium".to_owned(), 1e6, 1e14),
				("strong".to_owned(), 1e14, f64::MAX),
			],
		}
	}

	/// First tier whose interval contains the guess number.
	pub fn classify(&self, guess_number: f64) -> Option<&str> {
		self.tiers
			.iter()
			.find(|(_, lo, hi)| *lo <= guess_number && guess_number < *hi)
			.map(|(name, _, _)| name.as_str())
	}

	/// Tier names in declaration order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.tiers.iter().map(|(name, _, _)| name.as_str())
	}
}

/// Per-tier password counts produced by one bucketing run.
#[derive(Serialize, Clone, Debug, Default)]
pub struct StrengthReport {
	/// Tier name -> password -> occurrence count. Tiers appear in
	/// declaration order, empty tiers included.
	pub tiers: IndexMap<String, IndexMap<String, u64>>,
	/// Sum of all record counts.
	pub total: u64,
}

impl StrengthReport {
	/// Prints the per-tier unique/total summary to stderr.
	pub fn print_summary(&self) {
		for (name, passwords) in &self.tiers {
			let sub_total: u64 = passwords.values().sum();
			let percent = if self.total == 0 {
				0.0
			} else {
				100.0 * sub_total as f64 / self.total as f64
			};
			eprintln!(
				"{:7}: uniq {:8}, total {:8}, {:8.4}%",
				name,
				passwords.len(),
				sub_total,
				percent
			);
		}
	}
}

/// Buckets records into strength tiers.
///
/// # Errors
/// Returns an error for a record whose guess number matches no tier.
pub fn bucket_records<I>(records: I, tiers: &StrengthTiers) -> Result<StrengthReport, String>
where
	I: IntoIterator<Item = PasswordRecord>,
{
	let mut report = StrengthReport::default();
	for name in tiers.names() {
		report.tiers.insert(name.to_owned(), IndexMap::new());
	}

	for record in records {
		let tier = tiers.classify(record.guess_number).ok_or_else(|| {
			format!(
				"Guess number {} of {} matches no strength tier",
				record.guess_number, record.pw
			)
		})?;
		if let Some(passwords) = report.tiers.get_mut(tier) {
			passwords.insert(record.pw, record.cnt);
		}
		report.total += record.cnt;
	}
	Ok(report)
}

/// Buckets the JSON-lines records of one file into strength tiers.
///
/// Each line must carry `pw`, `cnt` and `guess_number` fields.
pub fn bucket_file<P: AsRef<Path>>(
	path: P,
	tiers: &StrengthTiers,
) -> Result<StrengthReport, Box<dyn Error>> {
	io::require_path(&path)?;

	let mut records = Vec::new();
	for line in io::read_file(&path)? {
		records.push(serde_json::from_str::<PasswordRecord>(&line)?);
	}
	Ok(bucket_records(records, tiers)?)
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::*;

	fn record(pw: &str, cnt: u64, guess_number: f64) -> PasswordRecord {
		PasswordRecord { pw: pw.to_owned(), cnt, guess_number }
	}

	#[test]
	fn test_default_tiers_classify() {
		let tiers = StrengthTiers::default_tiers();
		assert_eq!(tiers.classify(5.0), Some("weak"));
		assert_eq!(tiers.classify(2_000_000.0), Some("medium"));
		assert_eq!(tiers.classify(1e15), Some("strong"));
	}

	#[test]
	fn test_boundaries_are_half_open() {
		let tiers = StrengthTiers::default_tiers();
		assert_eq!(tiers.classify(1e6), Some("medium"));
		assert_eq!(tiers.classify(1e14), Some("strong"));
		assert_eq!(tiers.classify(0.5), None);
	}

	#[test]
	fn test_bucket_records() {
		let tiers = StrengthTiers::default_tiers();
		let report = bucket_records(
			vec![
				record("123456", 10, 5.0),
				record("dragon42", 3, 2_000_000.0),
				record("vX9$mQ2#kL", 1, 1e15),
			],
			&tiers,
		)
		.unwrap();

		assert_eq!(report.tiers["weak"]["123456"], 10);
		assert_eq!(report.tiers["medium"]["dragon42"], 3);
		assert_eq!(report.tiers["strong"]["vX9$mQ2#kL"], 1);
		assert_eq!(report.total, 14);
	}

	#[test]
	fn test_unmatched_guess_number_is_an_error() {
		let tiers = StrengthTiers::default_tiers();
		assert!(bucket_records(vec![record("x", 1, 0.0)], &tiers).is_err());
	}

	#[test]
	fn test_custom_tiers_require_paired_bounds() {
		assert!(StrengthTiers::new(&["only".to_owned()], &[1.0]).is_err());
		let tiers = StrengthTiers::new(&["only".to_owned()], &[1.0, 100.0]).unwrap();
		assert_eq!(tiers.classify(50.0), Some("only"));
	}

	#[test]
	fn test_bucket_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("pw.txt");
		fs::write(
			&path,
			"{\"pw\":\"abc\",\"cnt\":2,\"guess_number\":5}\n\
			 {\"pw\":\"def\",\"cnt\":1,\"guess_number\":2000000}\n",
		)
		.unwrap();

		let report = bucket_file(&path, &StrengthTiers::default_tiers()).unwrap();
		assert_eq!(report.tiers["weak"].len(), 1);
		assert_eq!(report.tiers["medium"].len(), 1);
		assert_eq!(report.tiers["strong"].len(), 0);
		assert_eq!(report.total, 3);
	}
}
