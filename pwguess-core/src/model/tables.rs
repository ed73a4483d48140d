use std::error::Error;
use std::path::Path;

use indexmap::IndexMap;

use crate::io;
use super::structure::{Structure, StructureComponent, Tag};

/// Empirical probabilities of concrete terminal values for one
/// (class, run-length) key. Probabilities sum to at most 1.
pub type TerminalTable = IndexMap<String, f64>;

/// All terminal tables, keyed by (class, run-length).
pub type TerminalTables = IndexMap<StructureComponent, TerminalTable>;

/// Empirical probabilities of the grammar's structures.
pub type GrammarTable = IndexMap<Structure, f64>;

/// Splits one tab-separated table line into its two fields.
fn split_tab(line: &str) -> Result<(&str, &str), String> {
	line.split_once('\t')
		.ok_or_else(|| format!("Expected tab-separated line, got: {}", line))
}

/// Reads the terminal tables of one character class.
///
/// The class directory holds one file per observed run-length; the
/// leading decimal digits of each filename are the run-length. Each
/// line maps a terminal value to its probability, tab-separated.
///
/// Duplicate terminal values within one file follow last-line-wins.
/// Files are visited in sorted filename order.
///
/// # Errors
/// Fails if the directory is missing or any line is malformed.
pub fn read_class_tables<P: AsRef<Path>>(
	dir: P,
	tag: Tag,
) -> Result<TerminalTables, Box<dyn Error>> {
	let dir = dir.as_ref();
	io::require_path(dir)?;

	let mut tables = TerminalTables::new();
	for file in io::list_files(dir)? {
		let digits: String = file.chars().take_while(|c| c.is_ascii_digit()).collect();
		let len: usize = digits
			.parse()
			.map_err(|_| format!("No run-length prefix in filename: {}", file))?;

		let table = tables.entry(StructureComponent { tag, len }).or_default();
		for line in io::read_file(dir.join(&file))? {
			let (value, prob) = split_tab(&line)?;
			table.insert(value.to_owned(), prob.parse::<f64>()?);
		}
	}
	Ok(tables)
}

/// Reads the structure grammar file.
///
/// Each line is an encoded structure string and its probability,
/// tab-separated.
///
/// # Errors
/// Fails if the file is missing or any line is malformed.
pub fn read_grammar<P: AsRef<Path>>(path: P) -> Result<GrammarTable, Box<dyn Error>> {
	io::require_path(&path)?;

	let mut grammar = GrammarTable::new();
	for line in io::read_file(&path)? {
		let (encoded, prob) = split_tab(&line)?;
		grammar.insert(Structure::parse(encoded)?, prob.parse::<f64>()?);
	}
	Ok(grammar)
}

/// Reads a full plaintext model directory.
///
/// Expects `grammar/structures.txt` plus one subdirectory per
/// terminal class. All terminal tables are merged into a single
/// mapping keyed by (class, run-length).
pub fn read_model<P: AsRef<Path>>(
	model_dir: P,
) -> Result<(GrammarTable, TerminalTables), Box<dyn Error>> {
	let model_dir = model_dir.as_ref();
	io::require_path(model_dir)?;

	let grammar = read_grammar(model_dir.join("grammar").join("structures.txt"))?;

	let classes = [
		("lower", Tag::Lower),
		("upper", Tag::Upper),
		("mixed_2", Tag::Mixed2),
		("mixed_3", Tag::Mixed3),
		("mixed_4", Tag::Mixed4),
		("digits", Tag::Digits),
		("special", Tag::Special),
	];
	let mut terminals = TerminalTables::new();
	for (subdir, tag) in classes {
		terminals.extend(read_class_tables(model_dir.join(subdir), tag)?);
	}
	Ok((grammar, terminals))
}

/// Bit cost of a probability: its negative base-2 logarithm.
///
/// Additive across independent draws; order-reversing in `p`.
pub fn bit_cost(p: f64) -> f64 {
	-p.log2()
}

/// Converts a probability mapping to bit costs in place.
///
/// One-way: the linear probabilities are not recoverable afterwards.
pub fn to_bit_costs<K>(table: &mut IndexMap<K, f64>) {
	for prob in table.values_mut() {
		*prob = bit_cost(*prob);
	}
}

/// Converts every terminal table to bit costs in place.
pub fn terminals_to_bit_costs(tables: &mut TerminalTables) {
	for table in tables.values_mut() {
		to_bit_costs(table);
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::*;

	#[test]
	fn test_read_class_tables_last_line_wins() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("8.txt"), "password\t0.5\nletmein1\t0.25\npassword\t0.125\n")
			.unwrap();

		let tables = read_class_tables(dir.path(), Tag::Lower).unwrap();
		let key = StructureComponent { tag: Tag::Lower, len: 8 };
		let table = &tables[&key];
		assert_eq!(table.len(), 2);
		assert_eq!(table["password"], 0.125);
		assert_eq!(table["letmein1"], 0.25);
	}

	#[test]
	fn test_read_class_tables_missing_dir_fails() {
		let dir = tempfile::tempdir().unwrap();
		assert!(read_class_tables(dir.path().join("absent"), Tag::Digits).is_err());
	}

	#[test]
	fn test_read_class_tables_rejects_malformed_line() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("4.txt"), "no-tab-here\n").unwrap();
		assert!(read_class_tables(dir.path(), Tag::Digits).is_err());
	}

	#[test]
	fn test_read_grammar() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("structures.txt");
		fs::write(&path, "L10D1\t0.5\nDM4\t0.25\n").unwrap();

		let grammar = read_grammar(&path).unwrap();
		assert_eq!(grammar.len(), 2);
		assert_eq!(grammar[&Structure::parse("L10D1").unwrap()], 0.5);
		assert_eq!(grammar[&Structure::parse("DM4").unwrap()], 0.25);
	}

	#[test]
	fn test_bit_cost_monotonic_and_zero_at_one() {
		assert_eq!(bit_cost(1.0), 0.0);
		assert!(bit_cost(0.5) < bit_cost(0.25));
		assert!((bit_cost(0.25) - 2.0).abs() < 1e-12);
	}

	#[test]
	fn test_to_bit_costs_in_place() {
		let mut table: IndexMap<&str, f64> = IndexMap::new();
		table.insert("a", 0.5);
		table.insert("b", 0.125);
		to_bit_costs(&mut table);
		assert!((table["a"] - 1.0).abs() < 1e-12);
		assert!((table["b"] - 3.0).abs() < 1e-12);
	}
}
