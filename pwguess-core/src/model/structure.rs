use serde::{Deserialize, Serialize};

/// Character class of one contiguous run within a password.
///
/// Drawn from a fixed closed set: four pure classes plus three mixed
/// classes standing for runs that blend two, three or four distinct
/// pure classes. Terminal distributions for mixed runs are measured
/// as their own tables rather than decomposed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
	Lower,
	Upper,
	Digits,
	Special,
	Mixed2,
	Mixed3,
	Mixed4,
}

impl Tag {
	/// Parses the uppercase letter code used in encoded structure strings.
	///
	/// # Errors
	/// Returns an error for any code outside the closed class set.
	pub fn from_code(code: &str) -> Result<Self, String> {
		match code {
			"L" => Ok(Tag::Lower),
			"U" => Ok(Tag::Upper),
			"D" => Ok(Tag::Digits),
			"S" => Ok(Tag::Special),
			"DM" => Ok(Tag::Mixed2),
			"TM" => Ok(Tag::Mixed3),
			"FM" => Ok(Tag::Mixed4),
			other => Err(format!("Unknown class code: {}", other)),
		}
	}

	/// Returns the letter code of this class.
	pub fn code(&self) -> &'static str {
		match self {
			Tag::Lower => "L",
			Tag::Upper => "U",
			Tag::Digits => "D",
			Tag::Special => "S",
			Tag::Mixed2 => "DM",
			Tag::Mixed3 => "TM",
			Tag::Mixed4 => "FM",
		}
	}

	/// True for the classes blending several pure classes in one run.
	pub fn is_mixed(&self) -> bool {
		matches!(self, Tag::Mixed2 | Tag::Mixed3 | Tag::Mixed4)
	}
}

/// One contiguous run: a character class and its length.
///
/// Also serves as the lookup key of the terminal table measured for
/// that exact (class, run-length) pair.
///
/// # Invariants
/// - `len` is always >= 1
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StructureComponent {
	/// Character class of the run.
	pub tag: Tag,
	/// Number of characters in the run.
	pub len: usize,
}

/// Ordered run decomposition of a password's shape.
///
/// Structures are the grammar's production right-hand sides. Two
/// structures are length-equal if their total lengths match, and
/// class-compatible if every pair of per-character classes is either
/// identical or has a mixed class on at least one side.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Structure(pub Vec<StructureComponent>);

impl Structure {
	/// Parses an encoded structure string such as `"L10D1"`.
	///
	/// Tokenizes greedily on the letter/digit boundary: each token is
	/// an uppercase class code immediately followed by a decimal
	/// run-length.
	///
	/// # Errors
	/// Returns an error on an unknown class code, a token without a
	/// run-length, a zero run-length, or any other character.
	pub fn parse(encoded: &str) -> Result<Self, String> {
		let mut components = Vec::new();
		let mut chars = encoded.chars().peekable();

		while chars.peek().is_some() {
			let mut code = String::new();
			while let Some(c) = chars.peek() {
				if c.is_ascii_uppercase() {
					code.push(*c);
					chars.next();
				} else {
					break;
				}
			}

			let mut digits = String::new();
			while let Some(c) = chars.peek() {
				if c.is_ascii_digit() {
					digits.push(*c);
					chars.next();
				} else {
					break;
				}
			}

			if code.is_empty() || digits.is_empty() {
				return Err(format!("Malformed structure token in: {}", encoded));
			}
			let len: usize = digits
				.parse()
				.map_err(|_| format!("Bad run-length in: {}", encoded))?;
			if len == 0 {
				return Err(format!("Zero run-length in: {}", encoded));
			}
			components.push(StructureComponent { tag: Tag::from_code(&code)?, len });
		}

		if components.is_empty() {
			return Err("Empty structure".to_owned());
		}
		Ok(Structure(components))
	}

	/// Total length: sum of all run-lengths.
	pub fn total_len(&self) -> usize {
		self.0.iter().map(|c| c.len).sum()
	}

	/// Merges adjacent same-class runs into the canonical form.
	///
	/// Returns the merged structure and whether any component carries
	/// a mixed class. Merging an already-canonical structure yields
	/// itself unchanged.
	pub fn merged(&self) -> (Structure, bool) {
		let mut merged: Vec<StructureComponent> = Vec::with_capacity(self.0.len());
		let mut mixed = false;

		for component in &self.0 {
			match merged.last_mut() {
				Some(prev) if prev.tag == component.tag => prev.len += component.len,
				_ => merged.push(*component),
			}
			if component.tag.is_mixed() {
				mixed = true;
			}
		}

		(Structure(merged), mixed)
	}

	/// Expands to a flat per-character class sequence.
	///
	/// Each component's class is replicated run-length times.
	pub fn expand(&self) -> Vec<Tag> {
		let mut expanded = Vec::with_capacity(self.total_len());
		for component in &self.0 {
			expanded.extend(std::iter::repeat_n(component.tag, component.len));
		}
		expanded
	}
}

/// Position-by-position class compatibility over expanded sequences.
///
/// Two per-character sequences match if they have equal length and
/// every position is either class-identical or mixed on at least one
/// side.
pub fn classes_match(a: &[Tag], b: &[Tag]) -> bool {
	if a.len() != b.len() {
		return false;
	}
	a.iter()
		.zip(b.iter())
		.all(|(ta, tb)| ta == tb || ta.is_mixed() || tb.is_mixed())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn component(tag: Tag, len: usize) -> StructureComponent {
		StructureComponent { tag, len }
	}

	#[test]
	fn test_parse_basic() {
		let structure = Structure::parse("L10D1").unwrap();
		assert_eq!(
			structure.0,
			vec![component(Tag::Lower, 10), component(Tag::Digits, 1)]
		);
		assert_eq!(structure.total_len(), 11);
	}

	#[test]
	fn test_parse_mixed_codes() {
		let structure = Structure::parse("DM3U1TM2FM4S1").unwrap();
		assert_eq!(
			structure.0,
			vec![
				component(Tag::Mixed2, 3),
				component(Tag::Upper, 1),
				component(Tag::Mixed3, 2),
				component(Tag::Mixed4, 4),
				component(Tag::Special, 1),
			]
		);
	}

	#[test]
	fn test_parse_rejects_malformed() {
		assert!(Structure::parse("").is_err());
		assert!(Structure::parse("L").is_err());
		assert!(Structure::parse("10L").is_err());
		assert!(Structure::parse("X4").is_err());
		assert!(Structure::parse("L0").is_err());
		assert!(Structure::parse("L3 D1").is_err());
	}

	#[test]
	fn test_merge_adjacent_runs() {
		let structure = Structure(vec![
			component(Tag::Lower, 3),
			component(Tag::Lower, 2),
			component(Tag::Digits, 1),
		]);
		let (canonical, mixed) = structure.merged();
		assert_eq!(
			canonical.0,
			vec![component(Tag::Lower, 5), component(Tag::Digits, 1)]
		);
		assert!(!mixed);
	}

	#[test]
	fn test_merge_is_idempotent() {
		let canonical = Structure(vec![
			component(Tag::Lower, 5),
			component(Tag::Digits, 2),
			component(Tag::Lower, 1),
		]);
		let (merged, _) = canonical.merged();
		assert_eq!(merged, canonical);
		let (merged_again, _) = merged.merged();
		assert_eq!(merged_again, canonical);
	}

	#[test]
	fn test_merge_flags_mixed() {
		let structure = Structure(vec![
			component(Tag::Mixed2, 2),
			component(Tag::Digits, 2),
		]);
		let (_, mixed) = structure.merged();
		assert!(mixed);
	}

	#[test]
	fn test_expand() {
		let structure = Structure(vec![
			component(Tag::Lower, 2),
			component(Tag::Digits, 1),
		]);
		assert_eq!(structure.expand(), vec![Tag::Lower, Tag::Lower, Tag::Digits]);
	}

	#[test]
	fn test_classes_match_symmetric_on_mixed() {
		let pure = [Tag::Lower, Tag::Lower, Tag::Digits];
		let mixed = [Tag::Mixed2, Tag::Mixed2, Tag::Digits];
		assert!(classes_match(&pure, &mixed));
		assert!(classes_match(&mixed, &pure));
	}

	#[test]
	fn test_classes_match_rejects_incompatible() {
		let a = [Tag::Lower, Tag::Digits];
		let b = [Tag::Lower, Tag::Special];
		assert!(!classes_match(&a, &b));
		assert!(!classes_match(&[Tag::Lower], &[Tag::Lower, Tag::Lower]));
	}
}
