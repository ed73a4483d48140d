use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::structure::{Structure, Tag, classes_match};
use super::tables::GrammarTable;

/// Outcome of reconciling the grammar's raw structures with their
/// pure-class canonical forms.
///
/// Terminal tables are measured per pure class, but observed
/// structures may blend classes into ambiguous mixed-run tokens.
/// Reconciliation recovers which pure interpretations are length- and
/// shape-consistent with each ambiguous observation.
///
/// # Invariants
/// - Every pure structure appears in the converts set of its own
///   canonical form
/// - Every mixed structure appears in the unreconciled index, whether
///   or not a compatible canonical candidate was found
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Reconciliation {
	/// Canonical structure -> every raw structure it can stand for.
	pub converts: IndexMap<Structure, IndexSet<Structure>>,
	/// Mixed-run structures, keyed by total length.
	pub unreconciled: IndexMap<usize, IndexSet<Structure>>,
}

/// Reconciles the grammar's structures in one pass.
///
/// # Behavior
/// - Merges adjacent same-class runs to obtain each structure's
///   canonical form; structures carrying a mixed class are set aside.
/// - Maps each canonical form to the raw structures it covers (a pure
///   structure always converts to itself).
/// - For each mixed structure, tests class-compatibility against the
///   canonical candidates of equal total length, using memoized
///   per-candidate character expansions. A mixed structure may match
///   zero, one or several candidates; it is added to all of them.
///
/// A mixed structure with no compatible candidate is not an error;
/// it remains visible only through the unreconciled index.
pub fn reconcile(grammar: &GrammarTable) -> Reconciliation {
	let mut converts: IndexMap<Structure, IndexSet<Structure>> = IndexMap::new();
	let mut skipped: Vec<Structure> = Vec::new();

	for structure in grammar.keys() {
		let (canonical, mixed) = structure.merged();
		if mixed {
			skipped.push(structure.clone());
			continue;
		}
		converts.entry(canonical).or_default().insert(structure.clone());
	}

	// Candidates per total length, to narrow the search space below.
	let mut novels: IndexMap<usize, Vec<Structure>> = IndexMap::new();
	for canonical in converts.keys() {
		novels.entry(canonical.total_len()).or_default().push(canonical.clone());
	}

	let mut expansions: HashMap<Structure, Vec<Tag>> = HashMap::new();
	let mut unreconciled: IndexMap<usize, IndexSet<Structure>> = IndexMap::new();

	for structure in skipped {
		let total_len = structure.total_len();
		let expanded = structure.expand();

		if let Some(candidates) = novels.get(&total_len) {
			for candidate in candidates {
				let candidate_chars = expansions
					.entry(candidate.clone())
					.or_insert_with(|| candidate.expand());
				if classes_match(candidate_chars, &expanded) {
					if let Some(raws) = converts.get_mut(candidate) {
						raws.insert(structure.clone());
					}
				}
			}
		}

		unreconciled.entry(total_len).or_default().insert(structure);
	}

	Reconciliation { converts, unreconciled }
}
