use std::collections::HashMap;

use rand::Rng;

use super::sampler::WeightedIndex;
use super::structure::{Structure, StructureComponent};
use super::tables::{GrammarTable, TerminalTables};

/// Monte Carlo sampler over the compiled grammar.
///
/// Holds one bit-cost `WeightedIndex` for the structure grammar plus
/// one per non-empty terminal table. The indexes are built once and
/// never mutated; trials only read them, so they are independent and
/// identically distributed given a shared random source.
///
/// # Responsibilities
/// - Prepare bit-cost indexes from the raw probability tables
/// - Produce one guess-probability sample per generation event
#[derive(Debug)]
pub struct PcfgSimulator {
	structures: WeightedIndex<Structure>,
	terminals: HashMap<StructureComponent, WeightedIndex<String>>,
}

impl PcfgSimulator {
	/// Builds the simulator from raw (not yet bit-cost-converted) tables.
	///
	/// Empty terminal tables are filtered out before indexing.
	///
	/// # Errors
	/// Returns an error if the grammar itself is empty.
	pub fn new(grammar: &GrammarTable, terminals: &TerminalTables) -> Result<Self, String> {
		let structures = WeightedIndex::new(grammar, true)?;

		let mut indexed = HashMap::new();
		for (key, table) in terminals {
			if table.is_empty() {
				continue;
			}
			indexed.insert(*key, WeightedIndex::new(table, true)?);
		}

		Ok(Self { structures, terminals: indexed })
	}

	/// Runs one trial: one full synthetic password generation event.
	///
	/// Draws a structure, then one terminal per component in structure
	/// order, summing bit costs. The draw ordering is part of the
	/// reproducibility contract for a fixed seed.
	///
	/// # Errors
	/// Returns an error if a drawn structure references a
	/// (class, run-length) pair with no loaded terminal table.
	pub fn sample1(&self, rng: &mut impl Rng) -> Result<f64, String> {
		let (mut cost, structure) = self.structures.pick(rng);

		for component in &structure.0 {
			let index = self.terminals.get(component).ok_or_else(|| {
				format!(
					"No terminal table for class {} run-length {}",
					component.tag.code(),
					component.len
				)
			})?;
			let (terminal_cost, _) = index.pick(rng);
			cost += terminal_cost;
		}

		Ok(cost)
	}

	/// Runs `n` independent trials with one shared random source.
	pub fn sample_many(&self, n: usize, rng: &mut impl Rng) -> Result<Vec<f64>, String> {
		let mut samples = Vec::with_capacity(n);
		for _ in 0..n {
			samples.push(self.sample1(rng)?);
		}
		Ok(samples)
	}
}
