use indexmap::IndexMap;
use rand::Rng;

use super::tables::bit_cost;

/// Immutable weighted-draw view over an empirical distribution.
///
/// Built once per distribution and reused across all trials: the key
/// list, the running cumulative sum of weights, and the reported
/// values (raw probabilities, or bit costs when requested at
/// construction) are all fixed at build time.
///
/// Keys keep the insertion order of the source mapping. Sampling
/// streams under a fixed random seed depend on that order, so it is
/// never re-sorted.
///
/// # Invariants
/// - `keys`, `values` and `cum_sums` have the same non-zero length
/// - `cum_sums` is monotonically non-decreasing
#[derive(Clone, Debug)]
pub struct WeightedIndex<K> {
	keys: Vec<K>,
	values: Vec<f64>,
	cum_sums: Vec<f64>,
}

impl<K: Clone> WeightedIndex<K> {
	/// Builds the index from a probability mapping.
	///
	/// # Parameters
	/// - `dist`: keys mapped to non-negative weights with a positive total.
	/// - `bit_cost_mode`: report each outcome's bit cost instead of its
	///   raw probability.
	///
	/// # Errors
	/// Returns an error for an empty distribution; callers filter
	/// empty tables before indexing them.
	pub fn new(dist: &IndexMap<K, f64>, bit_cost_mode: bool) -> Result<Self, String>
	where
		K: std::hash::Hash + Eq,
	{
		if dist.is_empty() {
			return Err("Cannot index an empty distribution".to_owned());
		}

		let keys: Vec<K> = dist.keys().cloned().collect();
		let mut cum_sums = Vec::with_capacity(dist.len());
		let mut acc = 0.0;
		for &weight in dist.values() {
			acc += weight;
			cum_sums.push(acc);
		}
		let values: Vec<f64> = dist
			.values()
			.map(|&p| if bit_cost_mode { bit_cost(p) } else { p })
			.collect();

		Ok(Self { keys, values, cum_sums })
	}

	/// Number of keys in the distribution.
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	/// Always false; empty distributions are rejected at construction.
	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	/// Draws one weighted sample.
	///
	/// Draws a uniform real in `[0, total]`, then locates the first
	/// cumulative-sum entry strictly greater than the draw by binary
	/// search. Returns the reported value and the key.
	///
	/// A draw landing exactly on the total (measure-zero edge) clamps
	/// to the last key.
	pub fn pick(&self, rng: &mut impl Rng) -> (f64, &K) {
		let total = self.cum_sums[self.cum_sums.len() - 1];
		let draw = rng.random_range(0.0..=total);
		let idx = self
			.cum_sums
			.partition_point(|&c| c <= draw)
			.min(self.keys.len() - 1);
		(self.values[idx], &self.keys[idx])
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn test_empty_distribution_is_rejected() {
		let dist: IndexMap<&str, f64> = IndexMap::new();
		assert!(WeightedIndex::new(&dist, false).is_err());
	}

	#[test]
	fn test_pick_reports_raw_probability() {
		let mut dist = IndexMap::new();
		dist.insert("only", 0.25);
		let index = WeightedIndex::new(&dist, false).unwrap();
		let mut rng = StdRng::seed_from_u64(1);

		let (value, key) = index.pick(&mut rng);
		assert_eq!(*key, "only");
		assert_eq!(value, 0.25);
	}

	#[test]
	fn test_pick_reports_bit_cost() {
		let mut dist = IndexMap::new();
		dist.insert("only", 0.25);
		let index = WeightedIndex::new(&dist, true).unwrap();
		let mut rng = StdRng::seed_from_u64(1);

		let (value, _) = index.pick(&mut rng);
		assert!((value - 2.0).abs() < 1e-12);
	}

	#[test]
	fn test_sampling_reproduces_probabilities() {
		let mut dist = IndexMap::new();
		dist.insert("common", 0.6);
		dist.insert("rare", 0.1);
		dist.insert("medium", 0.3);
		let index = WeightedIndex::new(&dist, false).unwrap();

		let mut rng = StdRng::seed_from_u64(42);
		let trials = 200_000;
		let mut counts: IndexMap<&str, usize> = IndexMap::new();
		for _ in 0..trials {
			let (_, key) = index.pick(&mut rng);
			*counts.entry(*key).or_insert(0) += 1;
		}

		for (key, &expected) in &dist {
			let observed = counts[key] as f64 / trials as f64;
			assert!(
				(observed - expected).abs() < 0.01,
				"{}: observed {}, expected {}",
				key,
				observed,
				expected
			);
		}
	}

	#[test]
	fn test_fixed_seed_reproduces_stream() {
		let mut dist = IndexMap::new();
		dist.insert("a", 0.5);
		dist.insert("b", 0.3);
		dist.insert("c", 0.2);
		let index = WeightedIndex::new(&dist, false).unwrap();

		let draw_stream = |seed: u64| -> Vec<String> {
			let mut rng = StdRng::seed_from_u64(seed);
			(0..100).map(|_| index.pick(&mut rng).1.to_string()).collect()
		};
		assert_eq!(draw_stream(7), draw_stream(7));
	}
}
