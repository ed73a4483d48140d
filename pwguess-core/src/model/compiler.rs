use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::io;
use super::reconcile;
use super::simulator::PcfgSimulator;
use super::tables;

/// File name of the bit-cost grammar and terminal tables artifact.
pub const MODEL_FILE: &str = "model.bin";
/// File name of the converts/unreconciled relation artifact.
pub const INTERMEDIATE_FILE: &str = "intermediate.bin";
/// File name of the flagged-substring set artifact.
pub const FLAGGED_FILE: &str = "flagged_chunks.bin";
/// File name of the Monte Carlo samples artifact.
pub const SAMPLES_FILE: &str = "samples.bin";

/// Explicit configuration for one compilation run.
///
/// Keeps the orchestration free of ambient state: paths, trial count
/// and seed all come from the caller.
#[derive(Clone, Debug)]
pub struct CompileConfig {
	/// Plaintext model directory (class subdirectories + grammar).
	pub model_dir: PathBuf,
	/// Newline-delimited flagged-substring file.
	pub flagged_path: PathBuf,
	/// Output directory for the four binary artifacts.
	pub out_dir: PathBuf,
	/// Number of Monte Carlo trials. Governs sampling variance only;
	/// there is no convergence check.
	pub num_samples: usize,
	/// Random seed. A fixed seed reproduces the sample stream
	/// bit-for-bit; `None` seeds from the operating system.
	pub seed: Option<u64>,
}

impl CompileConfig {
	/// Creates a configuration with the default trial count (one million).
	pub fn new<P: Into<PathBuf>>(model_dir: P, flagged_path: P, out_dir: P) -> Self {
		Self {
			model_dir: model_dir.into(),
			flagged_path: flagged_path.into(),
			out_dir: out_dir.into(),
			num_samples: 1_000_000,
			seed: None,
		}
	}
}

/// Compiles a plaintext model directory into the binary artifacts.
///
/// # Behavior
/// - Loads the grammar and terminal tables with raw probabilities
/// - Reconciles mixed-run structures against canonical forms
/// - Runs the configured number of Monte Carlo trials over one
///   sequentially shared random source
/// - Converts every stored probability to bit-cost form (one-way;
///   this is the form persisted)
/// - Loads the flagged-substring set
/// - Writes the four artifacts into the output directory, creating
///   it if absent
///
/// # Errors
/// Any missing input path or malformed line aborts the run; there is
/// no partial-result recovery.
pub fn compile(config: &CompileConfig) -> Result<(), Box<dyn Error>> {
	eprintln!("Loading model...");
	let (mut grammar, mut terminals) = tables::read_model(&config.model_dir)?;

	eprintln!("Counting intermediate results...");
	let reconciliation = reconcile::reconcile(&grammar);

	eprintln!("Sampling probabilities ({} trials)...", config.num_samples);
	let simulator = PcfgSimulator::new(&grammar, &terminals)?;
	let mut rng = match config.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};
	let samples = simulator.sample_many(config.num_samples, &mut rng)?;

	// Persisted probabilities are bit costs.
	tables::to_bit_costs(&mut grammar);
	tables::terminals_to_bit_costs(&mut terminals);

	eprintln!("Loading flagged substrings...");
	let flagged = read_flagged(&config.flagged_path)?;

	eprintln!("Writing artifacts to {}...", config.out_dir.display());
	fs::create_dir_all(&config.out_dir)?;
	write_artifact(&config.out_dir.join(MODEL_FILE), &(&grammar, &terminals))?;
	write_artifact(&config.out_dir.join(INTERMEDIATE_FILE), &reconciliation)?;
	write_artifact(&config.out_dir.join(FLAGGED_FILE), &flagged)?;
	write_artifact(&config.out_dir.join(SAMPLES_FILE), &samples)?;
	eprintln!("Done!");

	Ok(())
}

/// Reads the flagged-substring set, one string per line.
fn read_flagged<P: AsRef<Path>>(path: P) -> Result<IndexSet<String>, Box<dyn Error>> {
	io::require_path(&path)?;
	Ok(io::read_file(&path)?.into_iter().collect())
}

/// Serializes one value into a compact binary artifact.
fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
	let bytes = postcard::to_stdvec(value)?;
	fs::write(path, bytes)?;
	Ok(())
}
