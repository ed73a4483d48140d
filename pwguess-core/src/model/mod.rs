//! Top-level module for the guessability model.
//!
//! The model pipeline runs loaders, reconciliation, sampling and
//! compilation in sequence:
//! - Structure grammar and per-class terminal tables (`tables`)
//! - Character-class structures and compatibility rules (`structure`)
//! - Canonical/raw structure reconciliation (`reconcile`)
//! - Weighted random draws over loaded distributions (`sampler`)
//! - Monte Carlo bit-cost sampling (`simulator`)
//! - Artifact serialization (`compiler`)

/// Character-class tags, structure components and structures.
///
/// Handles encoded-structure tokenization, canonical merging of
/// adjacent same-class runs, per-character expansion, and the
/// class-compatibility test used during reconciliation.
pub mod structure;

/// Loaders for terminal tables and the structure grammar.
///
/// Reads the per-class model directories and the grammar file into
/// insertion-ordered probability tables, and converts tables to
/// bit-cost form for persistence.
pub mod tables;

/// Reconciliation of mixed-class structures with canonical forms.
pub mod reconcile;

/// Immutable weighted-draw index over an empirical distribution.
///
/// Supports O(log n) weighted random draws via cumulative sums and
/// binary search, optionally reporting outcomes as bit costs.
pub mod sampler;

/// Monte Carlo simulation of full password generation events.
pub mod simulator;

/// Orchestration: one compilation run from plaintext model to the
/// four binary artifacts.
pub mod compiler;
