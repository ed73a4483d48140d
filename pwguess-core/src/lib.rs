//! Password-guessability model compiler.
//!
//! This crate models passwords as strings generated by a probabilistic
//! grammar over character-class structures and provides:
//! - Loaders for empirically measured terminal and structure tables
//! - Reconciliation between pure-class and mixed-class tokenizations
//! - O(log n) weighted random sampling over the loaded distributions
//! - A Monte Carlo simulator producing bit-cost guess-probability samples
//! - A compiler serializing the model into compact binary artifacts
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Core model types, loaders, sampling and compilation logic.
///
/// This module exposes the structure grammar, the weighted sampler,
/// the Monte Carlo simulator and the model compiler.
pub mod model;

/// Downstream streaming transforms over password-record files.
///
/// Rule-set intersection and guess-number strength bucketing. These
/// consume artifacts produced elsewhere in the pipeline and have no
/// dependency on the model compiler.
pub mod analysis;

/// I/O utilities (file loading, path checks).
///
/// Not exposed
pub(crate) mod io;
