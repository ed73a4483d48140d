//! Streaming transforms over password-record files.
//!
//! These consume JSON-lines record files produced by the guessing
//! pipeline. They are file-to-file transforms with no dependency on
//! the model compiler.

/// Intersection of password sets across several rule-result files.
pub mod intersect;

/// Bucketing of password records into named strength tiers by
/// guess-number intervals.
pub mod strength;
