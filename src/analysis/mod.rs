//! Analysis modules.
//!
//! Aggregation of raw compliance-checker results into a cross-file summary.

pub mod aggregator;

pub use aggregator::*;
