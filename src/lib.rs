//! cc-summariser core library.
//!
//! Aggregates compliance-checker results from many files into one summary
//! and renders it as a text report or a JSON document.
//!
//! High-level modules:
//! - `models`: raw checker input and aggregated summary types.
//! - `analysis`: the aggregation of failing records into failure groups.
//! - `report`: text and JSON rendering.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: `.cc-summariser.toml` loading and merging.
pub mod analysis;
pub mod cli;
pub mod config;
pub mod models;
pub mod report;

pub use analysis::{aggregate, summarise_json};
pub use models::{FailureGroup, InputError, MessageGroup, RawResults, Summary, Tier};
