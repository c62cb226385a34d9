//! Report rendering.
//!
//! Renders an aggregated summary as a text report or a JSON document.

pub mod generator;

pub use generator::*;
