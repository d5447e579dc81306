//! Benchmark support crate for whispers.
//!
//! Generates reproducible community-structured graphs and names the
//! parameters Criterion reports for each run.

pub mod error;
pub mod graph;
pub mod params;
