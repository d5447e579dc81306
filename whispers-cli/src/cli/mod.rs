//! Command-line interface for clustering edge-list files.
//!
//! `whispers run <PATH>` reads one edge per line as `from to [weight]`,
//! clusters the graph and prints one `node<TAB>cluster` line per node.

mod byte_size;
mod commands;
mod edge_list;

pub use byte_size::{ByteSizeError, parse_byte_size};
pub use commands::{Cli, CliError, Command, DEFAULT_MAX_BYTES, ExecutionSummary, RunCommand, render_summary, run_cli};
pub use edge_list::{DEFAULT_WEIGHT, EdgeLineError, ParsedEdge, parse_edge_line};

#[cfg(test)]
mod tests;
