//! Support library for the `whispers` binary.
//!
//! Exposes command parsing and execution so tests and doctests can drive the
//! pipeline in-process.

pub mod cli;
pub mod logging;
