//! Shared test utilities used across whispers crates.
//!
//! - [`tracing`] captures spans and events so tests can assert on
//!   instrumentation without a global subscriber.
//! - [`ci`] reads the environment overrides that tune property-test runs.

pub mod ci;
pub mod tracing;
