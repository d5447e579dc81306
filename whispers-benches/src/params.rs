//! Benchmark parameter labels.

use std::fmt;

/// Parameters identifying one propagation benchmark case.
#[derive(Clone, Debug)]
pub struct PropagationBenchParams {
    /// Nodes in the generated graph.
    pub node_count: usize,
    /// Iteration multiplier passed to the builder.
    pub iterations: u64,
}

impl fmt::Display for PropagationBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},iter={}", self.node_count, self.iterations)
    }
}
