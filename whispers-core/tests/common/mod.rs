//! Shared helpers for the whispers-core integration tests.

use whispers_core::{ChineseWhispers, ChineseWhispersBuilder, NodeId};

/// Creates a seeded instance pre-loaded with `edges`.
#[must_use]
pub fn seeded(iterations: u64, seed: u64, edges: &[(NodeId, NodeId, f64)]) -> ChineseWhispers {
    let mut whispers = ChineseWhispersBuilder::new()
        .with_iterations(iterations)
        .with_seed(seed)
        .build()
        .expect("builder configuration must be valid");
    for &(from, to, weight) in edges {
        whispers.add_edge(from, to, weight);
    }
    whispers
}
