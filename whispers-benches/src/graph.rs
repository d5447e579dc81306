//! Planted-partition graphs for propagation benchmarks.
//!
//! Nodes are split into equally sized communities. Each node links to a few
//! random members of its own community with strong weights, and a handful of
//! weak bridges connect random nodes across the whole graph.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use whispers_core::{Edge, NodeId};

use crate::error::BenchSetupError;

/// Configuration for [`PlantedGraph::generate`].
#[derive(Clone, Debug)]
pub struct PlantedPartitionConfig {
    /// Number of communities.
    pub communities: usize,
    /// Nodes per community.
    pub community_size: usize,
    /// Intra-community edges drawn per node; self-draws are skipped.
    pub intra_degree: usize,
    /// Weak edges between uniformly random nodes.
    pub bridges: usize,
    /// Seed for the generator.
    pub seed: u64,
}

/// Generated edge list with its planted community layout.
#[derive(Clone, Debug)]
pub struct PlantedGraph {
    node_count: usize,
    community_size: usize,
    edges: Vec<Edge>,
}

impl PlantedGraph {
    /// Generates a graph from `config`.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::ZeroValue`] when the community count or size
    /// is zero and [`BenchSetupError::TooLarge`] when the node count overflows.
    ///
    /// # Examples
    /// ```
    /// use whispers_benches::graph::{PlantedGraph, PlantedPartitionConfig};
    ///
    /// let graph = PlantedGraph::generate(&PlantedPartitionConfig {
    ///     communities: 4,
    ///     community_size: 25,
    ///     intra_degree: 3,
    ///     bridges: 2,
    ///     seed: 7,
    /// })?;
    /// assert_eq!(graph.node_count(), 100);
    /// # Ok::<(), whispers_benches::error::BenchSetupError>(())
    /// ```
    pub fn generate(config: &PlantedPartitionConfig) -> Result<Self, BenchSetupError> {
        if config.communities == 0 {
            return Err(BenchSetupError::ZeroValue {
                context: "communities",
            });
        }
        if config.community_size == 0 {
            return Err(BenchSetupError::ZeroValue {
                context: "community_size",
            });
        }
        let node_count = config
            .communities
            .checked_mul(config.community_size)
            .ok_or(BenchSetupError::TooLarge {
                communities: config.communities,
                community_size: config.community_size,
            })?;

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut edges = Vec::with_capacity(
            node_count
                .saturating_mul(config.intra_degree)
                .saturating_add(config.bridges),
        );
        for base in (0..node_count).step_by(config.community_size) {
            for member in 0..config.community_size {
                for _ in 0..config.intra_degree {
                    let peer = rng.gen_range(0..config.community_size);
                    if peer != member {
                        edges.push(Edge::new(base + member, base + peer, rng.gen_range(0.5..1.0)));
                    }
                }
            }
        }
        for _ in 0..config.bridges {
            let from = rng.gen_range(0..node_count);
            let to = rng.gen_range(0..node_count);
            edges.push(Edge::new(from, to, rng.gen_range(0.01..0.1)));
        }

        Ok(Self {
            node_count,
            community_size: config.community_size,
            edges,
        })
    }

    #[rustfmt::skip]
    /// Total number of nodes, including any that drew no edges.
    #[must_use]
    pub const fn node_count(&self) -> usize { self.node_count }

    #[rustfmt::skip]
    /// Generated edges in generation order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] { &self.edges }

    /// Community that `node` was planted in.
    #[must_use]
    pub fn community_of(&self, node: NodeId) -> usize {
        node.checked_div(self.community_size).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn config() -> PlantedPartitionConfig {
        PlantedPartitionConfig {
            communities: 5,
            community_size: 20,
            intra_degree: 4,
            bridges: 3,
            seed: 11,
        }
    }

    #[rstest]
    fn strong_edges_stay_inside_their_community(config: PlantedPartitionConfig) {
        let graph = PlantedGraph::generate(&config).expect("valid configuration");
        assert_eq!(graph.node_count(), 100);
        for edge in graph.edges() {
            assert!(edge.from() < graph.node_count() && edge.to() < graph.node_count());
            assert!(!edge.is_self_edge() || edge.weight() < 0.5);
            if edge.weight() >= 0.5 {
                assert_eq!(graph.community_of(edge.from()), graph.community_of(edge.to()));
            }
        }
    }

    #[rstest]
    fn same_seed_generates_same_edges(config: PlantedPartitionConfig) {
        let first = PlantedGraph::generate(&config).expect("valid configuration");
        let second = PlantedGraph::generate(&config).expect("valid configuration");
        assert_eq!(first.edges(), second.edges());
    }

    #[rstest]
    #[case::no_communities(0, 10, "communities")]
    #[case::empty_communities(3, 0, "community_size")]
    fn zero_sizes_are_rejected(
        config: PlantedPartitionConfig,
        #[case] communities: usize,
        #[case] community_size: usize,
        #[case] expected: &str,
    ) {
        let err = PlantedGraph::generate(&PlantedPartitionConfig {
            communities,
            community_size,
            ..config
        })
        .expect_err("zero sizes must be rejected");
        assert!(matches!(err, BenchSetupError::ZeroValue { context } if context == expected));
    }

    #[rstest]
    fn overflowing_sizes_are_rejected(config: PlantedPartitionConfig) {
        let err = PlantedGraph::generate(&PlantedPartitionConfig {
            communities: usize::MAX,
            community_size: 2,
            ..config
        })
        .expect_err("overflow must be rejected");
        assert!(matches!(err, BenchSetupError::TooLarge { .. }));
    }
}
