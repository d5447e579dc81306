//! Per-node neighbour ranges over a normalised edge slice.

use std::ops::Range;

use crate::edge::{Edge, NodeId, NormalizedEdges};

/// Maps each node to the half-open range of edges whose `from` is that node.
///
/// Ranges partition the underlying slice; nodes without incident edges own an
/// empty range.
///
/// # Examples
/// ```
/// use whispers_core::{Edge, EdgeStore, NeighbourIndex};
///
/// let mut store: EdgeStore = [Edge::new(0, 2, 1.0)].into_iter().collect();
/// let index = NeighbourIndex::build(store.normalize());
/// assert_eq!(index.node_count(), 3);
/// assert_eq!(index.range(0), Some(0..1));
/// assert!(index.neighbours(1).is_empty());
/// assert_eq!(index.neighbours(2)[0].to(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct NeighbourIndex<'a> {
    edges: &'a [Edge],
    ranges: Vec<Range<usize>>,
}

impl<'a> NeighbourIndex<'a> {
    /// Builds the index in one pass over `edges`.
    #[must_use]
    pub fn build(edges: NormalizedEdges<'a>) -> Self {
        let node_count = edges.node_count();
        let slice = edges.as_slice();
        let mut ranges = vec![0..0; node_count];
        let mut start = 0;
        for run in slice.chunk_by(|left, right| left.from() == right.from()) {
            let end = start + run.len();
            if let Some(slot) = run.first().and_then(|edge| ranges.get_mut(edge.from())) {
                *slot = start..end;
            }
            start = end;
        }
        tracing::debug!(nodes = node_count, edges = slice.len(), "built neighbour index");
        Self {
            edges: slice,
            ranges,
        }
    }

    /// Number of nodes covered by the index.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` when the index covers no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Returns the edge range for `node`, or `None` when it is out of range.
    #[must_use]
    pub fn range(&self, node: NodeId) -> Option<Range<usize>> {
        self.ranges.get(node).cloned()
    }

    /// Returns the edges leaving `node`; empty for isolated or unknown nodes.
    #[must_use]
    pub fn neighbours(&self, node: NodeId) -> &'a [Edge] {
        self.range(node)
            .and_then(|range| self.edges.get(range))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::edge::EdgeStore;

    fn store(edges: &[(NodeId, NodeId, f64)]) -> EdgeStore {
        edges
            .iter()
            .map(|&(from, to, weight)| Edge::new(from, to, weight))
            .collect()
    }

    #[rstest]
    fn ranges_partition_the_edge_slice() {
        let mut edges = store(&[(0, 1, 1.0), (1, 2, 1.0), (3, 3, 1.0)]);
        let normalized = edges.normalize();
        let total = normalized.as_slice().len();
        let index = NeighbourIndex::build(normalized);
        let ranges: Vec<_> = (0..index.node_count())
            .filter_map(|node| index.range(node))
            .collect();
        assert_eq!(ranges, vec![0..1, 1..3, 3..4, 4..5]);
        assert_eq!(ranges.iter().map(ExactSizeIterator::len).sum::<usize>(), total);
    }

    #[rstest]
    fn isolated_nodes_have_empty_ranges() {
        let mut edges = store(&[(0, 0, 1.0), (2, 3, 1.0)]);
        let index = NeighbourIndex::build(edges.normalize());
        assert_eq!(index.node_count(), 4);
        assert_eq!(index.range(1), Some(0..0));
        assert!(index.neighbours(1).is_empty());
    }

    #[rstest]
    fn neighbours_follow_target_order() {
        let mut edges = store(&[(1, 0, 0.5), (1, 4, 2.0), (1, 2, 1.0)]);
        let index = NeighbourIndex::build(edges.normalize());
        let targets: Vec<_> = index.neighbours(1).iter().map(Edge::to).collect();
        assert_eq!(targets, vec![0, 2, 4]);
        assert!(index.neighbours(1).iter().all(|edge| edge.from() == 1));
    }

    #[rstest]
    fn empty_edges_produce_empty_index() {
        let mut edges = EdgeStore::new();
        let index = NeighbourIndex::build(edges.normalize());
        assert!(index.is_empty());
        assert_eq!(index.range(0), None);
        assert!(index.neighbours(0).is_empty());
    }
}
