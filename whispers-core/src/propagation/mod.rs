//! Asynchronous label propagation over a [`NeighbourIndex`].
//!
//! Every node starts in its own singleton cluster. Each step samples one node,
//! sums edge weights per neighbouring label, and writes the heaviest label
//! back immediately so later steps in the same run observe it. This is the
//! node-at-a-time update; there is no generation barrier between steps.

mod tally;

use crate::{edge::NodeId, neighbours::NeighbourIndex, sampler::NodeSampler};

use self::tally::LabelTally;

/// Counters describing one propagation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropagationStats {
    steps: u64,
    label_changes: u64,
}

impl PropagationStats {
    /// Number of node updates performed.
    #[must_use]
    #[rustfmt::skip]
    pub const fn steps(&self) -> u64 { self.steps }

    /// Number of updates that assigned a different label.
    #[must_use]
    #[rustfmt::skip]
    pub const fn label_changes(&self) -> u64 { self.label_changes }
}

/// Owns the per-node label buffer and mutates it in place.
///
/// # Examples
/// ```
/// use whispers_core::{Edge, EdgeStore, NeighbourIndex, PropagationEngine, SeededSampler};
///
/// let mut store: EdgeStore = [Edge::new(0, 1, 1.0)].into_iter().collect();
/// let index = NeighbourIndex::build(store.normalize());
/// let mut engine = PropagationEngine::new(index.node_count());
/// assert_eq!(engine.labels(), &[0, 1]);
///
/// let stats = engine.run(&index, 10, &mut SeededSampler::from_seed(1));
/// assert_eq!(stats.steps(), 20);
/// assert_eq!(engine.labels()[0], engine.labels()[1]);
/// ```
#[derive(Debug)]
pub struct PropagationEngine {
    labels: Vec<NodeId>,
    tally: LabelTally,
}

impl PropagationEngine {
    /// Creates an engine where `labels[i] == i` for every node.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            labels: (0..node_count).collect(),
            tally: LabelTally::default(),
        }
    }

    /// Number of nodes carrying a label.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Current raw labels in node order.
    #[must_use]
    pub fn labels(&self) -> &[NodeId] {
        &self.labels
    }

    /// Consumes the engine and returns its label buffer.
    #[must_use]
    pub fn into_labels(self) -> Vec<NodeId> {
        self.labels
    }

    /// Runs `node_count * iterations` steps, drawing nodes from `sampler`.
    ///
    /// Performs no work when there are no nodes or `iterations` is zero. The
    /// label buffer is a valid partition after every step.
    pub fn run<S>(&mut self, index: &NeighbourIndex<'_>, iterations: u64, sampler: &mut S) -> PropagationStats
    where
        S: NodeSampler + ?Sized,
    {
        let node_count = self.node_count();
        debug_assert_eq!(node_count, index.node_count(), "index and labels disagree on node count");
        if node_count == 0 {
            return PropagationStats::default();
        }

        let steps = u64::try_from(node_count)
            .unwrap_or(u64::MAX)
            .saturating_mul(iterations);
        let mut label_changes = 0;
        for _ in 0..steps {
            let node = sampler.sample_node(node_count);
            if self.step(index, node) {
                label_changes += 1;
            }
        }
        PropagationStats {
            steps,
            label_changes,
        }
    }

    /// Relabels `node` with the heaviest label among its neighbours.
    ///
    /// Returns `true` when the label changed. Nodes without neighbours and
    /// nodes outside the buffer are left untouched.
    pub fn step(&mut self, index: &NeighbourIndex<'_>, node: NodeId) -> bool {
        let Some(&incumbent) = self.labels.get(node) else {
            return false;
        };

        self.tally.clear();
        for edge in index.neighbours(node) {
            if let Some(&label) = self.labels.get(edge.to()) {
                self.tally.add(label, edge.weight());
            }
        }
        let best = self.tally.best(incumbent);

        match self.labels.get_mut(node) {
            Some(slot) if *slot != best => {
                *slot = best;
                true
            }
            _ => false,
        }
    }
}
