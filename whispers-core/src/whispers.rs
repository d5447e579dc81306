//! Chinese Whispers clustering entry point.
//!
//! Ties the pipeline together: normalise the edge store, index neighbours,
//! propagate labels, then compact them into contiguous cluster ids.

use std::num::NonZeroUsize;

use tracing::{Span, field, info, instrument, warn};

use crate::{
    builder::DEFAULT_NODE_LIMIT,
    compaction::compact_labels,
    edge::{Edge, EdgeStore, NodeId},
    error::{EdgeError, WhispersError},
    memory::{estimate_peak_bytes, format_bytes},
    neighbours::NeighbourIndex,
    propagation::{PropagationEngine, PropagationStats},
    result::{ClusterId, ClusteringResult},
    sampler::{NodeSampler, SeededSampler},
};

/// Clusters a weighted graph by iterative label propagation.
///
/// # Examples
/// ```
/// use whispers_core::ChineseWhispersBuilder;
///
/// let mut whispers = ChineseWhispersBuilder::new()
///     .with_iterations(20)
///     .with_seed(3)
///     .build()
///     .expect("builder must succeed");
/// whispers.add_edge(0, 1, 1.0);
/// whispers.add_edge(2, 3, 1.0);
///
/// let clusters = whispers.run();
/// assert_eq!(clusters, 2);
/// assert_eq!(whispers.label_of(0), whispers.label_of(1));
/// assert_ne!(whispers.label_of(1), whispers.label_of(2));
/// assert_eq!(whispers.all_labels().len(), 4);
/// ```
#[derive(Debug)]
pub struct ChineseWhispers<S = SeededSampler> {
    iterations: u64,
    node_limit: NonZeroUsize,
    max_bytes: Option<u64>,
    sampler: S,
    edges: EdgeStore,
    result: ClusteringResult,
    stats: PropagationStats,
}

impl ChineseWhispers {
    /// Creates an instance with an entropy-seeded sampler.
    ///
    /// Use [`crate::ChineseWhispersBuilder`] for reproducible runs.
    #[must_use]
    pub fn new(iterations: u64) -> Self {
        Self::with_sampler(iterations, SeededSampler::from_entropy())
    }
}

impl<S: NodeSampler> ChineseWhispers<S> {
    /// Creates an instance that draws nodes from `sampler`.
    ///
    /// # Examples
    /// ```
    /// use whispers_core::{ChineseWhispers, SeededSampler};
    ///
    /// let mut whispers = ChineseWhispers::with_sampler(0, SeededSampler::from_seed(1));
    /// whispers.add_edge(0, 1, 1.0);
    /// assert_eq!(whispers.run(), 2);
    /// ```
    #[must_use]
    pub fn with_sampler(iterations: u64, sampler: S) -> Self {
        let node_limit = NonZeroUsize::new(DEFAULT_NODE_LIMIT).unwrap_or(NonZeroUsize::MIN);
        Self::from_parts(iterations, node_limit, sampler)
    }

    pub(crate) fn from_parts(iterations: u64, node_limit: NonZeroUsize, sampler: S) -> Self {
        Self {
            iterations,
            node_limit,
            max_bytes: None,
            sampler,
            edges: EdgeStore::new(),
            result: ClusteringResult::default(),
            stats: PropagationStats::default(),
        }
    }

    pub(crate) fn with_max_bytes(mut self, max_bytes: Option<u64>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Returns the iteration multiplier.
    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Returns the exclusive node limit enforced by [`Self::try_add_edge`].
    #[must_use]
    pub fn node_limit(&self) -> NonZeroUsize {
        self.node_limit
    }

    /// Returns the memory budget enforced by [`Self::try_run`], if any.
    #[must_use]
    pub fn max_bytes(&self) -> Option<u64> {
        self.max_bytes
    }

    /// Returns the edge store.
    #[must_use]
    pub fn edges(&self) -> &EdgeStore {
        &self.edges
    }

    /// Appends an edge without validation.
    ///
    /// Edges added after [`Self::run`] take part in the next run.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f64) {
        self.edges.push(Edge::new(from, to, weight));
    }

    /// Appends an edge after checking its weight and endpoints.
    ///
    /// # Errors
    /// Returns [`EdgeError::NonFiniteWeight`] for NaN or infinite weights and
    /// [`EdgeError::NodeLimitExceeded`] when an endpoint is not below
    /// [`Self::node_limit`].
    ///
    /// # Examples
    /// ```
    /// use whispers_core::{ChineseWhispersBuilder, EdgeError};
    ///
    /// let mut whispers = ChineseWhispersBuilder::new()
    ///     .with_node_limit(4)
    ///     .build()
    ///     .expect("builder must succeed");
    /// assert!(whispers.try_add_edge(0, 3, 0.5).is_ok());
    /// assert!(matches!(
    ///     whispers.try_add_edge(0, 4, 0.5),
    ///     Err(EdgeError::NodeLimitExceeded { node: 4, limit: 4 })
    /// ));
    /// ```
    pub fn try_add_edge(&mut self, from: NodeId, to: NodeId, weight: f64) -> Result<(), EdgeError> {
        if !weight.is_finite() {
            return Err(EdgeError::NonFiniteWeight { from, to, weight });
        }
        let limit = self.node_limit.get();
        if let Some(node) = [from, to].into_iter().find(|&node| node >= limit) {
            return Err(EdgeError::NodeLimitExceeded { node, limit });
        }
        self.add_edge(from, to, weight);
        Ok(())
    }

    /// Estimates the peak allocation of the next run.
    #[must_use]
    pub fn estimated_peak_bytes(&self) -> u64 {
        estimate_peak_bytes(self.edges.node_count(), self.edges.len())
    }

    /// Runs like [`Self::run`] after checking the estimated peak allocation
    /// against the configured memory limit.
    ///
    /// # Errors
    /// Returns [`WhispersError::MemoryLimitExceeded`] without touching the
    /// edges or the previous result when the estimate exceeds the limit.
    ///
    /// # Examples
    /// ```
    /// use whispers_core::{ChineseWhispersBuilder, WhispersError};
    ///
    /// let mut whispers = ChineseWhispersBuilder::new()
    ///     .with_max_bytes(1 << 20)
    ///     .build()
    ///     .expect("builder must succeed");
    /// whispers.add_edge(0, 4_000_000_000, 1.0);
    /// assert!(matches!(
    ///     whispers.try_run(),
    ///     Err(WhispersError::MemoryLimitExceeded { node_count: 4_000_000_001, .. })
    /// ));
    /// ```
    pub fn try_run(&mut self) -> Result<usize, WhispersError> {
        if let Some(limit) = self.max_bytes {
            let estimated = self.estimated_peak_bytes();
            if estimated > limit {
                let node_count = self.edges.node_count();
                warn!(
                    node_count,
                    estimated = %format_bytes(estimated),
                    limit = %format_bytes(limit),
                    "rejecting run over the memory limit"
                );
                return Err(WhispersError::MemoryLimitExceeded {
                    node_count,
                    estimated,
                    limit,
                });
            }
        }
        Ok(self.run())
    }

    /// Normalises the edges, propagates labels and compacts them.
    ///
    /// Returns the number of clusters. Labels from any previous run are
    /// discarded. A graph without edges yields zero clusters.
    #[instrument(
        name = "whispers.run",
        skip(self),
        fields(
            edges = self.edges.len(),
            iterations = self.iterations,
            nodes = field::Empty,
            clusters = field::Empty,
        ),
    )]
    pub fn run(&mut self) -> usize {
        let index = NeighbourIndex::build(self.edges.normalize());
        let node_count = index.node_count();
        let span = Span::current();
        span.record("nodes", node_count);

        if index.is_empty() {
            warn!("graph has no edges, returning zero clusters");
            self.result = ClusteringResult::default();
            self.stats = PropagationStats::default();
            span.record("clusters", 0);
            return 0;
        }

        let mut engine = PropagationEngine::new(node_count);
        let stats = engine.run(&index, self.iterations, &mut self.sampler);
        let mut labels = engine.into_labels();
        let clusters = compact_labels(&mut labels);

        self.result = ClusteringResult::from_compacted(labels, clusters);
        self.stats = stats;
        span.record("clusters", clusters);
        record_run_metrics(stats, clusters);
        info!(
            steps = stats.steps(),
            label_changes = stats.label_changes(),
            clusters,
            "propagation completed"
        );
        clusters
    }

    /// Returns the cluster of `node` from the latest run.
    ///
    /// `None` means the node is outside `[0, node_count)` or no run happened.
    #[must_use]
    pub fn label_of(&self, node: NodeId) -> Option<ClusterId> {
        self.result.label_of(node)
    }

    /// Returns every node's cluster from the latest run, in node order.
    #[must_use]
    pub fn all_labels(&self) -> &[ClusterId] {
        self.result.assignments()
    }

    /// Returns the full result of the latest run.
    #[must_use]
    pub fn result(&self) -> &ClusteringResult {
        &self.result
    }

    /// Returns the propagation counters of the latest run.
    #[must_use]
    pub fn stats(&self) -> PropagationStats {
        self.stats
    }
}

#[cfg(feature = "metrics")]
fn record_run_metrics(stats: PropagationStats, clusters: usize) {
    metrics::counter!("whispers_runs_total").increment(1);
    metrics::counter!("whispers_label_changes_total").increment(stats.label_changes());
    metrics::histogram!("whispers_cluster_count").record(clusters as f64);
}

#[cfg(not(feature = "metrics"))]
fn record_run_metrics(_stats: PropagationStats, _clusters: usize) {}
