//! Result types for clustering operations.
//!
//! Provides structures to represent clustering results including cluster
//! assignments and validation of cluster identifier constraints.

use thiserror::Error;

use crate::edge::NodeId;

/// Represents the compacted labels produced by [`crate::ChineseWhispers::run`].
///
/// # Examples
/// ```
/// use whispers_core::{ClusteringResult, ClusterId};
///
/// let result = ClusteringResult::try_from_assignments(vec![ClusterId::new(0), ClusterId::new(1)])
///     .expect("assignments are contiguous");
/// assert_eq!(result.assignments().len(), 2);
/// assert_eq!(result.cluster_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusteringResult {
    assignments: Vec<ClusterId>,
    cluster_count: usize,
}

/// Error returned when assignments are not in compacted order.
///
/// Compacted labels number clusters `0..k` in the order their first node
/// appears, so every identifier is either one already used or exactly the next
/// unused one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("node {node} is assigned cluster {found}, but the next unused cluster is {expected}")]
pub struct NonContiguousClusterIds {
    /// Index of the first offending node.
    pub node: NodeId,
    /// Cluster identifier carried by that node.
    pub found: u64,
    /// Smallest identifier not yet used by an earlier node.
    pub expected: u64,
}

impl ClusteringResult {
    /// Wraps labels already compacted by [`crate::compact_labels`].
    pub(crate) fn from_compacted(labels: Vec<NodeId>, cluster_count: usize) -> Self {
        let assignments = labels
            .into_iter()
            .map(|label| ClusterId::new(label as u64))
            .collect();
        Self {
            assignments,
            cluster_count,
        }
    }

    /// Attempts to build a result from cluster assignments.
    ///
    /// The assignments must be in the order [`crate::compact_labels`] leaves
    /// them: scanning nodes by index, each new cluster takes the next unused
    /// identifier starting at zero. Use this to validate labels obtained
    /// elsewhere. An empty vector yields `cluster_count == 0`.
    ///
    /// # Errors
    /// Returns [`NonContiguousClusterIds`] for the first node whose identifier
    /// skips past the next unused one.
    ///
    /// # Examples
    /// ```
    /// use whispers_core::{ClusteringResult, ClusterId, NonContiguousClusterIds};
    ///
    /// let result = ClusteringResult::try_from_assignments(vec![ClusterId::new(0)])
    ///     .expect("assignments are compacted");
    /// assert_eq!(result.cluster_count(), 1);
    ///
    /// let gap = ClusteringResult::try_from_assignments(vec![ClusterId::new(0), ClusterId::new(2)]);
    /// assert_eq!(
    ///     gap,
    ///     Err(NonContiguousClusterIds { node: 1, found: 2, expected: 1 })
    /// );
    /// ```
    pub fn try_from_assignments(
        assignments: Vec<ClusterId>,
    ) -> Result<Self, NonContiguousClusterIds> {
        let mut cluster_count = 0usize;
        let mut next = 0u64;
        for (node, id) in assignments.iter().enumerate() {
            let found = id.get();
            if found == next {
                cluster_count += 1;
                next += 1;
            } else if found > next {
                return Err(NonContiguousClusterIds {
                    node,
                    found,
                    expected: next,
                });
            }
        }
        Ok(Self {
            assignments,
            cluster_count,
        })
    }

    /// Returns one cluster per node in node-index order.
    #[must_use]
    pub fn assignments(&self) -> &[ClusterId] {
        &self.assignments
    }

    /// Returns the cluster of `node`, or `None` when the node is unknown.
    #[must_use]
    pub fn label_of(&self, node: NodeId) -> Option<ClusterId> {
        self.assignments.get(node).copied()
    }

    /// Number of labelled nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns `true` when no node was labelled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Returns how many nodes each cluster holds, indexed by cluster id.
    ///
    /// # Examples
    /// ```
    /// use whispers_core::{ClusteringResult, ClusterId};
    ///
    /// let result = ClusteringResult::try_from_assignments(vec![
    ///     ClusterId::new(0),
    ///     ClusterId::new(1),
    ///     ClusterId::new(0),
    /// ])
    /// .expect("assignments are contiguous");
    /// assert_eq!(result.cluster_sizes(), vec![2, 1]);
    /// ```
    #[must_use]
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.cluster_count];
        for id in &self.assignments {
            if let Some(size) = usize::try_from(id.get())
                .ok()
                .and_then(|index| sizes.get_mut(index))
            {
                *size += 1;
            }
        }
        sizes
    }

    /// Counts how many distinct clusters exist within the assignments.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }
}

/// Identifier assigned to a cluster.
///
/// # Examples
/// ```
/// use whispers_core::ClusterId;
///
/// let id = ClusterId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(u64);

impl ClusterId {
    /// Creates a new cluster identifier.
    ///
    /// # Examples
    /// ```
    /// use whispers_core::ClusterId;
    ///
    /// let id = ClusterId::new(2);
    /// assert_eq!(id.get(), 2);
    /// ```
    #[rustfmt::skip]
    #[must_use]
    pub fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    ///
    /// # Examples
    /// ```
    /// use whispers_core::ClusterId;
    ///
    /// let id = ClusterId::new(7);
    /// assert_eq!(id.get(), 7);
    /// ```
    #[rustfmt::skip]
    #[must_use]
    pub fn get(self) -> u64 { self.0 }
}
