//! Weighted edges and the store that normalises them before indexing.
//!
//! Callers append edges in any order and orientation. [`EdgeStore::normalize`]
//! mirrors every non-self edge, sorts the result by `(from, to)` and writes it
//! back into the store. The returned [`NormalizedEdges`] view is the only
//! input [`crate::NeighbourIndex::build`] accepts, so an un-normalised edge
//! list cannot reach the indexer.

use std::cmp::Ordering;

use crate::error::EdgeError;

/// Dense, zero-based node identifier.
pub type NodeId = usize;

/// A weighted relationship between two nodes.
///
/// Edges are undirected in meaning; the store materialises the mirrored
/// direction during normalisation. Self-edges are permitted.
///
/// # Examples
/// ```
/// use whispers_core::Edge;
///
/// let edge = Edge::new(0, 3, 0.5);
/// assert_eq!(edge.mirrored(), Edge::new(3, 0, 0.5));
/// assert!(!edge.is_self_edge());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    from: NodeId,
    to: NodeId,
    weight: f64,
}

impl Edge {
    /// Creates an edge from `from` to `to` carrying `weight`.
    #[must_use]
    pub const fn new(from: NodeId, to: NodeId, weight: f64) -> Self {
        Self { from, to, weight }
    }

    /// Returns the source endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn from(&self) -> NodeId { self.from }

    /// Returns the target endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn to(&self) -> NodeId { self.to }

    /// Returns the vote weight.
    #[must_use]
    #[rustfmt::skip]
    pub const fn weight(&self) -> f64 { self.weight }

    /// Returns `true` when both endpoints are the same node.
    #[must_use]
    pub const fn is_self_edge(&self) -> bool {
        self.from == self.to
    }

    /// Returns the same edge with its endpoints swapped.
    #[must_use]
    pub const fn mirrored(&self) -> Self {
        Self::new(self.to, self.from, self.weight)
    }

    /// Returns the larger of the two endpoints.
    #[must_use]
    pub fn max_endpoint(&self) -> NodeId {
        self.from.max(self.to)
    }

    /// Orders edges by `(from, to)`; weight only separates otherwise equal
    /// edges so sorting is fully deterministic.
    fn sort_key_cmp(&self, other: &Self) -> Ordering {
        self.from
            .cmp(&other.from)
            .then_with(|| self.to.cmp(&other.to))
            .then_with(|| self.weight.total_cmp(&other.weight))
    }

    fn endpoints_cmp(&self, other: &Self) -> Ordering {
        self.from
            .cmp(&other.from)
            .then_with(|| self.to.cmp(&other.to))
    }
}

/// Insertion-ordered edge list owned by a clustering instance.
///
/// The store tracks how much of its contents is already normalised, so edges
/// appended after a run are mirrored exactly once on the next
/// [`normalize`](Self::normalize) call.
///
/// # Examples
/// ```
/// use whispers_core::{Edge, EdgeStore};
///
/// let mut store = EdgeStore::new();
/// store.push(Edge::new(1, 0, 2.0));
/// store.push(Edge::new(2, 2, 1.0));
/// let normalized = store.normalize();
/// let pairs: Vec<_> = normalized
///     .as_slice()
///     .iter()
///     .map(|edge| (edge.from(), edge.to()))
///     .collect();
/// assert_eq!(pairs, vec![(0, 1), (1, 0), (2, 2)]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EdgeStore {
    edges: Vec<Edge>,
    normalized_len: usize,
}

impl EdgeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one edge. Endpoints are not validated here.
    pub fn push(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Number of stored edges, counting mirrored copies once normalised.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` when no edges have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of nodes implied by the stored edges: `max(endpoint) + 1`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        NormalizedEdges { edges: &self.edges }.node_count()
    }

    /// Returns `true` when every stored edge has been normalised.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.normalized_len == self.edges.len()
    }

    /// Returns the stored edges in their current order.
    #[must_use]
    pub fn as_slice(&self) -> &[Edge] {
        &self.edges
    }

    /// Mirrors pending non-self edges, sorts the store by `(from, to)` and
    /// returns a view proving the invariant holds.
    ///
    /// The rewritten sequence replaces the store contents. A store that
    /// already satisfies the invariant, either from an earlier call or
    /// because the caller supplied sorted symmetric edges, is left untouched.
    pub fn normalize(&mut self) -> NormalizedEdges<'_> {
        if !self.is_normalized() && NormalizedEdges::try_from_slice(&self.edges).is_ok() {
            self.normalized_len = self.edges.len();
        }
        if !self.is_normalized() {
            let pending = self.edges.split_off(self.normalized_len);
            let mirrors = pending.iter().filter(|edge| !edge.is_self_edge()).count();
            self.edges.reserve(pending.len() + mirrors);
            for edge in pending {
                self.edges.push(edge);
                if !edge.is_self_edge() {
                    self.edges.push(edge.mirrored());
                }
            }
            self.edges.sort_by(Edge::sort_key_cmp);
            self.normalized_len = self.edges.len();
            tracing::debug!(edges = self.edges.len(), "normalised edge store");
        }
        NormalizedEdges { edges: &self.edges }
    }
}

impl Extend<Edge> for EdgeStore {
    fn extend<I: IntoIterator<Item = Edge>>(&mut self, iter: I) {
        self.edges.extend(iter);
    }
}

impl FromIterator<Edge> for EdgeStore {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

/// A borrowed edge slice that is sorted by `(from, to)` and symmetric.
///
/// Obtain one from [`EdgeStore::normalize`], or validate caller-prepared
/// edges with [`NormalizedEdges::try_from_slice`].
#[derive(Clone, Copy, Debug)]
pub struct NormalizedEdges<'a> {
    edges: &'a [Edge],
}

impl<'a> NormalizedEdges<'a> {
    /// Validates that `edges` is sorted by `(from, to)` and that every
    /// non-self edge has a mirror of equal weight.
    ///
    /// # Errors
    /// Returns [`EdgeError::Unsorted`] for the first out-of-order edge and
    /// [`EdgeError::MissingMirror`] for the first edge without a mirror.
    ///
    /// # Examples
    /// ```
    /// use whispers_core::{Edge, EdgeError, NormalizedEdges};
    ///
    /// let symmetric = [Edge::new(0, 1, 1.0), Edge::new(1, 0, 1.0)];
    /// assert!(NormalizedEdges::try_from_slice(&symmetric).is_ok());
    ///
    /// let one_way = [Edge::new(0, 1, 1.0)];
    /// assert!(matches!(
    ///     NormalizedEdges::try_from_slice(&one_way),
    ///     Err(EdgeError::MissingMirror { from: 0, to: 1 })
    /// ));
    /// ```
    pub fn try_from_slice(edges: &'a [Edge]) -> Result<Self, EdgeError> {
        let out_of_order = |pair: &[Edge]| {
            matches!(pair, [left, right] if left.endpoints_cmp(right) == Ordering::Greater)
        };
        if let Some(position) = edges.windows(2).position(out_of_order) {
            return Err(EdgeError::Unsorted {
                position: position + 1,
            });
        }
        let normalized = Self { edges };
        if let Some(edge) = edges
            .iter()
            .find(|edge| !edge.is_self_edge() && !normalized.contains(&edge.mirrored()))
        {
            return Err(EdgeError::MissingMirror {
                from: edge.from(),
                to: edge.to(),
            });
        }
        Ok(normalized)
    }

    /// Returns the underlying sorted, symmetric edges.
    #[must_use]
    pub const fn as_slice(&self) -> &'a [Edge] {
        self.edges
    }

    /// Number of nodes implied by the edges: `max(endpoint) + 1`, or zero.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.edges
            .iter()
            .map(Edge::max_endpoint)
            .max()
            .map_or(0, |max| max.saturating_add(1))
    }

    /// Returns `true` when an edge with the same endpoints and weight exists.
    fn contains(&self, wanted: &Edge) -> bool {
        let start = self
            .edges
            .partition_point(|edge| edge.endpoints_cmp(wanted) == Ordering::Less);
        self.edges
            .get(start..)
            .unwrap_or_default()
            .iter()
            .take_while(|edge| edge.endpoints_cmp(wanted) == Ordering::Equal)
            .any(|edge| edge.weight() == wanted.weight())
    }
}
