//! Whispers core library: Chinese Whispers graph clustering.
//!
//! Callers supply weighted edges between dense node indices; the library
//! normalises them into a symmetric, sorted adjacency list, propagates labels
//! node by node, and compacts the surviving labels into cluster ids `0..k`.
//!
//! # Metrics
//!
//! When the `metrics` feature is enabled every run emits:
//!
//! - `whispers_runs_total` (counter)
//! - `whispers_label_changes_total` (counter)
//! - `whispers_cluster_count` (histogram)
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod compaction;
mod edge;
mod error;
mod memory;
mod neighbours;
mod propagation;
mod result;
mod sampler;
mod whispers;

pub use crate::{
    builder::{ChineseWhispersBuilder, DEFAULT_ITERATIONS, DEFAULT_NODE_LIMIT},
    compaction::compact_labels,
    edge::{Edge, EdgeStore, NodeId, NormalizedEdges},
    error::{EdgeError, EdgeErrorCode, Result, WhispersError, WhispersErrorCode},
    memory::{estimate_peak_bytes, format_bytes},
    neighbours::NeighbourIndex,
    propagation::{PropagationEngine, PropagationStats},
    result::{ClusterId, ClusteringResult, NonContiguousClusterIds},
    sampler::{NodeSampler, RngSampler, SeededSampler},
    whispers::ChineseWhispers,
};
