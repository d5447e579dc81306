//! Pre-flight memory estimation for a clustering run.
//!
//! [`crate::ChineseWhispers::run`] allocates per node up to the largest
//! endpoint, so one stray id can demand far more memory than the edge list
//! itself. The estimate lets callers reject such graphs before allocating.

use std::{mem::size_of, ops::Range};

use crate::{edge::Edge, edge::NodeId, result::ClusterId};

/// Numerator and denominator of the 1.5x multiplier covering hasher
/// overhead, allocator slack and transient buffers.
const SAFETY_MULTIPLIER_NUMERATOR: u64 = 3;
const SAFETY_MULTIPLIER_DENOMINATOR: u64 = 2;

/// Per-node bytes: neighbour range, working label, compaction slot
/// (key, value and control byte) and the final cluster id.
const PER_NODE_BYTES: u64 = (size_of::<Range<usize>>()
    + size_of::<NodeId>()
    + 2 * size_of::<NodeId>()
    + 1
    + size_of::<ClusterId>()) as u64;

/// Per stored edge after normalisation, which can double the edge count.
const PER_EDGE_BYTES: u64 = 2 * size_of::<Edge>() as u64;

/// Returns a conservative estimate of the peak bytes a run allocates for a
/// graph with `node_count` nodes and `edge_count` stored edges.
///
/// # Examples
/// ```
/// use whispers_core::estimate_peak_bytes;
///
/// assert_eq!(estimate_peak_bytes(0, 0), 0);
/// assert!(estimate_peak_bytes(4_000_000_000, 1) > 64_000_000_000);
/// ```
#[must_use]
pub fn estimate_peak_bytes(node_count: usize, edge_count: usize) -> u64 {
    let nodes = u64::try_from(node_count).unwrap_or(u64::MAX);
    let edges = u64::try_from(edge_count).unwrap_or(u64::MAX);
    nodes
        .saturating_mul(PER_NODE_BYTES)
        .saturating_add(edges.saturating_mul(PER_EDGE_BYTES))
        .saturating_mul(SAFETY_MULTIPLIER_NUMERATOR)
        / SAFETY_MULTIPLIER_DENOMINATOR
}

/// Formats a byte count with binary units, e.g. `"1.5 KiB"`.
///
/// # Examples
/// ```
/// use whispers_core::format_bytes;
///
/// assert_eq!(format_bytes(1023), "1023 B");
/// assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GiB");
/// ```
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    let mut scaled = bytes as f64;
    let mut unit = None;
    for name in UNITS {
        if scaled < 1024.0 {
            break;
        }
        scaled /= 1024.0;
        unit = Some(name);
    }
    match unit {
        Some(name) => format!("{scaled:.1} {name}"),
        None => format!("{bytes} B"),
    }
}
