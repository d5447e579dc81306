//! Remaps surviving raw labels into a dense `0..k` range.

use std::collections::HashMap;

use crate::edge::NodeId;

/// Rewrites `labels` in place so they form `0..k` and returns `k`.
///
/// IDs are handed out in the order raw labels are first met while scanning
/// nodes by index, not by raw value. Compacting an already compacted slice
/// leaves it unchanged.
///
/// # Examples
/// ```
/// use whispers_core::compact_labels;
///
/// let mut labels = vec![7, 2, 7, 9, 2];
/// assert_eq!(compact_labels(&mut labels), 3);
/// assert_eq!(labels, vec![0, 1, 0, 2, 1]);
/// ```
pub fn compact_labels(labels: &mut [NodeId]) -> usize {
    let mut remap: HashMap<NodeId, NodeId> = HashMap::new();
    for label in labels.iter_mut() {
        let next = remap.len();
        *label = *remap.entry(*label).or_insert(next);
    }
    remap.len()
}
