//! Reusable per-step label tally.

use std::collections::{HashMap, hash_map::Entry};

use crate::edge::NodeId;

/// Accumulates `label -> weight` for one node's neighbourhood.
///
/// Scores are kept in first-seen order, so [`LabelTally::best`] breaks ties
/// identically on every platform regardless of hasher state.
#[derive(Debug, Default)]
pub(crate) struct LabelTally {
    slots: HashMap<NodeId, usize>,
    scores: Vec<(NodeId, f64)>,
}

impl LabelTally {
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.scores.clear();
    }

    pub(crate) fn add(&mut self, label: NodeId, weight: f64) {
        match self.slots.entry(label) {
            Entry::Occupied(slot) => {
                if let Some((_, score)) = self.scores.get_mut(*slot.get()) {
                    *score += weight;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(self.scores.len());
                self.scores.push((label, weight));
            }
        }
    }

    /// Returns the first label whose score is strictly greater than every
    /// earlier one, or `incumbent` when the tally is empty.
    pub(crate) fn best(&self, incumbent: NodeId) -> NodeId {
        let mut best_label = incumbent;
        let mut best_score = f64::NEG_INFINITY;
        for &(label, score) in &self.scores {
            if score > best_score {
                best_score = score;
                best_label = label;
            }
        }
        best_label
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.scores.len()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn empty_tally_keeps_incumbent() {
        assert_eq!(LabelTally::default().best(9), 9);
    }

    #[rstest]
    fn weights_accumulate_per_label() {
        let mut tally = LabelTally::default();
        tally.add(4, 1.0);
        tally.add(7, 1.5);
        tally.add(4, 1.0);
        assert_eq!(tally.len(), 2);
        assert_eq!(tally.best(0), 4);
    }

    #[rstest]
    #[case::first_seen_wins(&[(3, 2.0), (1, 2.0)], 3)]
    #[case::later_strictly_greater(&[(3, 2.0), (1, 2.5)], 1)]
    #[case::negative_weights_still_vote(&[(5, -1.0)], 5)]
    fn best_prefers_first_strictly_greater(#[case] votes: &[(NodeId, f64)], #[case] expected: NodeId) {
        let mut tally = LabelTally::default();
        for &(label, weight) in votes {
            tally.add(label, weight);
        }
        assert_eq!(tally.best(0), expected);
    }

    #[rstest]
    fn clear_resets_scores() {
        let mut tally = LabelTally::default();
        tally.add(2, 1.0);
        tally.clear();
        assert_eq!(tally.len(), 0);
        assert_eq!(tally.best(6), 6);
    }
}
