//! Pairwise overlap detection within a lane.
//!
//! # Algorithm
//! For every pair `(i, j)`, `i < j`, of one lane, both operations are
//! flagged iff `start_i < end_j && start_j < end_i`. Touching endpoints
//! are not a conflict.
//!
//! # Complexity
//! O(n²) per lane. Fine for lanes of tens to low hundreds of operations;
//! there is no enforced ceiling.

use std::collections::{BTreeSet, HashMap};

use super::lanes::{Lane, LaneIndex};
use crate::models::OperationId;

/// Conflicts found in one lane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaneConflicts {
    /// Ids of every operation that overlaps at least one other.
    pub members: BTreeSet<OperationId>,
    /// Each overlapping pair, smaller id first.
    pub pairs: Vec<(OperationId, OperationId)>,
}

impl LaneConflicts {
    pub fn contains(&self, id: OperationId) -> bool {
        self.members.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Stateless conflict detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector;

impl ConflictDetector {
    /// Detects overlaps in a single lane.
    pub fn detect_lane(lane: &Lane) -> LaneConflicts {
        let ops = &lane.operations;
        let mut result = LaneConflicts::default();
        for i in 0..ops.len() {
            for j in (i + 1)..ops.len() {
                let (a, b) = (&ops[i], &ops[j]);
                if a.start_time < b.end_time && b.start_time < a.end_time {
                    result.members.insert(a.id);
                    result.members.insert(b.id);
                    result.pairs.push((a.id.min(b.id), a.id.max(b.id)));
                }
            }
        }
        result
    }

    /// Detects overlaps in every lane, keyed by resource external id.
    ///
    /// Lanes without conflicts are present with an empty set.
    pub fn detect(index: &LaneIndex) -> HashMap<String, LaneConflicts> {
        index
            .lanes()
            .iter()
            .map(|lane| (lane.resource_id.clone(), Self::detect_lane(lane)))
            .collect()
    }

    /// Total number of distinct conflicting operations across all lanes.
    pub fn count(index: &LaneIndex) -> usize {
        index
            .lanes()
            .iter()
            .map(|lane| Self::detect_lane(lane).members.len())
            .sum()
    }
}
