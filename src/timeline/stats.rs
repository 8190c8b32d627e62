//! Summary statistics for the timeline header.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Resources | Number of lanes |
//! | Operations | Operations placed in some lane |
//! | Unassigned | Operations with a missing or unknown resource |
//! | Conflicts | Distinct operations overlapping another in their lane |
//! | Utilization | Busy time inside the window / window length, per lane |
//!
//! Busy time is the plain sum of clipped operation lengths, so a lane with
//! conflicts can exceed 1.0.

use std::collections::HashMap;

use super::conflicts::ConflictDetector;
use super::lanes::LaneIndex;
use crate::models::TimeSpan;

/// Header statistics for one render of the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineStats {
    pub resource_count: usize,
    pub operation_count: usize,
    pub unassigned_count: usize,
    pub conflict_count: usize,
    /// Mean of `utilization_by_resource` (0.0 with no lanes).
    pub avg_utilization: f64,
    /// Per-lane utilization over the window, keyed by resource external id.
    pub utilization_by_resource: HashMap<String, f64>,
}

impl TimelineStats {
    /// Computes statistics for `index` over the visible `window`.
    pub fn calculate(index: &LaneIndex, window: &TimeSpan) -> Self {
        let window_hours = window.hours();
        let utilization_by_resource: HashMap<String, f64> = index
            .lanes()
            .iter()
            .map(|lane| {
                let busy: f64 = lane
                    .operations
                    .iter()
                    .filter_map(|op| op.span().clip(window))
                    .map(|s| s.hours())
                    .sum();
                let util = if window_hours > 0.0 {
                    busy / window_hours
                } else {
                    0.0
                };
                (lane.resource_id.clone(), util)
            })
            .collect();

        let avg_utilization = if utilization_by_resource.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_resource.values().sum();
            sum / utilization_by_resource.len() as f64
        };

        Self {
            resource_count: index.lane_count(),
            operation_count: index.placed_count(),
            unassigned_count: index.unassigned().len(),
            conflict_count: ConflictDetector::count(index),
            avg_utilization,
            utilization_by_resource,
        }
    }

    /// Average utilization as a whole percentage, for display.
    pub fn utilization_percent(&self) -> u32 {
        (self.avg_utilization * 100.0).round().max(0.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Operation, Resource};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 19, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_stats_basic() {
        let resources = vec![Resource::new(1, "R1"), Resource::new(2, "R2")];
        let ops = vec![
            Operation::new(1, "A", at(8), at(12)).on_resource("R1"),
            Operation::new(2, "B", at(10), at(12)).on_resource("R1"),
            Operation::new(3, "C", at(8), at(10)).on_resource("R2"),
            Operation::new(4, "D", at(8), at(9)),
        ];
        let index = LaneIndex::build(&resources, &ops);
        let window = TimeSpan::new(at(8), at(16)); // 8 hours

        let stats = TimelineStats::calculate(&index, &window);
        assert_eq!(stats.resource_count, 2);
        assert_eq!(stats.operation_count, 3);
        assert_eq!(stats.unassigned_count, 1);
        assert_eq!(stats.conflict_count, 2);
        // R1: (4 + 2) / 8 = 0.75, R2: 2 / 8 = 0.25
        assert!((stats.utilization_by_resource["R1"] - 0.75).abs() < 1e-10);
        assert!((stats.utilization_by_resource["R2"] - 0.25).abs() < 1e-10);
        assert!((stats.avg_utilization - 0.5).abs() < 1e-10);
        assert_eq!(stats.utilization_percent(), 50);
    }

    #[test]
    fn test_stats_clip_to_window() {
        let resources = vec![Resource::new(1, "R1")];
        let ops = vec![Operation::new(1, "A", at(6), at(10)).on_resource("R1")];
        let index = LaneIndex::build(&resources, &ops);
        let window = TimeSpan::new(at(8), at(12));

        let stats = TimelineStats::calculate(&index, &window);
        // only 08:00-10:00 counts: 2 / 4
        assert!((stats.utilization_by_resource["R1"] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_stats_empty() {
        let index = LaneIndex::build(&[], &[]);
        let stats = TimelineStats::calculate(&index, &TimeSpan::new(at(8), at(12)));
        assert_eq!(stats.resource_count, 0);
        assert_eq!(stats.conflict_count, 0);
        assert!((stats.avg_utilization - 0.0).abs() < 1e-10);
    }
}
