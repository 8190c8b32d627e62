//! Resource lane index.
//!
//! Groups operations by the external id of their resource. The index is
//! rebuilt from scratch whenever the operation set changes; lane sizes are
//! small enough that incremental maintenance would not pay off.
//!
//! Operations whose resource is `None`, or names a resource that is not in
//! the resource list, are left out of every lane and only counted.

use std::collections::HashMap;

use crate::models::{Operation, OperationId, Resource};

/// Operations assigned to one resource, ordered by start time then id.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    /// External id of the lane's resource.
    pub resource_id: String,
    /// Operations in this lane.
    pub operations: Vec<Operation>,
}

impl Lane {
    fn new(resource_id: String) -> Self {
        Self {
            resource_id,
            operations: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn get(&self, id: OperationId) -> Option<&Operation> {
        self.operations.iter().find(|op| op.id == id)
    }
}

/// Mapping from resource external id to its lane.
///
/// Lanes follow the order of the resource list, including resources with
/// no operations.
#[derive(Debug, Clone, Default)]
pub struct LaneIndex {
    lanes: Vec<Lane>,
    by_resource: HashMap<String, usize>,
    unassigned: Vec<OperationId>,
}

impl LaneIndex {
    /// Builds the index.
    pub fn build(resources: &[Resource], operations: &[Operation]) -> Self {
        let mut lanes = Vec::with_capacity(resources.len());
        let mut by_resource = HashMap::with_capacity(resources.len());
        for resource in resources {
            // First occurrence wins if the list carries a duplicate id.
            if by_resource.contains_key(&resource.external_id) {
                continue;
            }
            by_resource.insert(resource.external_id.clone(), lanes.len());
            lanes.push(Lane::new(resource.external_id.clone()));
        }

        let mut unassigned = Vec::new();
        for op in operations {
            match op.resource_id.as_ref().and_then(|r| by_resource.get(r)) {
                Some(&idx) => lanes[idx].operations.push(op.clone()),
                None => unassigned.push(op.id),
            }
        }

        for lane in &mut lanes {
            lane.operations
                .sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
        }

        Self {
            lanes,
            by_resource,
            unassigned,
        }
    }

    /// Lane for a resource, O(1).
    pub fn lane(&self, resource_id: &str) -> Option<&Lane> {
        self.by_resource.get(resource_id).map(|&idx| &self.lanes[idx])
    }

    /// Lane at a display position.
    pub fn lane_at(&self, index: usize) -> Option<&Lane> {
        self.lanes.get(index)
    }

    /// Display position of a resource's lane.
    pub fn position_of(&self, resource_id: &str) -> Option<usize> {
        self.by_resource.get(resource_id).copied()
    }

    /// All lanes in display order.
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Number of operations placed in some lane.
    pub fn placed_count(&self) -> usize {
        self.lanes.iter().map(Lane::len).sum()
    }

    /// Ids of operations excluded for a missing or unknown resource.
    pub fn unassigned(&self) -> &[OperationId] {
        &self.unassigned
    }

    /// Whether `resource_id` has a lane.
    pub fn contains(&self, resource_id: &str) -> bool {
        self.by_resource.contains_key(resource_id)
    }
}

/// Vertical lane geometry: lane `i` occupies `[i * row_height, (i + 1) * row_height)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneLayout {
    pub row_height: f64,
}

impl LaneLayout {
    pub fn new(row_height: f64) -> Self {
        Self { row_height }
    }

    /// Lane position under a vertical content offset.
    pub fn index_at(&self, y: f64, lane_count: usize) -> Option<usize> {
        if y < 0.0 || self.row_height <= 0.0 {
            return None;
        }
        let idx = (y / self.row_height).floor() as usize;
        (idx < lane_count).then_some(idx)
    }

    /// Resource external id of the lane under `y`.
    pub fn resource_at<'a>(&self, y: f64, index: &'a LaneIndex) -> Option<&'a str> {
        self.index_at(y, index.lane_count())
            .and_then(|i| index.lane_at(i))
            .map(|lane| lane.resource_id.as_str())
    }

    /// Top offset of lane `index`.
    pub fn top_of(&self, index: usize) -> f64 {
        index as f64 * self.row_height
    }

    /// Total height of `lane_count` lanes.
    pub fn content_height(&self, lane_count: usize) -> f64 {
        lane_count as f64 * self.row_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 19, hour, 0, 0).unwrap()
    }

    fn resources() -> Vec<Resource> {
        vec![
            Resource::new(1, "R1").with_name("Kettle"),
            Resource::new(2, "R2").with_name("Fermenter"),
            Resource::new(3, "R3").with_name("Packaging"),
        ]
    }

    fn operations() -> Vec<Operation> {
        vec![
            Operation::new(3, "late", at(14), at(15)).on_resource("R1"),
            Operation::new(1, "early", at(9), at(11)).on_resource("R1"),
            Operation::new(2, "other", at(10), at(12)).on_resource("R2"),
            Operation::new(4, "orphan", at(9), at(10)),
            Operation::new(5, "ghost", at(9), at(10)).on_resource("R9"),
        ]
    }

    #[test]
    fn test_build_groups_by_resource() {
        let index = LaneIndex::build(&resources(), &operations());
        assert_eq!(index.lane_count(), 3);

        let r1 = index.lane("R1").unwrap();
        let ids: Vec<_> = r1.operations.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 3]); // sorted by start

        assert_eq!(index.lane("R2").unwrap().len(), 1);
        assert!(index.lane("R3").unwrap().is_empty());
        assert!(index.lane("R9").is_none());
    }

    #[test]
    fn test_unassigned_excluded_from_lanes() {
        let index = LaneIndex::build(&resources(), &operations());
        assert_eq!(index.unassigned(), &[4, 5]);
        assert_eq!(index.placed_count(), 3);
        for lane in index.lanes() {
            assert!(lane.get(4).is_none());
            assert!(lane.get(5).is_none());
        }
    }

    #[test]
    fn test_lane_order_follows_resources() {
        let index = LaneIndex::build(&resources(), &operations());
        assert_eq!(index.position_of("R2"), Some(1));
        assert_eq!(index.lane_at(2).unwrap().resource_id, "R3");
        assert!(index.contains("R3"));
        assert!(!index.contains("R9"));
    }

    #[test]
    fn test_duplicate_resource_ids_keep_first() {
        let mut res = resources();
        res.push(Resource::new(9, "R1").with_name("Duplicate"));
        let index = LaneIndex::build(&res, &operations());
        assert_eq!(index.lane_count(), 3);
        assert_eq!(index.lane("R1").unwrap().len(), 2);
    }

    #[test]
    fn test_layout_hit_testing() {
        let index = LaneIndex::build(&resources(), &operations());
        let layout = LaneLayout::new(50.0);
        assert_eq!(layout.resource_at(0.0, &index), Some("R1"));
        assert_eq!(layout.resource_at(49.9, &index), Some("R1"));
        assert_eq!(layout.resource_at(50.0, &index), Some("R2"));
        assert_eq!(layout.resource_at(149.0, &index), Some("R3"));
        assert_eq!(layout.resource_at(150.0, &index), None);
        assert_eq!(layout.resource_at(-1.0, &index), None);
        assert_eq!(layout.top_of(2), 100.0);
        assert_eq!(layout.content_height(3), 150.0);
    }
}
