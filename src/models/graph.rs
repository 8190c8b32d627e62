//! Schedule graph snapshot forwarded to the optimization engine.

use serde::{Deserialize, Serialize};

use super::{Operation, Resource};

/// The current resource/operation set, as handed to the external engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleGraph {
    pub resources: Vec<Resource>,
    pub operations: Vec<Operation>,
}

impl ScheduleGraph {
    /// Creates a graph from owned snapshots.
    pub fn new(resources: Vec<Resource>, operations: Vec<Operation>) -> Self {
        Self {
            resources,
            operations,
        }
    }
}
