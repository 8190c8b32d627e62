//! Timeline domain models.
//!
//! Read-only copies of the data owned by the external read collaborator,
//! plus the small value types the engine passes around.
//!
//! # Domain Mappings
//!
//! | u-timeline | Manufacturing | Healthcare | Logistics |
//! |------------|--------------|------------|-----------|
//! | Resource | Machine/Line | Room/Doctor | Truck/Dock |
//! | Operation | Operation | Procedure | Transport Leg |
//! | Lane | Machine row | Room row | Dock row |
//!
//! # Time Representation
//! Unlike a solver's epoch-relative milliseconds, the timeline works on
//! absolute UTC timestamps (`chrono::DateTime<Utc>`), serialized as ISO-8601.

mod graph;
mod operation;
mod resource;
mod span;

pub use graph::ScheduleGraph;
pub use operation::{Operation, OperationId, OperationRecord};
pub use resource::{disambiguated_names, Resource, ResourceType};
pub use span::TimeSpan;
