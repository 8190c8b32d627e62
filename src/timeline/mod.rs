//! Timeline geometry and per-render analysis.
//!
//! Leaves of the engine: pure time/offset mapping, grouping of operations
//! into resource lanes, overlap detection, scroll synchronization and
//! header statistics. None of these touch the network or own the cached
//! operation collection.

pub mod conflicts;
pub mod lanes;
pub mod scale;
pub mod scroll;
pub mod stats;

pub use conflicts::{ConflictDetector, LaneConflicts};
pub use lanes::{Lane, LaneIndex, LaneLayout};
pub use scale::{clamp_zoom, fit_zoom, forward_map, inverse_map, zoom_bounds, BarRegion, TimeScale};
pub use scroll::{Pane, ScrollCommand, ScrollSync};
pub use stats::TimelineStats;
