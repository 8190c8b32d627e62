//! Interactive resource timeline and scheduling conflict engine.
//!
//! Lays scheduled operations out in per-resource lanes over a time axis,
//! flags overlapping operations, and lets the user drag or resize them.
//! Changes are applied optimistically and rolled back if the external
//! store refuses them. Schedule optimization is delegated to an external
//! engine through a small lifecycle protocol.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Resource`, `Operation`, `TimeSpan`, `ScheduleGraph`
//! - **`timeline`**: Time-coordinate mapping, lane index, conflict detection,
//!   scroll synchronization, header statistics
//! - **`interaction`**: Drag/resize state machine
//! - **`mutation`**: Optimistic mutation gateway and collaborator traits
//! - **`optimization`**: Optimization dispatcher and engine trait
//! - **`view`**: `TimelineView`, the façade wiring everything together
//! - **`validation`**: Integrity checks on fetched data
//!
//! # Architecture
//!
//! Single-threaded and event-driven. The host feeds pointer, scroll and
//! frame events into [`TimelineView`] and renders the [`RenderFrame`] it
//! returns. The only suspension points are the collaborator calls, which
//! are modelled as `async_trait` traits so any transport can implement
//! them. Nothing here is fatal: the worst outcome of any error is a stale
//! view that the next refresh corrects.

pub mod config;
pub mod error;
pub mod interaction;
pub mod models;
pub mod mutation;
pub mod notice;
pub mod optimization;
pub mod timeline;
pub mod validation;
pub mod view;

pub use config::TimelineConfig;
pub use error::{CollaboratorError, RejectReason, Result, TimelineError};
pub use notice::{Notice, NoticeLevel};
pub use view::{BarFrame, LaneFrame, PreviewFrame, RenderFrame, TimelineView};
