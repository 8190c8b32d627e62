//! Optimization dispatcher.
//!
//! Forwards a [`Strategy`] and the current [`ScheduleGraph`](crate::models::ScheduleGraph)
//! to an opaque external engine and tracks its lifecycle.
//!
//! # Status
//!
//! | Status | Entered on | Left on |
//! |--------|-----------|---------|
//! | `Idle` | start, completion, conflict | request, calculation start |
//! | `Calculating` | engine recalculation (data change) | completion, conflict |
//! | `Optimizing` | explicit request | completion, conflict |
//!
//! Only one explicit run is in flight. Requests while not idle are
//! refused with a notice and leave the running job alone. Conflicts are
//! reported, never resolved automatically.

mod dispatcher;
mod strategy;

pub use dispatcher::{
    DispatchEffect, EngineOutcome, EngineSignal, EngineStatus, OptimizationDispatcher,
    OptimizationEngine,
};
pub use strategy::{OptimizationRequest, Strategy, UnknownStrategy};
