//! Drag/resize interaction state machine.
//!
//! Owns the single in-progress manipulation of an operation bar as one
//! tagged state, produces the live preview, and on completion hands back a
//! [`CommitRequest`] for the mutation gateway. Stored data is never touched
//! here.
//!
//! # States
//!
//! ```text
//! Idle ──begin_drag──▶ Dragging ──drop──▶ Idle   (commit if lane + time resolve)
//!   │                     └─────cancel──▶ Idle   (silent)
//!   └──begin_resize──▶ Resizing(edge) ──finish_resize──▶ Idle  (commit if end > start)
//!                         └─────cancel──▶ Idle   (silent)
//! ```
//!
//! Starts are refused while not idle, and for operations whose previous
//! commit has not resolved yet (see [`PendingCommits`]).

mod machine;

pub use machine::{
    CommitRequest, DragState, DraftKind, Interaction, InteractionMachine, ManipulationDraft, PendingCommits,
    Pointer, ResizeEdge, ResizeState,
};
