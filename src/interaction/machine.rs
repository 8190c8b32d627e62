use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::error::RejectReason;
use crate::models::{Operation, OperationId, TimeSpan};
use crate::timeline::{LaneIndex, LaneLayout, TimeScale};

/// Pointer position in content coordinates (scroll offsets already added).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which edge of a bar is being resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeEdge {
    Start,
    End,
}

/// Kind of manipulation a draft belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftKind {
    Drag,
    Resize(ResizeEdge),
}

/// Ephemeral preview of a manipulation. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManipulationDraft {
    pub operation_id: OperationId,
    pub kind: DraftKind,
    /// Lane under the pointer; `None` while outside every lane.
    pub preview_resource_id: Option<String>,
    pub preview_start: DateTime<Utc>,
    pub preview_end: DateTime<Utc>,
}

impl ManipulationDraft {
    fn at_rest(op: &Operation, kind: DraftKind) -> Self {
        Self {
            operation_id: op.id,
            kind,
            preview_resource_id: op.resource_id.clone(),
            preview_start: op.start_time,
            preview_end: op.end_time,
        }
    }

    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.preview_start, self.preview_end)
    }
}

/// A completed manipulation, ready for the mutation gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    pub operation_id: OperationId,
    pub new_resource_id: String,
    pub new_start: DateTime<Utc>,
    pub new_end: DateTime<Utc>,
}

impl CommitRequest {
    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.new_start, self.new_end)
    }
}

/// Lookup of operations whose last commit is still in flight.
pub trait PendingCommits {
    fn is_pending(&self, id: OperationId) -> bool;
}

impl PendingCommits for HashSet<OperationId> {
    fn is_pending(&self, id: OperationId) -> bool {
        self.contains(&id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    original: Operation,
    origin: Pointer,
    /// Pointer time minus the operation's start at grab time. Kept in time
    /// so zooming or shifting the window mid-drag does not move the bar.
    grab: Duration,
    draft: ManipulationDraft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeState {
    original: Operation,
    edge: ResizeEdge,
    /// Pointer time minus the grabbed edge's time.
    grab: Duration,
    draft: ManipulationDraft,
}

/// The single current manipulation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging(DragState),
    Resizing(ResizeState),
}

impl DragState {
    pub fn origin(&self) -> Pointer {
        self.origin
    }
}

impl ResizeState {
    pub fn edge(&self) -> ResizeEdge {
        self.edge
    }
}

/// Drives [`Interaction`] from pointer events.
#[derive(Debug, Clone, Default)]
pub struct InteractionMachine {
    state: Interaction,
    snap_minutes: Option<u32>,
}

impl InteractionMachine {
    /// Creates an idle machine. `snap_minutes` rounds preview times.
    pub fn new(snap_minutes: Option<u32>) -> Self {
        Self {
            state: Interaction::Idle,
            snap_minutes,
        }
    }

    pub fn state(&self) -> &Interaction {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, Interaction::Idle)
    }

    /// Live preview of the current manipulation.
    pub fn draft(&self) -> Option<&ManipulationDraft> {
        match &self.state {
            Interaction::Idle => None,
            Interaction::Dragging(d) => Some(&d.draft),
            Interaction::Resizing(r) => Some(&r.draft),
        }
    }

    /// Id of the operation being manipulated.
    pub fn active_operation(&self) -> Option<OperationId> {
        self.draft().map(|d| d.operation_id)
    }

    /// Pointer-down on an operation's body.
    pub fn begin_drag(
        &mut self,
        op: &Operation,
        origin: Pointer,
        scale: &TimeScale,
        pending: &dyn PendingCommits,
    ) -> Result<(), RejectReason> {
        self.check_can_start(op.id, pending)?;
        let grab = scale.time_at(origin.x) - op.start_time;
        debug!(operation_id = op.id, "drag started");
        self.state = Interaction::Dragging(DragState {
            original: op.clone(),
            origin,
            grab,
            draft: ManipulationDraft::at_rest(op, DraftKind::Drag),
        });
        Ok(())
    }

    /// Pointer-down on an operation's leading or trailing edge.
    pub fn begin_resize(
        &mut self,
        op: &Operation,
        edge: ResizeEdge,
        origin: Pointer,
        scale: &TimeScale,
        pending: &dyn PendingCommits,
    ) -> Result<(), RejectReason> {
        self.check_can_start(op.id, pending)?;
        let edge_time = match edge {
            ResizeEdge::Start => op.start_time,
            ResizeEdge::End => op.end_time,
        };
        let grab = scale.time_at(origin.x) - edge_time;
        debug!(operation_id = op.id, ?edge, "resize started");
        self.state = Interaction::Resizing(ResizeState {
            original: op.clone(),
            edge,
            grab,
            draft: ManipulationDraft::at_rest(op, DraftKind::Resize(edge)),
        });
        Ok(())
    }

    /// Pointer-move: recomputes the preview. No-op while idle.
    pub fn pointer_move(
        &mut self,
        pointer: Pointer,
        scale: &TimeScale,
        layout: &LaneLayout,
        lanes: &LaneIndex,
    ) {
        let snap = self.snap_minutes;
        let snapped = |t: DateTime<Utc>| match snap {
            Some(minutes) => scale.snap(t, minutes),
            None => t,
        };
        match &mut self.state {
            Interaction::Idle => {}
            Interaction::Dragging(d) => {
                d.draft.preview_resource_id = layout.resource_at(pointer.y, lanes).map(str::to_owned);
                // Out of the representable range: keep the last preview.
                let Some(start) = scale.time_at(pointer.x).checked_sub_signed(d.grab).map(snapped) else {
                    return;
                };
                let Some(end) = start.checked_add_signed(d.original.duration()) else {
                    return;
                };
                d.draft.preview_start = start;
                d.draft.preview_end = end;
            }
            Interaction::Resizing(r) => {
                let Some(time) = scale.time_at(pointer.x).checked_sub_signed(r.grab).map(snapped) else {
                    return;
                };
                match r.edge {
                    ResizeEdge::Start => r.draft.preview_start = time,
                    ResizeEdge::End => r.draft.preview_end = time,
                }
            }
        }
    }

    /// Pointer-up while dragging.
    ///
    /// Emits a commit keeping the original duration when the preview has
    /// a lane; otherwise cancels silently. Always ends idle.
    pub fn drop(&mut self) -> Option<CommitRequest> {
        if !matches!(self.state, Interaction::Dragging(_)) {
            return None;
        }
        let Interaction::Dragging(d) = std::mem::take(&mut self.state) else {
            return None;
        };
        let Some(resource_id) = d.draft.preview_resource_id else {
            debug!(operation_id = d.original.id, reason = %RejectReason::NoTargetLane, "drop cancelled");
            return None;
        };
        let new_start = d.draft.preview_start;
        let request = CommitRequest {
            operation_id: d.original.id,
            new_resource_id: resource_id,
            new_start,
            new_end: new_start + d.original.duration(),
        };
        debug!(operation_id = request.operation_id, resource = %request.new_resource_id, "dropped");
        Some(request)
    }

    /// Pointer-up while resizing.
    ///
    /// A result violating `end > start`, or an operation without a
    /// resource, is rejected here and never dispatched. Always ends idle.
    pub fn finish_resize(&mut self) -> Option<CommitRequest> {
        if !matches!(self.state, Interaction::Resizing(_)) {
            return None;
        }
        let Interaction::Resizing(r) = std::mem::take(&mut self.state) else {
            return None;
        };
        if r.draft.preview_end <= r.draft.preview_start {
            debug!(
                operation_id = r.original.id,
                reason = %RejectReason::NonPositiveDuration,
                "resize rejected"
            );
            return None;
        }
        let Some(resource_id) = r.original.resource_id.clone() else {
            debug!(operation_id = r.original.id, reason = %RejectReason::NoTargetLane, "resize rejected");
            return None;
        };
        debug!(operation_id = r.original.id, edge = ?r.edge, "resized");
        Some(CommitRequest {
            operation_id: r.original.id,
            new_resource_id: resource_id,
            new_start: r.draft.preview_start,
            new_end: r.draft.preview_end,
        })
    }

    /// Pointer-up in any state: drop, finish a resize, or nothing.
    pub fn release(&mut self) -> Option<CommitRequest> {
        match self.state {
            Interaction::Idle => None,
            Interaction::Dragging(_) => self.drop(),
            Interaction::Resizing(_) => self.finish_resize(),
        }
    }

    /// Abandons the current manipulation without side effects.
    pub fn cancel(&mut self) {
        if let Some(id) = self.active_operation() {
            debug!(operation_id = id, "manipulation cancelled");
        }
        self.state = Interaction::Idle;
    }

    fn check_can_start(
        &self,
        id: OperationId,
        pending: &dyn PendingCommits,
    ) -> Result<(), RejectReason> {
        if !self.is_idle() {
            debug!(operation_id = id, "start ignored: manipulation in progress");
            return Err(RejectReason::NotIdle);
        }
        if pending.is_pending(id) {
            debug!(operation_id = id, "start ignored: commit in flight");
            return Err(RejectReason::PendingCommit);
        }
        Ok(())
    }
}
