//! Timeline view: the façade owning every component.
//!
//! # Data flow
//!
//! ```text
//! read collaborator ──▶ MutationGateway (operation cache) ──▶ LaneIndex ──▶ ConflictDetector
//!                              ▲                                 │
//!   pointer events ──▶ InteractionMachine ── CommitRequest ──────┘ (rebuilt after every write)
//!   scroll events  ──▶ ScrollSync
//!   optimize       ──▶ OptimizationDispatcher ── Refetch ──▶ read collaborator
//! ```
//!
//! All methods run on the host's event loop, one event at a time. The
//! two-phase methods (`pointer_up` then `commit_succeeded`/`commit_failed`,
//! `request_optimization` then `on_engine_signal`) never block; the `async`
//! variants drive a collaborator to completion for hosts that can await.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use u_timeline::models::{Operation, Resource, TimeSpan};
//! use u_timeline::{TimelineConfig, TimelineView};
//!
//! let day = Utc.with_ymd_and_hms(2025, 8, 19, 0, 0, 0).unwrap();
//! let window = TimeSpan::new(day, day + Duration::days(14));
//! let resources = vec![Resource::new(1, "R1").with_name("Kettle")];
//! let operations = vec![
//!     Operation::new(1, "Boil", day + Duration::hours(9), day + Duration::hours(11)).on_resource("R1"),
//!     Operation::new(2, "Mash", day + Duration::hours(10), day + Duration::hours(12)).on_resource("R1"),
//! ];
//!
//! let view = TimelineView::mount(TimelineConfig::default(), window, day, resources, operations);
//! let frame = view.render();
//! assert_eq!(frame.lanes[0].label, "Kettle");
//! assert!(frame.lanes[0].bars.iter().all(|b| b.conflicting));
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::config::TimelineConfig;
use crate::error::{Result, TimelineError};
use crate::interaction::{InteractionMachine, ManipulationDraft, Pointer, ResizeEdge};
use crate::models::{
    disambiguated_names, Operation, OperationId, OperationRecord, Resource, ScheduleGraph,
    TimeSpan,
};
use crate::mutation::{MutationCollaborator, MutationGateway, OperationUpdate, ReadCollaborator};
use crate::notice::Notice;
use crate::optimization::{
    DispatchEffect, EngineSignal, EngineStatus, OptimizationDispatcher, OptimizationEngine,
    OptimizationRequest, Strategy,
};
use crate::timeline::{
    BarRegion, ConflictDetector, LaneConflicts, LaneIndex, LaneLayout, Pane, ScrollCommand,
    ScrollSync, TimeScale, TimelineStats,
};
use crate::validation::validate_input;

/// One operation bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarFrame {
    pub operation_id: OperationId,
    pub name: String,
    pub x: f64,
    pub width: f64,
    pub conflicting: bool,
    /// A commit for this operation is in flight.
    pub pending: bool,
    /// The operation is being dragged or resized.
    pub manipulating: bool,
    pub percent_done: f64,
}

/// One resource lane.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneFrame {
    pub resource_id: String,
    pub label: String,
    pub top: f64,
    pub bars: Vec<BarFrame>,
    /// Overlapping id pairs in this lane.
    pub conflicts: Vec<(OperationId, OperationId)>,
}

/// Live preview of the current manipulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewFrame {
    pub draft: ManipulationDraft,
    pub x: f64,
    pub width: f64,
    /// Top of the target lane; `None` while over no lane.
    pub top: Option<f64>,
}

/// Everything the host needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub lanes: Vec<LaneFrame>,
    pub preview: Option<PreviewFrame>,
    pub content_width: f64,
    pub content_height: f64,
    pub zoom: f64,
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub engine_status: EngineStatus,
}

/// Interactive resource timeline.
#[derive(Debug, Clone)]
pub struct TimelineView {
    config: TimelineConfig,
    resources: Vec<Resource>,
    labels: HashMap<String, String>,
    scale: TimeScale,
    layout: LaneLayout,
    lanes: LaneIndex,
    scroll: ScrollSync,
    interaction: InteractionMachine,
    gateway: MutationGateway,
    optimizer: OptimizationDispatcher,
}

impl TimelineView {
    /// Builds the view over `window` and scrolls so `now` sits at the
    /// configured lead margin.
    pub fn mount(
        config: TimelineConfig,
        window: TimeSpan,
        now: DateTime<Utc>,
        resources: Vec<Resource>,
        operations: Vec<Operation>,
    ) -> Self {
        for problem in config.validate() {
            warn!(%problem, "timeline config");
        }
        let mut view = Self {
            scale: TimeScale::from_config(window, &config),
            layout: LaneLayout::new(config.row_height),
            interaction: InteractionMachine::new(config.snap_minutes),
            config,
            resources: Vec::new(),
            labels: HashMap::new(),
            lanes: LaneIndex::default(),
            scroll: ScrollSync::new(),
            gateway: MutationGateway::default(),
            optimizer: OptimizationDispatcher::new(),
        };
        view.refresh(resources, operations);
        view.scroll_to_now(now);
        info!(
            resources = view.resources.len(),
            operations = view.gateway.operations().len(),
            "timeline mounted"
        );
        view
    }

    /// Like [`mount`](Self::mount), normalizing raw records first.
    pub fn mount_records(
        config: TimelineConfig,
        window: TimeSpan,
        now: DateTime<Utc>,
        resources: Vec<Resource>,
        records: Vec<OperationRecord>,
    ) -> Self {
        let operations = normalize(records, config.default_duration_minutes);
        Self::mount(config, window, now, resources, operations)
    }

    /// Fetches resources and operations, then mounts.
    pub async fn load(
        config: TimelineConfig,
        window: TimeSpan,
        now: DateTime<Utc>,
        reader: &dyn ReadCollaborator,
    ) -> Result<Self> {
        let (resources, records) = fetch(reader).await?;
        Ok(Self::mount_records(config, window, now, resources, records))
    }

    // ---- data ----

    /// Full refresh. Pending optimistic patches survive it.
    pub fn refresh(&mut self, resources: Vec<Resource>, operations: Vec<Operation>) {
        if let Err(errors) = validate_input(&resources, &operations) {
            for e in &errors {
                warn!(kind = ?e.kind, message = %e.message, "invalid timeline data");
            }
        }
        self.labels.clear();
        for (r, name) in resources.iter().zip(disambiguated_names(&resources)) {
            self.labels.entry(r.external_id.clone()).or_insert(name);
        }
        self.resources = resources;
        self.gateway.refresh(operations);
        self.rebuild_lanes();
    }

    /// Full refresh from raw records.
    pub fn refresh_records(&mut self, resources: Vec<Resource>, records: Vec<OperationRecord>) {
        let operations = normalize(records, self.config.default_duration_minutes);
        self.refresh(resources, operations);
    }

    /// Re-fetches everything. On failure the current data is kept.
    pub async fn reload(&mut self, reader: &dyn ReadCollaborator) -> Result<()> {
        let (resources, records) = fetch(reader).await?;
        self.refresh_records(resources, records);
        Ok(())
    }

    fn rebuild_lanes(&mut self) {
        self.lanes = LaneIndex::build(&self.resources, self.gateway.operations());
    }

    // ---- rendering ----

    /// Geometry for the current frame. Conflicts are recomputed each call.
    pub fn render(&self) -> RenderFrame {
        let conflicts = ConflictDetector::detect(&self.lanes);
        let active = self.interaction.active_operation();

        let lanes = self
            .lanes
            .lanes()
            .iter()
            .enumerate()
            .map(|(pos, lane)| {
                let lane_conflicts = conflicts.get(&lane.resource_id);
                let bars = lane
                    .operations
                    .iter()
                    .map(|op| BarFrame {
                        operation_id: op.id,
                        name: op.name.clone(),
                        x: self.scale.offset_of(op.start_time),
                        width: self.scale.width_of(&op.span()),
                        conflicting: lane_conflicts.is_some_and(|c| c.contains(op.id)),
                        pending: self.gateway.is_pending(op.id),
                        manipulating: active == Some(op.id),
                        percent_done: op.percent_done,
                    })
                    .collect();
                LaneFrame {
                    resource_id: lane.resource_id.clone(),
                    label: self
                        .labels
                        .get(&lane.resource_id)
                        .cloned()
                        .unwrap_or_else(|| lane.resource_id.clone()),
                    top: self.layout.top_of(pos),
                    bars,
                    conflicts: lane_conflicts.map(|c| c.pairs.clone()).unwrap_or_default(),
                }
            })
            .collect();

        let preview = self.interaction.draft().map(|draft| PreviewFrame {
            x: self.scale.offset_of(draft.preview_start),
            width: self.scale.width_of(&draft.span()),
            top: draft
                .preview_resource_id
                .as_deref()
                .and_then(|r| self.lanes.position_of(r))
                .map(|pos| self.layout.top_of(pos)),
            draft: draft.clone(),
        });

        RenderFrame {
            lanes,
            preview,
            content_width: self.scale.content_width(),
            content_height: self.layout.content_height(self.lanes.lane_count()),
            zoom: self.scale.zoom(),
            scroll_left: self.scroll.left(),
            scroll_top: self.scroll.top(Pane::Timeline),
            engine_status: self.optimizer.status(),
        }
    }

    /// Conflicts per resource lane.
    pub fn conflicts(&self) -> HashMap<String, LaneConflicts> {
        ConflictDetector::detect(&self.lanes)
    }

    /// Header statistics over the visible window.
    pub fn stats(&self) -> TimelineStats {
        TimelineStats::calculate(&self.lanes, &self.scale.window())
    }

    // ---- zoom and navigation ----

    pub fn zoom_in(&mut self) -> f64 {
        let zoom = self.scale.zoom_by(self.config.zoom_step);
        debug!(zoom, "zoom in");
        zoom
    }

    pub fn zoom_out(&mut self) -> f64 {
        let zoom = self.scale.zoom_by(1.0 / self.config.zoom_step);
        debug!(zoom, "zoom out");
        zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.scale.set_zoom(zoom)
    }

    pub fn reset_zoom(&mut self) -> f64 {
        self.scale.set_zoom(self.config.default_zoom)
    }

    /// Fits all visible operations into `available_span` units.
    ///
    /// Returns `false` when there is nothing to fit; the zoom is unchanged.
    pub fn zoom_to_fit(&mut self, available_span: f64) -> bool {
        let fitted = self
            .scale
            .fit_to(self.lanes.lanes().iter().flat_map(|l| &l.operations), available_span);
        debug!(fitted, zoom = self.scale.zoom(), "zoom to fit");
        fitted
    }

    /// Moves the window one window-length earlier.
    pub fn shift_previous(&mut self) {
        self.scale.shift_window(-1);
    }

    /// Moves the window one window-length later.
    pub fn shift_next(&mut self) {
        self.scale.shift_window(1);
    }

    /// Scrolls horizontally so `now` sits at the lead margin. Returns the
    /// new offset.
    pub fn scroll_to_now(&mut self, now: DateTime<Utc>) -> f64 {
        let left = self.scale.scroll_offset_for(now, self.config.now_lead_margin);
        self.scroll.set_left(left);
        left
    }

    // ---- scrolling ----

    pub fn on_scroll(&mut self, source: Pane, top: f64) -> Option<ScrollCommand> {
        self.scroll.on_scroll(source, top)
    }

    pub fn on_horizontal_scroll(&mut self, left: f64) {
        self.scroll.on_horizontal_scroll(left);
    }

    /// Per-frame tick.
    pub fn on_frame(&mut self) {
        self.scroll.on_frame();
    }

    /// Converts a timeline-pane viewport position to content coordinates.
    pub fn to_content(&self, viewport_x: f64, viewport_y: f64) -> Pointer {
        Pointer::new(
            viewport_x + self.scroll.left(),
            viewport_y + self.scroll.top(Pane::Timeline),
        )
    }

    // ---- pointer ----

    /// Pointer-down in content coordinates.
    ///
    /// Starts a drag on a bar body or a resize on a bar edge. Returns the
    /// grabbed operation, `Ok(None)` when nothing was hit.
    pub fn pointer_down(&mut self, pointer: Pointer) -> Result<Option<OperationId>> {
        let Some(lane) = self
            .layout
            .index_at(pointer.y, self.lanes.lane_count())
            .and_then(|i| self.lanes.lane_at(i))
        else {
            return Ok(None);
        };
        // Later bars are drawn on top.
        let hit = lane.operations.iter().rev().find_map(|op| {
            self.scale
                .hit_test(&op.span(), pointer.x, self.config.edge_grab_width)
                .map(|region| (op, region))
        });
        let Some((op, region)) = hit else {
            return Ok(None);
        };
        let started = match region {
            BarRegion::Body => {
                self.interaction
                    .begin_drag(op, pointer, &self.scale, &self.gateway)
            }
            BarRegion::StartEdge => self.interaction.begin_resize(
                op,
                ResizeEdge::Start,
                pointer,
                &self.scale,
                &self.gateway,
            ),
            BarRegion::EndEdge => self.interaction.begin_resize(
                op,
                ResizeEdge::End,
                pointer,
                &self.scale,
                &self.gateway,
            ),
        };
        started.map_err(TimelineError::from)?;
        Ok(Some(op.id))
    }

    pub fn pointer_move(&mut self, pointer: Pointer) {
        self.interaction
            .pointer_move(pointer, &self.scale, &self.layout, &self.lanes);
    }

    /// Pointer-up: finishes the manipulation and applies it optimistically.
    ///
    /// Returns the update to send to the mutation collaborator, or `None`
    /// when the manipulation was cancelled or refused.
    pub fn pointer_up(&mut self) -> Option<OperationUpdate> {
        let request = self.interaction.release()?;
        match self.gateway.apply(&request, &self.resources) {
            Ok(update) => {
                self.rebuild_lanes();
                Some(update)
            }
            Err(e) => {
                debug!(operation_id = request.operation_id, error = %e, "commit refused");
                None
            }
        }
    }

    /// Pointer left the surface: silent cancel.
    pub fn pointer_leave(&mut self) {
        self.interaction.cancel();
    }

    // ---- commit resolution ----

    pub fn commit_succeeded(&mut self, id: OperationId) {
        self.gateway.acknowledge(id);
    }

    /// Rolls `id` back to its pre-manipulation state.
    pub fn commit_failed(&mut self, id: OperationId, reason: impl Into<String>) -> TimelineError {
        let err = self.gateway.reject(id, reason);
        self.rebuild_lanes();
        err
    }

    /// Sends `update` and resolves it.
    pub async fn commit(
        &mut self,
        update: &OperationUpdate,
        writer: &dyn MutationCollaborator,
    ) -> Result<()> {
        let outcome = writer.update_operation(update).await;
        let result = self.gateway.resolve(update.operation_id, outcome);
        self.rebuild_lanes();
        result
    }

    // ---- optimization ----

    /// Snapshot of the current resources and operations.
    pub fn graph(&self) -> ScheduleGraph {
        ScheduleGraph::new(self.resources.clone(), self.gateway.operations().to_vec())
    }

    pub fn request_optimization(&mut self, strategy: Strategy) -> Result<OptimizationRequest> {
        let graph = self.graph();
        self.optimizer.request(strategy, graph)
    }

    pub fn on_engine_signal(&mut self, signal: EngineSignal) -> DispatchEffect {
        self.optimizer.on_signal(signal)
    }

    /// Runs an optimization and re-fetches on completion.
    pub async fn optimize(
        &mut self,
        strategy: Strategy,
        engine: &dyn OptimizationEngine,
        reader: &dyn ReadCollaborator,
    ) -> Result<()> {
        let graph = self.graph();
        if self.optimizer.run(strategy, graph, engine).await? == DispatchEffect::Refetch {
            self.reload(reader).await?;
        }
        Ok(())
    }

    pub fn engine_status(&self) -> EngineStatus {
        self.optimizer.status()
    }

    // ---- notices and accessors ----

    /// All pending notices, oldest first per source.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        let mut notices = self.gateway.drain_notices();
        notices.extend(self.optimizer.drain_notices());
        notices
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn scale(&self) -> &TimeScale {
        &self.scale
    }

    pub fn lanes(&self) -> &LaneIndex {
        &self.lanes
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn operations(&self) -> &[Operation] {
        self.gateway.operations()
    }

    pub fn interaction(&self) -> &InteractionMachine {
        &self.interaction
    }

    pub fn scroll(&self) -> &ScrollSync {
        &self.scroll
    }

    pub fn is_pending(&self, id: OperationId) -> bool {
        self.gateway.is_pending(id)
    }
}

fn normalize(records: Vec<OperationRecord>, default_duration_minutes: i64) -> Vec<Operation> {
    let total = records.len();
    let operations: Vec<Operation> = records
        .into_iter()
        .filter_map(|r| r.into_operation(default_duration_minutes))
        .collect();
    if operations.len() < total {
        warn!(dropped = total - operations.len(), "unusable operation records dropped");
    }
    operations
}

async fn fetch(reader: &dyn ReadCollaborator) -> Result<(Vec<Resource>, Vec<OperationRecord>)> {
    let resources = reader.fetch_resources().await.map_err(|e| {
        warn!(error = %e, "resource fetch failed, keeping cached data");
        TimelineError::DataFetchFailed(e.to_string())
    })?;
    let records = reader.fetch_operations().await.map_err(|e| {
        warn!(error = %e, "operation fetch failed, keeping cached data");
        TimelineError::DataFetchFailed(e.to_string())
    })?;
    Ok((resources, records))
}
