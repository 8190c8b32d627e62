//! End-to-end behaviour of the timeline view.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Mutex;

use u_timeline::interaction::Pointer;
use u_timeline::models::{Operation, OperationRecord, Resource, TimeSpan};
use u_timeline::mutation::{MutationCollaborator, OperationUpdate, ReadCollaborator};
use u_timeline::optimization::{EngineSignal, EngineStatus, Strategy};
use u_timeline::timeline::{forward_map, inverse_map, Pane};
use u_timeline::{CollaboratorError, TimelineConfig, TimelineError, TimelineView};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 19, hour, minute, 0).unwrap()
}

fn window() -> TimeSpan {
    TimeSpan::new(at(0, 0), at(0, 0) + Duration::days(1))
}

fn scenario() -> TimelineView {
    let resources = vec![Resource::new(1, "R1"), Resource::new(2, "R2")];
    let operations = vec![
        Operation::new(1, "A", at(9, 0), at(11, 0)).on_resource("R1"),
        Operation::new(2, "B", at(10, 0), at(12, 0)).on_resource("R1"),
    ];
    TimelineView::mount(
        TimelineConfig::default(),
        window(),
        at(9, 0),
        resources,
        operations,
    )
}

fn lane_ids(view: &TimelineView, resource: &str) -> Vec<i64> {
    view.lanes()
        .lane(resource)
        .map(|l| l.operations.iter().map(|o| o.id).collect())
        .unwrap_or_default()
}

/// Drags operation 1 (x 540..660 in lane R1) into lane R2 at 09:00.
fn drag_first_to_r2(view: &mut TimelineView) -> OperationUpdate {
    assert_eq!(view.pointer_down(Pointer::new(570.0, 25.0)).unwrap(), Some(1));
    view.pointer_move(Pointer::new(570.0, 75.0));
    view.pointer_up().expect("drop should produce an update")
}

#[test]
fn test_scenario_conflict_then_move_resolves_it() {
    let mut view = scenario();
    let conflicts = view.conflicts();
    assert!(conflicts["R1"].contains(1));
    assert!(conflicts["R1"].contains(2));

    let update = drag_first_to_r2(&mut view);
    assert_eq!(update.operation_id, 1);
    assert_eq!(update.resource_id, 2);
    assert_eq!(update.start_time, at(9, 0));
    assert_eq!(update.end_time, at(11, 0));

    view.commit_succeeded(1);
    assert_eq!(lane_ids(&view, "R1"), vec![2]);
    assert_eq!(lane_ids(&view, "R2"), vec![1]);
    assert!(view.conflicts().values().all(|c| c.is_empty()));
    assert_eq!(view.stats().conflict_count, 0);
}

#[test]
fn test_failed_commit_restores_pre_drag_view() {
    let mut view = scenario();
    let operations_before = view.operations().to_vec();
    let frame_before = serde_json::to_string(&view.render()).unwrap();

    drag_first_to_r2(&mut view);
    view.commit_failed(1, "resource unavailable");

    assert_eq!(view.operations(), operations_before.as_slice());
    assert_eq!(serde_json::to_string(&view.render()).unwrap(), frame_before);
    assert!(view.interaction().is_idle());
}

#[test]
fn test_every_commit_keeps_positive_duration() {
    let mut view = scenario();
    // Grab op 2's leading edge (x 600) and pull it past its end (x 720).
    assert_eq!(view.pointer_down(Pointer::new(601.0, 25.0)).unwrap(), Some(2));
    view.pointer_move(Pointer::new(800.0, 25.0));
    assert!(view.pointer_up().is_none());
    assert!(view.interaction().is_idle());

    for op in view.operations() {
        assert!(op.end_time > op.start_time);
    }
}

#[test]
fn test_configured_view_snaps_and_scrolls() {
    let config = TimelineConfig::new()
        .with_default_zoom(120.0)
        .with_now_lead_margin(60.0)
        .with_snap_minutes(15);
    let resources = vec![Resource::new(1, "R1"), Resource::new(2, "R2")];
    let operations = vec![Operation::new(1, "A", at(9, 0), at(11, 0)).on_resource("R1")];
    let mut view = TimelineView::mount(config, window(), at(9, 0), resources, operations);
    // 09:00 is x=1080 at 120 units per hour
    assert!((view.scroll().left() - 1020.0).abs() < 1e-10);

    assert_eq!(view.pointer_down(Pointer::new(1140.0, 25.0)).unwrap(), Some(1));
    // 10:31 less the half-hour grab is 10:01, which snaps to 10:00
    view.pointer_move(Pointer::new(1262.0, 75.0));
    let update = view.pointer_up().unwrap();
    assert_eq!(update.resource_id, 2);
    assert_eq!(update.start_time, at(10, 0));
    assert_eq!(update.end_time, at(12, 0));
}

#[test]
fn test_round_trip_law() {
    let origin = at(0, 0);
    for zoom in [10.0, 25.0, 60.0, 137.5, 200.0] {
        for minutes in [0i64, 1, 59, 61, 600, 1439, 3000] {
            let t = origin + Duration::minutes(minutes);
            let x = forward_map(origin, t, zoom);
            let back = inverse_map(origin, x, zoom);
            assert!((forward_map(origin, back, zoom) - x).abs() <= 1.0);
        }
    }
}

#[test]
fn test_scroll_sync_mirrors_offsets() {
    let mut view = scenario();
    let before = view.scroll().top(Pane::Timeline);

    let cmd = view.on_scroll(Pane::Labels, 150.0).unwrap();
    assert_eq!(cmd.pane, Pane::Timeline);
    // The host applies the command, which echoes back once.
    assert!(view.on_scroll(cmd.pane, cmd.top).is_none());
    view.on_frame();
    assert_eq!(view.scroll().top(Pane::Timeline) - before, 150.0);

    let cmd = view.on_scroll(Pane::Timeline, 90.0).unwrap();
    assert_eq!(cmd.pane, Pane::Labels);
    assert!(view.on_scroll(cmd.pane, cmd.top).is_none());
    view.on_frame();
    assert_eq!(view.scroll().top(Pane::Labels), 90.0);
}

#[test]
fn test_optimization_mutual_exclusion() {
    let mut view = scenario();
    view.request_optimization(Strategy::ResourceLeveling).unwrap();
    let err = view.request_optimization(Strategy::Asap).unwrap_err();
    assert_eq!(err, TimelineError::NotReady(EngineStatus::Optimizing));
    assert_eq!(view.engine_status(), EngineStatus::Optimizing);

    view.on_engine_signal(EngineSignal::CalculationComplete);
    assert_eq!(view.engine_status(), EngineStatus::Idle);
    let titles: Vec<_> = view.drain_notices().into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["Engine Not Ready", "Schedule Optimized"]);
}

struct Backend {
    operations: Mutex<Vec<OperationRecord>>,
    refuse: bool,
}

impl Backend {
    fn new(refuse: bool) -> Self {
        let rec = |id, resource: &str, start, end| OperationRecord {
            id,
            name: format!("op{id}"),
            resource_id: Some(resource.to_string()),
            start_time: Some(at(start, 0)),
            end_time: Some(at(end, 0)),
            ..Default::default()
        };
        Self {
            operations: Mutex::new(vec![rec(1, "R1", 9, 11), rec(2, "R1", 10, 12)]),
            refuse,
        }
    }
}

#[async_trait]
impl ReadCollaborator for Backend {
    async fn fetch_resources(&self) -> Result<Vec<Resource>, CollaboratorError> {
        Ok(vec![Resource::new(1, "R1"), Resource::new(2, "R2")])
    }

    async fn fetch_operations(&self) -> Result<Vec<OperationRecord>, CollaboratorError> {
        Ok(self.operations.lock().unwrap().clone())
    }
}

#[async_trait]
impl MutationCollaborator for Backend {
    async fn update_operation(&self, update: &OperationUpdate) -> Result<(), CollaboratorError> {
        if self.refuse {
            return Err(CollaboratorError::Rejected("locked".into()));
        }
        let mut ops = self.operations.lock().unwrap();
        if let Some(rec) = ops.iter_mut().find(|r| r.id == update.operation_id) {
            rec.resource_id = Some(update.resource_external_id.clone());
            rec.start_time = Some(update.start_time);
            rec.end_time = Some(update.end_time);
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_async_round_trip_with_backend() {
    let backend = Backend::new(false);
    let mut view = TimelineView::load(TimelineConfig::default(), window(), at(9, 0), &backend)
        .await
        .unwrap();
    assert_eq!(lane_ids(&view, "R1"), vec![1, 2]);

    let update = drag_first_to_r2(&mut view);
    view.commit(&update, &backend).await.unwrap();
    view.reload(&backend).await.unwrap();

    assert_eq!(lane_ids(&view, "R1"), vec![2]);
    assert_eq!(lane_ids(&view, "R2"), vec![1]);
    assert!(!view.is_pending(1));
}

#[tokio::test]
async fn test_async_refusal_rolls_back() {
    let backend = Backend::new(true);
    let mut view = TimelineView::load(TimelineConfig::default(), window(), at(9, 0), &backend)
        .await
        .unwrap();
    let before = view.operations().to_vec();

    let update = drag_first_to_r2(&mut view);
    let err = view.commit(&update, &backend).await.unwrap_err();
    assert!(matches!(err, TimelineError::CommitFailed { operation_id: 1, .. }));
    assert_eq!(view.operations(), before.as_slice());
}
