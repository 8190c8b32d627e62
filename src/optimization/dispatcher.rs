use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use super::strategy::{OptimizationRequest, Strategy};
use crate::error::{CollaboratorError, Result, TimelineError};
use crate::models::ScheduleGraph;
use crate::notice::{Notice, NoticeQueue};

/// Engine lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    #[default]
    Idle,
    /// Engine-internal recalculation after a data change.
    Calculating,
    /// Explicit user-requested run.
    Optimizing,
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EngineStatus::Idle => "idle",
            EngineStatus::Calculating => "calculating",
            EngineStatus::Optimizing => "optimizing",
        })
    }
}

/// Lifecycle signal emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineSignal {
    CalculationStarted,
    CalculationComplete,
    ConflictDetected(String),
}

/// Final answer of one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutcome {
    Completed,
    Conflict(String),
}

/// What the host must do after a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEffect {
    None,
    /// Re-fetch operations from the read collaborator.
    Refetch,
}

/// External optimization engine. Its algorithms are opaque.
#[async_trait]
pub trait OptimizationEngine: Send + Sync {
    async fn optimize(
        &self,
        request: &OptimizationRequest,
    ) -> std::result::Result<EngineOutcome, CollaboratorError>;
}

/// Tracks engine status and enforces one optimizing run at a time.
#[derive(Debug, Clone, Default)]
pub struct OptimizationDispatcher {
    status: EngineStatus,
    active: Option<Strategy>,
    notices: NoticeQueue,
}

impl OptimizationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    /// Strategy of the run in flight.
    pub fn active_strategy(&self) -> Option<Strategy> {
        self.active
    }

    pub fn is_idle(&self) -> bool {
        self.status == EngineStatus::Idle
    }

    /// Starts an optimizing run and returns the request for the engine.
    ///
    /// Refused with a "not ready" notice unless idle; a run already in
    /// flight is unaffected.
    pub fn request(&mut self, strategy: Strategy, graph: ScheduleGraph) -> Result<OptimizationRequest> {
        if self.status != EngineStatus::Idle {
            warn!(%strategy, status = %self.status, "optimization refused: engine busy");
            self.notices.push(Notice::info(
                "Engine Not Ready",
                format!("The scheduling engine is {}. Try again when it is idle.", self.status),
            ));
            return Err(TimelineError::NotReady(self.status));
        }
        info!(
            %strategy,
            operations = graph.operations.len(),
            resources = graph.resources.len(),
            "optimization dispatched"
        );
        self.status = EngineStatus::Optimizing;
        self.active = Some(strategy);
        Ok(OptimizationRequest { strategy, graph })
    }

    /// Applies an engine signal.
    pub fn on_signal(&mut self, signal: EngineSignal) -> DispatchEffect {
        match signal {
            EngineSignal::CalculationStarted => {
                if self.status == EngineStatus::Idle {
                    debug!("engine calculating");
                    self.status = EngineStatus::Calculating;
                }
                DispatchEffect::None
            }
            EngineSignal::CalculationComplete => match self.status {
                EngineStatus::Optimizing => {
                    let strategy = self.active.take().unwrap_or_default();
                    self.status = EngineStatus::Idle;
                    info!(%strategy, "optimization complete");
                    self.notices.push(Notice::success(
                        "Schedule Optimized",
                        format!(
                            "Applied {} optimization algorithm",
                            strategy.as_str().to_uppercase()
                        ),
                    ));
                    DispatchEffect::Refetch
                }
                EngineStatus::Calculating => {
                    debug!("engine calculation complete");
                    self.status = EngineStatus::Idle;
                    DispatchEffect::None
                }
                EngineStatus::Idle => DispatchEffect::None,
            },
            EngineSignal::ConflictDetected(description) => {
                warn!(status = %self.status, %description, "engine reported conflict");
                self.status = EngineStatus::Idle;
                self.active = None;
                self.notices
                    .push(Notice::error("Optimization Conflict", description));
                DispatchEffect::None
            }
        }
    }

    /// Forces the status back to idle without a notice.
    pub fn reset(&mut self) {
        self.status = EngineStatus::Idle;
        self.active = None;
    }

    /// Requests, runs, and resolves an optimization in one call.
    ///
    /// Returns the effect the host must perform on success. A transport
    /// failure is treated like an engine conflict.
    pub async fn run(
        &mut self,
        strategy: Strategy,
        graph: ScheduleGraph,
        engine: &dyn OptimizationEngine,
    ) -> Result<DispatchEffect> {
        let request = self.request(strategy, graph)?;
        match engine.optimize(&request).await {
            Ok(EngineOutcome::Completed) => Ok(self.on_signal(EngineSignal::CalculationComplete)),
            Ok(EngineOutcome::Conflict(description)) => {
                self.on_signal(EngineSignal::ConflictDetected(description.clone()));
                Err(TimelineError::OptimizationConflict(description))
            }
            Err(e) => {
                let description = format!("engine error: {}", e.message());
                self.on_signal(EngineSignal::ConflictDetected(description.clone()));
                Err(TimelineError::OptimizationConflict(description))
            }
        }
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }
}
