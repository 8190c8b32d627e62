//! Error taxonomy.
//!
//! Nothing here is fatal. The worst outcome of any error is a locally
//! stale view, which the next full refresh corrects.
//!
//! | Error | Surfaced to user | Effect |
//! |-------|------------------|--------|
//! | `ManipulationRejected` | never | interaction returns to idle |
//! | `CommitFailed` | transient notice | optimistic patch rolled back |
//! | `OptimizationConflict` | transient notice | engine status back to idle |
//! | `DataFetchFailed` | left to the host | stale cache retained |
//! | `NotReady` | transient notice | running optimization unaffected |

use thiserror::Error;

use crate::models::OperationId;
use crate::optimization::EngineStatus;

/// Crate result alias.
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Errors produced by the timeline engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    /// A drag, drop or resize was refused before any network call.
    #[error("manipulation rejected: {0}")]
    ManipulationRejected(RejectReason),
    /// The mutation collaborator refused a move or resize.
    #[error("commit of operation {operation_id} failed: {reason}")]
    CommitFailed {
        operation_id: OperationId,
        reason: String,
    },
    /// The optimization engine reported an irreconcilable conflict.
    #[error("optimization conflict: {0}")]
    OptimizationConflict(String),
    /// The read collaborator could not deliver resources or operations.
    #[error("failed to fetch schedule data: {0}")]
    DataFetchFailed(String),
    /// An optimization was requested while the engine was busy.
    #[error("optimization engine not ready (status: {0})")]
    NotReady(EngineStatus),
}

/// Why a manipulation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The pointer was not over any lane.
    #[error("no target lane under pointer")]
    NoTargetLane,
    /// The target lane's resource is not in the resource list.
    #[error("target resource is unknown")]
    UnknownResource,
    /// The operation is not in the cache.
    #[error("operation is unknown")]
    UnknownOperation,
    /// The result would violate `end > start`.
    #[error("end time must be after start time")]
    NonPositiveDuration,
    /// Another manipulation is already in progress.
    #[error("another manipulation is in progress")]
    NotIdle,
    /// A previous commit for the same operation has not resolved yet.
    #[error("a commit for this operation is still in flight")]
    PendingCommit,
}

impl From<RejectReason> for TimelineError {
    fn from(reason: RejectReason) -> Self {
        TimelineError::ManipulationRejected(reason)
    }
}

/// Error returned by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// The collaborator answered and refused the request.
    #[error("rejected: {0}")]
    Rejected(String),
    /// The request never got an answer.
    #[error("transport error: {0}")]
    Transport(String),
}

impl CollaboratorError {
    /// The message without the variant prefix, for notices.
    pub fn message(&self) -> &str {
        match self {
            CollaboratorError::Rejected(m) | CollaboratorError::Transport(m) => m,
        }
    }
}
