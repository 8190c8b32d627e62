use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CollaboratorError;
use crate::models::{OperationId, OperationRecord, Resource};

/// Payload sent to the mutation collaborator.
///
/// `resourceId` on the wire is the resource's database id; the external
/// id is kept locally for lane bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationUpdate {
    pub operation_id: OperationId,
    pub resource_id: i64,
    #[serde(skip)]
    pub resource_external_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Source of resources and operations.
#[async_trait]
pub trait ReadCollaborator: Send + Sync {
    /// All resources, in display order.
    async fn fetch_resources(&self) -> Result<Vec<Resource>, CollaboratorError>;

    /// All operations, in the loose read shape.
    async fn fetch_operations(&self) -> Result<Vec<OperationRecord>, CollaboratorError>;
}

/// Persists moves and resizes. Must be idempotent for identical updates.
#[async_trait]
pub trait MutationCollaborator: Send + Sync {
    async fn update_operation(&self, update: &OperationUpdate) -> Result<(), CollaboratorError>;
}
