use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::cache::OperationCache;
use super::collaborator::{MutationCollaborator, OperationUpdate};
use crate::error::{CollaboratorError, RejectReason, Result, TimelineError};
use crate::interaction::{CommitRequest, PendingCommits};
use crate::models::{Operation, OperationId, Resource};
use crate::notice::{Notice, NoticeQueue};

/// An optimistic change awaiting the collaborator's answer.
#[derive(Debug, Clone, PartialEq)]
struct PendingPatch {
    update: OperationUpdate,
    resource_name: String,
    /// The operation exactly as it was before the patch.
    pre_image: Operation,
}

/// Optimistic apply / acknowledge / roll back over the operation cache.
///
/// All writes to the cached collection go through here, either as a
/// per-operation patch or as a full [`refresh`](Self::refresh).
#[derive(Debug, Clone, Default)]
pub struct MutationGateway {
    cache: OperationCache,
    pending: HashMap<OperationId, PendingPatch>,
    notices: NoticeQueue,
}

impl MutationGateway {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self {
            cache: OperationCache::new(operations),
            pending: HashMap::new(),
            notices: NoticeQueue::new(),
        }
    }

    /// Phase one: patches the cache and records the pre-image.
    ///
    /// Refused, with the cache untouched, when the interval is empty, a
    /// commit for the operation is already in flight, or the operation or
    /// target resource is unknown.
    pub fn apply(&mut self, request: &CommitRequest, resources: &[Resource]) -> Result<OperationUpdate> {
        let id = request.operation_id;
        if request.new_end <= request.new_start {
            return Err(RejectReason::NonPositiveDuration.into());
        }
        if self.pending.contains_key(&id) {
            return Err(RejectReason::PendingCommit.into());
        }
        let resource = resources
            .iter()
            .find(|r| r.external_id == request.new_resource_id)
            .ok_or(RejectReason::UnknownResource)?;
        let op = self.cache.get_mut(id).ok_or(RejectReason::UnknownOperation)?;

        let pre_image = op.clone();
        let resource_name = resource.label().to_string();
        op.reschedule(
            resource.external_id.clone(),
            resource_name.clone(),
            request.new_start,
            request.new_end,
        );

        let update = OperationUpdate {
            operation_id: id,
            resource_id: resource.id,
            resource_external_id: resource.external_id.clone(),
            start_time: request.new_start,
            end_time: request.new_end,
        };
        self.pending.insert(
            id,
            PendingPatch {
                update: update.clone(),
                resource_name,
                pre_image,
            },
        );
        info!(
            operation_id = id,
            resource = %update.resource_external_id,
            start = %update.start_time,
            end = %update.end_time,
            "optimistic update applied"
        );
        Ok(update)
    }

    /// Phase two, success: clears the pending marker.
    ///
    /// Returns `false` if nothing was pending for `id`.
    pub fn acknowledge(&mut self, id: OperationId) -> bool {
        if self.pending.remove(&id).is_none() {
            debug!(operation_id = id, "acknowledge without pending commit");
            return false;
        }
        info!(operation_id = id, "commit acknowledged");
        self.notices.push(Notice::success(
            "Operation Updated",
            "The operation has been successfully rescheduled.",
        ));
        true
    }

    /// Phase two, failure: restores the pre-image of `id` only.
    ///
    /// Other operations, including ones with their own pending patches,
    /// are left alone.
    pub fn reject(&mut self, id: OperationId, reason: impl Into<String>) -> TimelineError {
        let reason = reason.into();
        match self.pending.remove(&id) {
            Some(patch) => match self.cache.get_mut(id) {
                Some(op) => {
                    *op = patch.pre_image;
                    warn!(operation_id = id, %reason, "commit failed, rolled back");
                }
                None => warn!(operation_id = id, %reason, "commit failed, operation no longer cached"),
            },
            None => debug!(operation_id = id, "reject without pending commit"),
        }
        let message = if reason.is_empty() {
            "Failed to update the operation schedule.".to_string()
        } else {
            reason.clone()
        };
        self.notices.push(Notice::error("Update Failed", message));
        TimelineError::CommitFailed {
            operation_id: id,
            reason,
        }
    }

    /// Resolves a commit with the collaborator's answer.
    pub fn resolve(
        &mut self,
        id: OperationId,
        outcome: std::result::Result<(), CollaboratorError>,
    ) -> Result<()> {
        match outcome {
            Ok(()) => {
                self.acknowledge(id);
                Ok(())
            }
            Err(e) => Err(self.reject(id, e.message())),
        }
    }

    /// Applies, sends, and resolves a commit in one call.
    pub async fn submit(
        &mut self,
        request: &CommitRequest,
        resources: &[Resource],
        collaborator: &dyn MutationCollaborator,
    ) -> Result<()> {
        let update = self.apply(request, resources)?;
        let outcome = collaborator.update_operation(&update).await;
        self.resolve(update.operation_id, outcome)
    }

    /// Full refresh from the read collaborator.
    ///
    /// Pending patches are re-applied over the fresh records, which become
    /// their new pre-images.
    pub fn refresh(&mut self, operations: Vec<Operation>) {
        self.cache.replace(operations);
        for (id, patch) in self.pending.iter_mut() {
            let Some(op) = self.cache.get_mut(*id) else {
                debug!(operation_id = *id, "pending operation missing from refresh");
                continue;
            };
            patch.pre_image = op.clone();
            op.reschedule(
                patch.update.resource_external_id.clone(),
                patch.resource_name.clone(),
                patch.update.start_time,
                patch.update.end_time,
            );
        }
        debug!(
            operations = self.cache.len(),
            pending = self.pending_count(),
            "operation cache refreshed"
        );
    }

    pub fn is_pending(&self, id: OperationId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn operations(&self) -> &[Operation] {
        self.cache.operations()
    }

    pub fn get(&self, id: OperationId) -> Option<&Operation> {
        self.cache.get(id)
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }
}

impl PendingCommits for MutationGateway {
    fn is_pending(&self, id: OperationId) -> bool {
        MutationGateway::is_pending(self, id)
    }
}
