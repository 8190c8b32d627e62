//! Mutation gateway: optimistic updates of the cached operations.
//!
//! # Protocol
//!
//! 1. [`MutationGateway::apply`] patches the cached operation at once,
//!    stores its pre-image and marks it pending. The returned
//!    [`OperationUpdate`] is what the host sends to the
//!    [`MutationCollaborator`].
//! 2. The answer resolves the patch: [`acknowledge`](MutationGateway::acknowledge)
//!    clears the marker, [`reject`](MutationGateway::reject) restores the
//!    pre-image and queues an error notice. There is no retry.
//!
//! Patches are keyed by operation id, so answers arriving in any order
//! only ever touch their own operation. At most one commit per id is in
//! flight; a second is refused until the first resolves.

mod cache;
mod collaborator;
mod gateway;

pub use cache::OperationCache;
pub use collaborator::{MutationCollaborator, OperationUpdate, ReadCollaborator};
pub use gateway::MutationGateway;
