//! Admin surface: feature flags, user roles, and job queue management.
//! Every mutation here is audited through the same [`AuditLog`] port the
//! widget use cases use; transport wires RBAC's `admin` role in front of all
//! of it.

pub mod audit_log;
mod flags;
mod queues;
mod roles;

use std::sync::Arc;

use audit_log::{AuditLog, InMemoryAuditLog};
use flags::FeatureFlagStore;
use hexaframe_service::jobs::{DeadLetterQueue, Enqueuer};
use roles::RoleStore;

pub use roles::ALLOWED_ROLES;

/// Shared dependencies for every admin operation. Cheap to clone: every
/// field is already an `Arc` or internally synchronized.
pub struct AdminDeps {
    flags: FeatureFlagStore,
    roles: RoleStore,
    dlq: DeadLetterQueue,
    audit: Arc<dyn AuditLog>,
    enqueuer: Arc<dyn Enqueuer>,
}

impl AdminDeps {
    pub fn new() -> Self {
        Self::with_enqueuer(Arc::new(NullEnqueuer))
    }

    pub fn with_enqueuer(enqueuer: Arc<dyn Enqueuer>) -> Self {
        Self {
            flags: FeatureFlagStore::new(),
            roles: RoleStore::new(),
            dlq: DeadLetterQueue::new(),
            audit: Arc::new(InMemoryAuditLog::new()),
            enqueuer,
        }
    }

    pub fn with_dependencies(
        dlq: DeadLetterQueue,
        audit: Arc<dyn AuditLog>,
        enqueuer: Arc<dyn Enqueuer>,
    ) -> Self {
        Self {
            flags: FeatureFlagStore::new(),
            roles: RoleStore::new(),
            dlq,
            audit,
            enqueuer,
        }
    }
}

impl Default for AdminDeps {
    fn default() -> Self {
        Self::new()
    }
}

/// Placeholder enqueuer for deployments/tests that never exercise queue
/// retry; real binaries wire the worker's [`FireAndForget`] handle via
/// [`AdminDeps::with_dependencies`].
struct NullEnqueuer;

#[async_trait::async_trait]
impl Enqueuer for NullEnqueuer {
    async fn enqueue(
        &self,
        _task: hexaframe_service::jobs::Task,
        _options: hexaframe_service::jobs::TaskOptions,
    ) -> Result<(), hexaframe_service::jobs::EnqueueError> {
        Err(hexaframe_service::jobs::EnqueueError::Closed)
    }
}
