//! Application layer: the one use-case struct this service exercises,
//! `WidgetUseCases<R>`, generic over the repository port so it never depends
//! on a concrete adapter. Imports only `domain`, the repository/audit/UoW
//! ports, and the standard library -- no axum, no serde wire types.

mod create_widget;
mod delete_widget;
mod get_widget;
mod list_widgets;
mod unit_of_work;
mod update_widget;

pub use unit_of_work::{InMemoryUnitOfWork, UnitOfWork};

use std::sync::Arc;

use hexaframe_service::repository::Repository;

use crate::admin::audit_log::AuditLog;
use crate::domain::{CreateWidget, UpdateWidget, Widget, WidgetId};

/// Context carried through a use case for audit attribution -- who called
/// it and which request it belongs to. Transport builds this from the
/// authenticated `Claims` and `X-Request-ID`.
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub actor_id: Option<String>,
    pub request_id: String,
}

impl ActorContext {
    pub fn new(actor_id: Option<String>, request_id: impl Into<String>) -> Self {
        Self {
            actor_id,
            request_id: request_id.into(),
        }
    }
}

pub struct WidgetUseCases<R>
where
    R: Repository<WidgetId, Widget, CreateWidget, UpdateWidget>,
{
    repo: Arc<R>,
    audit: Arc<dyn AuditLog>,
    uow: Arc<dyn UnitOfWork>,
}

impl<R> WidgetUseCases<R>
where
    R: Repository<WidgetId, Widget, CreateWidget, UpdateWidget>,
{
    pub fn new(repo: Arc<R>, audit: Arc<dyn AuditLog>, uow: Arc<dyn UnitOfWork>) -> Self {
        Self { repo, audit, uow }
    }
}
