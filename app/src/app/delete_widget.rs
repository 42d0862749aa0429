//! Delete-widget use case: audits the deletion, not the miss.

use hexaframe_service::domain::{AppError, DomainError};
use hexaframe_service::repository::Repository;
use serde_json::json;

use super::{ActorContext, WidgetUseCases};
use crate::admin::audit_log::AuditEvent;
use crate::domain::{CreateWidget, UpdateWidget, Widget, WidgetId};

const OP: &str = "delete_widget";

impl<R> WidgetUseCases<R>
where
    R: Repository<WidgetId, Widget, CreateWidget, UpdateWidget> + 'static,
{
    pub async fn delete_widget(&self, id: WidgetId, ctx: &ActorContext) -> Result<(), AppError> {
        let deleted = self.repo.delete(&id).await.map_err(|err| {
            AppError::from_domain(DomainError::DependencyFailure(err.to_string()), OP)
                .with_source(err)
        })?;

        if !deleted {
            return Err(AppError::from_domain(
                DomainError::NotFound {
                    entity: "widget".into(),
                    id: id.to_string(),
                },
                OP,
            ));
        }

        self.audit
            .record(AuditEvent::new(
                "widget.deleted",
                ctx.actor_id.clone(),
                "widget",
                id.to_string(),
                json!({}),
                ctx.request_id.clone(),
            ))
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::admin::audit_log::InMemoryAuditLog;
    use crate::app::{ActorContext, InMemoryUnitOfWork, WidgetUseCases};
    use crate::domain::{CreateWidget, WidgetId};
    use crate::infra::InMemoryWidgetRepository;

    fn use_cases() -> WidgetUseCases<InMemoryWidgetRepository> {
        WidgetUseCases::new(
            Arc::new(InMemoryWidgetRepository::new()),
            Arc::new(InMemoryAuditLog::new()),
            Arc::new(InMemoryUnitOfWork::new()),
        )
    }

    #[tokio::test]
    async fn delete_missing_widget_maps_to_not_found() {
        let use_cases = use_cases();
        let ctx = ActorContext::new(None, "req-1");
        let err = use_cases
            .delete_widget(WidgetId::new(), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_existing_widget_then_get_returns_not_found() {
        let use_cases = use_cases();
        let ctx = ActorContext::new(None, "req-1");
        let created = use_cases
            .create_widget(
                CreateWidget {
                    name: "Widget".into(),
                    sku: "SKU-1".into(),
                    price_cents: 100,
                },
                &ctx,
            )
            .await
            .unwrap();
        use_cases.delete_widget(created.id, &ctx).await.unwrap();
        assert_eq!(
            use_cases.get_widget(created.id).await.unwrap_err().code,
            "NOT_FOUND"
        );
    }
}
