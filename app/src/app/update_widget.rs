//! Update-widget use case: partial patch, audited on success.

use hexaframe_service::domain::{AppError, DomainError};
use hexaframe_service::repository::{Repository, RepositoryErrorKind};
use serde_json::json;

use super::{ActorContext, WidgetUseCases};
use crate::admin::audit_log::AuditEvent;
use crate::domain::{CreateWidget, UpdateWidget, Widget, WidgetId};

const OP: &str = "update_widget";

impl<R> WidgetUseCases<R>
where
    R: Repository<WidgetId, Widget, CreateWidget, UpdateWidget> + 'static,
{
    pub async fn update_widget(
        &self,
        id: WidgetId,
        input: UpdateWidget,
        ctx: &ActorContext,
    ) -> Result<Widget, AppError> {
        if let Some(price_cents) = input.price_cents {
            if price_cents < 0 {
                return Err(AppError::from_domain(
                    DomainError::Validation {
                        field: "priceCents".into(),
                        message: "must not be negative".into(),
                    },
                    OP,
                ));
            }
        }

        let updated = self.repo.update(&id, input).await.map_err(|err| match err.kind {
            RepositoryErrorKind::NotFound => AppError::from_domain(
                DomainError::NotFound {
                    entity: "widget".into(),
                    id: id.to_string(),
                },
                OP,
            )
            .with_source(err),
            _ => AppError::from_domain(DomainError::DependencyFailure(err.to_string()), OP)
                .with_source(err),
        })?;

        self.audit
            .record(AuditEvent::new(
                "widget.updated",
                ctx.actor_id.clone(),
                "widget",
                updated.id.to_string(),
                json!({"priceCents": updated.price_cents}),
                ctx.request_id.clone(),
            ))
            .await;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::admin::audit_log::InMemoryAuditLog;
    use crate::app::{ActorContext, InMemoryUnitOfWork, WidgetUseCases};
    use crate::domain::{CreateWidget, UpdateWidget, WidgetId};
    use crate::infra::InMemoryWidgetRepository;

    fn use_cases() -> WidgetUseCases<InMemoryWidgetRepository> {
        WidgetUseCases::new(
            Arc::new(InMemoryWidgetRepository::new()),
            Arc::new(InMemoryAuditLog::new()),
            Arc::new(InMemoryUnitOfWork::new()),
        )
    }

    #[tokio::test]
    async fn update_missing_widget_maps_to_not_found() {
        let use_cases = use_cases();
        let ctx = ActorContext::new(None, "req-1");
        let err = use_cases
            .update_widget(WidgetId::new(), UpdateWidget::default(), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn update_rejects_negative_price() {
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
        let err = use_cases
            .update_widget(
                created.id,
                UpdateWidget {
                    name: None,
                    price_cents: Some(-1),
                },
                &ctx,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, "VALIDATION_ERROR");
    }
}
