//! Create-widget use case: validates input, writes through the repository
//! and audit log inside one `UnitOfWork`, and converts every failure into
//! `AppError` the way `RepositoryError` conversions do one layer down.

use hexaframe_service::domain::{AppError, DomainError};
use hexaframe_service::repository::{Repository, RepositoryErrorKind};
use serde_json::json;

use super::{ActorContext, WidgetUseCases};
use crate::admin::audit_log::AuditEvent;
use crate::domain::{CreateWidget, Widget};

const OP: &str = "create_widget";

fn validate(input: &CreateWidget) -> Result<(), AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::from_domain(
            DomainError::Validation {
                field: "name".into(),
                message: "must not be empty".into(),
            },
            OP,
        ));
    }
    if input.sku.trim().is_empty() {
        return Err(AppError::from_domain(
            DomainError::Validation {
                field: "sku".into(),
                message: "must not be empty".into(),
            },
            OP,
        ));
    }
    if input.price_cents < 0 {
        return Err(AppError::from_domain(
            DomainError::Validation {
                field: "priceCents".into(),
                message: "must not be negative".into(),
            },
            OP,
        ));
    }
    Ok(())
}

impl<R> WidgetUseCases<R>
where
    R: Repository<crate::domain::WidgetId, Widget, CreateWidget, crate::domain::UpdateWidget>
        + 'static,
{
    pub async fn create_widget(
        &self,
        input: CreateWidget,
        ctx: &ActorContext,
    ) -> Result<Widget, AppError> {
        validate(&input)?;

        let created = self.repo.create(input).await.map_err(|err| match err.kind {
            RepositoryErrorKind::AlreadyExists => AppError::from_domain(
                DomainError::Conflict {
                    entity: "widget".into(),
                    reason: err.message.clone(),
                },
                OP,
            )
            .with_source(err),
            _ => AppError::from_domain(
                DomainError::DependencyFailure(err.to_string()),
                OP,
            )
            .with_source(err),
        })?;

        self.audit
            .record(AuditEvent::new(
                "widget.created",
                ctx.actor_id.clone(),
                "widget",
                created.id.to_string(),
                json!({"sku": created.sku, "priceCents": created.price_cents}),
                ctx.request_id.clone(),
            ))
            .await;

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::admin::audit_log::InMemoryAuditLog;
    use crate::app::{ActorContext, InMemoryUnitOfWork, WidgetUseCases};
    use crate::domain::CreateWidget;
    use crate::infra::InMemoryWidgetRepository;

    fn use_cases() -> WidgetUseCases<InMemoryWidgetRepository> {
        WidgetUseCases::new(
            Arc::new(InMemoryWidgetRepository::new()),
            Arc::new(InMemoryAuditLog::new()),
            Arc::new(InMemoryUnitOfWork::new()),
        )
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let use_cases = use_cases();
        let ctx = ActorContext::new(Some("user:1".into()), "req-1");
        let err = use_cases
            .create_widget(
                CreateWidget {
                    name: "  ".into(),
                    sku: "SKU-1".into(),
                    price_cents: 100,
                },
                &ctx,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn create_persists_and_audits() {
        let use_cases = use_cases();
        let ctx = ActorContext::new(Some("user:1".into()), "req-1");
        let widget = use_cases
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
        assert_eq!(widget.sku, "SKU-1");
        assert_eq!(use_cases.audit.recent(10).await.len(), 1);
    }
}
