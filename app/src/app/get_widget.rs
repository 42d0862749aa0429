//! Get-widget use case: a pure read, no audit emission (reads aren't mutations).

use hexaframe_service::domain::{AppError, DomainError};
use hexaframe_service::repository::Repository;

use super::WidgetUseCases;
use crate::domain::{CreateWidget, UpdateWidget, Widget, WidgetId};

const OP: &str = "get_widget";

impl<R> WidgetUseCases<R>
where
    R: Repository<WidgetId, Widget, CreateWidget, UpdateWidget> + 'static,
{
    pub async fn get_widget(&self, id: WidgetId) -> Result<Widget, AppError> {
        self.repo
            .find_by_id(&id)
            .await
            .map_err(|err| {
                AppError::from_domain(DomainError::DependencyFailure(err.to_string()), OP)
                    .with_source(err)
            })?
            .ok_or_else(|| {
                AppError::from_domain(
                    DomainError::NotFound {
                        entity: "widget".into(),
                        id: id.to_string(),
                    },
                    OP,
                )
            })
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
    async fn get_missing_widget_returns_not_found() {
        let use_cases = use_cases();
        let err = use_cases.get_widget(WidgetId::new()).await.unwrap_err();
        assert_eq!(err.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn get_existing_widget_round_trips() {
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
        let found = use_cases.get_widget(created.id).await.unwrap();
        assert_eq!(found, created);
    }
}
