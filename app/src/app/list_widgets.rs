//! List-widgets use case: thin pass-through to the repository's own
//! filter/order/pagination support.

use hexaframe_service::domain::{AppError, DomainError};
use hexaframe_service::repository::{FilterCondition, OrderDirection, Pagination, Repository};

use super::WidgetUseCases;
use crate::domain::{CreateWidget, UpdateWidget, Widget, WidgetId};

const OP: &str = "list_widgets";

/// Page of widgets plus the total count matching the same filters, enough
/// for transport to build the `{page, pageSize, totalItems, totalPages}`
/// pagination meta spec.md's wire format requires.
pub struct WidgetPage {
    pub items: Vec<Widget>,
    pub total: u64,
}

impl<R> WidgetUseCases<R>
where
    R: Repository<WidgetId, Widget, CreateWidget, UpdateWidget> + 'static,
{
    pub async fn list_widgets(
        &self,
        filters: &[FilterCondition],
        order_by: Option<(&str, OrderDirection)>,
        pagination: Pagination,
    ) -> Result<WidgetPage, AppError> {
        let items = self
            .repo
            .find_all(filters, order_by, Some(pagination))
            .await
            .map_err(|err| {
                AppError::from_domain(DomainError::DependencyFailure(err.to_string()), OP)
                    .with_source(err)
            })?;
        let total = self.repo.count(filters).await.map_err(|err| {
            AppError::from_domain(DomainError::DependencyFailure(err.to_string()), OP)
                .with_source(err)
        })?;
        Ok(WidgetPage { items, total })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::admin::audit_log::InMemoryAuditLog;
    use crate::app::{ActorContext, InMemoryUnitOfWork, WidgetUseCases};
    use crate::domain::CreateWidget;
    use crate::infra::InMemoryWidgetRepository;
    use hexaframe_service::repository::Pagination;

    #[tokio::test]
    async fn list_reports_total_independent_of_page_size() {
        let use_cases = WidgetUseCases::new(
            Arc::new(InMemoryWidgetRepository::new()),
            Arc::new(InMemoryAuditLog::new()),
            Arc::new(InMemoryUnitOfWork::new()),
        );
        let ctx = ActorContext::new(None, "req-1");
        for i in 0..3 {
            use_cases
                .create_widget(
                    CreateWidget {
                        name: format!("Widget {i}"),
                        sku: format!("SKU-{i}"),
                        price_cents: 100,
                    },
                    &ctx,
                )
                .await
                .unwrap();
        }

        let page = use_cases
            .list_widgets(&[], None, Pagination::first_page(2))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 3);
    }
}
