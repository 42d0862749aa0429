//! In-memory adapter for the `WidgetRepository` port. Backs the `api`/`worker`
//! binaries when no database is configured and backs the test suite directly.
//! Grounded on the `Repository` trait's own doc examples and mock impl in
//! `hexaframe_service::repository::traits` (manually-written RPITIT futures,
//! implemented here with plain `async fn` bodies as that module's own tests do).

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use hexaframe_service::repository::{
    FilterCondition, FilterOperator, FilterValue, OrderDirection, Pagination, Repository,
    RepositoryError, RepositoryOperation, RepositoryResult,
};

use crate::domain::{CreateWidget, UpdateWidget, Widget, WidgetId};

/// `Arc`-free by design: callers wrap this in `Arc` themselves (it is shared
/// behind `Arc<InMemoryWidgetRepository>` from `app/src/bin/api.rs` onward),
/// the same way `jobs::enqueue::FireAndForget` leaves sharing to its caller.
#[derive(Debug, Default)]
pub struct InMemoryWidgetRepository {
    widgets: RwLock<HashMap<WidgetId, Widget>>,
}

impl InMemoryWidgetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(widget: &Widget, filter: &FilterCondition) -> bool {
        let field_value: FilterValue = match filter.field.as_str() {
            "name" => widget.name.clone().into(),
            "sku" => widget.sku.clone().into(),
            "price_cents" => widget.price_cents.into(),
            _ => return true,
        };
        match (&field_value, filter.operator, &filter.value) {
            (FilterValue::String(a), FilterOperator::Equal, FilterValue::String(b)) => a == b,
            (FilterValue::String(a), FilterOperator::NotEqual, FilterValue::String(b)) => a != b,
            (FilterValue::String(a), FilterOperator::Like, FilterValue::String(pattern)) => {
                let needle = pattern.trim_matches('%');
                a.contains(needle)
            }
            (FilterValue::String(a), FilterOperator::In, FilterValue::StringList(list)) => {
                list.contains(a)
            }
            (FilterValue::Integer(a), FilterOperator::Equal, FilterValue::Integer(b)) => a == b,
            (FilterValue::Integer(a), FilterOperator::NotEqual, FilterValue::Integer(b)) => {
                a != b
            }
            (FilterValue::Integer(a), FilterOperator::GreaterThan, FilterValue::Integer(b)) => {
                a > b
            }
            (
                FilterValue::Integer(a),
                FilterOperator::GreaterThanOrEqual,
                FilterValue::Integer(b),
            ) => a >= b,
            (FilterValue::Integer(a), FilterOperator::LessThan, FilterValue::Integer(b)) => {
                a < b
            }
            (FilterValue::Integer(a), FilterOperator::LessThanOrEqual, FilterValue::Integer(b)) => {
                a <= b
            }
            (FilterValue::Integer(a), FilterOperator::In, FilterValue::IntegerList(list)) => {
                list.contains(a)
            }
            _ => true,
        }
    }

    fn sort_key(widget: &Widget, field: &str) -> String {
        match field {
            "name" => widget.name.clone(),
            "sku" => widget.sku.clone(),
            "price_cents" => format!("{:020}", widget.price_cents),
            "created_at" => widget.created_at.to_rfc3339(),
            "updated_at" => widget.updated_at.to_rfc3339(),
            _ => widget.id.to_string(),
        }
    }
}

impl Repository<WidgetId, Widget, CreateWidget, UpdateWidget> for InMemoryWidgetRepository {
    async fn find_by_id(&self, id: &WidgetId) -> RepositoryResult<Option<Widget>> {
        let widgets = self
            .widgets
            .read()
            .map_err(|_| RepositoryError::database_error(RepositoryOperation::FindById, "lock poisoned"))?;
        Ok(widgets.get(id).cloned())
    }

    async fn find_all(
        &self,
        filters: &[FilterCondition],
        order_by: Option<(&str, OrderDirection)>,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<Vec<Widget>> {
        let widgets = self
            .widgets
            .read()
            .map_err(|_| RepositoryError::database_error(RepositoryOperation::FindAll, "lock poisoned"))?;

        let mut matching: Vec<Widget> = widgets
            .values()
            .filter(|widget| filters.iter().all(|f| Self::matches(widget, f)))
            .cloned()
            .collect();

        if let Some((field, direction)) = order_by {
            matching.sort_by(|a, b| {
                let ordering = Self::sort_key(a, field).cmp(&Self::sort_key(b, field));
                match direction {
                    OrderDirection::Ascending => ordering,
                    OrderDirection::Descending => ordering.reverse(),
                }
            });
        } else {
            matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        }

        if let Some(pagination) = pagination {
            let offset = pagination.offset as usize;
            let limit = pagination.limit as usize;
            matching = matching.into_iter().skip(offset).take(limit).collect();
        }

        Ok(matching)
    }

    async fn count(&self, filters: &[FilterCondition]) -> RepositoryResult<u64> {
        let widgets = self
            .widgets
            .read()
            .map_err(|_| RepositoryError::database_error(RepositoryOperation::Count, "lock poisoned"))?;
        Ok(widgets
            .values()
            .filter(|widget| filters.iter().all(|f| Self::matches(widget, f)))
            .count() as u64)
    }

    async fn exists(&self, id: &WidgetId) -> RepositoryResult<bool> {
        let widgets = self
            .widgets
            .read()
            .map_err(|_| RepositoryError::database_error(RepositoryOperation::Exists, "lock poisoned"))?;
        Ok(widgets.contains_key(id))
    }

    async fn create(&self, data: CreateWidget) -> RepositoryResult<Widget> {
        let mut widgets = self
            .widgets
            .write()
            .map_err(|_| RepositoryError::database_error(RepositoryOperation::Create, "lock poisoned"))?;

        if widgets.values().any(|w| w.sku == data.sku) {
            return Err(RepositoryError::already_exists("Widget", data.sku.clone()));
        }

        let now = Utc::now();
        let widget = Widget {
            id: WidgetId::new(),
            name: data.name,
            sku: data.sku,
            price_cents: data.price_cents,
            created_at: now,
            updated_at: now,
        };
        widgets.insert(widget.id, widget.clone());
        Ok(widget)
    }

    async fn update(&self, id: &WidgetId, data: UpdateWidget) -> RepositoryResult<Widget> {
        let mut widgets = self
            .widgets
            .write()
            .map_err(|_| RepositoryError::database_error(RepositoryOperation::Update, "lock poisoned"))?;

        let widget = widgets
            .get_mut(id)
            .ok_or_else(|| RepositoryError::not_found("Widget", id.to_string()))?;

        if let Some(name) = data.name {
            widget.name = name;
        }
        if let Some(price_cents) = data.price_cents {
            widget.price_cents = price_cents;
        }
        widget.updated_at = Utc::now();
        Ok(widget.clone())
    }

    async fn delete(&self, id: &WidgetId) -> RepositoryResult<bool> {
        let mut widgets = self
            .widgets
            .write()
            .map_err(|_| RepositoryError::database_error(RepositoryOperation::Delete, "lock poisoned"))?;
        Ok(widgets.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CreateWidget {
        CreateWidget {
            name: "Widget One".to_string(),
            sku: "SKU-1".to_string(),
            price_cents: 1000,
        }
    }

    #[tokio::test]
    async fn create_then_find_by_id_round_trips() {
        let repo = InMemoryWidgetRepository::new();
        let created = repo.create(sample()).await.unwrap();
        let found = repo.find_by_id(&created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_sku() {
        let repo = InMemoryWidgetRepository::new();
        repo.create(sample()).await.unwrap();
        let err = repo.create(sample()).await.unwrap_err();
        assert_eq!(err.kind, hexaframe_service::repository::RepositoryErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn update_missing_widget_returns_not_found() {
        let repo = InMemoryWidgetRepository::new();
        let err = repo
            .update(&WidgetId::new(), UpdateWidget::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, hexaframe_service::repository::RepositoryErrorKind::NotFound);
    }

    #[tokio::test]
    async fn update_patches_only_provided_fields() {
        let repo = InMemoryWidgetRepository::new();
        let created = repo.create(sample()).await.unwrap();
        let updated = repo
            .update(
                &created.id,
                UpdateWidget {
                    name: Some("Widget Renamed".to_string()),
                    price_cents: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Widget Renamed");
        assert_eq!(updated.price_cents, created.price_cents);
    }

    #[tokio::test]
    async fn delete_removes_widget_and_reports_absence() {
        let repo = InMemoryWidgetRepository::new();
        let created = repo.create(sample()).await.unwrap();
        assert!(repo.delete(&created.id).await.unwrap());
        assert!(!repo.delete(&created.id).await.unwrap());
        assert_eq!(repo.find_by_id(&created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn find_all_applies_filter_order_and_pagination() {
        let repo = InMemoryWidgetRepository::new();
        repo.create(CreateWidget {
            name: "Alpha".to_string(),
            sku: "SKU-A".to_string(),
            price_cents: 300,
        })
        .await
        .unwrap();
        repo.create(CreateWidget {
            name: "Beta".to_string(),
            sku: "SKU-B".to_string(),
            price_cents: 100,
        })
        .await
        .unwrap();
        repo.create(CreateWidget {
            name: "Gamma".to_string(),
            sku: "SKU-C".to_string(),
            price_cents: 200,
        })
        .await
        .unwrap();

        let results = repo
            .find_all(
                &[FilterCondition::gte("price_cents", 150_i64)],
                Some(("price_cents", OrderDirection::Ascending)),
                Some(Pagination::first_page(1)),
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].sku, "SKU-C");
    }

    #[tokio::test]
    async fn count_reflects_filter() {
        let repo = InMemoryWidgetRepository::new();
        repo.create(sample()).await.unwrap();
        repo.create(CreateWidget {
            name: "Other".to_string(),
            sku: "SKU-2".to_string(),
            price_cents: 5000,
        })
        .await
        .unwrap();

        let count = repo
            .count(&[FilterCondition::lt("price_cents", 2000_i64)])
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
