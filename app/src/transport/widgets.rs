//! HTTP adapter for the widget use cases. Built as its own fully-resolved
//! `Router<()>` -- `VersionedApiBuilder::add_version` only accepts
//! `FnOnce(Router) -> Router` over a stateless `Router<()>`, so state is
//! attached here via `.with_state` rather than threaded through
//! `hexaframe_service::state::AppState`.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::Router;
use hexaframe_service::domain::AppError;
use hexaframe_service::envelope::{Envelope, Pagination as EnvelopePagination};
use hexaframe_service::extract::StrictJson;
use hexaframe_service::handlers::ListQuery;
use hexaframe_service::problem::ProblemDetail;
use hexaframe_service::repository::{Pagination, Repository};
use serde::{Deserialize, Serialize};

use crate::app::{ActorContext, WidgetUseCases};
use crate::domain::{CreateWidget, UpdateWidget, Widget, WidgetId};

const ERROR_BASE_URL: &str = "https://errors.hexaframe.example.com";

fn to_problem(err: AppError, instance: &str, trace_id: String) -> ProblemDetail {
    ProblemDetail::new(ERROR_BASE_URL, err.code, err.message, instance, trace_id)
}

fn actor_context(request_id: String) -> ActorContext {
    ActorContext::new(None, request_id)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPayload {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub price_cents: i64,
}

impl From<Widget> for WidgetPayload {
    fn from(widget: Widget) -> Self {
        Self {
            id: widget.id.to_string(),
            name: widget.name,
            sku: widget.sku,
            price_cents: widget.price_cents,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateWidgetBody {
    pub name: String,
    pub sku: String,
    pub price_cents: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateWidgetBody {
    pub name: Option<String>,
    pub price_cents: Option<i64>,
}

async fn list_widgets_handler<R>(
    State(deps): State<Arc<WidgetUseCases<R>>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Envelope<Vec<WidgetPayload>>, ProblemDetail>
where
    R: Repository<WidgetId, Widget, CreateWidget, UpdateWidget> + 'static,
{
    let request_id = crate::transport::trace_id(&headers);
    let pagination = Pagination::page(query.page_number() as u64, query.items_per_page() as u64);
    let page = deps
        .list_widgets(&[], None, pagination)
        .await
        .map_err(|err| to_problem(err, "/v1/widgets", request_id.clone()))?;

    let items: Vec<WidgetPayload> = page.items.into_iter().map(WidgetPayload::from).collect();
    let meta_pagination =
        EnvelopePagination::new(query.page_number(), query.items_per_page(), page.total);
    Ok(Envelope::paginated(items, request_id, meta_pagination))
}

async fn create_widget_handler<R>(
    State(deps): State<Arc<WidgetUseCases<R>>>,
    headers: HeaderMap,
    StrictJson(body): StrictJson<CreateWidgetBody>,
) -> Result<Envelope<WidgetPayload>, ProblemDetail>
where
    R: Repository<WidgetId, Widget, CreateWidget, UpdateWidget> + 'static,
{
    let request_id = crate::transport::trace_id(&headers);
    let ctx = actor_context(request_id.clone());
    let created = deps
        .create_widget(
            CreateWidget {
                name: body.name,
                sku: body.sku,
                price_cents: body.price_cents,
            },
            &ctx,
        )
        .await
        .map_err(|err| to_problem(err, "/v1/widgets", request_id.clone()))?;
    Ok(Envelope::new(created.into(), request_id))
}

async fn get_widget_handler<R>(
    State(deps): State<Arc<WidgetUseCases<R>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Envelope<WidgetPayload>, ProblemDetail>
where
    R: Repository<WidgetId, Widget, CreateWidget, UpdateWidget> + 'static,
{
    let request_id = crate::transport::trace_id(&headers);
    let id = parse_id(&id, &request_id)?;
    let widget = deps
        .get_widget(id)
        .await
        .map_err(|err| to_problem(err, &format!("/v1/widgets/{id}"), request_id.clone()))?;
    Ok(Envelope::new(widget.into(), request_id))
}

async fn update_widget_handler<R>(
    State(deps): State<Arc<WidgetUseCases<R>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    StrictJson(body): StrictJson<UpdateWidgetBody>,
) -> Result<Envelope<WidgetPayload>, ProblemDetail>
where
    R: Repository<WidgetId, Widget, CreateWidget, UpdateWidget> + 'static,
{
    let request_id = crate::transport::trace_id(&headers);
    let id = parse_id(&id, &request_id)?;
    let ctx = actor_context(request_id.clone());
    let updated = deps
        .update_widget(
            id,
            UpdateWidget {
                name: body.name,
                price_cents: body.price_cents,
            },
            &ctx,
        )
        .await
        .map_err(|err| to_problem(err, &format!("/v1/widgets/{id}"), request_id.clone()))?;
    Ok(Envelope::new(updated.into(), request_id))
}

async fn delete_widget_handler<R>(
    State(deps): State<Arc<WidgetUseCases<R>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<axum::http::StatusCode, ProblemDetail>
where
    R: Repository<WidgetId, Widget, CreateWidget, UpdateWidget> + 'static,
{
    let request_id = crate::transport::trace_id(&headers);
    let id = parse_id(&id, &request_id)?;
    let ctx = actor_context(request_id.clone());
    deps.delete_widget(id, &ctx)
        .await
        .map_err(|err| to_problem(err, &format!("/v1/widgets/{id}"), request_id))?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str, request_id: &str) -> Result<WidgetId, ProblemDetail> {
    raw.parse().map_err(|_| {
        ProblemDetail::new(
            ERROR_BASE_URL,
            "VALIDATION_ERROR",
            "path parameter `id` must be a UUID",
            format!("/v1/widgets/{raw}"),
            request_id.to_string(),
        )
    })
}

/// Builds the fully-resolved widget sub-router for one API version.
pub fn widget_routes<R>(deps: Arc<WidgetUseCases<R>>) -> Router
where
    R: Repository<WidgetId, Widget, CreateWidget, UpdateWidget> + 'static,
{
    Router::new()
        .route(
            "/widgets",
            get(list_widgets_handler::<R>).post(create_widget_handler::<R>),
        )
        .route(
            "/widgets/{id}",
            get(get_widget_handler::<R>)
                .patch(update_widget_handler::<R>)
                .delete(delete_widget_handler::<R>),
        )
        .with_state(deps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::audit_log::InMemoryAuditLog;
    use crate::app::InMemoryUnitOfWork;
    use crate::infra::InMemoryWidgetRepository;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        let deps = Arc::new(WidgetUseCases::new(
            Arc::new(InMemoryWidgetRepository::new()),
            Arc::new(InMemoryAuditLog::new()),
            Arc::new(InMemoryUnitOfWork::new()),
        ));
        widget_routes(deps)
    }

    #[tokio::test]
    async fn create_then_list_round_trips() {
        let app = router();
        let body = serde_json::to_vec(&serde_json::json!({
            "name": "Bolt",
            "sku": "SKU-1",
            "priceCents": 150
        }))
        .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/widgets")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::builder().uri("/widgets").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn get_missing_widget_returns_404_problem() {
        let app = router();
        let id = WidgetId::new();
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/widgets/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
