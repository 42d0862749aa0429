//! HTTP adapter for the admin surface: feature flags, user roles, and job
//! queue management. Every route here sits behind the `admin` role, enforced
//! by [`hexaframe_service::middleware::rbac`] via `route_layer` so it runs
//! once per request rather than once per handler.

use std::sync::Arc;

use axum::extract::{Extension, Path, State};
use axum::http::HeaderMap;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use hexaframe_service::domain::AppError;
use hexaframe_service::envelope::Envelope;
use hexaframe_service::extract::StrictJson;
use hexaframe_service::jobs::QueueStats;
use hexaframe_service::middleware::{require_role, Claims, RequireRole};
use hexaframe_service::problem::ProblemDetail;
use serde::{Deserialize, Serialize};

use crate::admin::AdminDeps;
use crate::app::ActorContext;

const ERROR_BASE_URL: &str = "https://errors.hexaframe.example.com";

fn to_problem(err: AppError, instance: &str, trace_id: String) -> ProblemDetail {
    ProblemDetail::new(ERROR_BASE_URL, err.code, err.message, instance, trace_id)
}

fn actor_context(claims: Option<Extension<Claims>>) -> ActorContext {
    let request_id = hexaframe_service::ids::RequestId::new().to_string();
    ActorContext::new(claims.map(|Extension(c)| c.sub), request_id)
}

#[derive(Debug, Serialize)]
pub struct FlagPayload {
    pub name: String,
    pub enabled: bool,
}

async fn list_flags(State(deps): State<Arc<AdminDeps>>, headers: HeaderMap) -> Envelope<Vec<FlagPayload>> {
    let flags = deps
        .list_flags()
        .await
        .into_iter()
        .map(|(name, enabled)| FlagPayload { name, enabled })
        .collect();
    Envelope::new(flags, crate::transport::trace_id(&headers))
}

async fn get_flag(
    State(deps): State<Arc<AdminDeps>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<Envelope<FlagPayload>, ProblemDetail> {
    let request_id = crate::transport::trace_id(&headers);
    let enabled = deps
        .get_flag(&name)
        .await
        .map_err(|err| to_problem(err, &format!("/v1/admin/flags/{name}"), request_id.clone()))?;
    Ok(Envelope::new(FlagPayload { name, enabled }, request_id))
}

async fn enable_flag(
    State(deps): State<Arc<AdminDeps>>,
    claims: Option<Extension<Claims>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<axum::http::StatusCode, ProblemDetail> {
    let ctx = actor_context(claims);
    deps.enable_flag(&name, &ctx)
        .await
        .map_err(|err| to_problem(err, &format!("/v1/admin/flags/{name}/enable"), crate::transport::trace_id(&headers)))?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn disable_flag(
    State(deps): State<Arc<AdminDeps>>,
    claims: Option<Extension<Claims>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<axum::http::StatusCode, ProblemDetail> {
    let ctx = actor_context(claims);
    deps.disable_flag(&name, &ctx)
        .await
        .map_err(|err| to_problem(err, &format!("/v1/admin/flags/{name}/disable"), crate::transport::trace_id(&headers)))?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetRolesBody {
    pub roles: Vec<String>,
}

async fn get_roles(
    State(deps): State<Arc<AdminDeps>>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Result<Envelope<Vec<String>>, ProblemDetail> {
    let request_id = crate::transport::trace_id(&headers);
    let roles = deps
        .get_roles(&user_id)
        .await
        .map_err(|err| to_problem(err, &format!("/v1/admin/users/{user_id}/roles"), request_id.clone()))?;
    Ok(Envelope::new(roles, request_id))
}

async fn set_roles(
    State(deps): State<Arc<AdminDeps>>,
    claims: Option<Extension<Claims>>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    StrictJson(body): StrictJson<SetRolesBody>,
) -> Result<axum::http::StatusCode, ProblemDetail> {
    let ctx = actor_context(claims);
    deps.set_roles(&user_id, body.roles, &ctx)
        .await
        .map_err(|err| to_problem(err, &format!("/v1/admin/users/{user_id}/roles"), crate::transport::trace_id(&headers)))?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn add_role(
    State(deps): State<Arc<AdminDeps>>,
    claims: Option<Extension<Claims>>,
    headers: HeaderMap,
    Path((user_id, role)): Path<(String, String)>,
) -> Result<axum::http::StatusCode, ProblemDetail> {
    let ctx = actor_context(claims);
    deps.add_role(&user_id, &role, &ctx)
        .await
        .map_err(|err| to_problem(err, &format!("/v1/admin/users/{user_id}/roles/{role}"), crate::transport::trace_id(&headers)))?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn remove_role(
    State(deps): State<Arc<AdminDeps>>,
    claims: Option<Extension<Claims>>,
    headers: HeaderMap,
    Path((user_id, role)): Path<(String, String)>,
) -> Result<axum::http::StatusCode, ProblemDetail> {
    let ctx = actor_context(claims);
    deps.remove_role(&user_id, &role, &ctx)
        .await
        .map_err(|err| to_problem(err, &format!("/v1/admin/users/{user_id}/roles/{role}"), crate::transport::trace_id(&headers)))?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn queue_stats(
    State(deps): State<Arc<AdminDeps>>,
    headers: HeaderMap,
) -> Envelope<hexaframe_service::jobs::InspectorSummary> {
    let summary = deps.queue_stats(Vec::<QueueStats>::new()).await;
    Envelope::new(summary, crate::transport::trace_id(&headers))
}

async fn list_dead_letters(
    State(deps): State<Arc<AdminDeps>>,
    headers: HeaderMap,
) -> Envelope<Vec<hexaframe_service::jobs::DlqEvent>> {
    let events = deps.list_dead_letters().await;
    Envelope::new(events, crate::transport::trace_id(&headers))
}

async fn delete_dead_letter(
    State(deps): State<Arc<AdminDeps>>,
    claims: Option<Extension<Claims>>,
    headers: HeaderMap,
    Path(index): Path<usize>,
) -> Result<axum::http::StatusCode, ProblemDetail> {
    let ctx = actor_context(claims);
    deps.delete_dead_letter(index, &ctx)
        .await
        .map_err(|err| to_problem(err, &format!("/v1/admin/queues/dead-letters/{index}"), crate::transport::trace_id(&headers)))?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn retry_dead_letter(
    State(deps): State<Arc<AdminDeps>>,
    claims: Option<Extension<Claims>>,
    headers: HeaderMap,
    Path(index): Path<usize>,
) -> Result<axum::http::StatusCode, ProblemDetail> {
    let ctx = actor_context(claims);
    deps.retry_dead_letter(index, &ctx).await.map_err(|err| {
        to_problem(
            err,
            &format!("/v1/admin/queues/dead-letters/{index}/retry"),
            crate::transport::trace_id(&headers),
        )
    })?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

/// Builds the admin sub-router, gated end-to-end by the `admin` role.
pub fn admin_routes(deps: Arc<AdminDeps>) -> Router {
    Router::new()
        .route("/admin/flags", get(list_flags))
        .route(
            "/admin/flags/{name}",
            get(get_flag),
        )
        .route("/admin/flags/{name}/enable", axum::routing::post(enable_flag))
        .route("/admin/flags/{name}/disable", axum::routing::post(disable_flag))
        .route(
            "/admin/users/{user_id}/roles",
            get(get_roles).put(set_roles),
        )
        .route(
            "/admin/users/{user_id}/roles/{role}",
            axum::routing::post(add_role).delete(remove_role),
        )
        .route("/admin/queues/stats", get(queue_stats))
        .route("/admin/queues/dead-letters", get(list_dead_letters))
        .route(
            "/admin/queues/dead-letters/{index}",
            axum::routing::delete(delete_dead_letter),
        )
        .route(
            "/admin/queues/dead-letters/{index}/retry",
            axum::routing::post(retry_dead_letter),
        )
        .route_layer(from_fn_with_state(require_role("admin"), RequireRole::middleware))
        .with_state(deps)
}
