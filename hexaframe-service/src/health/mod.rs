//! Health check handlers.

pub mod registry;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{de::DeserializeOwned, Serialize};

use crate::state::AppState;
use registry::{check_fn, HealthRegistry, ReadyResponse, DEFAULT_CHECK_TIMEOUT};

/// Health check response
#[derive(Debug, Serialize, serde::Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Simple health check (liveness probe)
///
/// Always returns 200 OK if the service is running.
/// This is used by Kubernetes to determine if the pod should be restarted.
pub async fn health<T>(State(state): State<AppState<T>>) -> impl IntoResponse
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check (readiness probe): runs every configured dependency
/// check in parallel, each bounded by [`DEFAULT_CHECK_TIMEOUT`], and
/// returns `{"status": "ready"|"not_ready", "checks": {name: "ok"|"FAIL: ..."}}`.
/// Returns 503 if any non-optional dependency is unhealthy.
pub async fn readiness<T>(State(state): State<AppState<T>>) -> impl IntoResponse
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    compute_readiness(&state).await
}

async fn compute_readiness<T>(state: &AppState<T>) -> ReadyResponse
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    let mut registry = HealthRegistry::new();

    #[cfg(feature = "database")]
    if let Some(db_config) = state.config().database.clone() {
        let state = state.clone();
        let check = check_fn("database", move || {
            let state = state.clone();
            async move {
                let pool = state
                    .db()
                    .await
                    .ok_or_else(|| "not connected (lazy init in progress)".to_string())?;
                sqlx::query("SELECT 1")
                    .fetch_one(&pool)
                    .await
                    .map(|_| ())
                    .map_err(|e| format!("query failed: {e}"))
            }
        });
        if db_config.optional {
            registry.register_optional(check);
        } else {
            registry.register(check);
        }
    }

    #[cfg(feature = "cache")]
    if let Some(redis_config) = state.config().redis.clone() {
        let state = state.clone();
        let check = check_fn("redis", move || {
            let state = state.clone();
            async move {
                let pool = state
                    .redis()
                    .await
                    .ok_or_else(|| "not connected (lazy init in progress)".to_string())?;
                let mut conn = pool
                    .get()
                    .await
                    .map_err(|e| format!("pool error: {e}"))?;
                use std::ops::DerefMut;
                redis::cmd("PING")
                    .query_async::<String>(conn.deref_mut())
                    .await
                    .map(|_| ())
                    .map_err(|e| format!("ping failed: {e}"))
            }
        });
        if redis_config.optional {
            registry.register_optional(check);
        } else {
            registry.register(check);
        }
    }

    #[cfg(feature = "events")]
    if let Some(nats_config) = state.config().nats.clone() {
        let state = state.clone();
        let check = check_fn("nats", move || {
            let state = state.clone();
            async move {
                let client = state
                    .nats()
                    .await
                    .ok_or_else(|| "not connected (lazy init in progress)".to_string())?;
                match client.connection_state() {
                    async_nats::connection::State::Connected => Ok(()),
                    other => Err(format!("connection state: {other:?}")),
                }
            }
        });
        if nats_config.optional {
            registry.register_optional(check);
        } else {
            registry.register(check);
        }
    }

    // Note: the `turso`/`surrealdb` features exist but `Config` carries no
    // corresponding fields and `AppState` exposes no `turso()`/`surrealdb()`
    // accessors, so there is nothing to probe here yet. The previous
    // sequential readiness check referenced both regardless, which could
    // not have compiled with either feature enabled.

    let response: ReadyResponse = registry.run_all(DEFAULT_CHECK_TIMEOUT).await;
    response
}

/// Pool health metrics endpoint
///
/// Returns detailed metrics about connection pool health including:
/// - Database pool: size, idle connections, utilization
/// - Redis pool: status, availability
/// - NATS client: connection state
///
/// This is useful for monitoring and capacity planning.
pub async fn pool_metrics<T>(State(state): State<AppState<T>>) -> impl IntoResponse
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    let health = state.pool_health().await;
    let status = if health.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(health))
}

/// Prometheus text-exposition metrics endpoint, served from the internal
/// listener alongside `/healthz`/`/readyz`.
///
/// Request/job/publish counters and histograms are emitted through the OTel
/// meter (`middleware::metrics`, `jobs`, `event_bus`) and pushed to whatever
/// OTLP collector `otlp.endpoint` points at; this endpoint complements that
/// push path with a minimal pull surface so a bare Prometheus scrape (no
/// collector in front of it) still sees liveness/readiness as gauges.
pub async fn metrics_text<T>(State(state): State<AppState<T>>) -> impl IntoResponse
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    let ready = compute_readiness(&state).await;
    let up = if ready.status == "ready" { 1 } else { 0 };
    let pool = state.pool_health().await;

    let mut body = String::new();
    body.push_str("# HELP hexaframe_up Whether the readiness checks currently pass.\n");
    body.push_str("# TYPE hexaframe_up gauge\n");
    body.push_str(&format!("hexaframe_up {up}\n"));
    body.push_str("# HELP hexaframe_pool_healthy Whether all configured connection pools are healthy.\n");
    body.push_str("# TYPE hexaframe_pool_healthy gauge\n");
    body.push_str(&format!("hexaframe_pool_healthy {}\n", if pool.healthy { 1 } else { 0 }));

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            service: "test-service".to_string(),
            version: Some("1.0.0".to_string()),
        };

        assert_eq!(response.status, "healthy");
        assert_eq!(response.service, "test-service");
    }
}
