//! Generic, parallel-with-timeout health check registry.
//!
//! Replaces the old sequential "check database, then check redis, then
//! check nats" style with a registry of independent [`HealthCheck`]s run
//! concurrently, each bounded by the same timeout so one slow dependency
//! can't stall the whole readiness probe.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{http::StatusCode, response::IntoResponse, Json};
use futures::future::join_all;
use serde::{Deserialize, Serialize};

/// One independent health check. `name()` becomes the JSON key.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    fn name(&self) -> &str;
    async fn check(&self) -> Result<(), String>;
}

struct FnCheck<F> {
    name: String,
    f: F,
}

#[async_trait]
impl<F, Fut> HealthCheck for FnCheck<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), String>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> Result<(), String> {
        (self.f)().await
    }
}

/// Wraps a bare async closure as a [`HealthCheck`], so callers don't need
/// to define a struct per dependency.
pub fn check_fn<F, Fut>(name: impl Into<String>, f: F) -> Arc<dyn HealthCheck>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), String>> + Send + 'static,
{
    Arc::new(FnCheck { name: name.into(), f })
}

struct Entry {
    check: Arc<dyn HealthCheck>,
    /// A failing non-critical check still reports `FAIL: ...` but does not
    /// flip overall readiness — used for dependencies configured `optional`.
    critical: bool,
}

#[derive(Default)]
pub struct HealthRegistry {
    entries: Vec<Entry>,
}

/// Default per-check timeout: one slow dependency gets 2s before it's
/// recorded as failed, rather than blocking the probe indefinitely.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, check: Arc<dyn HealthCheck>) -> &mut Self {
        self.entries.push(Entry {
            check,
            critical: true,
        });
        self
    }

    pub fn register_optional(&mut self, check: Arc<dyn HealthCheck>) -> &mut Self {
        self.entries.push(Entry {
            check,
            critical: false,
        });
        self
    }

    pub async fn run_all(&self, timeout: Duration) -> ReadyResponse {
        let outcomes = join_all(self.entries.iter().map(|entry| async move {
            let name = entry.check.name().to_string();
            let result = match tokio::time::timeout(timeout, entry.check.check()).await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(message)) => Err(message),
                Err(_) => Err(format!("timed out after {:?}", timeout)),
            };
            (name, result, entry.critical)
        }))
        .await;

        let mut checks = HashMap::with_capacity(outcomes.len());
        let mut ready = true;
        for (name, result, critical) in outcomes {
            match result {
                Ok(()) => {
                    checks.insert(name, "ok".to_string());
                }
                Err(message) => {
                    checks.insert(name, format!("FAIL: {message}"));
                    if critical {
                        ready = false;
                    }
                }
            }
        }

        ReadyResponse {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            checks,
        }
    }
}

/// `{"status": "ready"|"not_ready", "checks": {name: "ok"|"FAIL: ..."}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    pub checks: HashMap<String, String>,
}

impl IntoResponse for ReadyResponse {
    fn into_response(self) -> axum::response::Response {
        let status = if self.status == "ready" {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn all_checks_passing_is_ready() {
        let mut registry = HealthRegistry::new();
        registry.register(check_fn("database", || async { Ok(()) }));
        registry.register(check_fn("redis", || async { Ok(()) }));
        let response = registry.run_all(Duration::from_secs(1)).await;
        assert_eq!(response.status, "ready");
        assert_eq!(response.checks.get("database").unwrap(), "ok");
    }

    #[tokio::test]
    async fn critical_failure_flips_overall_status() {
        let mut registry = HealthRegistry::new();
        registry.register(check_fn("database", || async { Err("connection refused".to_string()) }));
        let response = registry.run_all(Duration::from_secs(1)).await;
        assert_eq!(response.status, "not_ready");
        assert_eq!(response.checks.get("database").unwrap(), "FAIL: connection refused");
    }

    #[tokio::test]
    async fn optional_failure_keeps_ready_status() {
        let mut registry = HealthRegistry::new();
        registry.register(check_fn("database", || async { Ok(()) }));
        registry.register_optional(check_fn("nats", || async { Err("unreachable".to_string()) }));
        let response = registry.run_all(Duration::from_secs(1)).await;
        assert_eq!(response.status, "ready");
        assert!(response.checks.get("nats").unwrap().starts_with("FAIL:"));
    }

    #[tokio::test]
    async fn slow_check_is_recorded_as_timed_out() {
        let mut registry = HealthRegistry::new();
        registry.register(check_fn("slow", || async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        }));
        let response = registry.run_all(Duration::from_millis(20)).await;
        assert_eq!(response.status, "not_ready");
        assert!(response.checks.get("slow").unwrap().contains("timed out"));
    }
}
