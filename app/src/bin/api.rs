//! HTTP entry point: wires the widget and admin transport routers behind
//! `VersionedApiBuilder`, then hands the assembled routes to `ServiceBuilder`
//! so the real middleware pipeline (security headers, rate limiting,
//! tracing, request-id propagation, ...) and the internal healthz/readyz
//! listener both apply the same way they would to any hexaframe service.
//!
//! Job processing itself runs in the separate `worker` binary; this
//! process only ever produces tasks. When NATS is configured, tasks are
//! published over it so any `worker` process (same host or not) can pick
//! them up -- without NATS, we fall back to an embedded worker so the
//! service still runs standalone for local development.

use std::sync::Arc;

use app::admin::audit_log::InMemoryAuditLog;
use app::admin::AdminDeps;
use app::app::{InMemoryUnitOfWork, WidgetUseCases};
use app::bootstrap::build_enqueuer;
use app::infra::InMemoryWidgetRepository;
use app::transport::{admin_routes, not_found_fallback, widget_routes};
use hexaframe_service::config::Config;
use hexaframe_service::jobs::DeadLetterQueue;
use hexaframe_service::service_builder::ServiceBuilder;
use hexaframe_service::versioning::{ApiVersion, VersionedApiBuilder};

#[tokio::main]
async fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load configuration: {err}");
            std::process::exit(1);
        }
    };

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("config error: {error}");
        }
        std::process::exit(1);
    }

    let audit = Arc::new(InMemoryAuditLog::new());
    let widget_deps = Arc::new(WidgetUseCases::new(
        Arc::new(InMemoryWidgetRepository::new()),
        audit.clone(),
        Arc::new(InMemoryUnitOfWork::new()),
    ));

    let dlq = DeadLetterQueue::new();
    let enqueuer = build_enqueuer(&config, dlq.clone()).await;
    let admin_deps = Arc::new(AdminDeps::with_dependencies(dlq, audit, enqueuer));

    let routes = VersionedApiBuilder::new()
        .with_base_path("/api")
        .add_version(ApiVersion::V1, move |router| {
            router
                .merge(widget_routes(widget_deps))
                .merge(admin_routes(admin_deps))
        })
        .with_fallback(not_found_fallback)
        .build_routes();

    let service = ServiceBuilder::new().with_config(config).with_routes(routes).build();

    if let Err(err) = service.serve().await {
        eprintln!("server exited with error: {err}");
        std::process::exit(1);
    }
}
