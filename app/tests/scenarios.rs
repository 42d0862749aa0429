//! End-to-end scenarios adapted from the service's invariants: unknown
//! routes, wire-format validation, idempotent job dedup, and dead-letter
//! accounting after exhausted retries.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use app::admin::audit_log::InMemoryAuditLog;
use app::app::{InMemoryUnitOfWork, WidgetUseCases};
use app::infra::InMemoryWidgetRepository;
use app::transport::{admin_routes, not_found_fallback, widget_routes};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use hexaframe_service::jobs::{DeadLetterQueue, HandlerError, Task, TaskOptions, Worker};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

fn app() -> Router {
    let audit = Arc::new(InMemoryAuditLog::new());
    let widget_deps = Arc::new(WidgetUseCases::new(
        Arc::new(InMemoryWidgetRepository::new()),
        audit.clone(),
        Arc::new(InMemoryUnitOfWork::new()),
    ));
    let admin_deps = Arc::new(app::admin::AdminDeps::new());
    Router::new()
        .merge(widget_routes(widget_deps))
        .merge(admin_routes(admin_deps))
        .fallback(not_found_fallback)
}

/// S1: an unmatched route returns a 404 problem detail naming the path as
/// `instance`, carrying a non-empty trace id.
#[tokio::test]
async fn unknown_route_returns_404_problem() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/problem+json"
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let problem: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(problem["code"], "NOT_FOUND");
    assert_eq!(problem["instance"], "/does-not-exist");
    assert!(!problem["meta"]["traceId"].as_str().unwrap().is_empty());
}

/// S2: a body with an unknown field is rejected with 400 and the
/// validation error names the offending field.
#[tokio::test]
async fn unknown_field_is_rejected_with_named_validation_error() {
    let body = serde_json::to_vec(&serde_json::json!({
        "name": "Bolt",
        "sku": "SKU-1",
        "priceCents": 150,
        "color": "red"
    }))
    .unwrap();

    let response = app()
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
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let problem: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(problem["code"], "VALIDATION_ERROR");
    assert_eq!(problem["validationErrors"][0]["field"], "color");
}

/// Admin routes require the `admin` role; an unauthenticated request is
/// rejected before it ever reaches a handler.
#[tokio::test]
async fn admin_routes_reject_unauthenticated_requests() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/admin/flags")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// S5 analog: two enqueues sharing a `unique_key` within the dedup window
/// run the handler exactly once.
#[tokio::test]
async fn duplicate_task_within_unique_window_runs_handler_once() {
    let dlq = DeadLetterQueue::new();
    let (mut worker, enqueuer) = Worker::with_enqueuer(dlq.clone(), CancellationToken::new());

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    worker.register_handler(
        "widget:notify",
        Arc::new(move |_task: Task| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<(), HandlerError>(())
            }
        }),
    );

    let options = TaskOptions {
        unique_key: Some("k1".to_string()),
        unique_window: Some(Duration::from_secs(60)),
        ..TaskOptions::default()
    };
    enqueuer
        .enqueue(Task::new("widget:notify", serde_json::json!({})), options.clone())
        .await
        .unwrap();
    enqueuer
        .enqueue(Task::new("widget:notify", serde_json::json!({})), options)
        .await
        .unwrap();

    let handle = tokio::spawn(async move { worker.run().await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    drop(enqueuer);
    handle.await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// S6 analog: a handler that always fails exhausts `max_retry + 1`
/// attempts and lands exactly one event in the dead-letter queue.
#[tokio::test]
async fn exhausted_retries_produce_one_dlq_event() {
    let dlq = DeadLetterQueue::new();
    let (mut worker, enqueuer) = Worker::with_enqueuer(dlq.clone(), CancellationToken::new());

    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    worker.register_handler(
        "widget:notify",
        Arc::new(move |_task: Task| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(HandlerError("handler always fails".to_string()))
            }
        }),
    );

    enqueuer
        .enqueue(
            Task::new("widget:notify", serde_json::json!({})),
            TaskOptions {
                max_retry: 2,
                timeout: Duration::from_secs(1),
                ..TaskOptions::default()
            },
        )
        .await
        .unwrap();

    let handle = tokio::spawn(async move { worker.run().await });
    tokio::time::sleep(Duration::from_millis(500)).await;
    drop(enqueuer);
    handle.await.unwrap();

    assert_eq!(dlq.len(), 1);
    let events = dlq.snapshot();
    assert_eq!(events[0].attempts, 3);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}
