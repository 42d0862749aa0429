//! # hexaframe-service
//!
//! Production-ready Rust backend framework built on axum and tower.
//! Works equally well for monolithic applications and microservices architectures.
//!
//! ## Features
//!
//! - **HTTP pipeline**: axum router with a composable tower middleware stack
//! - **Middleware stack**: JWT auth, rate limiting, request tracking, panic recovery, body size limits
//! - **Resilience**: Circuit breaker, retry with backoff, bulkhead (concurrency limiting)
//! - **Observability**: OpenTelemetry tracing, HTTP metrics, request ID propagation
//! - **Connection pooling**: Database (YSQL), Redis, NATS JetStream
//! - **Health checks**: Liveness and readiness probes
//! - **Graceful shutdown**: Proper signal handling (SIGTERM, SIGINT)
//!
//! ## Example
//!
//! ```rust,no_run
//! use hexaframe_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Load configuration
//!     let config = Config::load()?;
//!
//!     // Initialize tracing
//!     init_tracing(&config)?;
//!
//!     // Build application state
//!     let state = AppState::builder()
//!         .config(config.clone())
//!         .build()
//!         .await?;
//!
//!     // Create router. `/healthz`, `/readyz`, and `/metrics` are added
//!     // automatically by `ServiceBuilder` on a separate internal listener.
//!     let app = Router::new().with_state(state);
//!
//!     // Run server
//!     Server::new(config)
//!         .serve(app)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod ids;
pub mod middleware;
pub mod health;
pub mod pool_health;
pub mod problem;
pub mod responses;
pub mod server;
pub mod service_builder;
pub mod state;
pub mod versioning;

#[cfg(any(feature = "rate-limit", feature = "idempotency"))]
pub mod deadline;

#[cfg(feature = "repository")]
pub mod repository;

#[cfg(feature = "handlers")]
pub mod handlers;

#[cfg(feature = "idempotency")]
pub mod idempotency;

#[cfg(feature = "jobs")]
pub mod jobs;

#[cfg(feature = "event-bus")]
pub mod event_bus;

#[cfg(feature = "database")]
pub mod database;

#[cfg(feature = "cache")]
pub mod cache;

#[cfg(feature = "events")]
pub mod events;

pub mod observability;

#[cfg(feature = "openapi")]
pub mod openapi;

#[cfg(feature = "auth")]
pub mod auth;

/// Internal agent-based components
///
/// Connection pool management is handled internally by agents. Users don't
/// need to interact with this module directly - just use `ServiceBuilder::build()`
/// and access pools via `state.db()`, `state.redis()`, etc.
///
/// The only user-facing types from this module are:
/// - [`BackgroundWorker`](agents::BackgroundWorker) - for managed background tasks
/// - [`TaskStatus`](agents::TaskStatus) - for checking background task status
/// - [`HealthStatus`](agents::HealthStatus) - for health check results
pub mod agents;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, RateLimitConfig, RouteRateLimitConfig};

    pub use crate::error::{Error, Result};
    pub use crate::domain::{AppError, DomainError};
    pub use crate::envelope::{Envelope, Pagination, ResponseMeta, UNKNOWN_TRACE_ID};
    pub use crate::problem::{ProblemDetail, ValidationFieldError, status_for_code};
    pub use crate::extract::StrictJson;

    #[cfg(any(feature = "rate-limit", feature = "idempotency"))]
    pub use crate::deadline::with_deadline;

    #[cfg(feature = "repository")]
    pub use crate::repository::{
        FilterCondition, FilterOperator, FilterValue, OrderDirection, Pagination as RepoPagination,
        RelationLoader, Repository, RepositoryError, RepositoryErrorKind, RepositoryOperation,
        RepositoryResult, SoftDeleteRepository,
    };

    #[cfg(feature = "jobs")]
    pub use crate::jobs::{
        DlqEvent, Enqueuer, FanoutResult, FireAndForget, Queue, QueueInspector, QueueStats,
        ScheduledJob, Scheduler, Task, TaskOptions, Worker, WorkerMiddlewareChain,
    };

    #[cfg(feature = "event-bus")]
    pub use crate::event_bus::{
        Event, EventBusError, EventConsumer, EventPublisher, NatsEventBus,
    };
    pub use crate::health::{health, readiness, pool_metrics};
    pub use crate::ids::{MakeTypedRequestId, RequestId, RequestIdError};
    pub use crate::pool_health::PoolHealthSummary;

    #[cfg(feature = "database")]
    pub use crate::pool_health::DatabasePoolHealth;

    #[cfg(feature = "cache")]
    pub use crate::pool_health::RedisPoolHealth;

    #[cfg(feature = "events")]
    pub use crate::pool_health::NatsClientHealth;
    pub use crate::middleware::{
        Claims, TokenValidator, PasetoAuth, CompiledRoutePatterns, RateLimit, RequestTrackingConfig,
        PROPAGATE_HEADERS, SENSITIVE_HEADERS, normalize_path,
        request_id_layer, request_id_propagation_layer, sensitive_headers_layer,
        apply_security_headers, require_permission, require_role,
        RbacError, RequirePermission, RequireRole, SecurityHeadersConfig,
    };

    #[cfg(feature = "rate-limit")]
    pub use crate::middleware::{
        ip_key_extractor, user_id_key_extractor, AllowResult, BucketParams, FailurePolicy,
        InMemoryTokenBucket, TokenBucketLimiter,
    };

    #[cfg(feature = "rate-limit-redis")]
    pub use crate::middleware::RedisTokenBucket;

    #[cfg(feature = "idempotency")]
    pub use crate::idempotency::{IdempotencyConfig, IdempotencyFailurePolicy, IdempotencyStore};

    #[cfg(feature = "cache")]
    pub use crate::middleware::{TokenRevocation, RedisTokenRevocation};

    #[cfg(feature = "jwt")]
    pub use crate::middleware::JwtAuth;
    pub use crate::server::Server;
    pub use crate::service_builder::{HexaframeService, ServiceBuilder, VersionedRoutes};
    pub use crate::state::{AppState, AppStateBuilder};
    pub use crate::versioning::{
        ApiVersion, DeprecationInfo, VersionedApiBuilder, VersionedResponse,
        extract_version_from_path, versioned_router,
    };
    pub use crate::responses::{
        Accepted, Conflict, Created, FieldError, NoContent, Success, ValidationError,
    };

    #[cfg(feature = "resilience")]
    pub use crate::middleware::ResilienceConfig;

    #[cfg(feature = "otel-metrics")]
    pub use crate::middleware::{MetricsConfig, metric_labels, metric_names};

    #[cfg(feature = "governor")]
    pub use crate::middleware::{GovernorConfig, GovernorRateLimit, RateLimitExceeded};

    #[cfg(feature = "observability")]
    pub use crate::observability::init_tracing;

    #[cfg(feature = "openapi")]
    pub use crate::openapi::{OpenApiBuilder, RapiDoc, ReDoc, SwaggerUI};

    // Auth module exports
    #[cfg(feature = "auth")]
    pub use crate::auth::{
        AuthConfig, PasswordConfig, TokenGenerationConfig, PasetoGenerationConfig,
        RefreshTokenConfig, PasswordHasher, TokenGenerator, TokenPair, PasetoGenerator,
        ApiKey, ApiKeyGenerator,
    };

    #[cfg(all(feature = "auth", feature = "jwt"))]
    pub use crate::auth::JwtGenerator;

    // Re-export axum Html for non-templated HTML responses
    pub use axum::response::Html;

    // Background task management (user-facing)
    pub use crate::agents::{BackgroundWorker, TaskStatus};

    // Health status types (for checking aggregated health)
    pub use crate::agents::{AggregatedHealthResponse, HealthStatus};

    pub use axum::{
        extract::{Path, Query, State},
        http::{HeaderMap, HeaderValue, StatusCode},
        response::{IntoResponse, Json, Response},
        routing::{delete, get, patch, post, put},
        Extension, Router,
    };

    pub use serde::{Deserialize, Serialize};

    // Re-export tracing macros and types
    pub use tracing::{debug, error, info, instrument, trace, warn, Level, Span};

    // Re-export tokio for async runtime
    pub use tokio;

    // Re-export async-trait for async trait definitions
    pub use async_trait::async_trait;

    // Re-export error handling utilities
    pub use thiserror::Error;
    pub use anyhow::{self, Context as AnyhowContext};

    // Re-export time utilities
    pub use chrono::{DateTime, Duration as ChronoDuration, NaiveDateTime, Utc};

    // Re-export UUID
    pub use uuid::Uuid;

    // Re-export futures utilities
    pub use futures::{future, stream, Future, Stream, StreamExt, TryFutureExt, TryStreamExt};

    // Re-export HTTP types
    pub use http::{Method, Uri};

    // Re-export acton-reactive prelude for actor system
    pub use acton_reactive::prelude::*;
}
