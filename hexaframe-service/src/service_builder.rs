//! Type-safe service builder that enforces API versioning and best practices
//!
//! This module provides a compile-time enforced pattern for building microservices
//! that CANNOT have unversioned routes. The type system makes it impossible to
//! bypass versioning.
//!
//! ## Design Principles
//!
//! 1. **Impossible to bypass versioning**: Only `VersionedRoutes` can be used
//! 2. **Batteries-included**: Health and readiness endpoints are automatic
//! 3. **Type-state pattern**: Compiler enforces configuration order
//! 4. **Opaque types**: Internal Router cannot be accessed directly
//!
//! ## Example
//!
//! ```rust,ignore
//! use hexaframe_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Create versioned routes (ONLY way to create routes)
//!     let routes = VersionedApiBuilder::new()
//!         .with_base_path("/api")
//!         .add_version(ApiVersion::V1, |router| {
//!             router.route("/users", get(list_users))
//!         })
//!         .build_routes();  // Returns VersionedRoutes (not Router!)
//!
//!     // Build service with type-safe builder
//!     // Config loading and tracing initialization happen automatically
//!     let service = ServiceBuilder::new()
//!         .with_routes(routes)  // Only accepts VersionedRoutes
//!         .build();  // Automatically loads config and initializes tracing
//!
//!     // Health and readiness endpoints are automatically included
//!     service.serve().await?;
//!
//!     Ok(())
//! }
//! ```

use crate::config::Config;
use crate::middleware::security_headers::apply_security_headers;
use crate::middleware::{request_id_layer, request_id_propagation_layer, sensitive_headers_layer};
use crate::state::AppState;
use axum::Router;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

#[cfg(feature = "otel-metrics")]
use crate::middleware::metrics::create_metrics_layer;

#[cfg(feature = "rate-limit")]
use crate::middleware::token_bucket::{BucketParams, FailurePolicy, InMemoryTokenBucket, TokenBucketLimiter};

/// Opaque wrapper around versioned routes with batteries-included health/readiness
///
/// This type can ONLY be created by `VersionedApiBuilder::build_routes()`.
/// It cannot be constructed manually, ensuring all routes are versioned.
///
/// Uses an enum to support both stateless routes (Router<()>) and stateful routes (Router<AppState<T>>)
#[derive(Debug)]
pub enum VersionedRoutes<T = ()>
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    /// Routes without state (typical versioned API routes)
    WithoutState(Router<()>),
    /// Routes with AppState (includes health/readiness endpoints)
    WithState(Router<AppState<T>>),
}

impl<T> VersionedRoutes<T>
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    /// Create from a stateless router (crate-private, only accessible to VersionedApiBuilder)
    #[allow(dead_code)]
    pub(crate) fn from_router(router: Router<()>) -> Self {
        Self::WithoutState(router)
    }

    /// Create from a stateful router (crate-private)
    pub(crate) fn from_router_with_state(router: Router<AppState<T>>) -> Self {
        Self::WithState(router)
    }
}

impl<T> Default for VersionedRoutes<T>
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    /// Default routes. Liveness/readiness/metrics now live on the internal
    /// listener (see `HexaframeService::serve`), not on these public,
    /// versioned routes.
    fn default() -> Self {
        Self::WithState(Router::new())
    }
}

/// Builds the internal-only router (`/healthz`, `/readyz`, `/metrics`),
/// served from its own bind address so operational endpoints are never
/// reachable on the public listener.
fn build_internal_router<T>() -> Router<AppState<T>>
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    use axum::routing::get;

    Router::new()
        .route("/healthz", get(crate::health::health::<T>))
        .route("/readyz", get(crate::health::readiness::<T>))
        .route("/metrics", get(crate::health::metrics_text::<T>))
}


/// Simplified service builder with sensible defaults
///
/// Generic parameter `T` allows custom config extensions.
/// Use `ServiceBuilder<()>` (the default) for no custom config.
///
/// All fields are optional with defaults:
/// - config: Uses `Config::default()`
/// - routes: Uses `VersionedRoutes::default()` (health + readiness only)
/// - state: Uses `AppState::default()`
/// - agent_runtime: None (agent-based reactive components disabled by default)
///
/// Health and readiness endpoints are ALWAYS included (automatically added by ServiceBuilder).
pub struct ServiceBuilder<T = ()>
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    config: Option<Config>,
    routes: Option<VersionedRoutes<T>>,
    state: Option<AppState<T>>,
    agent_runtime: Option<acton_reactive::prelude::AgentRuntime>,
}

impl<T> ServiceBuilder<T>
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    /// Create a new service builder with defaults
    pub fn new() -> Self {
        Self {
            config: None,
            routes: None,
            state: None,
            agent_runtime: None,
        }
    }

    /// Set the service configuration (optional, defaults to Config::default())
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Add versioned routes to the service
    ///
    /// **IMPORTANT**: This method ONLY accepts `VersionedRoutes`, which can
    /// only be created by `VersionedApiBuilder::build_routes()`.
    /// This makes it impossible to add unversioned routes.
    ///
    /// If not provided, defaults to VersionedRoutes::default() (empty routes).
    pub fn with_routes(mut self, routes: VersionedRoutes<T>) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Set the application state (optional, defaults to AppState::default())
    pub fn with_state(mut self, state: AppState<T>) -> Self {
        self.state = Some(state);
        self
    }

    /// Initialize the agent runtime (internal use only)
    ///
    /// Returns a mutable reference to the `AgentRuntime` for spawning agents.
    /// Called automatically by `build()` when connection pools are configured.
    #[cfg(any(feature = "database", feature = "cache", feature = "events"))]
    fn init_agent_runtime(&mut self) -> &mut acton_reactive::prelude::AgentRuntime {
        if self.agent_runtime.is_none() {
            tracing::debug!("Initializing acton-reactive agent runtime");
            self.agent_runtime = Some(acton_reactive::prelude::ActonApp::launch());
        }
        self.agent_runtime.as_mut().unwrap()
    }

    /// Get the agent broker handle (internal use only)
    #[cfg(any(feature = "database", feature = "cache", feature = "events"))]
    fn broker(&self) -> Option<acton_reactive::prelude::AgentHandle> {
        self.agent_runtime.as_ref().map(|r| r.broker())
    }

    /// Build the service
    ///
    /// Automatically handles:
    /// - **Config loading**: Calls `Config::load()` if not provided (falls back to `Config::default()` on error)
    /// - **Tracing initialization**: Initializes tracing with the loaded config
    /// - **Pool agent spawning**: Spawns internal agents for database/redis/nats when configured
    /// - **Health endpoints**: Always includes `/health` and `/ready` endpoints
    ///
    /// Uses defaults for any fields not set:
    /// - config: `Config::load()` → `Config::default()` if load fails
    /// - routes: `VersionedRoutes::default()` (health + readiness only)
    /// - state: `AppState::default()` with agent-managed pools
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// // Minimal - everything is automatic
    /// let service = ServiceBuilder::new().build();
    /// // → Loads config, initializes tracing, spawns pool agents, adds health endpoints
    ///
    /// // With custom routes (most common)
    /// let service = ServiceBuilder::new()
    ///     .with_routes(versioned_routes)
    ///     .build();
    /// // → Pool agents automatically manage database/redis/nats connections
    ///
    /// // Override config (e.g., for testing)
    /// let custom_config = Config { /* ... */ };
    /// let service = ServiceBuilder::new()
    ///     .with_config(custom_config)
    ///     .with_routes(routes)
    ///     .build();
    /// // → Uses your config, spawns appropriate pool agents
    /// ```
    pub fn build(mut self) -> HexaframeService<T> {
        // Load config if not provided
        let config = self.config.take().unwrap_or_else(|| {
            Config::load().unwrap_or_else(|e| {
                eprintln!("Warning: Failed to load config: {}, using defaults", e);
                Config::default()
            })
        });

        // Initialize tracing with the loaded config
        if let Err(e) = crate::observability::init_tracing(&config) {
            eprintln!("Warning: Failed to initialize tracing: {}", e);
        }

        // Determine if we need to spawn pool agents
        #[cfg(feature = "database")]
        let needs_db_agent = config.database.is_some();

        #[cfg(feature = "cache")]
        let needs_redis_agent = config.redis.is_some();

        #[cfg(feature = "events")]
        let needs_nats_agent = config.nats.is_some();

        #[cfg(any(feature = "database", feature = "cache", feature = "events"))]
        let needs_agents = {
            #[cfg(feature = "database")]
            let db = needs_db_agent;
            #[cfg(not(feature = "database"))]
            let db = false;

            #[cfg(feature = "cache")]
            let redis = needs_redis_agent;
            #[cfg(not(feature = "cache"))]
            let redis = false;

            #[cfg(feature = "events")]
            let nats = needs_nats_agent;
            #[cfg(not(feature = "events"))]
            let nats = false;

            db || redis || nats
        };

        // Initialize agent runtime and spawn pool agents if needed
        #[cfg(feature = "database")]
        let shared_db_pool: Option<crate::agents::SharedDbPool> = if needs_db_agent {
            Some(std::sync::Arc::new(tokio::sync::RwLock::new(None)))
        } else {
            None
        };

        #[cfg(feature = "cache")]
        let shared_redis_pool: Option<crate::agents::SharedRedisPool> = if needs_redis_agent {
            Some(std::sync::Arc::new(tokio::sync::RwLock::new(None)))
        } else {
            None
        };

        #[cfg(feature = "events")]
        let shared_nats_client: Option<crate::agents::SharedNatsClient> = if needs_nats_agent {
            Some(std::sync::Arc::new(tokio::sync::RwLock::new(None)))
        } else {
            None
        };

        // Agent handles for AppState
        #[cfg(feature = "database")]
        let mut db_agent_handle: Option<acton_reactive::prelude::AgentHandle> = None;
        #[cfg(feature = "cache")]
        let mut redis_agent_handle: Option<acton_reactive::prelude::AgentHandle> = None;
        #[cfg(feature = "events")]
        let mut nats_agent_handle: Option<acton_reactive::prelude::AgentHandle> = None;

        #[cfg(any(feature = "database", feature = "cache", feature = "events"))]
        let broker_handle = if needs_agents {
            // Initialize the agent runtime
            let runtime = self.init_agent_runtime();

            // Use block_in_place to spawn agents (they're async)
            if let Ok(_handle) = tokio::runtime::Handle::try_current() {
                tokio::task::block_in_place(|| {
                    tokio::runtime::Handle::current().block_on(async {
                        // Spawn database pool agent
                        #[cfg(feature = "database")]
                        if let Some(ref db_config) = config.database {
                            match crate::agents::DatabasePoolAgent::spawn(
                                runtime,
                                db_config.clone(),
                                shared_db_pool.clone(),
                            ).await {
                                Ok(handle) => {
                                    tracing::info!("Database pool agent spawned");
                                    db_agent_handle = Some(handle);
                                }
                                Err(e) => {
                                    tracing::warn!("Failed to spawn database pool agent: {}", e);
                                }
                            }
                        }

                        // Spawn Redis pool agent
                        #[cfg(feature = "cache")]
                        if let Some(ref redis_config) = config.redis {
                            match crate::agents::RedisPoolAgent::spawn(
                                runtime,
                                redis_config.clone(),
                                shared_redis_pool.clone(),
                            ).await {
                                Ok(handle) => {
                                    tracing::info!("Redis pool agent spawned");
                                    redis_agent_handle = Some(handle);
                                }
                                Err(e) => {
                                    tracing::warn!("Failed to spawn Redis pool agent: {}", e);
                                }
                            }
                        }

                        // Spawn NATS pool agent
                        #[cfg(feature = "events")]
                        if let Some(ref nats_config) = config.nats {
                            match crate::agents::NatsPoolAgent::spawn(
                                runtime,
                                nats_config.clone(),
                                shared_nats_client.clone(),
                            ).await {
                                Ok(handle) => {
                                    tracing::info!("NATS pool agent spawned");
                                    nats_agent_handle = Some(handle);
                                }
                                Err(e) => {
                                    tracing::warn!("Failed to spawn NATS pool agent: {}", e);
                                }
                            }
                        }
                    });
                });
            }

            self.broker()
        } else {
            None
        };

        #[cfg(not(any(feature = "database", feature = "cache", feature = "events")))]
        let broker_handle: Option<acton_reactive::prelude::AgentHandle> = None;

        let routes = self.routes.unwrap_or_default();

        // Build AppState with agent-managed pools
        let state = if let Some(provided_state) = self.state {
            provided_state
        } else {
            let mut state = AppState::new(config.clone());

            // Set broker handle for event broadcasting
            if let Some(broker) = broker_handle {
                state.set_broker(broker);
            }

            // Set shared pool storage (agents will update these when connected)
            #[cfg(feature = "database")]
            if let Some(pool) = shared_db_pool {
                state.set_db_pool_storage(pool);
            }

            #[cfg(feature = "cache")]
            if let Some(pool) = shared_redis_pool {
                state.set_redis_pool_storage(pool);
            }

            #[cfg(feature = "events")]
            if let Some(client) = shared_nats_client {
                state.set_nats_client_storage(client);
            }

            state
        };

        let internal_app = build_internal_router::<T>().with_state(state.clone());

        // Handle both types of versioned routes
        let app = match routes {
            VersionedRoutes::WithState(router) => router.with_state(state),
            VersionedRoutes::WithoutState(router) => router,
        };

        let mut app = app;

        // Auto-apply JWT middleware if configured. Applied before the
        // general stack below, so the general stack (applied last) ends up
        // outermost and JWT innermost: request hits RequestID/Tracing/.../
        // SecurityHeaders first, then JWT, then the handler.
        if let Ok(jwt_auth) = crate::middleware::jwt::JwtAuth::new(&config.jwt) {
            tracing::debug!("Auto-applying JWT authentication middleware");
            app = app.layer(axum::middleware::from_fn_with_state(
                jwt_auth,
                crate::middleware::jwt::JwtAuth::middleware,
            ));
        } else {
            tracing::warn!("JWT configuration invalid, skipping JWT middleware");
        }

        // Apply the general middleware stack (request id, tracing, metrics,
        // rate limiting, panic recovery, body limit, security headers, plus
        // the ambient CORS/compression/timeout wrappers). Applied last, so
        // it ends up outermost -- it sees the request before Auth does.
        let app = Self::apply_middleware(app, &config);

        let listener_addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.service.port));
        let internal_listener_addr: std::net::SocketAddr = format!(
            "{}:{}",
            config.service.internal_bind_address, config.service.internal_port
        )
        .parse()
        .unwrap_or_else(|_| {
            std::net::SocketAddr::from(([127, 0, 0, 1], config.service.internal_port))
        });

        HexaframeService {
            config,
            listener_addr,
            internal_listener_addr,
            app,
            internal_app,
            agent_runtime: self.agent_runtime,
        }
    }

    /// Apply the general middleware stack.
    ///
    /// Each `.layer()` call wraps everything applied so far, so the layer
    /// added LAST ends up OUTERMOST and sees the request first. To realize
    /// the pipeline
    ///
    ///   request -> RequestID -> Tracing -> Metrics -> RateLimit -> Recovery
    ///           -> BodyLimit -> SecurityHeaders -> (Auth/RBAC, layered by
    ///              the caller around this function's result) -> handler
    ///
    /// this function must call `.layer()` in the REVERSE of that list --
    /// SecurityHeaders first, RequestID last -- with CORS/compression/
    /// timeout (ambient wrappers the pipeline spec doesn't name) added last
    /// of all so they sit outside everything else.
    ///
    /// Logging is folded into Tracing's `on_response`; there is no separate
    /// logging layer.
    fn apply_middleware(app: Router, config: &Config) -> Router {
        let body_limit = config.middleware.body_limit_mb * 1024 * 1024;

        let mut app = app;

        // SecurityHeaders (innermost of this stack - closest to Auth/handler)
        app = apply_security_headers(
            app,
            &config.middleware.security_headers,
            config.service.tls_enabled,
        );

        // Request body size limit - configurable
        app = app.layer(RequestBodyLimitLayer::new(body_limit));

        // Panic recovery
        if config.middleware.catch_panic {
            app = app.layer(CatchPanicLayer::new());
        }

        // Rate limiting - token-bucket, keyed by client IP (runs before Auth,
        // so there's no authenticated subject to key on yet)
        #[cfg(feature = "rate-limit")]
        {
            let rpm = config.rate_limit.per_client_rpm.max(1) as f64;
            let limiter = InMemoryTokenBucket::new(BucketParams::new(rpm / 60.0, rpm));
            let rate_limiter = TokenBucketLimiter::new(
                limiter,
                crate::middleware::token_bucket::ip_key_extractor,
                FailurePolicy::FailOpen,
            );
            app = app.layer(axum::middleware::from_fn_with_state(
                rate_limiter,
                TokenBucketLimiter::middleware,
            ));
        }

        // HTTP metrics (OpenTelemetry)
        #[cfg(feature = "otel-metrics")]
        if let Some(metrics_config) = &config.middleware.metrics {
            if let Some(layer) = create_metrics_layer(metrics_config) {
                app = app.layer(layer);
            }
        }

        // Tracing (HTTP request/response logging) - always enabled
        app = app.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        );

        // Request ID assignment/propagation - based on config. Order within
        // this group matters too: request_id_layer is applied last (so it's
        // outermost of the three) to make sure an ID is assigned before
        // anything downstream, including Tracing, can reference it.
        if config.middleware.request_tracking.mask_sensitive_headers {
            app = app.layer(sensitive_headers_layer());
        }
        if config.middleware.request_tracking.propagate_headers {
            app = app.layer(request_id_propagation_layer());
        }
        if config.middleware.request_tracking.request_id_enabled {
            app = app.layer(request_id_layer());
        }

        // Ambient wrappers, outside the named pipeline stages entirely.
        app = app.layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.service.timeout_secs),
        ));
        if config.middleware.compression {
            app = app.layer(CompressionLayer::new());
        }
        let cors_layer = match config.middleware.cors_mode.as_str() {
            "permissive" => CorsLayer::permissive(),
            "restrictive" => CorsLayer::new(),
            "disabled" => CorsLayer::new(),
            _ => {
                tracing::warn!("Unknown CORS mode: {}, defaulting to permissive", config.middleware.cors_mode);
                CorsLayer::permissive()
            }
        };
        app = app.layer(cors_layer);

        app
    }
}

impl<T> Default for ServiceBuilder<T>
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque service wrapper
///
/// This type wraps the final Router and Config. It cannot be manipulated
/// directly - the only way to use it is to call `serve()`.
///
/// This prevents developers from:
/// - Adding unversioned routes after construction
/// - Bypassing the type-safe builder
/// - Accessing the internal Router
pub struct HexaframeService<T = ()>
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    config: Config,
    listener_addr: std::net::SocketAddr,
    internal_listener_addr: std::net::SocketAddr,
    app: Router,
    internal_app: Router,
    agent_runtime: Option<acton_reactive::prelude::AgentRuntime>,
}

impl<T> HexaframeService<T>
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    /// Serve the application
    ///
    /// Runs the public HTTP server and the internal health/readiness/metrics
    /// server, each on its own listener, with graceful shutdown support.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let service = ServiceBuilder::new()
    ///     .with_config(config)
    ///     .with_routes(routes)
    ///     .with_state(state)
    ///     .build();
    ///
    /// service.serve().await?;
    /// ```
    pub async fn serve(self) -> crate::error::Result<()> {
        use tokio::net::TcpListener;
        use tokio::signal;

        // Graceful shutdown signal
        async fn shutdown_signal() {
            let ctrl_c = async {
                signal::ctrl_c()
                    .await
                    .expect("failed to install Ctrl+C handler");
            };

            #[cfg(unix)]
            let terminate = async {
                signal::unix::signal(signal::unix::SignalKind::terminate())
                    .expect("failed to install signal handler")
                    .recv()
                    .await;
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => {},
                _ = terminate => {},
            }
        }

        // Internal listener (`/healthz`, `/readyz`, `/metrics`) runs on its
        // own bind address, independent of the public listener below, so
        // operational endpoints are never exposed on the public port.
        tracing::info!(
            "Starting internal service (healthz/readyz/metrics) on {}",
            self.internal_listener_addr
        );
        let internal_listener = TcpListener::bind(&self.internal_listener_addr).await?;
        let internal_app = self.internal_app;
        let internal_handle = tokio::spawn(async move {
            axum::serve(internal_listener, internal_app)
                .with_graceful_shutdown(shutdown_signal())
                .await
        });

        tracing::info!("Starting HTTP service on {}", self.listener_addr);

        let listener = TcpListener::bind(&self.listener_addr).await?;

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        let _ = internal_handle.await;

        tracing::info!("Server shutdown complete");

        if let Some(mut runtime) = self.agent_runtime {
            tracing::info!("Shutting down agent runtime...");
            if let Err(e) = runtime.shutdown_all().await {
                tracing::error!("Agent runtime shutdown error: {}", e);
            }
            tracing::info!("Agent runtime shutdown complete");
        }

        Ok(())
    }

    /// Get a reference to the service configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}


#[cfg(test)]
mod tests {
    // This test verifies the type-state pattern at compile time
    #[test]
    fn test_service_builder_states_compile() {
        // This should compile - correct order
        // let _service = ServiceBuilder::new()
        //     .with_config(config)
        //     .with_routes(routes)
        //     .with_state(state)
        //     .build();

        // These should NOT compile (commented out to prevent compilation errors):

        // ❌ Cannot build without config
        // let _service = ServiceBuilder::new()
        //     .build();

        // ❌ Cannot skip routes
        // let _service = ServiceBuilder::new()
        //     .with_config(config)
        //     .with_state(state)
        //     .build();

        // ❌ Cannot call with_routes on wrong state
        // let _service = ServiceBuilder::new()
        //     .with_routes(routes);

        // ❌ Cannot call with_state on wrong state
        // let _service = ServiceBuilder::new()
        //     .with_config(config)
        //     .with_state(state);
    }

    #[test]
    fn test_versioned_routes_cannot_be_constructed_manually() {
        // This should NOT compile (VersionedRoutes has private fields):
        // let routes = VersionedRoutes { router: Router::new() };

        // The ONLY way to create VersionedRoutes is through VersionedApiBuilder
    }
}
