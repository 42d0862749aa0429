//! Middleware modules for authentication, rate limiting, and more

// Token abstraction layer (always available)
pub mod token;

// PASETO authentication (default)
pub mod paseto;

// Token revocation (requires cache feature)
#[cfg(feature = "cache")]
pub mod revocation;

// JWT authentication (requires jwt feature)
#[cfg(feature = "jwt")]
pub mod jwt;

pub mod rate_limit;
pub mod request_tracking;
pub mod route_matcher;

#[cfg(feature = "resilience")]
pub mod resilience;

#[cfg(feature = "otel-metrics")]
pub mod metrics;

#[cfg(feature = "governor")]
pub mod governor;

#[cfg(feature = "rate-limit")]
pub mod token_bucket;

#[cfg(feature = "rate-limit-redis")]
pub mod token_bucket_redis;

pub mod rbac;

pub mod security_headers;

// Token abstraction exports (always available)
pub use token::{Claims, TokenValidator};

#[cfg(feature = "cache")]
pub use token::TokenRevocation;

// PASETO exports (default)
pub use paseto::PasetoAuth;

// Token revocation exports (requires cache)
#[cfg(feature = "cache")]
pub use revocation::RedisTokenRevocation;

// JWT exports (requires jwt feature)
#[cfg(feature = "jwt")]
pub use jwt::JwtAuth;

// Other middleware exports
pub use rate_limit::RateLimit;
pub use route_matcher::{normalize_path, CompiledRoutePatterns};
pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers_layer,
    RequestTrackingConfig, PROPAGATE_HEADERS, SENSITIVE_HEADERS,
};

#[cfg(feature = "resilience")]
pub use resilience::ResilienceConfig;

#[cfg(feature = "otel-metrics")]
pub use metrics::{MetricsConfig, metric_labels, metric_names};

#[cfg(feature = "governor")]
pub use governor::{GovernorConfig, GovernorRateLimit, RateLimitExceeded};

#[cfg(feature = "rate-limit")]
pub use token_bucket::{
    ip_key_extractor, user_id_key_extractor, AllowResult, BucketParams, FailurePolicy,
    InMemoryTokenBucket, TokenBucketLimiter,
};

#[cfg(feature = "rate-limit-redis")]
pub use token_bucket_redis::RedisTokenBucket;

pub use rbac::{require_permission, require_role, RbacError, RequirePermission, RequireRole};

pub use security_headers::{apply_security_headers, SecurityHeadersConfig};
