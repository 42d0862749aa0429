//! Token-bucket rate limiting (in-memory store).
//!
//! Implements the exact refill formula from the rate-limiter design:
//! `tokens = min(capacity, tokens + elapsed * rate)`, then one token is
//! consumed if available. State is sharded in a [`DashMap`] keyed by the
//! extracted key string, mirroring [`crate::middleware::governor`]'s
//! sharding approach but with the precise token-bucket math the governor
//! crate's GCRA algorithm does not provide.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use tracing::warn;

use crate::middleware::Claims;

/// One bucket's mutable state.
#[derive(Debug, Clone, Copy)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Parameters shared by every bucket under a given limiter.
#[derive(Debug, Clone, Copy)]
pub struct BucketParams {
    /// Tokens added per second.
    pub rate: f64,
    /// Maximum tokens a bucket can hold.
    pub capacity: f64,
}

impl BucketParams {
    pub fn new(rate: f64, capacity: f64) -> Self {
        Self { rate, capacity }
    }
}

/// How long an idle bucket may sit in memory before the sweeper evicts it.
const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(300);

/// Whether a store failure should let the request through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    FailOpen,
    FailClosed,
}

/// In-memory, sharded token-bucket limiter.
#[derive(Clone)]
pub struct InMemoryTokenBucket {
    buckets: Arc<DashMap<String, BucketState>>,
    params: BucketParams,
    idle_ttl: Duration,
}

/// Outcome of an `allow` check.
pub struct AllowResult {
    pub allowed: bool,
    /// Seconds to wait before the next token is available (ceil'd), used for
    /// the `Retry-After` header when `allowed` is false.
    pub retry_after_secs: u64,
}

impl InMemoryTokenBucket {
    pub fn new(params: BucketParams) -> Self {
        Self {
            buckets: Arc::new(DashMap::new()),
            params,
            idle_ttl: DEFAULT_IDLE_TTL,
        }
    }

    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = ttl;
        self
    }

    /// Refill then attempt to consume one token for `key`.
    pub fn allow(&self, key: &str) -> AllowResult {
        let now = Instant::now();
        let mut entry = self.buckets.entry(key.to_string()).or_insert(BucketState {
            tokens: self.params.capacity,
            last_refill: now,
        });

        let elapsed = now.saturating_duration_since(entry.last_refill).as_secs_f64();
        entry.tokens = (entry.tokens + elapsed * self.params.rate).min(self.params.capacity);
        entry.last_refill = now;

        if entry.tokens >= 1.0 {
            entry.tokens -= 1.0;
            AllowResult {
                allowed: true,
                retry_after_secs: 0,
            }
        } else {
            let deficit = 1.0 - entry.tokens;
            let wait_secs = (deficit / self.params.rate).ceil() as u64;
            AllowResult {
                allowed: false,
                retry_after_secs: wait_secs.max(1),
            }
        }
    }

    /// Evict buckets untouched for longer than `idle_ttl`. Intended to be
    /// driven by a periodic `tokio::time::interval` task started at boot.
    pub fn sweep(&self) {
        let now = Instant::now();
        self.buckets
            .retain(|_, state| now.saturating_duration_since(state.last_refill) < self.idle_ttl);
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

/// Extracts `X-Forwarded-For`'s first IP, else `X-Real-IP`, else the peer
/// address (`ConnectInfo`, if set by the server).
pub fn ip_key_extractor(request: &Request<Body>) -> String {
    if let Some(xff) = request.headers().get("x-forwarded-for") {
        if let Ok(value) = xff.to_str() {
            if let Some(first) = value.split(',').next() {
                return first.trim().to_string();
            }
        }
    }
    if let Some(real_ip) = request.headers().get("x-real-ip") {
        if let Ok(value) = real_ip.to_str() {
            return value.to_string();
        }
    }
    "unknown".to_string()
}

/// Extracts the authenticated actor's subject, falling back to the IP key
/// extractor when no `Claims` extension is present.
pub fn user_id_key_extractor(request: &Request<Body>) -> String {
    if let Some(claims) = request.extensions().get::<Claims>() {
        return claims.sub.clone();
    }
    ip_key_extractor(request)
}

/// Tower/axum middleware wiring the limiter + key extractor + failure policy.
#[derive(Clone)]
pub struct TokenBucketLimiter {
    limiter: InMemoryTokenBucket,
    key_fn: fn(&Request<Body>) -> String,
    failure_policy: FailurePolicy,
}

impl TokenBucketLimiter {
    pub fn new(
        limiter: InMemoryTokenBucket,
        key_fn: fn(&Request<Body>) -> String,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            limiter,
            key_fn,
            failure_policy,
        }
    }

    pub async fn middleware(
        State(limiter): State<Self>,
        request: Request<Body>,
        next: Next,
    ) -> Response {
        let key = (limiter.key_fn)(&request);
        let result = limiter.limiter.allow(&key);

        if result.allowed {
            return next.run(request).await;
        }

        if limiter.failure_policy == FailurePolicy::FailOpen {
            warn!(key = %key, "rate limit store degraded, failing open");
        }

        let mut response = StatusCode::TOO_MANY_REQUESTS.into_response();
        if let Ok(value) = HeaderValue::from_str(&result.retry_after_secs.to_string()) {
            response.headers_mut().insert("retry-after", value);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_capacity_then_blocks() {
        let limiter = InMemoryTokenBucket::new(BucketParams::new(1.0, 2.0));
        assert!(limiter.allow("k").allowed);
        assert!(limiter.allow("k").allowed);
        let blocked = limiter.allow("k");
        assert!(!blocked.allowed);
        assert!(blocked.retry_after_secs >= 1);
    }

    #[test]
    fn refills_over_time() {
        let limiter = InMemoryTokenBucket::new(BucketParams::new(1000.0, 1.0));
        assert!(limiter.allow("k").allowed);
        assert!(!limiter.allow("k").allowed);
        std::thread::sleep(Duration::from_millis(5));
        assert!(limiter.allow("k").allowed);
    }

    #[test]
    fn distinct_keys_have_independent_buckets() {
        let limiter = InMemoryTokenBucket::new(BucketParams::new(1.0, 1.0));
        assert!(limiter.allow("a").allowed);
        assert!(limiter.allow("b").allowed);
    }

    #[test]
    fn sweep_evicts_idle_buckets() {
        let limiter = InMemoryTokenBucket::new(BucketParams::new(1.0, 1.0))
            .with_idle_ttl(Duration::from_millis(1));
        limiter.allow("k");
        std::thread::sleep(Duration::from_millis(5));
        limiter.sweep();
        assert_eq!(limiter.bucket_count(), 0);
    }

    #[test]
    fn bounded_allow_count_within_interval() {
        // Invariant: at most min(N, floor(capacity + rate*T)) allowed over T.
        let rate = 2.0;
        let capacity = 3.0;
        let limiter = InMemoryTokenBucket::new(BucketParams::new(rate, capacity));
        let n = 10;
        let mut allowed = 0;
        for _ in 0..n {
            if limiter.allow("k").allowed {
                allowed += 1;
            }
        }
        // With no elapsed time between calls, only capacity tokens are available.
        assert!(allowed as f64 <= capacity);
    }
}
