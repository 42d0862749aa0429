//! Redis-backed token-bucket rate limiting.
//!
//! Computes `{tokens, last_refill}` atomically in a single `EVAL` round trip,
//! matching the in-memory formula in [`crate::middleware::token_bucket`]
//! exactly so switching stores doesn't change observable behavior. Connection
//! handling mirrors [`crate::middleware::rate_limit`]'s existing Redis pool
//! usage.

use deadpool_redis::{redis::Script, Pool as RedisPool};
use tracing::warn;

use super::token_bucket::{AllowResult, BucketParams, FailurePolicy};

/// Lua script: KEYS[1] = bucket key, ARGV = [rate, capacity, now_ms].
/// Returns {allowed (0/1), retry_after_secs}.
const TOKEN_BUCKET_SCRIPT: &str = r#"
local key = KEYS[1]
local rate = tonumber(ARGV[1])
local capacity = tonumber(ARGV[2])
local now = tonumber(ARGV[3]) / 1000.0

local state = redis.call('HMGET', key, 'tokens', 'last_refill')
local tokens = tonumber(state[1])
local last_refill = tonumber(state[2])

if tokens == nil then
    tokens = capacity
    last_refill = now
end

local elapsed = math.max(now - last_refill, 0)
tokens = math.min(capacity, tokens + elapsed * rate)

local allowed = 0
local retry_after = 0
if tokens >= 1.0 then
    tokens = tokens - 1.0
    allowed = 1
else
    local deficit = 1.0 - tokens
    retry_after = math.ceil(deficit / rate)
    if retry_after < 1 then retry_after = 1 end
end

redis.call('HMSET', key, 'tokens', tostring(tokens), 'last_refill', tostring(now))
redis.call('EXPIRE', key, math.ceil(capacity / rate) + 60)

return {allowed, retry_after}
"#;

#[derive(Clone)]
pub struct RedisTokenBucket {
    pool: RedisPool,
    params: BucketParams,
    key_prefix: String,
    failure_policy: FailurePolicy,
}

impl RedisTokenBucket {
    pub fn new(
        pool: RedisPool,
        params: BucketParams,
        key_prefix: impl Into<String>,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            pool,
            params,
            key_prefix: key_prefix.into(),
            failure_policy,
        }
    }

    /// Evaluate the bucket for `key`. On Redis errors, applies
    /// `failure_policy`: `FailOpen` allows the request and logs a warning;
    /// `FailClosed` denies it.
    pub async fn allow(&self, key: &str) -> AllowResult {
        let redis_key = format!("{}{}", self.key_prefix, key);

        let conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(err) => return self.on_store_error(key, err),
        };

        let now_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64;

        let script = Script::new(TOKEN_BUCKET_SCRIPT);
        let mut conn = conn;
        let result: Result<(i64, i64), _> = script
            .key(&redis_key)
            .arg(self.params.rate)
            .arg(self.params.capacity)
            .arg(now_ms)
            .invoke_async(&mut conn)
            .await;

        match result {
            Ok((allowed, retry_after)) => AllowResult {
                allowed: allowed == 1,
                retry_after_secs: retry_after.max(0) as u64,
            },
            Err(err) => {
                warn!(key = %key, error = %err, "token bucket lua script failed");
                self.fail_open_or_closed()
            }
        }
    }

    fn on_store_error(
        &self,
        key: &str,
        err: deadpool_redis::PoolError,
    ) -> AllowResult {
        warn!(key = %key, error = %err, "redis pool unavailable for rate limiting");
        self.fail_open_or_closed()
    }

    fn fail_open_or_closed(&self) -> AllowResult {
        match self.failure_policy {
            FailurePolicy::FailOpen => AllowResult {
                allowed: true,
                retry_after_secs: 0,
            },
            FailurePolicy::FailClosed => AllowResult {
                allowed: false,
                retry_after_secs: 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lua_script_is_non_empty_and_balanced() {
        assert!(TOKEN_BUCKET_SCRIPT.contains("HMGET"));
        assert!(TOKEN_BUCKET_SCRIPT.contains("EXPIRE"));
    }
}
