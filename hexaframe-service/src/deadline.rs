//! Deadline propagation for IO entrypoints (DB, outbound HTTP, Redis).
//!
//! Rust has no ambient cancellation context; the equivalent contract is a
//! `Deadline` value threaded explicitly through repository/publisher calls.
//! [`with_deadline`] never shortens a deadline the caller already set and
//! only applies its default when the caller passed `None`.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::{error::Elapsed, timeout_at};

/// An optional point in time by which an operation must complete.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn at(instant: Instant) -> Self {
        Self(Some(instant))
    }

    pub fn after(duration: Duration) -> Self {
        Self(Some(Instant::now() + duration))
    }

    pub fn instant(&self) -> Option<Instant> {
        self.0
    }
}

/// Default deadlines per spec (§4.4): DB and outbound HTTP default to 30s;
/// Redis's default is configurable by callers, so no constant is provided
/// here — pass it explicitly via `default`.
pub const DEFAULT_DB_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Run `fut` under `deadline`, applying `default` only if `deadline` carries
/// no instant. An already-expired deadline returns `Err` immediately without
/// polling `fut`.
pub async fn with_deadline<F, T>(
    deadline: Deadline,
    default: Duration,
    fut: F,
) -> Result<T, Elapsed>
where
    F: Future<Output = T>,
{
    let at = deadline.instant().unwrap_or_else(|| Instant::now() + default);
    timeout_at(tokio::time::Instant::from_std(at), fut).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn uses_default_when_no_deadline_set() {
        let result = with_deadline(Deadline::none(), Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            42
        })
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn never_shortens_existing_deadline() {
        let generous = Deadline::after(Duration::from_millis(200));
        let result = with_deadline(generous, Duration::from_millis(1), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            "done"
        })
        .await;
        assert_eq!(result.unwrap(), "done");
    }

    #[tokio::test]
    async fn times_out_when_deadline_exceeded() {
        let tight = Deadline::after(Duration::from_millis(5));
        let result = with_deadline(tight, Duration::from_secs(30), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            "too slow"
        })
        .await;
        assert!(result.is_err());
    }
}
