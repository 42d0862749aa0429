//! Sequences a use case's repository write and its audit-log emission as one
//! logical step. There is no real transaction here (the in-memory adapters
//! have nothing to roll back), but the port is `async_trait`-based and
//! `Arc<dyn UnitOfWork>`-shaped so a future SQL-backed adapter can wrap a real
//! `sqlx::Transaction` behind the same call shape without touching any use
//! case.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use hexaframe_service::domain::AppError;
use tokio::sync::Mutex;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Run `work` as one unit. Adapters that back a real database wrap
    /// `work` in `BEGIN`/`COMMIT`/`ROLLBACK`; the in-memory adapter only
    /// serializes concurrent callers.
    async fn run(
        &self,
        work: Box<dyn FnOnce() -> BoxFuture<'static, Result<(), AppError>> + Send>,
    ) -> Result<(), AppError>;
}

/// Serializes unit-of-work calls behind a single mutex. Sufficient for the
/// in-memory adapters, which already guard their own state internally -- this
/// exists so use cases can depend on `UnitOfWork` uniformly regardless of
/// which repository/audit-log adapter is behind it.
#[derive(Default)]
pub struct InMemoryUnitOfWork {
    lock: Mutex<()>,
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn run(
        &self,
        work: Box<dyn FnOnce() -> BoxFuture<'static, Result<(), AppError>> + Send>,
    ) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        work().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_executes_the_closure_and_propagates_its_result() {
        let uow = InMemoryUnitOfWork::new();
        let ok = uow
            .run(Box::new(|| Box::pin(async { Ok(()) })))
            .await;
        assert!(ok.is_ok());

        let err = uow
            .run(Box::new(|| {
                Box::pin(async { Err(AppError::new("INTERNAL_ERROR", "boom", "test")) })
            }))
            .await;
        assert!(err.is_err());
    }
}
