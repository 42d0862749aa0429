//! Worker: polls the three priority queues (critical before default before
//! low), runs each task through a middleware chain, and retries failures up
//! to `TaskOptions::max_retry` before moving the task to the dead-letter
//! queue.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::dlq::{DeadLetterQueue, DlqEvent};
use super::enqueue::{FireAndForget, QueueSenders};
use super::task::{Task, TaskOptions};

#[derive(thiserror::Error, Debug)]
#[error("task handler failed: {0}")]
pub struct HandlerError(pub String);

/// A registered handler for one task type.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle(&self, task: &Task) -> Result<(), HandlerError>;
}

#[async_trait]
impl<F, Fut> TaskHandler for F
where
    F: Fn(Task) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<(), HandlerError>> + Send,
{
    async fn handle(&self, task: &Task) -> Result<(), HandlerError> {
        (self)(task.clone()).await
    }
}

/// A before/after hook run around every task handler invocation (logging,
/// metrics, tracing span). Hooks run in registration order before the
/// handler and in reverse order after it, the same "onion" semantics as a
/// tower layer stack but expressed as two plain async methods instead of a
/// `next`-continuation, which keeps the chain trivial to compose without a
/// dyn-`Fn` continuation type.
#[async_trait]
pub trait WorkerMiddleware: Send + Sync {
    async fn before(&self, _task: &Task) {}
    async fn after(&self, _task: &Task, _result: &Result<(), HandlerError>) {}
}

/// Ordered list of [`WorkerMiddleware`] applied to every task before it
/// reaches its handler.
#[derive(Default, Clone)]
pub struct WorkerMiddlewareChain {
    layers: Vec<Arc<dyn WorkerMiddleware>>,
}

impl WorkerMiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, middleware: Arc<dyn WorkerMiddleware>) -> Self {
        self.layers.push(middleware);
        self
    }

    async fn run(&self, task: &Task, handler: &dyn TaskHandler) -> Result<(), HandlerError> {
        for layer in &self.layers {
            layer.before(task).await;
        }
        let result = handler.handle(task).await;
        for layer in self.layers.iter().rev() {
            layer.after(task, &result).await;
        }
        result
    }
}

/// Logs the task type and outcome of every run; the teacher-idiom baseline
/// middleware every worker gets by default.
pub struct LoggingMiddleware;

#[async_trait]
impl WorkerMiddleware for LoggingMiddleware {
    async fn after(&self, task: &Task, result: &Result<(), HandlerError>) {
        match result {
            Ok(()) => info!(task_type = %task.task_type, "task completed"),
            Err(err) => warn!(task_type = %task.task_type, error = %err, "task failed"),
        }
    }
}

/// Backs off between retries: `base * 2^attempt`, capped at `max`.
fn backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    let scaled = base.saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX));
    scaled.min(max)
}

pub struct Worker {
    critical_rx: mpsc::Receiver<(Task, TaskOptions)>,
    default_rx: mpsc::Receiver<(Task, TaskOptions)>,
    low_rx: mpsc::Receiver<(Task, TaskOptions)>,
    handlers: HashMap<String, Arc<dyn TaskHandler>>,
    middleware: WorkerMiddlewareChain,
    dlq: DeadLetterQueue,
    cancel: CancellationToken,
}

/// Channel capacity for each priority queue's backlog.
pub const QUEUE_CAPACITY: usize = 1024;

impl Worker {
    /// Builds a worker alongside the [`FireAndForget`] enqueuer that feeds
    /// it — the two are always constructed together since they share the
    /// channel endpoints.
    pub fn with_enqueuer(
        dlq: DeadLetterQueue,
        cancel: CancellationToken,
    ) -> (Self, FireAndForget) {
        let (ctx, crx) = mpsc::channel(QUEUE_CAPACITY);
        let (dtx, drx) = mpsc::channel(QUEUE_CAPACITY);
        let (ltx, lrx) = mpsc::channel(QUEUE_CAPACITY);
        let enqueuer = FireAndForget::new(QueueSenders {
            critical: ctx,
            default: dtx,
            low: ltx,
        });
        let worker = Self {
            critical_rx: crx,
            default_rx: drx,
            low_rx: lrx,
            handlers: HashMap::new(),
            middleware: WorkerMiddlewareChain::new().push(Arc::new(LoggingMiddleware)),
            dlq,
            cancel,
        };
        (worker, enqueuer)
    }

    pub fn register_handler(&mut self, task_type: impl Into<String>, handler: Arc<dyn TaskHandler>) {
        self.handlers.insert(task_type.into(), handler);
    }

    pub fn with_middleware(mut self, chain: WorkerMiddlewareChain) -> Self {
        self.middleware = chain;
        self
    }

    /// Polls critical, then default, then low — never starving critical
    /// work, but a sustained critical backlog can still delay low-priority
    /// tasks, which is the accepted tradeoff of strict priority ordering.
    async fn next_task(&mut self) -> Option<(Task, TaskOptions)> {
        if let Ok(item) = self.critical_rx.try_recv() {
            return Some(item);
        }
        if let Ok(item) = self.default_rx.try_recv() {
            return Some(item);
        }
        if let Ok(item) = self.low_rx.try_recv() {
            return Some(item);
        }
        tokio::select! {
            Some(item) = self.critical_rx.recv() => Some(item),
            Some(item) = self.default_rx.recv() => Some(item),
            Some(item) = self.low_rx.recv() => Some(item),
            else => None,
        }
    }

    pub async fn run(&mut self) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("worker shutting down");
                    return;
                }
                next = self.next_task() => {
                    match next {
                        Some((task, options)) => self.process(task, options).await,
                        None => {
                            info!("all job queues closed, worker exiting");
                            return;
                        }
                    }
                }
            }
        }
    }

    async fn process(&self, task: Task, options: TaskOptions) {
        let Some(handler) = self.handlers.get(&task.task_type).cloned() else {
            error!(task_type = %task.task_type, "no handler registered for task type");
            return;
        };

        let mut attempt = 0;
        loop {
            let result = tokio::time::timeout(options.timeout, self.middleware.run(&task, handler.as_ref())).await;
            let outcome = match result {
                Ok(inner) => inner,
                Err(_) => Err(HandlerError(format!("timed out after {:?}", options.timeout))),
            };

            match outcome {
                Ok(()) => return,
                Err(err) if attempt < options.max_retry => {
                    attempt += 1;
                    let delay = backoff(attempt, Duration::from_millis(200), Duration::from_secs(30));
                    warn!(task_type = %task.task_type, attempt, error = %err, "retrying task after backoff");
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    error!(task_type = %task.task_type, attempts = attempt + 1, error = %err, "task exhausted retries, sending to dlq");
                    self.dlq.push(DlqEvent {
                        task: task.clone(),
                        queue: options.queue,
                        attempts: attempt + 1,
                        last_error: err.0,
                        failed_at_unix: unix_now(),
                    });
                    return;
                }
            }
        }
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::enqueue::Enqueuer;
    use serde_json::json;

    #[tokio::test]
    async fn successful_task_never_reaches_dlq() {
        let dlq = DeadLetterQueue::new();
        let (mut worker, enqueuer) = Worker::with_enqueuer(dlq.clone(), CancellationToken::new());
        worker.register_handler(
            "widget:notify",
            Arc::new(|_task: Task| async move { Ok(()) }),
        );
        enqueuer
            .enqueue(Task::new("widget:notify", json!({})), TaskOptions::default())
            .await
            .unwrap();
        let cancel = worker.cancel.clone();
        let handle = tokio::spawn(async move { worker.run().await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
        handle.await.unwrap();
        assert!(dlq.is_empty());
    }

    #[tokio::test]
    async fn task_exhausting_retries_lands_in_dlq() {
        let dlq = DeadLetterQueue::new();
        let (mut worker, enqueuer) = Worker::with_enqueuer(dlq.clone(), CancellationToken::new());
        worker.register_handler(
            "widget:notify",
            Arc::new(|_task: Task| async move { Err(HandlerError("boom".into())) }),
        );
        enqueuer
            .enqueue(
                Task::new("widget:notify", json!({})),
                TaskOptions {
                    max_retry: 1,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let cancel = worker.cancel.clone();
        let handle = tokio::spawn(async move { worker.run().await });
        tokio::time::sleep(Duration::from_millis(500)).await;
        cancel.cancel();
        handle.await.unwrap();
        assert_eq!(dlq.len(), 1);
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let base = Duration::from_millis(200);
        let max = Duration::from_secs(1);
        assert_eq!(backoff(0, base, max), Duration::from_millis(200));
        assert_eq!(backoff(1, base, max), Duration::from_millis(400));
        assert_eq!(backoff(10, base, max), max);
    }
}
