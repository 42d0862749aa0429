//! Enqueue-side API: the `Enqueuer` port and its in-process implementation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::task::{Queue, Task, TaskOptions};

/// Result of a fire-and-forget enqueue attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanoutResult {
    Enqueued,
    /// The queue's backlog rejected the task (e.g. channel closed or full
    /// past the enqueue deadline); the caller decides whether to retry.
    Rejected(String),
}

#[derive(thiserror::Error, Debug)]
pub enum EnqueueError {
    #[error("queue channel closed")]
    Closed,
    #[error("enqueue timed out after {0:?}")]
    TimedOut(Duration),
}

/// Port for submitting work. Applications depend on this trait, not on the
/// concrete worker transport, so tests can swap in a recording fake.
#[async_trait]
pub trait Enqueuer: Send + Sync {
    async fn enqueue(&self, task: Task, options: TaskOptions) -> Result<(), EnqueueError>;
}

/// Default enqueue timeout: a task submission that can't land on its queue
/// within 5s surfaces as a caller-visible error rather than blocking the
/// request thread indefinitely.
pub const ENQUEUE_TIMEOUT: Duration = Duration::from_secs(5);

/// In-process, in-memory job submission backed by one bounded mpsc channel
/// per [`Queue`]. `worker.rs` holds the matching receivers.
#[derive(Clone)]
pub struct FireAndForget {
    senders: Arc<QueueSenders>,
    enqueue_timeout: Duration,
    /// `unique_key` -> enqueue time, for `TaskOptions::unique_window` dedup.
    seen: Arc<DashMap<String, Instant>>,
}

pub(super) struct QueueSenders {
    pub critical: mpsc::Sender<(Task, TaskOptions)>,
    pub default: mpsc::Sender<(Task, TaskOptions)>,
    pub low: mpsc::Sender<(Task, TaskOptions)>,
}

impl FireAndForget {
    pub(super) fn new(senders: QueueSenders) -> Self {
        Self {
            senders: Arc::new(senders),
            enqueue_timeout: ENQUEUE_TIMEOUT,
            seen: Arc::new(DashMap::new()),
        }
    }

    /// Returns `true` (and records the key) if `key` has not been seen
    /// within `window`; returns `false` if a prior enqueue with the same
    /// key is still inside its dedup window.
    fn check_and_record_unique(&self, key: &str, window: Duration) -> bool {
        let now = Instant::now();
        if let Some(seen_at) = self.seen.get(key).map(|entry| *entry) {
            if now.duration_since(seen_at) < window {
                return false;
            }
        }
        self.seen.insert(key.to_string(), now);
        true
    }

    pub fn with_enqueue_timeout(mut self, timeout: Duration) -> Self {
        self.enqueue_timeout = timeout;
        self
    }

    fn sender_for(&self, queue: Queue) -> &mpsc::Sender<(Task, TaskOptions)> {
        match queue {
            Queue::Critical => &self.senders.critical,
            Queue::Default => &self.senders.default,
            Queue::Low => &self.senders.low,
        }
    }
}

#[async_trait]
impl Enqueuer for FireAndForget {
    async fn enqueue(&self, task: Task, options: TaskOptions) -> Result<(), EnqueueError> {
        if let (Some(key), Some(window)) = (&options.unique_key, options.unique_window) {
            if !self.check_and_record_unique(key, window) {
                debug!(task_type = %task.task_type, unique_key = %key, "duplicate task skipped");
                return Ok(());
            }
        }
        let sender = self.sender_for(options.queue).clone();
        match tokio::time::timeout(self.enqueue_timeout, sender.send((task, options))).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => {
                warn!("job queue channel closed, task dropped");
                Err(EnqueueError::Closed)
            }
            Err(_) => Err(EnqueueError::TimedOut(self.enqueue_timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn channel_pair(capacity: usize) -> (QueueSenders, [mpsc::Receiver<(Task, TaskOptions)>; 3]) {
        let (ctx, crx) = mpsc::channel(capacity);
        let (dtx, drx) = mpsc::channel(capacity);
        let (ltx, lrx) = mpsc::channel(capacity);
        (
            QueueSenders {
                critical: ctx,
                default: dtx,
                low: ltx,
            },
            [crx, drx, lrx],
        )
    }

    #[tokio::test]
    async fn enqueue_routes_to_the_requested_queue() {
        let (senders, mut recvs) = channel_pair(4);
        let enqueuer = FireAndForget::new(senders);
        let options = TaskOptions {
            queue: Queue::Critical,
            ..Default::default()
        };
        enqueuer
            .enqueue(Task::new("widget:notify", json!({})), options)
            .await
            .unwrap();
        let (task, _) = recvs[0].recv().await.unwrap();
        assert_eq!(task.task_type, "widget:notify");
    }

    #[tokio::test]
    async fn enqueue_fails_when_channel_is_closed() {
        let (senders, recvs) = channel_pair(1);
        drop(recvs);
        let enqueuer = FireAndForget::new(senders);
        let err = enqueuer
            .enqueue(Task::new("widget:notify", json!({})), TaskOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EnqueueError::Closed));
    }

    #[tokio::test]
    async fn duplicate_unique_key_within_window_is_skipped() {
        let (senders, mut recvs) = channel_pair(4);
        let enqueuer = FireAndForget::new(senders);
        let options = TaskOptions {
            unique_key: Some("k1".to_string()),
            unique_window: Some(Duration::from_secs(60)),
            ..Default::default()
        };
        enqueuer
            .enqueue(Task::new("widget:notify", json!({"k": 1})), options.clone())
            .await
            .unwrap();
        enqueuer
            .enqueue(Task::new("widget:notify", json!({"k": 1})), options)
            .await
            .unwrap();
        let (_, _) = recvs[1].recv().await.unwrap();
        assert!(recvs[1].try_recv().is_err(), "second enqueue must not reach the queue");
    }

    #[tokio::test]
    async fn distinct_unique_keys_both_enqueue() {
        let (senders, mut recvs) = channel_pair(4);
        let enqueuer = FireAndForget::new(senders);
        let window = Some(Duration::from_secs(60));
        enqueuer
            .enqueue(
                Task::new("widget:notify", json!({})),
                TaskOptions { unique_key: Some("a".into()), unique_window: window, ..Default::default() },
            )
            .await
            .unwrap();
        enqueuer
            .enqueue(
                Task::new("widget:notify", json!({})),
                TaskOptions { unique_key: Some("b".into()), unique_window: window, ..Default::default() },
            )
            .await
            .unwrap();
        recvs[1].recv().await.unwrap();
        recvs[1].recv().await.unwrap();
    }
}
