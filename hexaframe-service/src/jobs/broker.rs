//! Bridges the in-process job queue to NATS.
//!
//! `enqueue.rs`'s `FireAndForget` and `worker.rs`'s `Worker` share nothing
//! but a pair of mpsc channels -- fine when `api`/`worker` run as one
//! process, but the two are meant to run as independent binaries (see
//! `jobs/mod.rs`'s module doc), which share no memory at all. This module
//! gives `Enqueuer`/`Worker` a real cross-process transport by reusing the
//! existing `event_bus` NATS plumbing: `NatsEnqueuer` publishes tasks
//! instead of sending them on a local channel, and `bridge_nats_to_worker`
//! subscribes on a worker process and feeds what it receives into that
//! process's own local `FireAndForget`, so priority queueing, retry
//! backoff, and dead-lettering all keep working exactly as before.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::event_bus::{Event, EventBusError, EventConsumer, EventPublisher, NatsEventBus};

use super::enqueue::{EnqueueError, Enqueuer};
use super::task::{Queue, Task, TaskOptions};

/// Subject every `jobs` producer publishes to and every worker subscribes
/// to. Queue priority travels inside the payload's `queue` field, not the
/// subject, since all three priority queues share one worker process.
pub const JOBS_SUBJECT: &str = "jobs.tasks";

/// Wire form of [`TaskOptions`]. Durations cross as millisecond counts
/// rather than deriving `Serialize`/`Deserialize` on `TaskOptions` itself,
/// the same way `config.rs` keeps `Duration` off its wire structs in
/// favor of a raw integer field plus an `as_duration`-style accessor.
#[derive(Debug, Serialize, Deserialize)]
struct WireTaskOptions {
    queue: Queue,
    max_retry: u32,
    unique_window_ms: Option<u64>,
    unique_key: Option<String>,
    timeout_ms: u64,
}

impl From<&TaskOptions> for WireTaskOptions {
    fn from(options: &TaskOptions) -> Self {
        Self {
            queue: options.queue,
            max_retry: options.max_retry,
            unique_window_ms: options.unique_window.map(|d| d.as_millis() as u64),
            unique_key: options.unique_key.clone(),
            timeout_ms: options.timeout.as_millis() as u64,
        }
    }
}

impl From<WireTaskOptions> for TaskOptions {
    fn from(wire: WireTaskOptions) -> Self {
        Self {
            queue: wire.queue,
            max_retry: wire.max_retry,
            unique_window: wire.unique_window_ms.map(Duration::from_millis),
            unique_key: wire.unique_key,
            timeout: Duration::from_millis(wire.timeout_ms),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct QueuedTask {
    task: Task,
    options: WireTaskOptions,
}

/// `Enqueuer` that publishes to NATS instead of an in-process channel, so
/// any worker process subscribed to [`JOBS_SUBJECT`] can pick the task up
/// -- not just a `Worker` sharing this binary's memory.
pub struct NatsEnqueuer<P> {
    bus: P,
}

impl<P> NatsEnqueuer<P>
where
    P: EventPublisher,
{
    pub fn new(bus: P) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl<P> Enqueuer for NatsEnqueuer<P>
where
    P: EventPublisher,
{
    async fn enqueue(&self, task: Task, options: TaskOptions) -> Result<(), EnqueueError> {
        let queued = QueuedTask {
            task,
            options: WireTaskOptions::from(&options),
        };
        let payload = serde_json::to_value(&queued).expect("QueuedTask is always representable as JSON");
        self.bus.publish(Event::new(JOBS_SUBJECT, payload)).await.map_err(|err| {
            warn!(error = %err, "failed to publish task to NATS, dropping");
            EnqueueError::Closed
        })
    }
}

/// Runs on a worker process: subscribes to [`JOBS_SUBJECT`] and forwards
/// every decoded task into `local`, the worker's own in-process
/// `FireAndForget` enqueuer, so `Worker::run`'s priority-queue/retry/DLQ
/// machinery processes it exactly as if it had been enqueued directly.
///
/// Runs until the subscription closes (e.g. the NATS connection drops);
/// callers spawn this alongside `Worker::run` and let both terminate
/// together on shutdown.
pub async fn bridge_nats_to_worker(bus: &NatsEventBus, local: Arc<dyn Enqueuer>) -> Result<(), EventBusError> {
    let mut subscription = bus.subscribe(JOBS_SUBJECT).await?;
    loop {
        let Some(event) = subscription.recv().await? else {
            return Ok(());
        };
        match serde_json::from_value::<QueuedTask>(event.payload) {
            Ok(queued) => {
                if let Err(err) = local.enqueue(queued.task, queued.options.into()).await {
                    error!(error = %err, "failed to hand bridged task to local worker queue");
                }
            }
            Err(err) => error!(error = %err, "failed to decode queued task received from NATS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct RecordingPublisher {
        published: Arc<Mutex<Vec<Event>>>,
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, event: Event) -> Result<(), EventBusError> {
            self.published.lock().unwrap().push(event);
            Ok(())
        }
    }

    #[tokio::test]
    async fn nats_enqueuer_publishes_the_queued_task() {
        let publisher = RecordingPublisher::default();
        let enqueuer = NatsEnqueuer::new(publisher.clone());
        enqueuer
            .enqueue(
                Task::new("widget:notify", json!({"id": 1})),
                TaskOptions {
                    queue: Queue::Critical,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].subject, JOBS_SUBJECT);
        let queued: QueuedTask = serde_json::from_value(published[0].payload.clone()).unwrap();
        assert_eq!(queued.task.task_type, "widget:notify");
        assert!(matches!(queued.options.queue, Queue::Critical));
    }

    #[tokio::test]
    async fn wire_task_options_round_trips_durations_as_millis() {
        let options = TaskOptions {
            queue: Queue::Low,
            max_retry: 5,
            unique_window: Some(Duration::from_secs(60)),
            unique_key: Some("k1".into()),
            timeout: Duration::from_millis(1500),
        };
        let wire = WireTaskOptions::from(&options);
        let restored: TaskOptions = wire.into();
        assert_eq!(restored.max_retry, 5);
        assert_eq!(restored.unique_window, Some(Duration::from_secs(60)));
        assert_eq!(restored.unique_key, Some("k1".to_string()));
        assert_eq!(restored.timeout, Duration::from_millis(1500));
    }
}
