//! Background job subsystem: task enqueueing, priority-queue worker
//! processing, cron scheduling, dead-lettering, and queue introspection.
//!
//! Grounded on `r2e-scheduler`'s cancellation-token handle pattern for
//! scheduler shutdown and on `service_bus.rs`'s dead-letter/statistics
//! shapes for the DLQ and inspector. `broker.rs` (behind `event-bus`)
//! carries tasks between separate `api`/`worker` processes over NATS;
//! without it `Enqueuer`/`Worker` only ever share an mpsc channel pair
//! within one process.

#[cfg(feature = "event-bus")]
mod broker;
mod dlq;
mod enqueue;
mod fanout;
mod scheduler;
mod task;
mod worker;

pub mod inspector;

#[cfg(feature = "event-bus")]
pub use broker::{bridge_nats_to_worker, NatsEnqueuer, JOBS_SUBJECT};
pub use dlq::{DeadLetterQueue, DlqEvent};
pub use enqueue::{EnqueueError, Enqueuer, FanoutResult, FireAndForget, ENQUEUE_TIMEOUT};
pub use fanout::{fan_out, FanoutSummary};
pub use inspector::{InspectorSummary, QueueInspector, QueueStats};
pub use scheduler::{ScheduledJob, Scheduler};
pub use task::{Queue, Task, TaskOptions, TaskRegistry};
pub use worker::{
    HandlerError, LoggingMiddleware, TaskHandler, Worker, WorkerMiddleware, WorkerMiddlewareChain,
};
