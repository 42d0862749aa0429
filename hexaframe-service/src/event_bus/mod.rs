//! Event publish/subscribe ports atop the existing NATS client plumbing in
//! `events.rs`, plus an in-memory dead-letter queue for events a consumer
//! failed to process.

mod dlq;
mod nats_adapter;
mod port;

pub use dlq::{EventDeadLetterQueue, EventDlqEntry};
pub use nats_adapter::{NatsEventBus, NatsSubscription};
pub use port::{Event, EventBusError, EventConsumer, EventPublisher};
