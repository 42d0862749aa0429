//! Ports for publishing and consuming domain events, independent of the
//! wire transport. The application layer depends on these traits; only
//! `nats_adapter.rs` knows about NATS.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A published event: a subject (NATS-style dot-separated topic, e.g.
/// `"widget.created"`) and a JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub subject: String,
    pub payload: serde_json::Value,
}

impl Event {
    pub fn new(subject: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            subject: subject.into(),
            payload,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum EventBusError {
    #[error("event bus connection unavailable: {0}")]
    ConnectionUnavailable(String),
    #[error("failed to publish event: {0}")]
    PublishFailed(String),
    #[error("failed to subscribe: {0}")]
    SubscribeFailed(String),
    #[error("failed to decode event payload: {0}")]
    DecodeFailed(String),
}

/// Publishes events. Handlers depend on this trait so they can be tested
/// against an in-memory fake instead of a live NATS server.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: Event) -> Result<(), EventBusError>;
}

/// Consumes events from a single subscription. Each call to `recv` yields
/// the next event, or `Ok(None)` once the subscription is closed.
#[async_trait]
pub trait EventConsumer: Send {
    async fn recv(&mut self) -> Result<Option<Event>, EventBusError>;
}
