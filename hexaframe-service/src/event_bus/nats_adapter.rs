//! NATS-backed implementation of [`EventPublisher`]/[`EventConsumer`], built
//! on top of the existing `events::create_client`/`publish_json` helpers.

use async_nats::Client;
use async_trait::async_trait;
use futures::StreamExt;

use crate::config::NatsConfig;
use crate::events;

use super::port::{Event, EventBusError, EventConsumer, EventPublisher};

/// Thin wrapper over an [`async_nats::Client`] implementing the
/// event-bus ports.
#[derive(Clone)]
pub struct NatsEventBus {
    client: Client,
}

impl NatsEventBus {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn connect(config: &NatsConfig) -> Result<Self, EventBusError> {
        let client = events::create_client(config)
            .await
            .map_err(|err| EventBusError::ConnectionUnavailable(err.to_string()))?;
        Ok(Self { client })
    }

    pub async fn subscribe(&self, subject: &str) -> Result<NatsSubscription, EventBusError> {
        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|err| EventBusError::SubscribeFailed(err.to_string()))?;
        Ok(NatsSubscription { inner: subscriber })
    }
}

#[async_trait]
impl EventPublisher for NatsEventBus {
    async fn publish(&self, event: Event) -> Result<(), EventBusError> {
        events::publish_json(&self.client, &event.subject, &event.payload)
            .await
            .map_err(|err| EventBusError::PublishFailed(err.to_string()))
    }
}

/// A live NATS subscription, yielding decoded [`Event`]s.
pub struct NatsSubscription {
    inner: async_nats::Subscriber,
}

#[async_trait]
impl EventConsumer for NatsSubscription {
    async fn recv(&mut self) -> Result<Option<Event>, EventBusError> {
        match self.inner.next().await {
            Some(message) => {
                let payload: serde_json::Value = serde_json::from_slice(&message.payload)
                    .map_err(|err| EventBusError::DecodeFailed(err.to_string()))?;
                Ok(Some(Event::new(message.subject.to_string(), payload)))
            }
            None => Ok(None),
        }
    }
}
