//! Audit trail: every admin mutation and every widget write emits one
//! `AuditEvent`. The port is `async_trait`-based (unlike `Repository`) so it
//! can be shared as `Arc<dyn AuditLog>` across use cases, admin handlers, and
//! the unit-of-work closures that call it alongside a repository write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::RwLock;
use uuid::Uuid;

/// `{ID, EventType ("entity.action"), ActorID?, EntityType, EntityID,
/// Payload, Timestamp, RequestID}`. `payload` is assumed pre-redacted by the
/// caller -- this type carries it, it doesn't scrub it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    pub event_type: String,
    pub actor_id: Option<String>,
    pub entity_type: String,
    pub entity_id: String,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
}

impl AuditEvent {
    pub fn new(
        event_type: impl Into<String>,
        actor_id: Option<String>,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        payload: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            event_type: event_type.into(),
            actor_id,
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            payload,
            timestamp: Utc::now(),
            request_id: request_id.into(),
        }
    }
}

#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, event: AuditEvent);
    async fn recent(&self, limit: usize) -> Vec<AuditEvent>;
}

/// In-memory append log, newest-first on read. Sufficient for the one
/// illustrative service this repo ships; a durable adapter would append to
/// the same table the owning use case's `UnitOfWork` commits against.
#[derive(Default)]
pub struct InMemoryAuditLog {
    events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn record(&self, event: AuditEvent) {
        self.events.write().unwrap().push(event);
    }

    async fn recent(&self, limit: usize) -> Vec<AuditEvent> {
        let events = self.events.read().unwrap();
        events.iter().rev().take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn recent_returns_newest_first() {
        let log = InMemoryAuditLog::new();
        log.record(AuditEvent::new(
            "widget.created",
            Some("user:1".into()),
            "widget",
            "w1",
            json!({}),
            "req-1",
        ))
        .await;
        log.record(AuditEvent::new(
            "widget.deleted",
            Some("user:1".into()),
            "widget",
            "w1",
            json!({}),
            "req-2",
        ))
        .await;

        let recent = log.recent(10).await;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].event_type, "widget.deleted");
        assert_eq!(recent[1].event_type, "widget.created");
    }

    #[tokio::test]
    async fn recent_respects_limit() {
        let log = InMemoryAuditLog::new();
        for i in 0..5 {
            log.record(AuditEvent::new(
                "widget.created",
                None,
                "widget",
                format!("w{i}"),
                json!({}),
                "req",
            ))
            .await;
        }
        assert_eq!(log.recent(2).await.len(), 2);
    }
}
