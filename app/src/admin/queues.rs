//! Queue introspection and dead-letter management: stats, list, delete,
//! retry. Delete/retry operate on a dead-letter's position in the current
//! snapshot since `DlqEvent` carries no id of its own.

use hexaframe_service::domain::{AppError, DomainError};
use hexaframe_service::jobs::{DlqEvent, InspectorSummary, QueueInspector, QueueStats, Task, TaskOptions};
use serde_json::json;

use super::audit_log::AuditEvent;
use crate::admin::AdminDeps;
use crate::app::ActorContext;

const OP: &str = "queue_admin";

impl AdminDeps {
    pub async fn queue_stats(&self, pending_by_queue: Vec<QueueStats>) -> InspectorSummary {
        QueueInspector::new(self.dlq.clone()).summarize(pending_by_queue)
    }

    pub async fn list_dead_letters(&self) -> Vec<DlqEvent> {
        self.dlq.snapshot()
    }

    pub async fn delete_dead_letter(
        &self,
        index: usize,
        ctx: &ActorContext,
    ) -> Result<DlqEvent, AppError> {
        let mut events = self.dlq.drain();
        if index >= events.len() {
            let remaining = events;
            for event in remaining {
                self.dlq.push(event);
            }
            return Err(not_found(index));
        }
        let removed = events.remove(index);
        for event in events {
            self.dlq.push(event);
        }

        self.audit
            .record(AuditEvent::new(
                "queue.task_deleted",
                ctx.actor_id.clone(),
                "dead_letter",
                removed.task.task_type.clone(),
                json!({"index": index}),
                ctx.request_id.clone(),
            ))
            .await;
        Ok(removed)
    }

    pub async fn retry_dead_letter(
        &self,
        index: usize,
        ctx: &ActorContext,
    ) -> Result<(), AppError> {
        let removed = self.delete_dead_letter(index, ctx).await?;
        let options = TaskOptions {
            queue: removed.queue,
            ..TaskOptions::default()
        };
        self.enqueuer
            .enqueue(Task::new(removed.task.task_type.clone(), removed.task.payload), options)
            .await
            .map_err(|err| {
                AppError::from_domain(DomainError::DependencyFailure(err.to_string()), OP)
            })?;

        self.audit
            .record(AuditEvent::new(
                "queue.task_retried",
                ctx.actor_id.clone(),
                "dead_letter",
                removed.task.task_type,
                json!({"index": index}),
                ctx.request_id.clone(),
            ))
            .await;
        Ok(())
    }
}

fn not_found(index: usize) -> AppError {
    AppError::from_domain(
        DomainError::NotFound {
            entity: "dead_letter".into(),
            id: index.to_string(),
        },
        OP,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexaframe_service::jobs::Queue;
    use serde_json::json as json_macro;

    fn sample_event() -> DlqEvent {
        DlqEvent {
            task: Task::new("widget:notify", json_macro!({"id": 1})),
            queue: Queue::Default,
            attempts: 3,
            last_error: "handler returned error".into(),
            failed_at_unix: 0,
        }
    }

    #[tokio::test]
    async fn stats_reports_dead_letter_count() {
        let deps = AdminDeps::new();
        deps.dlq.push(sample_event());
        let summary = deps.queue_stats(vec![]).await;
        assert_eq!(summary.dead_letters, 1);
    }

    #[tokio::test]
    async fn delete_out_of_range_is_not_found() {
        let deps = AdminDeps::new();
        let ctx = ActorContext::new(Some("admin:1".into()), "req-1");
        let err = deps.delete_dead_letter(0, &ctx).await.unwrap_err();
        assert_eq!(err.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_removes_only_the_targeted_entry() {
        let deps = AdminDeps::new();
        let ctx = ActorContext::new(Some("admin:1".into()), "req-1");
        deps.dlq.push(sample_event());
        deps.dlq.push(sample_event());
        deps.delete_dead_letter(0, &ctx).await.unwrap();
        assert_eq!(deps.dlq.len(), 1);
        assert_eq!(deps.audit.recent(10).await.len(), 1);
    }
}
