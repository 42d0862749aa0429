//! Read-only introspection over queue depth and dead-letter counts, for the
//! admin surface and `/readyz`-adjacent operational tooling.

use serde::{Deserialize, Serialize};

use super::dlq::DeadLetterQueue;
use super::task::Queue;

/// Depth of a single priority queue at the moment of inspection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QueueStats {
    pub queue: Queue,
    pub pending: usize,
}

/// Aggregates queue depth with dead-letter count; constructed from the
/// `tokio::sync::mpsc::Sender` capacity/permit counts the worker module
/// owns, so this type itself holds no channel state.
pub struct QueueInspector {
    dlq: DeadLetterQueue,
}

impl QueueInspector {
    pub fn new(dlq: DeadLetterQueue) -> Self {
        Self { dlq }
    }

    pub fn dead_letter_count(&self) -> usize {
        self.dlq.len()
    }

    pub fn dead_letters(&self) -> Vec<super::dlq::DlqEvent> {
        self.dlq.snapshot()
    }

    /// Combines externally-supplied per-queue pending counts (sampled from
    /// each `mpsc::Sender`'s `capacity()` vs its configured bound) with the
    /// dead-letter count into one summary for the admin endpoint.
    pub fn summarize(&self, pending_by_queue: Vec<QueueStats>) -> InspectorSummary {
        InspectorSummary {
            queues: pending_by_queue,
            dead_letters: self.dead_letter_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectorSummary {
    pub queues: Vec<QueueStats>,
    pub dead_letters: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::dlq::DlqEvent;
    use crate::jobs::task::Task;
    use serde_json::json;

    #[test]
    fn summarize_combines_pending_and_dlq_counts() {
        let dlq = DeadLetterQueue::new();
        dlq.push(DlqEvent {
            task: Task::new("widget:notify", json!({})),
            queue: Queue::Default,
            attempts: 3,
            last_error: "boom".into(),
            failed_at_unix: 0,
        });
        let inspector = QueueInspector::new(dlq);
        let summary = inspector.summarize(vec![QueueStats {
            queue: Queue::Critical,
            pending: 5,
        }]);
        assert_eq!(summary.dead_letters, 1);
        assert_eq!(summary.queues[0].pending, 5);
    }
}
