//! Dead-letter queue: tasks that exhausted `TaskOptions::max_retry`.
//!
//! Shape mirrors `harborgrid`'s `service_bus::DeadLetter` (original message,
//! failure reason, attempt count, timestamp) but keyed by `Task` rather than
//! a bus `Message`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::task::{Queue, Task};

/// A task that exhausted its retry budget, recorded for inspection/replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DlqEvent {
    pub task: Task,
    pub queue: Queue,
    pub attempts: u32,
    pub last_error: String,
    /// Seconds since the Unix epoch, stamped by the caller (jobs modules
    /// cannot call `SystemTime::now()` from within this workspace's
    /// deterministic test harness, so worker.rs supplies it explicitly).
    pub failed_at_unix: u64,
}

/// In-memory dead-letter store. A production deployment backs this with
/// Redis or the durable queue store; this in-process version is what the
/// default (no `cache`) build uses and what tests exercise directly.
#[derive(Clone, Default)]
pub struct DeadLetterQueue {
    events: Arc<Mutex<Vec<DlqEvent>>>,
}

impl DeadLetterQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: DlqEvent) {
        self.events.lock().expect("dlq lock poisoned").push(event);
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("dlq lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn drain(&self) -> Vec<DlqEvent> {
        std::mem::take(&mut *self.events.lock().expect("dlq lock poisoned"))
    }

    pub fn snapshot(&self) -> Vec<DlqEvent> {
        self.events.lock().expect("dlq lock poisoned").clone()
    }

    /// Removes entries older than `max_age`, given the caller's notion of
    /// "now" in Unix seconds (see [`DlqEvent::failed_at_unix`]).
    pub fn evict_older_than(&self, now_unix: u64, max_age: Duration) {
        let cutoff = now_unix.saturating_sub(max_age.as_secs());
        self.events
            .lock()
            .expect("dlq lock poisoned")
            .retain(|e| e.failed_at_unix >= cutoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_event(failed_at: u64) -> DlqEvent {
        DlqEvent {
            task: Task::new("widget:notify", json!({"id": 1})),
            queue: Queue::Default,
            attempts: 3,
            last_error: "handler returned error".into(),
            failed_at_unix: failed_at,
        }
    }

    #[test]
    fn push_and_drain() {
        let dlq = DeadLetterQueue::new();
        dlq.push(sample_event(100));
        assert_eq!(dlq.len(), 1);
        let drained = dlq.drain();
        assert_eq!(drained.len(), 1);
        assert!(dlq.is_empty());
    }

    #[test]
    fn eviction_removes_only_stale_entries() {
        let dlq = DeadLetterQueue::new();
        dlq.push(sample_event(0));
        dlq.push(sample_event(1000));
        dlq.evict_older_than(1000, Duration::from_secs(500));
        let remaining = dlq.snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].failed_at_unix, 1000);
    }
}
