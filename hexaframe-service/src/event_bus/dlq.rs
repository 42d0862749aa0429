//! Dead-letter store for events a consumer failed to process, mirroring
//! `jobs::dlq`'s in-memory shape but keyed by [`Event`] rather than `Task`.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::port::Event;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDlqEntry {
    pub event: Event,
    pub error: String,
    pub failed_at_unix: u64,
}

#[derive(Clone, Default)]
pub struct EventDeadLetterQueue {
    entries: Arc<Mutex<Vec<EventDlqEntry>>>,
}

impl EventDeadLetterQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: EventDlqEntry) {
        self.entries.lock().expect("event dlq lock poisoned").push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("event dlq lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<EventDlqEntry> {
        self.entries.lock().expect("event dlq lock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn push_and_snapshot() {
        let dlq = EventDeadLetterQueue::new();
        dlq.push(EventDlqEntry {
            event: Event::new("widget.created", json!({"id": 1})),
            error: "consumer panicked".into(),
            failed_at_unix: 0,
        });
        assert_eq!(dlq.len(), 1);
        assert_eq!(dlq.snapshot()[0].event.subject, "widget.created");
    }
}
