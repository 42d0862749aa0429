//! Task registry: typed task definitions keyed by stable `noun:verb` strings.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The three named priority queues the worker server polls, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Queue {
    Critical,
    Default,
    Low,
}

impl Queue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Queue::Critical => "critical",
            Queue::Default => "default",
            Queue::Low => "low",
        }
    }
}

impl Default for Queue {
    fn default() -> Self {
        Queue::Default
    }
}

/// Per-enqueue options, defaulted by the task's registration and
/// overridable at enqueue time.
#[derive(Debug, Clone)]
pub struct TaskOptions {
    pub queue: Queue,
    pub max_retry: u32,
    /// Window during which a task with the same `unique_key` is
    /// deduplicated at enqueue time (orthogonal to handler-side
    /// idempotency). Has no effect unless `unique_key` is also set.
    pub unique_window: Option<Duration>,
    /// The key `FireAndForget::enqueue` dedups on, extracted by the caller
    /// from the task payload (e.g. an external event id).
    pub unique_key: Option<String>,
    pub timeout: Duration,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            queue: Queue::Default,
            max_retry: 3,
            unique_window: None,
            unique_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// A unit of work to be processed by a worker. `task_type` is a stable,
/// namespaced identifier (`"widget:notify"`) registered at startup;
/// `payload` is opaque JSON the handler deserializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_type: String,
    pub payload: serde_json::Value,
}

impl Task {
    pub fn new(task_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            task_type: task_type.into(),
            payload,
        }
    }
}

/// Registers task types and their default options at startup. Task type
/// strings are the stable identifier contract between enqueuer and worker.
#[derive(Default, Clone)]
pub struct TaskRegistry {
    defaults: HashMap<String, TaskOptions>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, task_type: impl Into<String>, options: TaskOptions) -> &mut Self {
        self.defaults.insert(task_type.into(), options);
        self
    }

    pub fn is_registered(&self, task_type: &str) -> bool {
        self.defaults.contains_key(task_type)
    }

    pub fn default_options(&self, task_type: &str) -> Option<&TaskOptions> {
        self.defaults.get(task_type)
    }
}
