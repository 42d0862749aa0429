//! Fan-out: enqueue the same task shape to many targets (e.g. one
//! notification task per member of a group) and report how many of the
//! enqueue attempts succeeded.

use std::sync::Arc;

use tracing::warn;

use super::enqueue::{Enqueuer, FanoutResult};
use super::task::{Task, TaskOptions};

/// Enqueues `task_for(target)` for every `target`, continuing past
/// individual failures so one bad enqueue doesn't block the rest of the
/// batch. Returns one [`FanoutResult`] per target, in input order.
pub async fn fan_out<T, F>(
    enqueuer: &dyn Enqueuer,
    targets: Vec<T>,
    options: TaskOptions,
    task_for: F,
) -> Vec<FanoutResult>
where
    F: Fn(&T) -> Task,
{
    let mut results = Vec::with_capacity(targets.len());
    for target in &targets {
        let task = task_for(target);
        match enqueuer.enqueue(task, options.clone()).await {
            Ok(()) => results.push(FanoutResult::Enqueued),
            Err(err) => {
                warn!(error = %err, "fanout enqueue failed for one target");
                results.push(FanoutResult::Rejected(err.to_string()));
            }
        }
    }
    results
}

/// Summary counts for a completed fan-out batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FanoutSummary {
    pub enqueued: usize,
    pub rejected: usize,
}

impl FanoutSummary {
    pub fn from_results(results: &[FanoutResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match result {
                FanoutResult::Enqueued => summary.enqueued += 1,
                FanoutResult::Rejected(_) => summary.rejected += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::enqueue::EnqueueError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEnqueuer {
        calls: AtomicUsize,
        fail_after: usize,
    }

    #[async_trait]
    impl Enqueuer for CountingEnqueuer {
        async fn enqueue(&self, _task: Task, _options: TaskOptions) -> Result<(), EnqueueError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call >= self.fail_after {
                Err(EnqueueError::Closed)
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn fanout_continues_past_individual_failures() {
        let enqueuer = CountingEnqueuer {
            calls: AtomicUsize::new(0),
            fail_after: 2,
        };
        let targets = vec![1, 2, 3, 4];
        let results = fan_out(&enqueuer, targets, TaskOptions::default(), |id| {
            Task::new("widget:notify", json!({ "id": id }))
        })
        .await;
        let summary = FanoutSummary::from_results(&results);
        assert_eq!(summary.enqueued, 2);
        assert_eq!(summary.rejected, 2);
    }
}
