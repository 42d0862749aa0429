//! Cron-driven scheduler: periodically enqueues a fixed [`Task`] for each
//! registered job. Shutdown is cooperative via a [`CancellationToken`],
//! mirroring the scheduler-handle pattern used for background task runtimes
//! elsewhere in this codebase.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use cron::Schedule;
use std::str::FromStr;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::enqueue::Enqueuer;
use super::task::{Task, TaskOptions};

/// A job registered to run on a cron schedule.
#[derive(Clone)]
pub struct ScheduledJob {
    pub name: String,
    pub cron_expr: String,
    pub task: Task,
    pub options: TaskOptions,
}

impl ScheduledJob {
    pub fn new(
        name: impl Into<String>,
        cron_expr: impl Into<String>,
        task: Task,
        options: TaskOptions,
    ) -> Result<Self, cron::error::Error> {
        let cron_expr = cron_expr.into();
        // Validate eagerly so registration fails fast instead of at the
        // next tick.
        Schedule::from_str(&cron_expr)?;
        Ok(Self {
            name: name.into(),
            cron_expr,
            task,
            options,
        })
    }

    fn schedule(&self) -> Schedule {
        Schedule::from_str(&self.cron_expr).expect("validated in ScheduledJob::new")
    }
}

/// Handle to a running scheduler, cloneable so callers (e.g. an admin
/// endpoint) can request cooperative shutdown without owning the loop.
#[derive(Clone)]
pub struct Scheduler {
    cancel: CancellationToken,
    jobs: Arc<Mutex<Vec<ScheduledJob>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            jobs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn register(&self, job: ScheduledJob) {
        self.jobs.lock().await.push(job);
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Returns `{name, schedule}` pairs for an admin-surface listing.
    pub async fn registered_jobs(&self) -> Vec<(String, String)> {
        self.jobs
            .lock()
            .await
            .iter()
            .map(|j| (j.name.clone(), j.cron_expr.clone()))
            .collect()
    }

    /// Runs until cancelled, checking every `poll_interval` whether any
    /// registered job's next scheduled fire time has passed since the last
    /// check, enqueuing it via `enqueuer` when it has.
    pub async fn run(
        &self,
        enqueuer: Arc<dyn Enqueuer>,
        poll_interval: Duration,
    ) {
        let mut last_checked = Utc::now();
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("scheduler shutting down");
                    return;
                }
                _ = tokio::time::sleep(poll_interval) => {}
            }

            let now = Utc::now();
            let jobs = self.jobs.lock().await.clone();
            for job in jobs {
                let mut due = job.schedule().after(&last_checked);
                if let Some(next_fire) = due.next() {
                    if next_fire <= now {
                        debug!(job = %job.name, "scheduled job due, enqueuing");
                        if let Err(err) = enqueuer
                            .enqueue(job.task.clone(), job.options.clone())
                            .await
                        {
                            error!(job = %job.name, error = %err, "failed to enqueue scheduled job");
                        }
                    }
                }
            }
            last_checked = now;
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_invalid_cron_expressions() {
        let result = ScheduledJob::new(
            "bad",
            "not a cron expr",
            Task::new("widget:sweep", json!({})),
            TaskOptions::default(),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn registered_jobs_lists_name_and_schedule() {
        let scheduler = Scheduler::new();
        let job = ScheduledJob::new(
            "sweep-widgets",
            "0 */5 * * * *",
            Task::new("widget:sweep", json!({})),
            TaskOptions::default(),
        )
        .unwrap();
        scheduler.register(job).await;
        let listed = scheduler.registered_jobs().await;
        assert_eq!(listed, vec![("sweep-widgets".to_string(), "0 */5 * * * *".to_string())]);
    }

    #[test]
    fn cancel_is_observable_via_token() {
        let scheduler = Scheduler::new();
        assert!(!scheduler.is_cancelled());
        scheduler.cancel();
        assert!(scheduler.is_cancelled());
        assert!(scheduler.token().is_cancelled());
    }
}
