//! Scheduler entry point: runs cron-driven jobs that enqueue fixed tasks on
//! a schedule. This demo registers a daily dead-letter sweep; real
//! deployments register jobs the same way before calling `run`. Enqueues
//! through the same NATS-or-embedded broker `api` uses, so a sweep fired
//! here lands on whichever `worker` process is actually consuming tasks.

use std::time::Duration;

use app::bootstrap::build_enqueuer;
use hexaframe_service::config::Config;
use hexaframe_service::jobs::{DeadLetterQueue, ScheduledJob, Scheduler, Task, TaskOptions};

#[tokio::main]
async fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load configuration: {err}");
            std::process::exit(1);
        }
    };
    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("config error: {error}");
        }
        std::process::exit(1);
    }

    if let Err(err) = hexaframe_service::observability::init_tracing(&config) {
        eprintln!("failed to initialize tracing: {err}");
    }

    let enqueuer = build_enqueuer(&config, DeadLetterQueue::new()).await;

    let scheduler = Scheduler::new();
    let job = ScheduledJob::new(
        "dead-letter-sweep",
        "0 0 * * * *",
        Task::new("queue:sweep_dead_letters", serde_json::json!({})),
        TaskOptions::default(),
    )
    .expect("static cron expression is valid");
    scheduler.register(job).await;

    let cancel = scheduler.token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    tracing::info!("scheduler starting");
    scheduler.run(enqueuer, Duration::from_secs(30)).await;
}
