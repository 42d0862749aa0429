//! Worker entry point: drains the critical/default/low priority queues and
//! runs registered task handlers, moving exhausted tasks to the dead-letter
//! queue. Run alongside `api` and `scheduler` as a separate process so a
//! worker crash never takes the HTTP surface down with it.
//!
//! When NATS is configured, tasks enqueued by any `api` process arrive here
//! over `jobs::bridge_nats_to_worker` rather than a local channel -- `api`
//! and `worker` share no memory once they're separate processes, so NATS is
//! what actually connects the two queues described in `jobs/mod.rs`.

use std::sync::Arc;

use hexaframe_service::config::Config;
use hexaframe_service::event_bus::NatsEventBus;
use hexaframe_service::jobs::{bridge_nats_to_worker, DeadLetterQueue, HandlerError, Task, Worker};
use tokio_util::sync::CancellationToken;

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

    let dlq = DeadLetterQueue::new();
    let cancel = CancellationToken::new();
    let (mut worker, enqueuer) = Worker::with_enqueuer(dlq, cancel.clone());

    worker.register_handler(
        "widget:notify",
        Arc::new(|task: Task| async move {
            tracing::info!(payload = %task.payload, "widget notification delivered");
            Ok::<(), HandlerError>(())
        }),
    );

    if let Some(nats_config) = &config.nats {
        match NatsEventBus::connect(nats_config).await {
            Ok(bus) => {
                let local = Arc::new(enqueuer);
                tokio::spawn(async move {
                    if let Err(err) = bridge_nats_to_worker(&bus, local).await {
                        tracing::error!(error = %err, "NATS job bridge stopped");
                    }
                });
                tracing::info!("subscribed to jobs over NATS");
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to connect to NATS, this worker will only see locally enqueued tasks");
            }
        }
    } else {
        tracing::warn!("no NATS configuration, this worker will only see locally enqueued tasks");
    }

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    tracing::info!("worker starting");
    worker.run().await;
}
