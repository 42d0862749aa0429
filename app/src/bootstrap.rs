//! Shared process wiring for the `api`, `worker`, and `scheduler` binaries.
//! Kept out of `domain`/`app`/`infra`/`transport` deliberately: it reaches
//! into framework config and the NATS-backed broker, which none of the
//! hexagonal layers are allowed to depend on directly.

use std::sync::Arc;

use hexaframe_service::config::Config;
use hexaframe_service::event_bus::NatsEventBus;
use hexaframe_service::jobs::{DeadLetterQueue, Enqueuer, HandlerError, NatsEnqueuer, Task, Worker};
use tokio_util::sync::CancellationToken;

/// Builds the `Enqueuer` every producer binary (`api`, `scheduler`) hands its
/// callers. Publishes to NATS when configured, so any `worker` process can
/// pick the task up; otherwise falls back to an embedded worker running
/// inside this same process, so the binary still works standalone.
pub async fn build_enqueuer(config: &Config, dlq: DeadLetterQueue) -> Arc<dyn Enqueuer> {
    if let Some(nats_config) = &config.nats {
        match NatsEventBus::connect(nats_config).await {
            Ok(bus) => {
                tracing::info!("publishing jobs to NATS, worker processing happens out-of-process");
                return Arc::new(NatsEnqueuer::new(bus));
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to connect to NATS, falling back to embedded worker");
            }
        }
    }

    let (mut worker, enqueuer) = Worker::with_enqueuer(dlq, CancellationToken::new());
    worker.register_handler(
        "widget:notify",
        Arc::new(|task: Task| async move {
            tracing::info!(payload = %task.payload, "widget notification delivered");
            Ok::<(), HandlerError>(())
        }),
    );
    tokio::spawn(async move { worker.run().await });
    Arc::new(enqueuer)
}
