//! OpenTelemetry tracing and observability

#[cfg(feature = "observability")]
use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

#[cfg(feature = "observability")]
static TRACER_PROVIDER: OnceLock<opentelemetry_sdk::trace::SdkTracerProvider> = OnceLock::new();

#[cfg(feature = "observability")]
static METER_PROVIDER: OnceLock<opentelemetry_sdk::metrics::SdkMeterProvider> = OnceLock::new();

/// Returns the globally installed meter, if OTLP export was enabled by
/// [`init_tracing`]. [`crate::middleware::metrics::create_metrics_layer`]
/// treats `None` as "metrics not available" rather than installing a
/// no-op instrument set.
#[cfg(feature = "observability")]
pub fn get_meter() -> Option<opentelemetry::metrics::Meter> {
    METER_PROVIDER.get().map(|p| {
        use opentelemetry::metrics::MeterProvider;
        p.meter("hexaframe-service")
    })
}

/// Initialize tracing. When the `observability` feature is enabled and
/// `otlp.enabled` is set in config, spans are exported to the configured
/// OTLP collector via gRPC alongside the usual JSON log output; otherwise
/// this only installs the JSON subscriber.
#[cfg(feature = "observability")]
pub fn init_tracing(config: &Config) -> Result<()> {
    use opentelemetry::trace::TracerProvider;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::SdkTracerProvider;
    use opentelemetry_sdk::Resource;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json();

    match &config.otlp {
        Some(otlp) if otlp.enabled => {
            let service_name = otlp
                .service_name
                .clone()
                .unwrap_or_else(|| config.service.name.clone());
            let resource = Resource::builder()
                .with_attribute(opentelemetry::KeyValue::new("service.name", service_name))
                .build();

            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(&otlp.endpoint)
                .build()
                .map_err(|e| crate::error::Error::Internal(format!("failed to build OTLP exporter: {e}")))?;

            let provider = SdkTracerProvider::builder()
                .with_resource(resource.clone())
                .with_batch_exporter(exporter)
                .build();
            let tracer = provider.tracer("hexaframe-service");

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .init();

            let _ = TRACER_PROVIDER.set(provider);

            #[cfg(feature = "otel-metrics")]
            {
                use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};

                match opentelemetry_otlp::MetricExporter::builder().with_tonic().with_endpoint(&otlp.endpoint).build() {
                    Ok(metric_exporter) => {
                        let meter_provider = SdkMeterProvider::builder()
                            .with_resource(resource)
                            .with_reader(PeriodicReader::builder(metric_exporter).build())
                            .build();
                        let _ = METER_PROVIDER.set(meter_provider);
                    }
                    Err(e) => tracing::warn!("failed to build OTLP metric exporter: {e}"),
                }
            }
        }
        _ => {
            tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();
        }
    }

    tracing::info!("Tracing initialized for service: {}", config.service.name);

    Ok(())
}

/// Initialize tracing without OpenTelemetry (fallback for builds without the
/// `observability` feature).
#[cfg(not(feature = "observability"))]
pub fn init_tracing(config: &Config) -> Result<()> {
    let log_level = config.service.log_level.clone();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Tracing initialized for service: {}", config.service.name);

    Ok(())
}

/// Shut down the OTLP tracer provider, flushing any buffered spans.
#[cfg(feature = "observability")]
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            tracing::warn!("failed to shut down OpenTelemetry tracer: {e}");
        }
    }
    if let Some(provider) = METER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            tracing::warn!("failed to shut down OpenTelemetry meter provider: {e}");
        }
    }
    tracing::info!("Tracing shutdown complete");
}

/// Shutdown tracing (no-op without the `observability` feature).
#[cfg(not(feature = "observability"))]
pub fn shutdown_tracing() {
    tracing::info!("Tracing shutdown (no-op)");
}
