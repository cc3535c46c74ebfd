// Telemetry module for structured logging and metrics

use crate::config::LogFormat;
use anyhow::Result;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const OPERATIONS_TOTAL: &str = "postboard_operations_total";
pub const QUERY_DURATION_SECONDS: &str = "postboard_query_duration_seconds";

/// Initialize structured logging
///
/// `RUST_LOG` takes precedence over the configured level. JSON output
/// carries the current span and span list so request fields from
/// `#[instrument]` land on every line.
#[tracing::instrument(skip_all)]
pub fn init_logging(log_level: &str, format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {}", e))?;

    let layer = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(false)
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;

    tracing::info!(log_level = log_level, format = ?format, "Structured logging initialized");

    Ok(())
}

/// Install the global Prometheus recorder and return a handle for `/metrics`
#[tracing::instrument(skip_all)]
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;

    describe_counter!(
        OPERATIONS_TOTAL,
        "Entity operations by entity, operation and outcome"
    );
    describe_histogram!(
        QUERY_DURATION_SECONDS,
        "Duration of storage calls in seconds"
    );

    tracing::info!("Prometheus metrics recorder installed");
    Ok(handle)
}

/// A handle backed by a recorder that is not installed globally
///
/// Renders an empty exposition; used where a process-wide recorder must not
/// be claimed, such as router tests.
pub fn detached_metrics_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

/// Record the outcome of one entity operation
///
/// `outcome` is one of `success`, `not_found` or `error`.
#[inline]
pub fn record_entity_operation(entity: &'static str, operation: &'static str, outcome: &'static str) {
    counter!(
        OPERATIONS_TOTAL,
        "entity" => entity,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record how long a storage call took
#[inline]
pub fn record_query_duration(entity: &'static str, operation: &'static str, duration_seconds: f64) {
    histogram!(
        QUERY_DURATION_SECONDS,
        "entity" => entity,
        "operation" => operation
    )
    .record(duration_seconds);
}
