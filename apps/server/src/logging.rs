//! Logging and OpenTelemetry initialization for the search server
//!
//! Console output is JSON or human-readable; file output rolls over on the
//! configured schedule; spans are optionally exported over OTLP. `RUST_LOG`
//! replaces the configured filter entirely when set.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    trace::{Sampler, TracerProvider},
    Resource,
};
use std::fs;
use std::time::Duration;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt,
    fmt::MakeWriter,
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

/// Everything below the filter sees only events the filter let through.
type Filtered = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync>;

/// Keeps the file writer flushing and shuts OpenTelemetry down on drop.
/// Hold it for the lifetime of the process.
pub struct TelemetryGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber described by `config`.
///
/// An OTLP exporter that cannot be built is reported once logging is up and
/// the server continues without span export.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<TelemetryGuard> {
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(3);

    let (tracer_provider, otel_error) = if config.opentelemetry_enabled {
        match init_tracer_provider(config, build_resource_attributes(config)) {
            Ok(provider) => (Some(provider), None),
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };
    if let Some(provider) = &tracer_provider {
        let otel_layer = tracing_opentelemetry::layer()
            .with_tracer(provider.tracer("docsearch-server"))
            .with_tracked_inactivity(true);
        layers.push(otel_layer.boxed());
    }

    layers.push(output_layer(config.json, true, std::io::stdout));
    let file_guard = if config.file_enabled {
        let (writer, guard) = create_file_appender(config)?;
        layers.push(output_layer(config.json, false, writer));
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(build_env_filter(config))
        .with(layers)
        .try_init()?;

    if let Some(provider) = tracer_provider {
        global::set_tracer_provider(provider);
    }
    if let Some(err) = otel_error {
        tracing::warn!(
            error = %err,
            "OpenTelemetry exporter unavailable; spans will not be exported"
        );
    }

    tracing::info!(
        otel_enabled = config.opentelemetry_enabled,
        service_name = %config.service_name,
        environment = %config.deployment_environment,
        "Logging initialized"
    );

    Ok(TelemetryGuard {
        _file_guard: file_guard,
    })
}

/// JSON lines carry the current span only; human output colours the console
/// and never the log file.
fn output_layer<W>(json: bool, console: bool, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    if json {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(writer)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_ansi(console)
            .with_writer(writer)
            .boxed()
    }
}

fn build_resource_attributes(config: &LoggingConfig) -> Resource {
    let service_version = config
        .service_version
        .clone()
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    Resource::new(vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", service_version),
        KeyValue::new(
            "deployment.environment",
            config.deployment_environment.clone(),
        ),
        KeyValue::new("telemetry.sdk.name", "opentelemetry"),
        KeyValue::new("telemetry.sdk.language", "rust"),
    ])
}

fn init_tracer_provider(
    config: &LoggingConfig,
    resource: Resource,
) -> anyhow::Result<TracerProvider> {
    use opentelemetry_sdk::trace::Config;

    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(&config.otlp_endpoint)
        .with_timeout(Duration::from_secs(config.otlp_timeout_seconds))
        .build_span_exporter()
        .map_err(|e| anyhow::anyhow!("Failed to create OTLP exporter: {}", e))?;

    let trace_config = Config::default()
        .with_sampler(sampler_for(config.trace_sample_ratio))
        .with_resource(resource);

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_config(trace_config)
        .build();

    Ok(provider)
}

/// Ratios in (0, 1) follow the parent's decision when there is one.
fn sampler_for(ratio: f64) -> Sampler {
    if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(ratio)))
    }
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)))
}

/// Our crates at `level`, sqlx only when it warns.
fn default_directives(level: &str) -> String {
    format!("docsearch_server={level},docsearch_plan={level},sqlx=warn")
}

/// Unknown values fall back to daily.
fn rotation_for(name: &str) -> Rotation {
    match name {
        "hourly" => Rotation::HOURLY,
        "minutely" => Rotation::MINUTELY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

fn create_file_appender(config: &LoggingConfig) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(&config.file_directory)?;

    let rotation = rotation_for(&config.file_rotation);
    let prefix = if rotation == Rotation::NEVER {
        format!("{}.log", config.file_prefix)
    } else {
        config.file_prefix.clone()
    };
    let file_appender = RollingFileAppender::new(rotation, &config.file_directory, prefix);

    Ok(tracing_appender::non_blocking(file_appender))
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        global::shutdown_tracer_provider();
    }
}
