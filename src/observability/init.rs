//! Subscriber setup.

use super::exporter::{file_tracer_provider, SCOPE};
use crate::infrastructure::paths::trace_file;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name recorded on every exported batch.
pub const SERVICE_NAME: &str = "CodeNexus";

/// Installs the global subscriber: an `EnvFilter` at `config.trace_level` (default
/// `info`) feeding an OpenTelemetry layer that exports to `<data_dir>/codenexus-otlp.json`.
///
/// Nothing is installed when the data directory cannot be created. Calling this again
/// after a subscriber is installed has no effect.
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");

    let data_dir = config.data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![KeyValue::new("service.name", SERVICE_NAME)]);
    let provider = file_tracer_provider(trace_file(&data_dir), resource);
    let layer = OpenTelemetryLayer::new(provider.tracer(SCOPE));

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(layer)
        .try_init();
}
