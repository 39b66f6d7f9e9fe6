use std::path::Path;
use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::SpanExporter;
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Where human-readable logs are written
pub enum LogTarget<'a> {
    /// Standard error, for interactive commands
    Stderr,
    /// `bridge.log` inside the given directory, when stdout carries the response
    File(&'a Path),
}

fn get_resource() -> Resource {
    static RESOURCE: OnceLock<Resource> = OnceLock::new();
    RESOURCE
        .get_or_init(|| Resource::builder().with_service_name("allocine-bridge").build())
        .clone()
}

fn init_traces() -> anyhow::Result<SdkTracerProvider> {
    let exporter = SpanExporter::builder().with_http().build()?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(get_resource())
        .build())
}

/// `bridge.log` in `dir`, failing instead of panicking when it cannot be opened
fn file_appender(dir: &Path) -> anyhow::Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)?;
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("bridge.log")
        .build(dir)?)
}

// Spans are exported over OTLP only when an endpoint is configured
pub fn init_tracing_subscriber(target: LogTarget<'_>) -> anyhow::Result<TelemetryGuard> {
    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match target {
        LogTarget::Stderr => fmt::layer().with_writer(std::io::stderr).boxed(),
        LogTarget::File(dir) => fmt::layer()
            .with_writer(file_appender(dir)?)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
    };

    let tracer_provider = if std::env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT").is_some() {
        Some(init_traces()?)
    } else {
        None
    };
    let otel_layer = tracer_provider
        .as_ref()
        .map(|provider| OpenTelemetryLayer::new(provider.tracer("allocine-bridge")));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(EnvFilter::from_default_env())
        .with(otel_layer)
        .init();

    Ok(TelemetryGuard { tracer_provider })
}

/// Flushes exported spans on drop
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(err) = provider.shutdown() {
                eprintln!("{err:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_appender_creates_log() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");

        assert!(file_appender(&log_dir).is_ok());
        assert!(log_dir.join("bridge.log").exists());
    }

    #[test]
    fn test_file_appender_unusable_directory() {
        let dir = TempDir::new().unwrap();
        let not_a_dir = dir.path().join("cache");
        std::fs::write(&not_a_dir, "").unwrap();

        assert!(file_appender(&not_a_dir).is_err());
    }
}
