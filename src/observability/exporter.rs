//! File-backed span exporter and the tracer provider built around it.

use super::otlp::batch_document;
use super::rotation::{RotatingFile, RotationPolicy};
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Instrumentation scope written into every batch.
pub const SCOPE: &str = "codenexus";

/// Writes each exported batch as one OTLP/JSON line.
#[derive(Debug)]
struct FileSpanExporter {
    file: RotatingFile,
    resource: Resource,
    stopped: AtomicBool,
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.stopped.load(Ordering::SeqCst) {
            Err(TraceError::from("trace exporter stopped"))
        } else {
            let line = batch_document(&self.resource, SCOPE, &batch).to_string();
            self.file.append(&line).map_err(|e| TraceError::from(e.to_string()))
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.resource = resource.clone();
    }
}

/// Builds a provider that exports every finished span to `trace_file` synchronously.
#[must_use]
pub fn file_tracer_provider(trace_file: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter {
        file: RotatingFile::new(trace_file, RotationPolicy::default()),
        resource: resource.clone(),
        stopped: AtomicBool::new(false),
    };

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
