//! OpenTelemetry tracing with file-based export.
//!
//! Spans produced by the controller and the terminal host are exported as OTLP/JSON
//! lines, one batch per line, for offline analysis.
//!
//! ```text
//! tracing → tracing-opentelemetry → TracerProvider → FileSpanExporter → codenexus-otlp.json
//! ```
//!
//! # Features
//!
//! - **File-Based Export**: `<data_dir>/codenexus-otlp.json`
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//! - **Propagation**: [`ApiCall`](crate::api::ApiCall)s carry the span context so HTTP
//!   requests are recorded under the event that issued them
//!
//! # Configuration
//!
//! The filter comes from `trace_level` (`trace`, `debug`, `info`, `warn`, `error`, or any
//! `EnvFilter` directive); the default is `"info"`.
//!
//! # Modules
//!
//! - `init`: subscriber setup
//! - `exporter`: span exporter and tracer provider
//! - `otlp`: OTLP/JSON encoding
//! - `rotation`: size-rotated trace file

mod exporter;
mod init;
mod otlp;
mod rotation;

pub use init::{init_tracing, SERVICE_NAME};
