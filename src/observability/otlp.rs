//! OTLP/JSON encoding of exported spans.
//!
//! Each exported batch becomes one self-contained document:
//!
//! ```json
//! {"resourceSpans": [{
//!   "resource": {"attributes": [{"key": "service.name", "value": {"stringValue": "CodeNexus"}}]},
//!   "scopeSpans": [{"scope": {"name": "codenexus"}, "spans": [...]}]
//! }]}
//! ```
//!
//! Ids are lowercase hex, timestamps are decimal strings of nanoseconds since the Unix
//! epoch, and status codes follow OTLP (0 unset, 1 ok, 2 error).

use opentelemetry::trace::{Event, Link, SpanId, SpanKind, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::resource::Resource;
use serde_json::{json, Value as Json};
use std::time::{SystemTime, UNIX_EPOCH};

/// Encodes a batch of spans under `scope`.
#[must_use]
pub fn batch_document(resource: &Resource, scope: &str, batch: &[SpanData]) -> Json {
    let resource_attributes: Vec<Json> = resource.iter().map(|(key, value)| attribute(key.as_str(), value)).collect();

    json!({
        "resourceSpans": [{
            "resource": { "attributes": resource_attributes },
            "scopeSpans": [{
                "scope": { "name": scope },
                "spans": batch.iter().map(span).collect::<Vec<_>>(),
            }],
        }],
    })
}

fn span(span: &SpanData) -> Json {
    let parent = if span.parent_span_id == SpanId::INVALID {
        String::new()
    } else {
        format!("{:016x}", span.parent_span_id)
    };
    let (code, message) = status(&span.status);

    json!({
        "traceId": format!("{:032x}", span.span_context.trace_id()),
        "spanId": format!("{:016x}", span.span_context.span_id()),
        "parentSpanId": parent,
        "name": span.name,
        "kind": kind_code(&span.span_kind),
        "startTimeUnixNano": unix_nanos(span.start_time),
        "endTimeUnixNano": unix_nanos(span.end_time),
        "attributes": attributes(&span.attributes),
        "events": span.events.iter().map(event).collect::<Vec<_>>(),
        "links": span.links.iter().map(link).collect::<Vec<_>>(),
        "status": { "code": code, "message": message },
    })
}

fn event(event: &Event) -> Json {
    json!({
        "timeUnixNano": unix_nanos(event.timestamp),
        "name": event.name,
        "attributes": attributes(&event.attributes),
    })
}

fn link(link: &Link) -> Json {
    json!({
        "traceId": format!("{:032x}", link.span_context.trace_id()),
        "spanId": format!("{:016x}", link.span_context.span_id()),
        "attributes": attributes(&link.attributes),
    })
}

fn attributes(pairs: &[KeyValue]) -> Vec<Json> {
    pairs.iter().map(|kv| attribute(kv.key.as_str(), &kv.value)).collect()
}

fn attribute(key: &str, value: &Value) -> Json {
    json!({ "key": key, "value": any_value(value) })
}

/// OTLP `AnyValue`; arrays are flattened to their debug text.
fn any_value(value: &Value) -> Json {
    match value {
        Value::Bool(b) => json!({ "boolValue": b }),
        Value::I64(i) => json!({ "intValue": i.to_string() }),
        Value::F64(f) => json!({ "doubleValue": f }),
        Value::String(s) => json!({ "stringValue": s.to_string() }),
        Value::Array(_) => json!({ "stringValue": format!("{value:?}") }),
    }
}

const fn kind_code(kind: &SpanKind) -> u8 {
    match kind {
        SpanKind::Internal => 1,
        SpanKind::Server => 2,
        SpanKind::Client => 3,
        SpanKind::Producer => 4,
        SpanKind::Consumer => 5,
    }
}

fn status(status: &Status) -> (u8, String) {
    match status {
        Status::Unset => (0, String::new()),
        Status::Ok => (1, String::new()),
        Status::Error { description } => (2, description.to_string()),
    }
}

fn unix_nanos(at: SystemTime) -> String {
    at.duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos().to_string()
}
