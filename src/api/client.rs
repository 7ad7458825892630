//! HTTP executor for [`ApiCall`]s.
//!
//! The executor is the host-side half of the API protocol: it turns a typed request into
//! a reqwest call against the configured base URL and reports whatever came back as an
//! [`ApiOutcome`]. It never interprets bodies; decoding happens in the controller, where
//! the generation check decides whether the outcome is still wanted.

use crate::api::messages::{ApiCall, ApiOutcome, Method};
use crate::domain::error::{CodeNexusError, Result};
use std::time::Duration;
use tracing::Instrument;
use url::Url;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Executes backend requests over HTTP.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Creates a client for the backend at `api_base`.
    ///
    /// # Errors
    ///
    /// - [`CodeNexusError::Config`] if `api_base` is not an absolute URL
    /// - [`CodeNexusError::Api`] if the HTTP client cannot be built
    pub fn new(api_base: &str) -> Result<Self> {
        let base = Url::parse(api_base)
            .map_err(|e| CodeNexusError::Config(format!("invalid api_base {api_base:?}: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("codenexus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CodeNexusError::Api(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Executes `call` and reports the outcome.
    ///
    /// Never fails: transport errors and bad URLs become [`ApiOutcome::Transport`].
    /// The request span is parented under the span that issued the call when the call
    /// carries a trace context.
    pub async fn execute(&self, call: &ApiCall) -> ApiOutcome {
        let span = tracing::debug_span!(
            "api_execute",
            kind = call.request.kind(),
            generation = %call.generation,
            status = tracing::field::Empty,
        );

        if let Some(parent) = call.trace_context.as_ref().and_then(|ctx| ctx.to_otel_context()) {
            use tracing_opentelemetry::OpenTelemetrySpanExt;
            span.set_parent(parent);
        }

        self.send(call).instrument(span).await
    }

    async fn send(&self, call: &ApiCall) -> ApiOutcome {
        let url = match call.request.url(&self.base) {
            Ok(url) => url,
            Err(e) => return ApiOutcome::Transport { message: e.to_string() },
        };

        let mut builder = match call.request.method() {
            Method::Get => self.http.get(url.clone()),
            Method::Post => self.http.post(url.clone()),
        };
        for (name, value) in call.request.headers() {
            builder = builder.header(name, value);
        }
        if let Some(body) = call.request.body() {
            builder = builder.json(&body);
        }

        tracing::debug!(%url, "sending request");

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "request failed");
                return ApiOutcome::Transport { message: e.to_string() };
            }
        };

        let status = response.status().as_u16();
        tracing::Span::current().record("status", status);

        match response.text().await {
            Ok(body) => {
                tracing::debug!(status, bytes = body.len(), "response received");
                ApiOutcome::Response { status, body }
            }
            Err(e) => {
                tracing::debug!(status, error = %e, "failed to read response body");
                ApiOutcome::Transport { message: e.to_string() }
            }
        }
    }
}
