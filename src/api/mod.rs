//! Backend API protocol and HTTP executor.
//!
//! The controller speaks to the backend only through values: it emits [`ApiCall`]s and
//! receives [`ApiOutcome`]s. The host runs the calls with [`ApiClient`].
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `client`: reqwest-based executor

pub mod client;
pub mod messages;

pub use client::ApiClient;
pub use messages::{
    ApiCall, ApiOutcome, ApiRequest, ArticleSubmission, Generation, Method, ToolSubmission, TraceContext,
    UNPAGED_PAGE_SIZE,
};
