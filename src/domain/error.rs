//! Error types for the CodeNexus controller and its terminal host.
//!
//! This module defines the centralized error type [`CodeNexusError`] and a type alias
//! [`Result`] used across the crate. Controller-level failures (a listing that fails to
//! load, a rejected admin code, a forbidden delete) are *not* errors here: they are
//! rendered or alerted by the controller itself. `CodeNexusError` covers faults in the
//! machinery around it, such as durable storage, decoding, theme files and the HTTP executor.

use thiserror::Error;

/// The main error type for CodeNexus operations.
///
/// # Examples
///
/// ```
/// use codenexus::CodeNexusError;
///
/// fn validate_base(base: &str) -> Result<(), CodeNexusError> {
///     if base.is_empty() {
///         return Err(CodeNexusError::Config("api_base must not be empty".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(validate_base("").is_err());
/// ```
#[derive(Debug, Error)]
pub enum CodeNexusError {
    /// Durable key/value storage failed to load or save.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Automatically converts from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme file could not be read or parsed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// The HTTP executor could not be built or could not reach the backend.
    ///
    /// Note that non-success statuses are not errors: they travel back to the
    /// controller as an [`ApiOutcome`](crate::api::ApiOutcome).
    #[error("API error: {0}")]
    Api(String),

    /// A payload could not be decoded into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CodeNexusError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// A specialized `Result` type for CodeNexus operations.
pub type Result<T> = std::result::Result<T, CodeNexusError>;
