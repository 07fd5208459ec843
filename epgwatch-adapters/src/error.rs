//! Error types for adapters.

use thiserror::Error;

/// Errors that can occur when collecting metrics from EPGStation.
///
/// Only transport problems are errors. Unexpected response bodies are
/// reported as zero values by the decoders, and non-2xx statuses are
/// parsed like any other response.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Reading the response body failed.
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// The configured endpoint cannot be used.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

#[cfg(feature = "epgstation")]
impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else if err.is_connect() {
            AdapterError::Connection(err.to_string())
        } else if err.is_body() || err.is_decode() {
            AdapterError::Body(err.to_string())
        } else {
            AdapterError::Http(err.to_string())
        }
    }
}
