//! Error types for the plugin helper.

use thiserror::Error;

/// Errors surfaced by [`crate::PluginHelper::run`].
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin failed to fetch its metrics.
    #[error("Failed to fetch metrics: {0}")]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Writing output or the state file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding graph definitions or state failed.
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}
