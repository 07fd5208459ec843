//! The plugin contract.

use async_trait::async_trait;
use epgwatch_types::{CollectionResult, GraphDefinition};

/// A metric plugin run by [`crate::PluginHelper`].
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Error returned when fetching fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Prefix of every metric key and graph name (e.g. `"EPGStation"`).
    fn metric_key_prefix(&self) -> String;

    /// Graph groupings, keyed by graph name.
    fn graph_definition(&self) -> GraphDefinition;

    /// Collect the current values.
    ///
    /// # Errors
    ///
    /// Returns an error if the data source is unreachable. The helper emits
    /// nothing in that case.
    async fn fetch_metrics(&self) -> Result<CollectionResult, Self::Error>;
}
