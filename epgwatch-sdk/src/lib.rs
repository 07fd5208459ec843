//! # epgwatch-sdk
//!
//! Host-side helper for metric plugins that speak the Mackerel agent plugin
//! protocol.
//!
//! A [`Plugin`] describes its graphs and fetches one [`CollectionResult`] per
//! run. [`PluginHelper`] takes care of everything the host agent expects
//! around that: printing graph meta data when asked for it, rendering value
//! lines, turning diff metrics into per-minute rates against the previous
//! run, and persisting values in the state file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use epgwatch_sdk::{CollectionResult, GraphDefinition, Plugin, PluginHelper};
//!
//! struct Uptime;
//!
//! #[async_trait]
//! impl Plugin for Uptime {
//!     type Error = std::io::Error;
//!
//!     fn metric_key_prefix(&self) -> String {
//!         "uptime".to_string()
//!     }
//!
//!     fn graph_definition(&self) -> GraphDefinition {
//!         GraphDefinition::builder()
//!             .graph("uptime", |g| g.label("Uptime").metric("seconds", "Seconds"))
//!             .build()
//!     }
//!
//!     async fn fetch_metrics(&self) -> Result<CollectionResult, Self::Error> {
//!         Ok(CollectionResult::builder().value("seconds", 42.0).build())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), epgwatch_sdk::PluginError> {
//!     PluginHelper::new(Uptime).run().await
//! }
//! ```
//!
//! ## Output format
//!
//! Values are printed one per line as `<prefix>.<graph>.<metric>\t<value>\t<epoch>`.
//! When the `MACKEREL_AGENT_PLUGIN_META` environment variable is set, the
//! helper prints `# mackerel-agent-plugin` followed by the graph definitions
//! as JSON instead.

mod error;
pub mod format;
mod helper;
mod output;
mod plugin;
pub mod state;

pub use error::PluginError;
pub use helper::PluginHelper;
pub use output::Output;
pub use plugin::Plugin;

// Re-export types for convenience
pub use epgwatch_types::{CollectionResult, Graph, GraphDefinition, Metric, MetricFamily, Unit};
