//! # epgwatch
//!
//! A Mackerel agent plugin reporting the state of an EPGStation recorder:
//! open streams, recording rules, reservations (scheduled, skipped,
//! overlapping, conflicting), recordings in progress, finished recordings and
//! the encode queue.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                mackerel-plugin-epgstation                    │
//! │  ┌────────┐    ┌─────────────────┐    ┌──────────────────┐   │
//! │  │ config │───▶│ EpgStationPlugin│───▶│   PluginHelper   │──▶ stdout
//! │  └────────┘    └────────┬────────┘    │  (epgwatch-sdk)  │   │
//! │                         │             └──────────────────┘   │
//! │                         ▼                                    │
//! │               ┌───────────────────┐                          │
//! │               │ EpgStationAdapter │── 9 x GET /api/... ──────▶ EPGStation
//! │               │(epgwatch-adapters)│                          │
//! │               └───────────────────┘                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`config`]**: defaults, normalization and layered loading of [`PluginConfig`]
//! - **[`plugin`]**: the metric schema, graph groupings and the collection pass
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Values
//! mackerel-plugin-epgstation --host 192.168.1.20 --port 8888
//!
//! # Graph definitions, as requested by mackerel-agent
//! MACKEREL_AGENT_PLUGIN_META=1 mackerel-plugin-epgstation
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use epgwatch::{EpgStationPlugin, PluginConfig};
//!
//! # tokio_test::block_on(async {
//! let config = PluginConfig::default();
//! let plugin = EpgStationPlugin::new(&config).unwrap();
//! let result = plugin.collect().await.unwrap();
//! println!("encode queue: {:?}", result.get("queue"));
//! # });
//! ```

pub mod config;
pub mod plugin;

use anyhow::{Context, Result};
use epgwatch_sdk::{Output, PluginHelper};

// Re-export main types for convenience
pub use config::PluginConfig;
pub use plugin::{title_case, EpgStationPlugin};

/// Run the plugin once: print graph meta data or the current values.
///
/// Transport failures are returned as errors and nothing is written.
pub async fn run(config: PluginConfig, output: Output) -> Result<()> {
    let config = config.normalize();
    let target = config.target();

    let plugin = EpgStationPlugin::new(&config)
        .with_context(|| format!("Failed to set up EPGStation client for {target}"))?;

    let mut helper = PluginHelper::new(plugin).output(output);
    if let Some(tempfile) = config.tempfile {
        helper = helper.tempfile(tempfile);
    }

    helper
        .run()
        .await
        .with_context(|| format!("EPGStation at {target}"))
}
