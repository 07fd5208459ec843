//! The plugin helper: one run of a plugin as the host agent expects it.

use std::path::PathBuf;

use crate::format::{render_meta, render_values, META_ENV, META_HEADER};
use crate::output::Output;
use crate::state::{default_path, StateFile};
use crate::{Plugin, PluginError};

/// Runs a [`Plugin`] once and emits its output.
///
/// # Example
///
/// ```rust,ignore
/// let helper = PluginHelper::new(plugin)
///     .tempfile("/var/tmp/mackerel-plugin-EPGStation")
///     .output(Output::Stdout);
///
/// helper.run().await?;
/// ```
#[derive(Debug)]
pub struct PluginHelper<P> {
    plugin: P,
    tempfile: Option<PathBuf>,
    output: Output,
    meta: Option<bool>,
}

impl<P: Plugin> PluginHelper<P> {
    /// Wrap a plugin with default settings (stdout, default state file).
    pub fn new(plugin: P) -> Self {
        Self {
            plugin,
            tempfile: None,
            output: Output::default(),
            meta: None,
        }
    }

    /// Set the state file path. An empty path selects the default location.
    pub fn tempfile(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.tempfile = (!path.as_os_str().is_empty()).then_some(path);
        self
    }

    /// Set the output destination.
    pub fn output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Force meta mode on or off instead of reading the environment.
    pub fn meta(mut self, meta: bool) -> Self {
        self.meta = Some(meta);
        self
    }

    /// The wrapped plugin.
    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    /// Path of the state file used for diff metrics.
    pub fn tempfile_path(&self) -> PathBuf {
        self.tempfile
            .clone()
            .unwrap_or_else(|| default_path(&self.plugin.metric_key_prefix()))
    }

    fn meta_requested(&self) -> bool {
        self.meta.unwrap_or_else(|| {
            std::env::var_os(META_ENV).is_some_and(|v| !v.is_empty())
        })
    }

    /// Emit graph definitions or values, depending on what the host asked for.
    pub async fn run(&self) -> Result<(), PluginError> {
        if self.meta_requested() {
            self.output_definitions().await
        } else {
            self.output_values().await
        }
    }

    /// Emit the graph definitions.
    pub async fn output_definitions(&self) -> Result<(), PluginError> {
        let prefix = self.plugin.metric_key_prefix();
        let meta = render_meta(&prefix, &self.plugin.graph_definition())?;
        self.output.emit(&[META_HEADER.to_string(), meta]).await?;
        Ok(())
    }

    /// Fetch the current values and emit them.
    ///
    /// Nothing is written when fetching fails.
    pub async fn output_values(&self) -> Result<(), PluginError> {
        let prefix = self.plugin.metric_key_prefix();
        let graphs = self.plugin.graph_definition();

        let current = self
            .plugin
            .fetch_metrics()
            .await
            .map_err(|e| PluginError::Fetch(Box::new(e)))?;

        let mut last = None;
        if graphs.has_diff() {
            let state = StateFile::new(self.tempfile_path());
            last = state.load().await?;
            state.save(&current).await?;
        }

        let lines = render_values(&prefix, &graphs, &current, last.as_ref());
        tracing::debug!(lines = lines.len(), "Emitting values");
        self.output.emit(&lines).await?;
        Ok(())
    }
}
