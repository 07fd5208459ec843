//! Runtime configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `EPGWATCH_*` environment variables. Command line flags are applied on top
//! by the binary.
//!
//! ```toml
//! host = "192.168.1.20"
//! port = "8888"
//! metric_key_prefix = "EPGStation"
//! tempfile = "/var/tmp/mackerel-plugin-epgstation"
//! ```

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Default EPGStation host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default EPGStation port.
pub const DEFAULT_PORT: &str = "8888";

/// Default metric key prefix.
pub const DEFAULT_PREFIX: &str = "EPGStation";

/// Prefix of the environment variables read by [`PluginConfig::load`].
pub const ENV_PREFIX: &str = "EPGWATCH";

/// Configuration of one plugin run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// EPGStation hostname or address.
    pub host: String,

    /// EPGStation port. Kept as a string, it is only ever joined into `host:port`.
    pub port: String,

    /// Prefix of metric keys and graph labels.
    pub metric_key_prefix: String,

    /// State file for diff metrics. `None` lets the helper pick its default.
    pub tempfile: Option<PathBuf>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT.to_string(),
            metric_key_prefix: DEFAULT_PREFIX.to_string(),
            tempfile: None,
        }
    }
}

impl PluginConfig {
    /// Load configuration from an optional file and the environment.
    ///
    /// The result is normalized.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        Ok(config.normalize())
    }

    /// Replace empty settings with their defaults.
    ///
    /// Callers building the configuration by hand can pass an empty prefix;
    /// it is never used as is.
    pub fn normalize(mut self) -> Self {
        if self.metric_key_prefix.is_empty() {
            self.metric_key_prefix = DEFAULT_PREFIX.to_string();
        }
        if self
            .tempfile
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            self.tempfile = None;
        }
        self
    }

    /// The `host:port` pair requests are sent to.
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
