//! Persistence of the previous run's values for diff metrics.
//!
//! The file holds a flat JSON object of metric values plus a `_lastTime`
//! entry with the unix timestamp of the run that wrote it.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use epgwatch_types::CollectionResult;
use serde_json::{Map, Value};

use crate::PluginError;

/// Environment variable overriding the directory of the default state file.
pub const WORKDIR_ENV: &str = "MACKEREL_PLUGIN_WORKDIR";

const LAST_TIME_KEY: &str = "_lastTime";

/// Default state file path for a metric key prefix.
pub fn default_path(prefix: &str) -> PathBuf {
    let dir = std::env::var_os(WORKDIR_ENV)
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    dir.join(format!("mackerel-plugin-{prefix}"))
}

/// State file holding the last collected values.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    /// Create a state file handle for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the previous values.
    ///
    /// A missing or unreadable file means there is no previous run; only
    /// I/O errors other than "not found" are returned.
    pub async fn load(&self) -> Result<Option<CollectionResult>, PluginError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match decode(&content) {
            Some(last) => Ok(Some(last)),
            None => {
                tracing::warn!(path = %self.path.display(), "Ignoring corrupt state file");
                Ok(None)
            }
        }
    }

    /// Overwrite the file with the given values.
    pub async fn save(&self, result: &CollectionResult) -> Result<(), PluginError> {
        let json = serde_json::to_vec(&encode(result))?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

fn encode(result: &CollectionResult) -> Value {
    let mut map: Map<String, Value> = result
        .iter()
        .filter(|(_, v)| v.is_finite())
        .map(|(k, v)| (k.clone(), Value::from(*v)))
        .collect();
    map.insert(LAST_TIME_KEY.to_string(), Value::from(result.timestamp_secs));
    Value::Object(map)
}

fn decode(content: &[u8]) -> Option<CollectionResult> {
    let map: BTreeMap<String, Value> = serde_json::from_slice(content).ok()?;

    let timestamp_secs = map.get(LAST_TIME_KEY)?.as_f64()? as u64;
    let mut result = CollectionResult::with_timestamp(timestamp_secs);
    for (name, value) in map {
        if name == LAST_TIME_KEY {
            continue;
        }
        if let Some(v) = value.as_f64() {
            result.insert(name, v);
        }
    }
    Some(result)
}
