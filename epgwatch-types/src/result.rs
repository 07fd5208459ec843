//! Collection result - the flat name to value mapping produced by one run.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::MetricFamily;

/// Values gathered by a single collection pass.
///
/// Values are `f64` because that is what the host protocol carries, even
/// though every EPGStation quantity is a non-negative integer.
///
/// # Example
///
/// ```rust
/// use epgwatch_types::{CollectionResult, MetricFamily};
///
/// let result = CollectionResult::builder()
///     .family(MetricFamily::Stream, 2.0)
///     .family(MetricFamily::Skip, 1.0)
///     .build();
///
/// assert_eq!(result.get("stream"), Some(2.0));
/// assert!(!result.is_complete());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectionResult {
    /// Unix timestamp in seconds when the values were collected.
    pub timestamp_secs: u64,

    /// Metric values keyed by metric name.
    pub values: BTreeMap<String, f64>,
}

impl CollectionResult {
    /// Create an empty result stamped with the current time.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Self::with_timestamp(current_timestamp_secs())
    }

    /// Create an empty result with a specific timestamp.
    pub fn with_timestamp(timestamp_secs: u64) -> Self {
        Self {
            timestamp_secs,
            values: BTreeMap::new(),
        }
    }

    /// Create a builder for collection results.
    pub fn builder() -> CollectionResultBuilder {
        CollectionResultBuilder::new()
    }

    /// Set the value of a metric.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Get a value by metric name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Get the value of a metric family.
    pub fn get_family(&self, family: MetricFamily) -> Option<f64> {
        self.get(family.name())
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no values were collected.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.values.iter()
    }

    /// Families that have no value in this result.
    pub fn missing(&self) -> Vec<MetricFamily> {
        MetricFamily::ALL
            .iter()
            .copied()
            .filter(|f| !self.values.contains_key(f.name()))
            .collect()
    }

    /// True when every metric family has a value.
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

#[cfg(feature = "std")]
impl Default for CollectionResult {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(MetricFamily, f64)> for CollectionResultBuilder {
    fn from_iter<I: IntoIterator<Item = (MetricFamily, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CollectionResultBuilder::new(), |b, (family, value)| {
                b.family(family, value)
            })
    }
}

/// Builder for constructing `CollectionResult` instances.
#[derive(Debug, Default)]
pub struct CollectionResultBuilder {
    timestamp_secs: Option<u64>,
    values: BTreeMap<String, f64>,
}

impl CollectionResultBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a specific timestamp (seconds since Unix epoch).
    pub fn timestamp_secs(mut self, ts: u64) -> Self {
        self.timestamp_secs = Some(ts);
        self
    }

    /// Set the value of a metric family.
    pub fn family(mut self, family: MetricFamily, value: f64) -> Self {
        self.values.insert(family.name().into(), value);
        self
    }

    /// Set the value of an arbitrary metric name.
    pub fn value(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Build the result.
    #[cfg(feature = "std")]
    pub fn build(self) -> CollectionResult {
        CollectionResult {
            timestamp_secs: self.timestamp_secs.unwrap_or_else(current_timestamp_secs),
            values: self.values,
        }
    }

    /// Build the result with a specific timestamp (for no_std).
    #[cfg(not(feature = "std"))]
    pub fn build(self) -> CollectionResult {
        CollectionResult {
            timestamp_secs: self.timestamp_secs.unwrap_or(0),
            values: self.values,
        }
    }
}

/// Get current timestamp in seconds since Unix epoch.
#[cfg(feature = "std")]
fn current_timestamp_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
