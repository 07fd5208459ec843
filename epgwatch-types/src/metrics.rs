//! Metric families and units.

use core::fmt;
use core::str::FromStr;

use alloc::string::{String, ToString};

/// One named scalar collected per run.
///
/// The set is closed: adding a family means adding an extraction rule in the
/// adapter and a slot in the graph table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MetricFamily {
    /// Live streams currently open on the server.
    Stream,
    /// Recording rules.
    Rule,
    /// Scheduled (reserved) programs.
    Schedule,
    /// Reservations that will be skipped.
    Skip,
    /// Reservations overlapping another reservation.
    Overlap,
    /// Reservations conflicting for a tuner.
    Duplicate,
    /// Programs being recorded right now.
    Recording,
    /// Finished recordings.
    Recorded,
    /// Encode queue depth, including the item currently encoding.
    Queue,
}

impl MetricFamily {
    /// Every family, in collection order.
    pub const ALL: [MetricFamily; 9] = [
        MetricFamily::Stream,
        MetricFamily::Rule,
        MetricFamily::Schedule,
        MetricFamily::Skip,
        MetricFamily::Overlap,
        MetricFamily::Duplicate,
        MetricFamily::Recording,
        MetricFamily::Recorded,
        MetricFamily::Queue,
    ];

    /// The metric name used in results and plugin output.
    pub const fn name(self) -> &'static str {
        match self {
            MetricFamily::Stream => "stream",
            MetricFamily::Rule => "rule",
            MetricFamily::Schedule => "schedule",
            MetricFamily::Skip => "skip",
            MetricFamily::Overlap => "overlap",
            MetricFamily::Duplicate => "duplicate",
            MetricFamily::Recording => "recording",
            MetricFamily::Recorded => "recorded",
            MetricFamily::Queue => "queue",
        }
    }

    /// Human readable label shown by the host.
    pub const fn label(self) -> &'static str {
        match self {
            MetricFamily::Stream => "Streams",
            MetricFamily::Rule => "Rules",
            MetricFamily::Schedule => "Schedule Programs",
            MetricFamily::Skip => "Skip Programs",
            MetricFamily::Overlap => "Overlap Programs",
            MetricFamily::Duplicate => "Duplicate Programs",
            MetricFamily::Recording => "Recording Programs",
            MetricFamily::Recorded => "Recorded Programs",
            MetricFamily::Queue => "Encode Queues",
        }
    }
}

impl fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown metric family name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFamily(pub String);

impl fmt::Display for UnknownFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown metric family: {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownFamily {}

impl FromStr for MetricFamily {
    type Err = UnknownFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricFamily::ALL
            .iter()
            .copied()
            .find(|family| family.name() == s)
            .ok_or_else(|| UnknownFamily(s.to_string()))
    }
}

/// Unit designator for a graph, as understood by the host agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    #[cfg_attr(feature = "serde", serde(rename = "float"))]
    Float,
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "integer"))]
    Integer,
    #[cfg_attr(feature = "serde", serde(rename = "percentage"))]
    Percentage,
    #[cfg_attr(feature = "serde", serde(rename = "seconds"))]
    Seconds,
    #[cfg_attr(feature = "serde", serde(rename = "milliseconds"))]
    Milliseconds,
    #[cfg_attr(feature = "serde", serde(rename = "bytes"))]
    Bytes,
    #[cfg_attr(feature = "serde", serde(rename = "bytes/sec"))]
    BytesPerSecond,
    #[cfg_attr(feature = "serde", serde(rename = "bits/sec"))]
    BitsPerSecond,
    #[cfg_attr(feature = "serde", serde(rename = "iops"))]
    Iops,
}

impl Unit {
    /// The wire name of the unit.
    pub const fn as_str(self) -> &'static str {
        match self {
            Unit::Float => "float",
            Unit::Integer => "integer",
            Unit::Percentage => "percentage",
            Unit::Seconds => "seconds",
            Unit::Milliseconds => "milliseconds",
            Unit::Bytes => "bytes",
            Unit::BytesPerSecond => "bytes/sec",
            Unit::BitsPerSecond => "bits/sec",
            Unit::Iops => "iops",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
