//! The EPGStation plugin: metric schema, graph groupings and collection.

use async_trait::async_trait;
use epgwatch_adapters::epgstation::EpgStationAdapter;
use epgwatch_adapters::AdapterError;
use epgwatch_sdk::Plugin;
use epgwatch_types::{CollectionResult, GraphDefinition, MetricFamily, Unit};

use crate::config::{PluginConfig, DEFAULT_PREFIX};

/// Graph groupings: key, label suffix and member families in display order.
const GRAPHS: &[(&str, &str, &[MetricFamily])] = &[
    ("stream", "Stream", &[MetricFamily::Stream]),
    ("rule", "Rule", &[MetricFamily::Rule]),
    (
        "record",
        "Recording Reservation",
        &[
            MetricFamily::Schedule,
            MetricFamily::Skip,
            MetricFamily::Overlap,
            MetricFamily::Duplicate,
        ],
    ),
    ("recording", "Recording", &[MetricFamily::Recording]),
    ("recorded", "Recorded", &[MetricFamily::Recorded]),
    ("encode", "Encode", &[MetricFamily::Queue]),
];

/// Collects EPGStation metrics for the plugin host.
#[derive(Debug, Clone)]
pub struct EpgStationPlugin {
    prefix: String,
    adapter: EpgStationAdapter,
}

impl EpgStationPlugin {
    /// Build the plugin and its HTTP adapter from a configuration.
    pub fn new(config: &PluginConfig) -> Result<Self, AdapterError> {
        let adapter = EpgStationAdapter::builder()
            .target(config.target())
            .build()?;
        Ok(Self::with_adapter(config.metric_key_prefix.clone(), adapter))
    }

    /// Build the plugin around an existing adapter.
    ///
    /// An empty prefix is replaced by the default one.
    pub fn with_adapter(prefix: impl Into<String>, adapter: EpgStationAdapter) -> Self {
        let mut prefix = prefix.into();
        if prefix.is_empty() {
            prefix = DEFAULT_PREFIX.to_string();
        }
        Self { prefix, adapter }
    }

    /// The metric key prefix in use.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The adapter used for collection.
    pub fn adapter(&self) -> &EpgStationAdapter {
        &self.adapter
    }

    /// Describe the graph groupings, labelled with the title-cased prefix.
    pub fn graphs(&self) -> GraphDefinition {
        let label_prefix = title_case(&self.prefix);

        let mut builder = GraphDefinition::builder();
        for (key, suffix, families) in GRAPHS {
            builder = builder.graph(*key, |g| {
                let g = g.label(format!("{label_prefix} {suffix}")).unit(Unit::Integer);
                families.iter().fold(g, |g, family| g.family(*family))
            });
        }
        builder.build()
    }

    /// Run one collection pass against the server.
    pub async fn collect(&self) -> Result<CollectionResult, AdapterError> {
        let result = self.adapter.collect().await?;
        tracing::debug!(server = self.adapter.target(), values = result.len(), "Collected");
        Ok(result)
    }
}

#[async_trait]
impl Plugin for EpgStationPlugin {
    type Error = AdapterError;

    fn metric_key_prefix(&self) -> String {
        self.prefix.clone()
    }

    fn graph_definition(&self) -> GraphDefinition {
        self.graphs()
    }

    async fn fetch_metrics(&self) -> Result<CollectionResult, Self::Error> {
        self.collect().await
    }
}

/// Title-case the first letter of every word.
///
/// Letters, digits and `_` continue a word; any other ASCII character and
/// whitespace start a new one. The rest of each word is left untouched, so
/// `"EPGStation"` stays as is. Mapping is one character to one character.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        out.push(if at_word_start { to_title(c) } else { c });
        at_word_start = is_separator(c);
    }

    out
}

/// Simple titlecase mapping of a single character.
///
/// Differs from upper case for the Latin digraphs (`ǆ` -> `ǅ`) and the Greek
/// letters with iota subscript. Characters whose upper case expands to
/// several characters (`ß`) have no simple mapping and are kept.
fn to_title(c: char) -> char {
    let title = match u32::from(c) {
        0x01C4..=0x01C6 => 0x01C5,
        0x01C7..=0x01C9 => 0x01C8,
        0x01CA..=0x01CC => 0x01CB,
        0x01F1..=0x01F3 => 0x01F2,
        cp @ (0x1F80..=0x1F87 | 0x1F90..=0x1F97 | 0x1FA0..=0x1FA7) => cp + 8,
        cp @ (0x1F88..=0x1F8F | 0x1F98..=0x1F9F | 0x1FA8..=0x1FAF) => cp,
        0x1FB3 | 0x1FBC => 0x1FBC,
        0x1FC3 | 0x1FCC => 0x1FCC,
        0x1FF3 | 0x1FFC => 0x1FFC,
        _ => {
            let mut upper = c.to_uppercase();
            return match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            };
        }
    };
    char::from_u32(title).unwrap_or(c)
}

fn is_separator(c: char) -> bool {
    if c.is_ascii() {
        !(c.is_ascii_alphanumeric() || c == '_')
    } else {
        c.is_whitespace()
    }
}
