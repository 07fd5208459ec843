//! Graph definitions - presentation metadata handed to the host agent.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{MetricFamily, Unit};

/// A single metric line within a graph.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metric {
    /// Key of the value in the collection result.
    pub name: String,

    /// Display label.
    pub label: String,

    /// Report the per-minute delta against the previous run instead of the raw value.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing))]
    pub diff: bool,

    /// Stack this metric on top of the previous ones when rendered.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stacked: bool,
}

impl Metric {
    /// Create a plain (non-diff, non-stacked) metric.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            diff: false,
            stacked: false,
        }
    }
}

impl From<MetricFamily> for Metric {
    fn from(family: MetricFamily) -> Self {
        Metric::new(family.name(), family.label())
    }
}

/// A named bundle of metrics sharing a label and unit.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph {
    /// Graph title.
    pub label: String,

    /// Unit shared by every metric of the graph.
    pub unit: Unit,

    /// Metrics in display order.
    pub metrics: Vec<Metric>,
}

impl Graph {
    /// Create a builder for a graph.
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    /// Names of the metrics in display order.
    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|m| m.name.as_str())
    }

    /// True if any metric needs the previous run's values.
    pub fn has_diff(&self) -> bool {
        self.metrics.iter().any(|m| m.diff)
    }
}

/// All graphs of a plugin, keyed by grouping name.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GraphDefinition {
    pub graphs: BTreeMap<String, Graph>,
}

impl GraphDefinition {
    /// Create an empty definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for graph definitions.
    pub fn builder() -> GraphDefinitionBuilder {
        GraphDefinitionBuilder::new()
    }

    /// Number of graphs.
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Check if there are no graphs.
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Get a graph by key.
    pub fn get(&self, key: &str) -> Option<&Graph> {
        self.graphs.get(key)
    }

    /// Iterate over graphs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Graph)> {
        self.graphs.iter()
    }

    /// True if any graph contains a diff metric.
    pub fn has_diff(&self) -> bool {
        self.graphs.values().any(Graph::has_diff)
    }

    /// Families referenced by the graphs that are not known metric families.
    ///
    /// An empty list means every referenced metric has an extraction rule.
    pub fn unknown_metrics(&self) -> Vec<&str> {
        self.graphs
            .values()
            .flat_map(|g| g.metric_names())
            .filter(|name| name.parse::<MetricFamily>().is_err())
            .collect()
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Builder for `GraphDefinition`.
#[derive(Debug, Default)]
pub struct GraphDefinitionBuilder {
    graphs: BTreeMap<String, Graph>,
}

impl GraphDefinitionBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a graph built using a closure.
    pub fn graph<F>(mut self, key: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(GraphBuilder) -> GraphBuilder,
    {
        let graph = f(GraphBuilder::new()).build();
        self.graphs.insert(key.into(), graph);
        self
    }

    /// Build the graph definition.
    pub fn build(self) -> GraphDefinition {
        GraphDefinition {
            graphs: self.graphs,
        }
    }
}

/// Builder for `Graph`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    label: String,
    unit: Unit,
    metrics: Vec<Metric>,
}

impl GraphBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the graph label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the unit (default: integer).
    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Append a metric.
    pub fn metric(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.metrics.push(Metric::new(name, label));
        self
    }

    /// Append a metric for a known family, using its standard label.
    pub fn family(mut self, family: MetricFamily) -> Self {
        self.metrics.push(Metric::from(family));
        self
    }

    /// Append a fully specified metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    /// Build the graph.
    pub fn build(self) -> Graph {
        Graph {
            label: self.label,
            unit: self.unit,
            metrics: self.metrics,
        }
    }
}
