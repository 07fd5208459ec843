//! Rendering of plugin meta data and value lines.

use std::collections::BTreeMap;

use epgwatch_types::{CollectionResult, Graph, GraphDefinition};
use serde::Serialize;

/// First line of the meta output.
pub const META_HEADER: &str = "# mackerel-agent-plugin";

/// Environment variable the host agent sets when it wants graph meta data.
pub const META_ENV: &str = "MACKEREL_AGENT_PLUGIN_META";

#[derive(Serialize)]
struct Meta<'a> {
    graphs: BTreeMap<String, &'a Graph>,
}

/// Join the non-empty parts of a metric key with dots.
pub fn metric_key(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(".")
}

/// Render the graph definitions as the single JSON line of the meta output.
pub fn render_meta(prefix: &str, graphs: &GraphDefinition) -> Result<String, serde_json::Error> {
    let meta = Meta {
        graphs: graphs
            .iter()
            .map(|(key, graph)| (metric_key(&[prefix, key.as_str()]), graph))
            .collect(),
    };
    serde_json::to_string(&meta)
}

/// Format one value line. Returns `None` for values the host cannot ingest.
pub fn format_line(key: &str, value: f64, timestamp_secs: u64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    Some(format!("{key}\t{value:.6}\t{timestamp_secs}"))
}

/// Per-minute rate of change between two samples.
///
/// `None` when no time has passed or the counter went backwards.
pub fn per_minute(current: f64, last: f64, elapsed_secs: u64) -> Option<f64> {
    if elapsed_secs == 0 {
        return None;
    }
    let delta = current - last;
    if delta < 0.0 {
        return None;
    }
    Some(delta * 60.0 / elapsed_secs as f64)
}

/// Render the value lines for every graph metric present in `current`.
///
/// Diff metrics need `last`; they are skipped on the first run.
pub fn render_values(
    prefix: &str,
    graphs: &GraphDefinition,
    current: &CollectionResult,
    last: Option<&CollectionResult>,
) -> Vec<String> {
    let mut lines = Vec::new();

    for (graph_key, graph) in graphs.iter() {
        for metric in &graph.metrics {
            let Some(value) = current.get(&metric.name) else {
                tracing::debug!(metric = %metric.name, "No value collected, skipping");
                continue;
            };

            let value = if metric.diff {
                let previous = last.and_then(|l| l.get(&metric.name).map(|v| (l.timestamp_secs, v)));
                let Some((last_ts, last_value)) = previous else {
                    continue;
                };
                let elapsed = current.timestamp_secs.saturating_sub(last_ts);
                match per_minute(value, last_value, elapsed) {
                    Some(rate) => rate,
                    None => {
                        tracing::debug!(metric = %metric.name, "Counter reset or no elapsed time, skipping");
                        continue;
                    }
                }
            } else {
                value
            };

            let key = metric_key(&[prefix, graph_key.as_str(), metric.name.as_str()]);
            if let Some(line) = format_line(&key, value, current.timestamp_secs) {
                lines.push(line);
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use epgwatch_types::{Metric, MetricFamily, Unit};

    fn graphs() -> GraphDefinition {
        GraphDefinition::builder()
            .graph("record", |g| {
                g.label("EPGStation Recording Reservation")
                    .unit(Unit::Integer)
                    .family(MetricFamily::Schedule)
                    .family(MetricFamily::Skip)
            })
            .graph("encode", |g| g.label("EPGStation Encode").family(MetricFamily::Queue))
            .build()
    }

    #[test]
    fn test_metric_key_skips_empty_parts() {
        assert_eq!(metric_key(&["EPGStation", "encode", "queue"]), "EPGStation.encode.queue");
        assert_eq!(metric_key(&["", "encode", "queue"]), "encode.queue");
    }

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line("EPGStation.stream.stream", 2.0, 1703160000).unwrap(),
            "EPGStation.stream.stream\t2.000000\t1703160000"
        );
        assert!(format_line("k", f64::NAN, 0).is_none());
        assert!(format_line("k", f64::INFINITY, 0).is_none());
    }

    #[test]
    fn test_render_values() {
        let current = CollectionResult::builder()
            .timestamp_secs(100)
            .family(MetricFamily::Schedule, 3.0)
            .family(MetricFamily::Skip, 1.0)
            .family(MetricFamily::Queue, 2.0)
            .build();

        let lines = render_values("EPGStation", &graphs(), &current, None);

        assert_eq!(
            lines,
            [
                "EPGStation.encode.queue\t2.000000\t100",
                "EPGStation.record.schedule\t3.000000\t100",
                "EPGStation.record.skip\t1.000000\t100",
            ]
        );
    }

    #[test]
    fn test_render_values_skips_missing_metrics() {
        let current = CollectionResult::builder()
            .timestamp_secs(100)
            .family(MetricFamily::Queue, 0.0)
            .build();

        let lines = render_values("p", &graphs(), &current, None);
        assert_eq!(lines, ["p.encode.queue\t0.000000\t100"]);
    }

    #[test]
    fn test_diff_metrics() {
        let mut metric = Metric::new("recorded", "Recorded per minute");
        metric.diff = true;
        let graphs = GraphDefinition::builder()
            .graph("recorded", |g| g.label("Recorded").with_metric(metric))
            .build();

        let last = CollectionResult::builder()
            .timestamp_secs(1000)
            .value("recorded", 10.0)
            .build();
        let current = CollectionResult::builder()
            .timestamp_secs(1120)
            .value("recorded", 16.0)
            .build();

        // First run: nothing to diff against.
        assert!(render_values("p", &graphs, &current, None).is_empty());

        let lines = render_values("p", &graphs, &current, Some(&last));
        assert_eq!(lines, ["p.recorded.recorded\t3.000000\t1120"]);
    }

    #[test]
    fn test_per_minute() {
        assert_eq!(per_minute(16.0, 10.0, 120), Some(3.0));
        assert_eq!(per_minute(5.0, 10.0, 60), None);
        assert_eq!(per_minute(5.0, 1.0, 0), None);
    }

    #[test]
    fn test_render_meta() {
        let meta = render_meta("EPGStation", &graphs()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&meta).unwrap();

        let record = &json["graphs"]["EPGStation.record"];
        assert_eq!(record["label"], "EPGStation Recording Reservation");
        assert_eq!(record["unit"], "integer");
        assert_eq!(record["metrics"][0]["name"], "schedule");
        assert_eq!(record["metrics"][1]["label"], "Skip Programs");
        assert!(json["graphs"]["EPGStation.encode"].is_object());
        assert!(!meta.contains('\n'));
    }
}
