//! Per-family API paths and response reductions.
//!
//! ## Metrics Collected
//!
//! | Family      | Path                               | Reduction                         |
//! |-------------|------------------------------------|-----------------------------------|
//! | `stream`    | `streams/info`                     | length of the returned list       |
//! | `rule`      | `rules?limit=1&offset=0`           | `total`                           |
//! | `schedule`  | `reserves?limit=1`                 | `total`                           |
//! | `skip`      | `reserves/skips?limit=1`           | `total`                           |
//! | `overlap`   | `reserves/overlaps?limit=1`        | `total`                           |
//! | `duplicate` | `reserves/conflicts?limit=1`       | `total`                           |
//! | `recording` | `recorded?limit=1&recording=true`  | `total`                           |
//! | `recorded`  | `recorded?limit=1&recording=false` | `total`                           |
//! | `queue`     | `encode`                           | `queue` length, +1 while encoding |
//!
//! Decoding is lenient: a body that is not JSON, has the wrong shape, or
//! carries a mistyped field yields zero for that field instead of an error.
//! Each such case is logged at `warn` so a broken integration is visible.

use epgwatch_types::MetricFamily;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// How a response body is reduced to a single number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Length of a top-level JSON array.
    Length,
    /// The `total` field of a paged listing.
    Total,
    /// Pending queue length plus the item currently encoding.
    EncodeQueue,
}

impl Reduction {
    /// The reduction used for a family.
    pub const fn of(family: MetricFamily) -> Self {
        match family {
            MetricFamily::Stream => Reduction::Length,
            MetricFamily::Queue => Reduction::EncodeQueue,
            MetricFamily::Rule
            | MetricFamily::Schedule
            | MetricFamily::Skip
            | MetricFamily::Overlap
            | MetricFamily::Duplicate
            | MetricFamily::Recording
            | MetricFamily::Recorded => Reduction::Total,
        }
    }
}

/// API path (relative to `/api/`) queried for a family.
pub const fn api_path(family: MetricFamily) -> &'static str {
    match family {
        MetricFamily::Stream => "streams/info",
        MetricFamily::Rule => "rules?limit=1&offset=0",
        MetricFamily::Schedule => "reserves?limit=1",
        MetricFamily::Skip => "reserves/skips?limit=1",
        MetricFamily::Overlap => "reserves/overlaps?limit=1",
        MetricFamily::Duplicate => "reserves/conflicts?limit=1",
        MetricFamily::Recording => "recorded?limit=1&recording=true",
        MetricFamily::Recorded => "recorded?limit=1&recording=false",
        MetricFamily::Queue => "encode",
    }
}

/// Reduce a raw response body to the family's value.
pub fn reduce(family: MetricFamily, body: &[u8]) -> f64 {
    let _span = tracing::debug_span!("decode", %family).entered();

    match Reduction::of(family) {
        Reduction::Length => decode::<Option<Vec<IgnoredAny>>>(family, body)
            .map_or(0.0, |items| items.len() as f64),
        Reduction::Total => decode_object::<TotalResponse>(family, body).total as f64,
        Reduction::EncodeQueue => decode_object::<EncodeResponse>(family, body).depth() as f64,
    }
}

/// Decode a body, falling back to the zero value when it does not fit `T`.
fn decode<T: DeserializeOwned + Default>(family: MetricFamily, body: &[u8]) -> T {
    match serde_json::from_slice(body) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(%family, error = %e, "Unexpected response body, reporting zero");
            T::default()
        }
    }
}

/// Like [`decode`], for bodies that must be a JSON object.
///
/// serde lets derived structs be filled from arrays by position; a listing
/// answered with `[7]` must still count as zero.
fn decode_object<T: DeserializeOwned + Default>(family: MetricFamily, body: &[u8]) -> T {
    let decoded = serde_json::from_slice::<Value>(body)
        .map_err(|e| e.to_string())
        .and_then(from_object);
    match decoded {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(%family, error = %e, "Unexpected response body, reporting zero");
            T::default()
        }
    }
}

/// Deserialize `T` from a JSON object. `null` yields the zero value.
fn from_object<T: DeserializeOwned + Default>(value: Value) -> Result<T, String> {
    if value.is_null() {
        return Ok(T::default());
    }
    if !value.is_object() {
        return Err(format!("expected a JSON object, found {}", json_kind(&value)));
    }
    T::deserialize(value).map_err(|e| e.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Field-level leniency: `null` is treated as absent, a mistyped value as zero.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(T::deserialize(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Mistyped field in response, using zero value");
        T::default()
    }))
}

/// [`lenient`] for nested objects: anything but an object is the zero value.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(from_object(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Mistyped field in response, using zero value");
        T::default()
    }))
}

/// Paged listing (`rules`, `reserves/*`, `recorded`).
#[derive(Debug, Default, Deserialize)]
struct TotalResponse {
    // Signed, so a broken server reporting -1 stays visible.
    #[serde(default, deserialize_with = "lenient")]
    total: i64,
}

/// Response of `encode`: the pending queue and the item being processed.
#[derive(Debug, Default, Deserialize)]
struct EncodeResponse {
    #[serde(default, deserialize_with = "lenient")]
    queue: Vec<IgnoredAny>,
    #[serde(default, deserialize_with = "lenient_object")]
    encoding: EncodingItem,
}

impl EncodeResponse {
    // The running encode is not part of `queue`.
    fn depth(&self) -> usize {
        let active = usize::from(!self.encoding.id.is_empty());
        self.queue.len() + active
    }
}

#[derive(Debug, Default, Deserialize)]
struct EncodingItem {
    #[serde(default, deserialize_with = "lenient")]
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_family_has_a_path() {
        for family in MetricFamily::ALL {
            assert!(!api_path(family).is_empty());
            assert!(!api_path(family).starts_with('/'));
        }
    }

    #[test]
    fn test_reduction_table() {
        assert_eq!(Reduction::of(MetricFamily::Stream), Reduction::Length);
        assert_eq!(Reduction::of(MetricFamily::Queue), Reduction::EncodeQueue);
        assert_eq!(Reduction::of(MetricFamily::Duplicate), Reduction::Total);
        assert_eq!(api_path(MetricFamily::Duplicate), "reserves/conflicts?limit=1");
    }

    #[test]
    fn test_total_families() {
        let body = br#"{"reserves":[{"id":1}],"total":42}"#;
        for family in MetricFamily::ALL {
            if Reduction::of(family) == Reduction::Total {
                assert_eq!(reduce(family, body), 42.0, "family {family}");
            }
        }
    }

    #[test]
    fn test_stream_length() {
        assert_eq!(reduce(MetricFamily::Stream, b"[{},{}]"), 2.0);
        assert_eq!(reduce(MetricFamily::Stream, br#"[{"streamId":0,"type":"M2TS"}]"#), 1.0);
        assert_eq!(reduce(MetricFamily::Stream, b"[]"), 0.0);
    }

    #[test]
    fn test_encode_queue_without_active_item() {
        let body = br#"{"queue":[{},{},{}],"encoding":{"id":""}}"#;
        assert_eq!(reduce(MetricFamily::Queue, body), 3.0);
    }

    #[test]
    fn test_encode_queue_counts_active_item() {
        let body = br#"{"queue":[{},{},{}],"encoding":{"id":"x1"}}"#;
        assert_eq!(reduce(MetricFamily::Queue, body), 4.0);

        let idle = br#"{"queue":[]}"#;
        assert_eq!(reduce(MetricFamily::Queue, idle), 0.0);

        let only_active = br#"{"encoding":{"id":"abc","name":"H.264"}}"#;
        assert_eq!(reduce(MetricFamily::Queue, only_active), 1.0);
    }

    #[test]
    fn test_empty_object_is_zero() {
        for family in MetricFamily::ALL {
            assert_eq!(reduce(family, b"{}"), 0.0, "family {family}");
        }
    }

    #[test]
    fn test_malformed_json_is_zero() {
        for family in MetricFamily::ALL {
            assert_eq!(reduce(family, b"<html>502 Bad Gateway</html>"), 0.0);
            assert_eq!(reduce(family, b""), 0.0);
        }
    }

    #[test]
    fn test_mistyped_fields_are_zero() {
        assert_eq!(reduce(MetricFamily::Rule, br#"{"total":"12"}"#), 0.0);
        assert_eq!(reduce(MetricFamily::Rule, br#"{"total":null}"#), 0.0);
        assert_eq!(reduce(MetricFamily::Rule, br#"{"total":1.5}"#), 0.0);
        assert_eq!(reduce(MetricFamily::Stream, br#"{"streams":[1,2]}"#), 0.0);
    }

    #[test]
    fn test_mistyped_encoding_keeps_queue() {
        let body = br#"{"queue":[{},{}],"encoding":{"id":17}}"#;
        assert_eq!(reduce(MetricFamily::Queue, body), 2.0);

        let body = br#"{"queue":"oops","encoding":{"id":"x"}}"#;
        assert_eq!(reduce(MetricFamily::Queue, body), 1.0);
    }

    #[test]
    fn test_array_body_is_zero_for_object_responses() {
        assert_eq!(reduce(MetricFamily::Rule, b"[7]"), 0.0);
        assert_eq!(reduce(MetricFamily::Recorded, br#"[[],345]"#), 0.0);

        let body = br#"[[{},{}],{"id":"x"}]"#;
        assert_eq!(reduce(MetricFamily::Queue, body), 0.0);
    }

    #[test]
    fn test_scalar_body_is_zero() {
        assert_eq!(reduce(MetricFamily::Rule, b"12"), 0.0);
        assert_eq!(reduce(MetricFamily::Queue, br#""busy""#), 0.0);
    }

    #[test]
    fn test_array_encoding_does_not_count() {
        let body = br#"{"queue":[{}],"encoding":["x"]}"#;
        assert_eq!(reduce(MetricFamily::Queue, body), 1.0);
    }

    #[test]
    fn test_null_body_is_zero() {
        for family in MetricFamily::ALL {
            assert_eq!(reduce(family, b"null"), 0.0, "family {family}");
        }
    }

    #[test]
    fn test_negative_total_is_reported() {
        assert_eq!(reduce(MetricFamily::Schedule, br#"{"total":-1}"#), -1.0);
    }
}
