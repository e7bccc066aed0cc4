//! Core metric types produced by the translator.

use std::fmt;

/// Prometheus metric kind inferred for a Heka field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Monotonically increasing value.
    Counter,
    /// Point-in-time value that may go up or down.
    Gauge,
    /// Unknown semantics.
    Untyped,
}

impl MetricKind {
    /// The name used in a `# TYPE` line of the exposition format.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Untyped => "untyped",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit hint attached to every Heka field as its `representation`.
///
/// The hint is matched case-sensitively, exactly as Heka reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Representation {
    /// `"count"`: a number of events.
    Count,
    /// `"ns"`: a duration in nanoseconds.
    Nanoseconds,
    /// `"B"`: a size in bytes.
    Bytes,
    /// Any other hint, including the empty string.
    Other(String),
}

impl Representation {
    /// Parse a representation hint.
    pub fn parse(hint: &str) -> Self {
        match hint {
            "count" => Representation::Count,
            "ns" => Representation::Nanoseconds,
            "B" => Representation::Bytes,
            other => Representation::Other(other.to_string()),
        }
    }

    /// The metric kind this hint maps to.
    pub fn kind(&self) -> MetricKind {
        match self {
            Representation::Count => MetricKind::Counter,
            Representation::Nanoseconds | Representation::Bytes => MetricKind::Gauge,
            Representation::Other(_) => MetricKind::Untyped,
        }
    }
}

/// Infer the metric kind for a representation hint.
///
/// ```
/// use heka_exporter::{infer_type, MetricKind};
///
/// assert_eq!(infer_type("count"), MetricKind::Counter);
/// assert_eq!(infer_type("ns"), MetricKind::Gauge);
/// assert_eq!(infer_type("bytes"), MetricKind::Untyped);
/// ```
pub fn infer_type(hint: &str) -> MetricKind {
    Representation::parse(hint).kind()
}

/// A single metric derived from one field of one pipeline component.
///
/// Records are rebuilt on every scrape and never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    /// The component's `Name`, exported as the `name` label.
    pub component_name: String,
    /// Section the component was found in (e.g. `"outputs"`).
    pub section: String,
    /// Normalized field key.
    pub metric_name: String,
    /// Human readable description.
    pub help: String,
    /// Inferred metric kind.
    pub kind: MetricKind,
    /// Sampled value.
    pub value: f64,
}
