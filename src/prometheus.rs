//! Prometheus exposition format support.
//!
//! Renders translated [`MetricRecord`]s together with the exporter's own
//! counters in the Prometheus text-based exposition format (version 0.0.4).
//!
//! Records sharing a fully-qualified name form one metric family: the
//! `# HELP` and `# TYPE` lines are written once and every component becomes a
//! sample distinguished by its `name` label. A family has a single kind, and
//! records that would break the text format (an invalid name, or a kind that
//! disagrees with the family) are left out.

use std::collections::HashMap;
use std::fmt::Write;

use tracing::{debug, warn};

use crate::metric::{MetricKind, MetricRecord};

/// Content type of the text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Label carrying the component name.
pub const NAME_LABEL: &str = "name";

/// Exporter-level counters rendered after the component metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessCounters {
    /// Failed fetches or decodes of the status report.
    pub errors_total: u64,
    /// Sections, components or fields skipped because of their shape.
    pub malformed_fields_total: u64,
}

/// Join non-empty name parts with underscores.
///
/// ```
/// use heka_exporter::prometheus::build_fq_name;
///
/// assert_eq!(build_fq_name("heka", "outputs", "memory"), "heka_outputs_memory");
/// assert_eq!(build_fq_name("", "outputs", "memory"), "outputs_memory");
/// ```
pub fn build_fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

/// Whether `name` matches `[a-zA-Z_:][a-zA-Z0-9_:]*`.
///
/// ```
/// use heka_exporter::prometheus::is_valid_metric_name;
///
/// assert!(is_valid_metric_name("heka_outputs_memory"));
/// assert!(!is_valid_metric_name("heka-outputs"));
/// assert!(!is_valid_metric_name("9lives"));
/// ```
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == ':' => {}
        _ => return false,
    }
    chars.all(is_name_char)
}

/// Whether `suffix` can follow an underscore in a metric name.
pub(crate) fn is_valid_name_suffix(suffix: &str) -> bool {
    !suffix.is_empty() && suffix.chars().all(is_name_char)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == ':'
}

struct Family<'a> {
    name: String,
    help: &'a str,
    kind: MetricKind,
    samples: Vec<&'a MetricRecord>,
}

/// Format records and process counters as Prometheus exposition text.
pub fn format_prometheus(
    records: &[MetricRecord],
    namespace: &str,
    counters: ProcessCounters,
) -> String {
    let mut families: Vec<Family<'_>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let name = build_fq_name(namespace, &record.section, &record.metric_name);
        if !is_valid_metric_name(&name) {
            warn!(
                metric = %name,
                component = %record.component_name,
                "Dropping sample with invalid metric name"
            );
            continue;
        }
        match index.get(&name).copied() {
            Some(i) => {
                let family = &mut families[i];
                if family.kind != record.kind {
                    warn!(
                        metric = %name,
                        component = %record.component_name,
                        expected = %family.kind,
                        found = %record.kind,
                        "Dropping sample whose kind conflicts with its family"
                    );
                    continue;
                }
                // One sample per label value; the first one reported wins.
                if family
                    .samples
                    .iter()
                    .any(|s| s.component_name == record.component_name)
                {
                    debug!(
                        metric = %name,
                        component = %record.component_name,
                        "Dropping duplicate sample"
                    );
                    continue;
                }
                family.samples.push(record);
            }
            None => {
                index.insert(name.clone(), families.len());
                families.push(Family {
                    name,
                    help: &record.help,
                    kind: record.kind,
                    samples: vec![record],
                });
            }
        }
    }

    let mut output = String::new();

    for family in &families {
        write_header(&mut output, &family.name, family.help, family.kind);
        for sample in &family.samples {
            let _ = writeln!(
                output,
                "{}{{{}=\"{}\"}} {}",
                family.name,
                NAME_LABEL,
                escape_label_value(&sample.component_name),
                format_value(sample.value)
            );
        }
    }

    let errors = build_fq_name(namespace, "", "errors_total");
    write_header(
        &mut output,
        &errors,
        "Number of errors when collecting heka metrics.",
        MetricKind::Counter,
    );
    let _ = writeln!(output, "{} {}", errors, counters.errors_total);

    let malformed = build_fq_name(namespace, "", "malformed_fields_total");
    write_header(
        &mut output,
        &malformed,
        "Number of malformed sections, components or fields skipped in heka reports.",
        MetricKind::Counter,
    );
    let _ = writeln!(output, "{} {}", malformed, counters.malformed_fields_total);

    output
}

fn write_header(output: &mut String, name: &str, help: &str, kind: MetricKind) {
    let _ = writeln!(output, "# HELP {} {}", name, escape_help(help));
    let _ = writeln!(output, "# TYPE {} {}", name, kind);
}

/// Format a sample value the way Prometheus expects special floats.
fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

/// Escape a label value for Prometheus format.
/// Backslash, double-quote, and newline must be escaped.
fn escape_label_value(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Escape help text. Only backslash and newline are special here.
fn escape_help(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\n', "\\n")
}
