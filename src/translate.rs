//! Translation of a Heka status report into metric records.
//!
//! The translator walks every known section of a [`StatusDocument`], treats
//! each entry as a named component and turns every other key of that
//! component into a [`MetricRecord`]. It never fails as a whole: a malformed
//! section, component or field is skipped and counted, and its siblings are
//! still translated.
//!
//! Fields whose normalized name is not a valid Prometheus name, and fields
//! whose kind disagrees with an earlier field of the same metric family, are
//! treated as malformed too, so the rendered exposition always parses.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::warn;

use crate::metric::{MetricKind, MetricRecord, Representation};
use crate::normalize::normalize;
use crate::prometheus::is_valid_name_suffix;
use crate::status::{
    json_type_name, StatusDocument, NAME_KEY, REPRESENTATION_KEY, SECTIONS, VALUE_KEY,
};

/// Result of a single translation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translation {
    /// Records in section order, then component order, then field order.
    pub records: Vec<MetricRecord>,
    /// Number of sections, components or fields skipped because of their shape.
    pub malformed: u64,
}

/// Translate a status report into metric records.
///
/// # Example
///
/// ```
/// use heka_exporter::{translate, MetricKind, StatusDocument};
///
/// let doc = StatusDocument::from_slice(br#"{
///     "outputs": [{
///         "Name": "FileOutput",
///         "ProcessMessageCount": { "representation": "count", "value": 42.0 }
///     }]
/// }"#).unwrap();
///
/// let translation = translate(&doc);
/// let record = &translation.records[0];
/// assert_eq!(record.metric_name, "process_message_count");
/// assert_eq!(record.kind, MetricKind::Counter);
/// assert_eq!(record.value, 42.0);
/// ```
pub fn translate(doc: &StatusDocument) -> Translation {
    let mut translation = Translation::default();
    // Kind fixed by the first record of each (section, metric) family.
    let mut kinds: HashMap<(&'static str, String), MetricKind> = HashMap::new();

    for section in SECTIONS {
        let Some(value) = doc.section(section) else {
            continue;
        };

        let Some(entries) = value.as_array() else {
            warn!(
                section,
                found = json_type_name(value),
                "Skipping section that is not an array"
            );
            translation.malformed += 1;
            continue;
        };

        for entry in entries {
            translate_component(section, entry, &mut kinds, &mut translation);
        }
    }

    translation
}

fn translate_component(
    section: &'static str,
    entry: &Value,
    kinds: &mut HashMap<(&'static str, String), MetricKind>,
    translation: &mut Translation,
) {
    let Some(component) = entry.as_object() else {
        warn!(
            section,
            found = json_type_name(entry),
            "Skipping component that is not an object"
        );
        translation.malformed += 1;
        return;
    };

    let Some(name) = component.get(NAME_KEY).and_then(Value::as_str) else {
        warn!(section, "Skipping component without a string Name");
        translation.malformed += 1;
        return;
    };

    for (key, field) in component {
        if key == NAME_KEY {
            continue;
        }

        let record = match translate_field(section, name, key, field) {
            Ok(record) => record,
            Err(reason) => {
                warn!(section, component = name, field = %key, reason, "Skipping malformed field");
                translation.malformed += 1;
                continue;
            }
        };

        let family_kind = *kinds
            .entry((section, record.metric_name.clone()))
            .or_insert(record.kind);
        if family_kind != record.kind {
            warn!(
                section,
                component = name,
                field = %key,
                expected = %family_kind,
                found = %record.kind,
                "Skipping field whose kind conflicts with its metric family"
            );
            translation.malformed += 1;
            continue;
        }

        translation.records.push(record);
    }
}

fn translate_field(
    section: &str,
    component_name: &str,
    key: &str,
    field: &Value,
) -> Result<MetricRecord, &'static str> {
    let field: &Map<String, Value> = field.as_object().ok_or("field is not an object")?;

    let representation = field
        .get(REPRESENTATION_KEY)
        .and_then(Value::as_str)
        .ok_or("missing string representation")?;

    let value = field
        .get(VALUE_KEY)
        .and_then(Value::as_f64)
        .ok_or("missing numeric value")?;

    let metric_name = normalize(key);
    if !is_valid_name_suffix(&metric_name) {
        return Err("key does not normalize to a valid metric name");
    }
    let help = format!("{key} for {metric_name} in {section}");

    Ok(MetricRecord {
        component_name: component_name.to_string(),
        section: section.to_string(),
        metric_name,
        help,
        kind: Representation::parse(representation).kind(),
        value,
    })
}
