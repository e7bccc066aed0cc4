//! The Heka status report document.
//!
//! Heka's dashboard output publishes a JSON report grouping plugins into
//! sections. Each section is a list of components, and every key of a
//! component other than `Name` is a field carrying a `value` and a
//! `representation` hint:
//!
//! ```json
//! {
//!     "outputs": [
//!         {
//!             "Name": "FileOutput",
//!             "ProcessMessageCount": { "representation": "count", "value": 42 }
//!         }
//!     ]
//! }
//! ```
//!
//! The document is kept as an untyped [`serde_json::Value`] tree because the
//! field set differs per plugin. Key order is preserved as received.

use serde_json::{Map, Value};

use crate::ExporterError;

/// Sections of the report that hold pipeline components, in translation order.
pub const SECTIONS: [&str; 6] = [
    "decoders", "encoders", "filters", "globals", "inputs", "outputs",
];

/// Key holding a component's identifier.
pub const NAME_KEY: &str = "Name";

/// Key holding a field's numeric value.
pub const VALUE_KEY: &str = "value";

/// Key holding a field's unit hint.
pub const REPRESENTATION_KEY: &str = "representation";

/// A decoded status report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusDocument {
    root: Map<String, Value>,
}

impl StatusDocument {
    /// Decode a report from raw JSON bytes.
    ///
    /// Fails if the bytes are not JSON or the top level is not an object.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ExporterError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Wrap an already decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, ExporterError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(ExporterError::Decode(format!(
                "expected a JSON object, found {}",
                json_type_name(&other)
            ))),
        }
    }

    /// The raw value of a section, if present and not `null`.
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.root.get(name).filter(|v| !v.is_null())
    }
}

/// Name of a JSON value's type, for diagnostics.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
