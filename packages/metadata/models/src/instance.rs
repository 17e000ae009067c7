//! Metadata values of a single resource.

use chrono::{DateTime, FixedOffset, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Field name to value mapping for one resource, in schema order.
pub type Instance = IndexMap<String, InstanceValue>;

/// A metadata value.
///
/// Mirrors JSON with two extra variants for literal dates, which callers
/// that build instances from typed records (rather than from JSON) use.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    /// A calendar date.
    Date(NaiveDate),
    /// A timestamp with its original offset.
    DateTime(DateTime<FixedOffset>),
    List(Vec<Self>),
    Object(Instance),
}

impl InstanceValue {
    /// Whether the value counts as set: `null`, `false`, zero, empty
    /// strings, and empty collections do not.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
            Self::Text(s) => !s.is_empty(),
            Self::Date(_) | Self::DateTime(_) => true,
            Self::List(items) => !items.is_empty(),
            Self::Object(fields) => !fields.is_empty(),
        }
    }

    /// Returns the nested fields of an object value.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Instance> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Converts back to JSON. Dates use ISO 8601 / RFC 3339.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Text(s) => Value::String(s.clone()),
            Self::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            Self::DateTime(dt) => Value::String(dt.to_rfc3339()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for InstanceValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(fields) => Self::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for InstanceValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<NaiveDate> for InstanceValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<FixedOffset>> for InstanceValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::DateTime(value)
    }
}

impl Serialize for InstanceValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InstanceValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values() {
        for raw in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!InstanceValue::from(raw.clone()).is_truthy(), "{raw} should be falsy");
        }
    }

    #[test]
    fn truthy_values() {
        for raw in [json!(true), json!(-1), json!(0.5), json!("x"), json!([0]), json!({"a": null})] {
            assert!(InstanceValue::from(raw.clone()).is_truthy(), "{raw} should be truthy");
        }
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(InstanceValue::from(date).is_truthy());
    }

    #[test]
    fn deserializes_nested_objects() {
        let instance: Instance = serde_json::from_value(json!({
            "title": "Roads",
            "contact": {"name": "Jane", "email": ""}
        }))
        .unwrap();
        let contact = instance["contact"].as_object().unwrap();
        assert_eq!(contact["name"], InstanceValue::from("Jane"));
        assert_eq!(serde_json::to_value(&instance).unwrap()["contact"]["email"], json!(""));
    }
}
