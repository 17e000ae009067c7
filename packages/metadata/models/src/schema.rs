//! JSON-schema-like description of a resource's metadata fields.
//!
//! Only the keys the flattener and UI schema builder act on are typed;
//! everything else (including every `ui:*` hint) is kept verbatim in the
//! `extra` map so that a fragment round-trips to the front-end unchanged.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Key of the per-field UI options object.
pub const UI_OPTIONS_KEY: &str = "ui:options";

/// Key of the per-field widget hint.
pub const UI_WIDGET_KEY: &str = "ui:widget";

/// Prefix shared by every UI hint key.
pub const UI_KEY_PREFIX: &str = "ui:";

/// UI option naming the display group of a field.
pub const GROUP_OPTION_KEY: &str = "geonode-ui:group";

/// Widget name that hides a field from the form.
pub const HIDDEN_WIDGET: &str = "hidden";

/// Schema `format` value for timestamps.
pub const DATE_TIME_FORMAT: &str = "date-time";

/// Root metadata schema as served by the schema provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataSchema {
    /// Top-level field definitions.
    #[serde(default)]
    pub properties: IndexMap<String, PropertySchema>,
    /// Remaining schema keys (`title`, `required`, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Declared `type` of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDecl {
    /// `"type": null`
    Null,
    /// `"type": "string"`
    Single(String),
    /// `"type": ["string", "null"]`
    Union(Vec<String>),
}

/// Schema fragment for a single field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// `None` when the fragment has no `type` key at all, which is
    /// distinct from an explicit `null`.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<TypeDecl>,
    /// Human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Value format hint (e.g. `date-time`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Enumerated `{const, title}` choices.
    #[serde(rename = "oneOf", default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<OneOfOption>>,
    /// Nested field definitions for `object` typed fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Self>>,
    /// Everything else, including `ui:*` hints.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// One enumerated choice of a `oneOf` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OneOfOption {
    /// Stored value. `Some(Value::Null)` for an explicit `"const": null`.
    #[serde(
        rename = "const",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub constant: Option<Value>,
    /// Display label for the stored value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Deserializes a field that is present in the input, keeping `null` as
/// a value instead of collapsing it into `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Value equality where numbers compare by magnitude, so `1.0` equals `1`.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => (x - y).abs() <= f64::EPSILON * x.abs().max(y.abs()),
            _ => x == y,
        },
        _ => a == b,
    }
}

impl PropertySchema {
    /// Fragment used for instance keys that the schema does not describe.
    #[must_use]
    pub fn untyped() -> Self {
        Self {
            kind: Some(TypeDecl::Null),
            ..Self::default()
        }
    }

    /// Whether this fragment declares exactly `"type": "object"`.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(&self.kind, Some(TypeDecl::Single(t)) if t == "object")
    }

    /// Whether the value format is `date-time`.
    #[must_use]
    pub fn is_date_time(&self) -> bool {
        self.format.as_deref() == Some(DATE_TIME_FORMAT)
    }

    /// The `ui:options` object, if any.
    #[must_use]
    pub fn ui_options(&self) -> Option<&Map<String, Value>> {
        self.extra.get(UI_OPTIONS_KEY).and_then(Value::as_object)
    }

    /// Reads a string UI option.
    #[must_use]
    pub fn ui_option_str(&self, key: &str) -> Option<&str> {
        self.ui_options()
            .and_then(|options| options.get(key))
            .and_then(Value::as_str)
    }

    /// The widget hint, from `ui:widget` or `ui:options.widget`.
    #[must_use]
    pub fn ui_widget(&self) -> Option<&str> {
        self.extra
            .get(UI_WIDGET_KEY)
            .and_then(Value::as_str)
            .or_else(|| self.ui_option_str("widget"))
    }

    /// Whether the field is rendered with the hidden widget.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.ui_widget() == Some(HIDDEN_WIDGET)
    }

    /// The display group declared through `geonode-ui:group`, ignoring
    /// empty labels.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.ui_option_str(GROUP_OPTION_KEY)
            .filter(|group| !group.is_empty())
    }

    /// Iterates over the `ui:*` keys of this fragment.
    pub fn ui_entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.extra
            .iter()
            .filter(|(key, _)| key.starts_with(UI_KEY_PREFIX))
    }

    /// Title of the `oneOf` choice whose `const` equals `value`.
    #[must_use]
    pub fn one_of_title(&self, value: &Value) -> Option<&str> {
        self.one_of
            .as_deref()?
            .iter()
            .find(|option| {
                option
                    .constant
                    .as_ref()
                    .is_some_and(|constant| same_value(constant, value))
            })
            .and_then(|option| option.title.as_deref())
    }

    /// Label to show for the field named `name`.
    #[must_use]
    pub fn display_title<'a>(&'a self, name: &'a str) -> &'a str {
        self.title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(name)
    }
}
