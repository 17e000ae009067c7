//! UI schema consumed by the metadata form renderer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{HIDDEN_WIDGET, UI_OPTIONS_KEY, UI_WIDGET_KEY};

/// Key of the custom section layout list.
pub const LAYOUT_KEY: &str = "gn:layout";

/// Key of the field help text.
pub const UI_HELP_KEY: &str = "ui:help";

/// Section that collects fields without a `sectionId` option.
pub const DEFAULT_SECTION_ID: &str = "_";

/// Field name to UI hints, plus the optional section layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiSchema {
    #[serde(rename = "gn:layout", default, skip_serializing_if = "Vec::is_empty")]
    pub layout: Vec<LayoutSection>,
    #[serde(flatten)]
    pub fields: IndexMap<String, FieldUiSchema>,
}

/// UI hints for a single field (`ui:widget`, `ui:help`, `ui:options`,
/// and the hints of nested fields keyed by their name).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldUiSchema(pub Map<String, Value>);

impl FieldUiSchema {
    #[must_use]
    pub fn with_widget(mut self, widget: &str) -> Self {
        self.0.insert(UI_WIDGET_KEY.to_string(), Value::from(widget));
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: &str) -> Self {
        self.0.insert(UI_HELP_KEY.to_string(), Value::from(help));
        self
    }

    /// Sets a single key of `ui:options`, creating the object if needed.
    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<Value>) -> Self {
        let options = self
            .0
            .entry(UI_OPTIONS_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !options.is_object() {
            *options = Value::Object(Map::new());
        }
        if let Value::Object(options) = options {
            options.insert(key.to_string(), value.into());
        }
        self
    }

    #[must_use]
    pub fn widget(&self) -> Option<&str> {
        self.0
            .get(UI_WIDGET_KEY)
            .and_then(Value::as_str)
            .or_else(|| self.option_str("widget"))
    }

    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.0.get(UI_HELP_KEY).and_then(Value::as_str)
    }

    #[must_use]
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(UI_OPTIONS_KEY)
            .and_then(Value::as_object)
            .and_then(|options| options.get(key))
            .and_then(Value::as_str)
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.widget() == Some(HIDDEN_WIDGET)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A tab of the metadata editor form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSection {
    pub id: String,
    pub title: String,
    /// CSS properties applied to the section container.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub style: IndexMap<String, String>,
}

/// A field placed in a layout section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_area: Option<String>,
}

/// A layout section together with the fields assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutTab {
    #[serde(flatten)]
    pub section: LayoutSection,
    pub items: Vec<LayoutItem>,
}
