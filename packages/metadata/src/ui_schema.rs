//! UI schema for the metadata editor form.
//!
//! The form renderer reads per-field hints (`ui:widget`, `ui:help`,
//! `ui:options`) and the custom `gn:layout` section list. Field hints come
//! from the schema itself ([`extract_ui_schema`]) and from the defaults
//! shipped here ([`default_ui_schema`]).

use geonode_metadata_models::schema::UI_OPTIONS_KEY;
use geonode_metadata_models::ui::DEFAULT_SECTION_ID;
use geonode_metadata_models::{
    FieldUiSchema, LayoutItem, LayoutSection, LayoutTab, PropertySchema, UiSchema,
};
use indexmap::IndexMap;
use serde_json::Value;

/// UI option selecting the layout section of a field.
pub const SECTION_OPTION_KEY: &str = "sectionId";

/// UI option selecting the CSS grid area of a field inside its section.
pub const GRID_AREA_OPTION_KEY: &str = "gridArea";

fn style(entries: &[(&str, &str)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

/// Sections of the editor form, in tab order.
#[must_use]
pub fn default_layout() -> Vec<LayoutSection> {
    vec![
        LayoutSection {
            id: "basic".to_string(),
            title: "Basic Metadata".to_string(),
            style: style(&[
                ("display", "grid"),
                ("gap", "1rem"),
                ("gridTemplateRows", "auto auto auto"),
                ("gridTemplateColumns", "1fr 0.5fr 0.5fr"),
                (
                    "gridTemplateAreas",
                    "'left top-middle top-right' 'left right right' 'left bottom bottom' 'footer footer footer'",
                ),
            ]),
        },
        LayoutSection {
            id: "location-and-licenses".to_string(),
            title: "Location and Licenses".to_string(),
            style: style(&[
                ("display", "grid"),
                ("gap", "1rem"),
                ("gridTemplateRows", "auto auto"),
                ("gridTemplateColumns", "1fr 1fr 1fr"),
                ("gridTemplateAreas", "'left middle right' 'footer footer footer'"),
            ]),
        },
        LayoutSection {
            id: DEFAULT_SECTION_ID.to_string(),
            title: "Optional Metadata".to_string(),
            style: style(&[("maxWidth", "50ch")]),
        },
    ]
}

/// The UI schema shipped with the metadata editor.
#[must_use]
pub fn default_ui_schema() -> UiSchema {
    let mut fields = IndexMap::new();
    fields.insert("pk".to_string(), FieldUiSchema::default().with_widget("hidden"));
    fields.insert(
        "title".to_string(),
        FieldUiSchema::default()
            .with_help("(Help from uiSchema) Name by which the cited resource is known")
            .with_option(SECTION_OPTION_KEY, "basic")
            .with_option(GRID_AREA_OPTION_KEY, "left"),
    );
    fields.insert(
        "regions".to_string(),
        FieldUiSchema::default()
            .with_widget("select")
            .with_option(SECTION_OPTION_KEY, "location-and-licenses")
            .with_option(GRID_AREA_OPTION_KEY, "middle"),
    );

    UiSchema {
        layout: default_layout(),
        fields,
    }
}

/// Collects the `ui:*` hints of every property.
///
/// Hints of the properties of an `object` field are added to that field's
/// entry, keyed by the nested property name. Properties without any hint
/// are left out.
#[must_use]
pub fn extract_ui_schema(properties: &IndexMap<String, PropertySchema>) -> UiSchema {
    UiSchema {
        layout: Vec::new(),
        fields: extract_fields(properties),
    }
}

fn extract_fields(properties: &IndexMap<String, PropertySchema>) -> IndexMap<String, FieldUiSchema> {
    let mut fields = IndexMap::new();

    for (key, schema) in properties {
        let mut field = FieldUiSchema(
            schema
                .ui_entries()
                .map(|(ui_key, value)| (ui_key.clone(), value.clone()))
                .collect(),
        );

        let nested = schema.properties.as_ref().filter(|_| schema.is_object());
        for (nested_key, nested_field) in nested.map(extract_fields).unwrap_or_default() {
            field.0.insert(nested_key, Value::Object(nested_field.0));
        }

        if !field.is_empty() {
            fields.insert(key.clone(), field);
        }
    }

    fields
}

/// Layers `overrides` on top of `base`.
///
/// Field entries are merged key by key, with `ui:options` merged one level
/// deeper. A non-empty layout in `overrides` replaces the base layout.
#[must_use]
pub fn merge_ui_schema(mut base: UiSchema, overrides: UiSchema) -> UiSchema {
    if !overrides.layout.is_empty() {
        base.layout = overrides.layout;
    }

    for (key, field) in overrides.fields {
        let target = base.fields.entry(key).or_default();
        for (ui_key, value) in field.0 {
            if ui_key == UI_OPTIONS_KEY {
                if let (Some(Value::Object(existing)), Value::Object(incoming)) =
                    (target.0.get_mut(&ui_key), &value)
                {
                    existing.extend(incoming.clone());
                    continue;
                }
            }
            target.0.insert(ui_key, value);
        }
    }

    base
}

/// Distributes `field_names` over the layout sections of `ui_schema`.
///
/// Hidden fields are skipped. A field goes to the section named by its
/// `sectionId` option, or to the default `_` section. Sections are
/// returned in layout order and only if at least one field landed in them.
#[must_use]
pub fn layout_tabs<'a>(
    ui_schema: &UiSchema,
    field_names: impl IntoIterator<Item = &'a str>,
) -> Vec<LayoutTab> {
    let mut sections: IndexMap<&str, Vec<LayoutItem>> = IndexMap::new();

    for name in field_names {
        let field = ui_schema.fields.get(name);
        if field.is_some_and(FieldUiSchema::is_hidden) {
            continue;
        }
        let section_id = field
            .and_then(|f| f.option_str(SECTION_OPTION_KEY))
            .unwrap_or(DEFAULT_SECTION_ID);
        sections.entry(section_id).or_default().push(LayoutItem {
            name: name.to_string(),
            grid_area: field
                .and_then(|f| f.option_str(GRID_AREA_OPTION_KEY))
                .map(str::to_string),
        });
    }

    ui_schema
        .layout
        .iter()
        .filter_map(|section| {
            sections
                .shift_remove(section.id.as_str())
                .map(|items| LayoutTab {
                    section: section.clone(),
                    items,
                })
        })
        .collect()
}
