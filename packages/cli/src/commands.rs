//! Implementations of the CLI subcommands.

use std::path::Path;

use geonode_geoserver::GeoServerClient;
use geonode_metadata::openapi::parse_schema;
use geonode_metadata::ui_schema::{
    default_ui_schema, extract_ui_schema, layout_tabs, merge_ui_schema,
};
use geonode_metadata::{GroupFilter, assign_groups_filtered, flatten_instance};
use geonode_metadata_models::{Instance, MetadataSchema, Resource, ResourceType};
use serde_json::Value;

type CommandResult = Result<Value, Box<dyn std::error::Error>>;

fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&text)?)
}

fn read_schema(path: &Path) -> Result<MetadataSchema, Box<dyn std::error::Error>> {
    Ok(parse_schema(&read_json(path)?)?)
}

/// Flattens the instance at `instance_path`, grouped when `filter` is set.
pub fn flatten(schema_path: &Path, instance_path: &Path, filter: Option<&GroupFilter>) -> CommandResult {
    let schema = read_schema(schema_path)?;
    let instance: Instance = serde_json::from_value(read_json(instance_path)?)?;
    log::debug!(
        "Flattening {} fields against {} schema properties",
        instance.len(),
        schema.properties.len()
    );

    let flattened = flatten_instance(&instance, &schema.properties)?;
    let output = match filter {
        Some(filter) => serde_json::to_value(assign_groups_filtered(&flattened, filter))?,
        None => serde_json::to_value(flattened)?,
    };
    Ok(output)
}

/// Prints the default UI schema, optionally merged with the hints of a
/// schema file, or its layout tabs.
pub fn ui_schema(schema_path: Option<&Path>, tabs: bool) -> CommandResult {
    let mut field_names = Vec::new();
    let ui = match schema_path {
        Some(path) => {
            let schema = read_schema(path)?;
            field_names.extend(schema.properties.keys().cloned());
            merge_ui_schema(default_ui_schema(), extract_ui_schema(&schema.properties))
        }
        None => {
            let ui = default_ui_schema();
            field_names.extend(ui.fields.keys().cloned());
            ui
        }
    };

    if tabs {
        return Ok(serde_json::to_value(layout_tabs(
            &ui,
            field_names.iter().map(String::as_str),
        ))?);
    }
    Ok(serde_json::to_value(ui)?)
}

/// Forces visual mode on the style of dataset `name`.
pub async fn visual_style(name: String, workspace: Option<String>) -> CommandResult {
    let client = GeoServerClient::from_env()?;
    let dataset = Resource {
        pk: 0,
        title: name.clone(),
        resource_type: ResourceType::Dataset,
        name,
        workspace,
    };

    let updated = client.force_visual_mode(&dataset).await?;
    Ok(serde_json::json!({ "updated": updated }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_fixtures(name: &str) -> (std::path::PathBuf, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let schema = dir.join("schema.json");
        std::fs::write(
            &schema,
            json!({
                "properties": {
                    "pk": {"type": "integer", "ui:widget": "hidden"},
                    "title": {"type": "string", "title": "Title"},
                    "license": {"$ref": "#/defs/License"}
                },
                "defs": {"License": {
                    "type": "string",
                    "title": "License",
                    "ui:options": {"geonode-ui:group": "Licenses", "sectionId": "location-and-licenses"}
                }}
            })
            .to_string(),
        )
        .unwrap();

        let instance = dir.join("instance.json");
        std::fs::write(
            &instance,
            json!({"pk": 3, "title": "Roads", "license": "cc-by", "abstract": null}).to_string(),
        )
        .unwrap();

        (schema, instance)
    }

    #[test]
    fn flatten_without_grouping() {
        let (schema, instance) = write_fixtures("geonode_cli_test_flatten");

        let output = flatten(&schema, &instance, None).unwrap();

        assert_eq!(output["title"]["value"], json!("Roads"));
        assert_eq!(output["license"]["schema"]["title"], json!("License"));
        assert!(output.get("abstract").is_none());
    }

    #[test]
    fn flatten_grouped_visible_only() {
        let (schema, instance) = write_fixtures("geonode_cli_test_grouped");

        let output = flatten(&schema, &instance, Some(&GroupFilter::visible())).unwrap();

        assert!(output["General"].get("pk").is_none());
        assert_eq!(output["Licenses"]["license"]["value"], json!("cc-by"));
    }

    #[test]
    fn ui_schema_tabs_include_schema_fields() {
        let (schema, _) = write_fixtures("geonode_cli_test_tabs");

        let output = ui_schema(Some(&schema), true).unwrap();

        let ids: Vec<&str> = output
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|tab| tab["id"].as_str())
            .collect();
        assert_eq!(ids, ["basic", "location-and-licenses"]);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = ui_schema(Some(Path::new("/nonexistent/schema.json")), false).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/schema.json"));
    }
}
