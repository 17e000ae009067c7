//! Partitioning of flattened metadata into display groups.

use geonode_metadata_models::{DEFAULT_GROUP, FlattenedEntry, FlattenedMetadata, MetadataGroups};

/// Which fields the metadata editor shows.
#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    /// Keep fields rendered with the hidden widget.
    pub include_hidden: bool,
    /// Case-insensitive substring the field title must contain.
    pub text: Option<String>,
}

impl GroupFilter {
    /// Filter used by the editor sidebar: hidden fields are skipped.
    #[must_use]
    pub fn visible() -> Self {
        Self::default()
    }

    /// Filter that keeps every field.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            include_hidden: true,
            text: None,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn accepts(&self, name: &str, entry: &FlattenedEntry) -> bool {
        if !self.include_hidden && entry.schema.is_hidden() {
            return false;
        }
        self.text.as_deref().is_none_or(|text| {
            entry
                .schema
                .display_title(name)
                .to_lowercase()
                .contains(&text.to_lowercase())
        })
    }
}

/// Assigns every flattened field to exactly one display group.
///
/// The group comes from the `geonode-ui:group` UI option of the field's
/// schema; fields without one go to [`DEFAULT_GROUP`]. Groups appear in
/// the order their first field appears.
#[must_use]
pub fn assign_groups(metadata: &FlattenedMetadata) -> MetadataGroups {
    assign_groups_filtered(metadata, &GroupFilter::all())
}

/// Like [`assign_groups`], but only for fields accepted by `filter`.
///
/// Groups that end up empty are not created.
#[must_use]
pub fn assign_groups_filtered(metadata: &FlattenedMetadata, filter: &GroupFilter) -> MetadataGroups {
    let mut groups = MetadataGroups::new();

    for (key, entry) in metadata {
        if !filter.accepts(key, entry) {
            continue;
        }
        let group = entry.schema.group().unwrap_or(DEFAULT_GROUP);
        groups
            .entry(group.to_string())
            .or_default()
            .insert(key.clone(), entry.clone());
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten_schema_instance;
    use geonode_metadata_models::{Instance, MetadataSchema};
    use serde_json::json;

    fn flattened() -> FlattenedMetadata {
        let schema: MetadataSchema = serde_json::from_value(json!({"properties": {
            "pk": {"type": "integer", "ui:widget": "hidden"},
            "title": {"type": "string", "title": "Title"},
            "regions": {
                "type": "array",
                "title": "Regions",
                "ui:options": {"geonode-ui:group": "Location"}
            },
            "abstract": {"type": "string", "title": "Abstract"},
            "srid": {
                "type": "string",
                "title": "Spatial reference",
                "ui:options": {"geonode-ui:group": "Location"}
            },
            "license": {
                "type": "string",
                "title": "License",
                "ui:options": {"geonode-ui:group": "Licenses"}
            }
        }}))
        .unwrap();
        let instance: Instance = serde_json::from_value(json!({
            "pk": 12,
            "regions": ["Europe"],
            "title": "Roads",
            "abstract": "Road network",
            "srid": "EPSG:4326",
            "license": "cc-by"
        }))
        .unwrap();
        flatten_schema_instance(&instance, &schema).unwrap()
    }

    #[test]
    fn every_field_lands_in_exactly_one_group() {
        let metadata = flattened();
        let groups = assign_groups(&metadata);

        let total: usize = groups.values().map(FlattenedMetadata::len).sum();
        assert_eq!(total, metadata.len());
        for key in metadata.keys() {
            assert_eq!(groups.values().filter(|g| g.contains_key(key)).count(), 1);
        }
    }

    #[test]
    fn ungrouped_fields_go_to_general_and_order_follows_first_field() {
        let groups = assign_groups(&flattened());

        assert_eq!(groups.keys().collect::<Vec<_>>(), ["General", "Location", "Licenses"]);
        assert_eq!(
            groups[DEFAULT_GROUP].keys().collect::<Vec<_>>(),
            ["pk", "title", "abstract"]
        );
        assert_eq!(groups["Location"].keys().collect::<Vec<_>>(), ["regions", "srid"]);
    }

    #[test]
    fn visible_filter_skips_hidden_fields() {
        let groups = assign_groups_filtered(&flattened(), &GroupFilter::visible());
        assert!(!groups[DEFAULT_GROUP].contains_key("pk"));
    }

    #[test]
    fn text_filter_matches_titles_and_drops_empty_groups() {
        let groups = assign_groups_filtered(&flattened(), &GroupFilter::visible().with_text("LIC"));
        assert_eq!(groups.keys().collect::<Vec<_>>(), ["Licenses"]);

        let groups = assign_groups_filtered(&flattened(), &GroupFilter::all().with_text("pk"));
        assert_eq!(groups[DEFAULT_GROUP].keys().collect::<Vec<_>>(), ["pk"]);
    }
}
