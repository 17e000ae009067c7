//! Flattening of a resource's metadata values against its schema.

use geonode_metadata_models::{
    FlattenedEntry, FlattenedMetadata, FlattenedValue, Instance, MetadataSchema, PropertySchema,
};
use indexmap::IndexMap;

use crate::MetadataError;
use crate::normalize::normalize_value;

/// Flattens `instance` against the top-level properties of `schema`.
///
/// # Errors
///
/// See [`flatten_instance`].
pub fn flatten_schema_instance(
    instance: &Instance,
    schema: &MetadataSchema,
) -> Result<FlattenedMetadata, MetadataError> {
    flatten_instance(instance, &schema.properties)
}

/// Pairs every set field of `instance` with its schema fragment.
///
/// Unset fields (see [`InstanceValue::is_truthy`]) are dropped. Fields the
/// schema does not describe get an untyped fragment. Fields whose fragment
/// is `object` typed are flattened recursively against the fragment's
/// `properties`; every other value is normalized for display.
///
/// [`InstanceValue::is_truthy`]: geonode_metadata_models::InstanceValue::is_truthy
///
/// # Errors
///
/// * [`MetadataError::MissingType`] if a fragment has no `type` key
/// * [`MetadataError::MissingProperties`] if an `object` fragment has no
///   `properties`
/// * [`MetadataError::NotAnObject`] if an `object` field holds a
///   non-object value
pub fn flatten_instance(
    instance: &Instance,
    properties: &IndexMap<String, PropertySchema>,
) -> Result<FlattenedMetadata, MetadataError> {
    let mut metadata = FlattenedMetadata::new();

    for (key, value) in instance {
        if !value.is_truthy() {
            continue;
        }

        let schema = properties.get(key).cloned().unwrap_or_else(|| {
            log::trace!("No schema for metadata field '{key}'");
            PropertySchema::untyped()
        });

        if schema.kind.is_none() {
            return Err(MetadataError::MissingType { field: key.clone() });
        }

        let value = if schema.is_object() {
            let nested_properties =
                schema
                    .properties
                    .as_ref()
                    .ok_or_else(|| MetadataError::MissingProperties {
                        field: key.clone(),
                    })?;
            let nested = value
                .as_object()
                .ok_or_else(|| MetadataError::NotAnObject { field: key.clone() })?;
            FlattenedValue::Nested(flatten_instance(nested, nested_properties)?)
        } else {
            FlattenedValue::Scalar(normalize_value(value, &schema))
        };

        metadata.insert(key.clone(), FlattenedEntry { value, schema });
    }

    Ok(metadata)
}
