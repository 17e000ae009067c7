#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Metadata schema, instance, and UI schema types for GeoNode resources.
//!
//! The schema and instance types describe the input handed over by the
//! metadata provider. The flattened and grouped types describe what the
//! metadata view renders. They carry no behavior beyond small accessors;
//! the traversal lives in `geonode_metadata`.

pub mod instance;
pub mod schema;
pub mod ui;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use instance::{Instance, InstanceValue};
pub use schema::{MetadataSchema, OneOfOption, PropertySchema, TypeDecl};
pub use ui::{FieldUiSchema, LayoutItem, LayoutSection, LayoutTab, UiSchema};

/// Group that receives every field without a `geonode-ui:group` option.
pub const DEFAULT_GROUP: &str = "General";

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Dataset,
    Map,
    Document,
    Geoapp,
    #[serde(other)]
    Other,
}

/// A catalog entry carrying metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Primary key.
    pub pk: i64,
    pub title: String,
    pub resource_type: ResourceType,
    /// Layer name on the map server (datasets only).
    #[serde(default)]
    pub name: String,
    /// Map server workspace the layer lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
}

impl Resource {
    #[must_use]
    pub fn is_dataset(&self) -> bool {
        self.resource_type == ResourceType::Dataset
    }
}

/// Display value of a flattened field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlattenedValue {
    /// A normalized leaf value.
    Scalar(Value),
    /// The flattened fields of an `object` typed field.
    Nested(FlattenedMetadata),
}

/// A field value next to the schema fragment that describes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlattenedEntry {
    pub value: FlattenedValue,
    pub schema: PropertySchema,
}

/// Field name to flattened entry, in instance order.
pub type FlattenedMetadata = IndexMap<String, FlattenedEntry>;

/// Group name to the fields displayed in it, in first-seen order.
pub type MetadataGroups = IndexMap<String, FlattenedMetadata>;
