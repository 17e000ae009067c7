#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the GeoNode metadata server.
//!
//! These types are serialized to JSON for the REST API. They wrap the
//! metadata models so the API contract can evolve independently.

use geonode_metadata_models::{Instance, MetadataGroups, Resource, UiSchema};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiHealth {
    pub healthy: bool,
    pub version: String,
}

/// Read-only metadata view of a resource.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetadataView {
    pub resource: Resource,
    /// Flattened metadata fields by display group.
    pub metadata_groups: MetadataGroups,
}

/// Schema and UI schema for the metadata editor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSchemaView {
    /// Schema document with all references inlined.
    pub schema: serde_json::Value,
    pub ui_schema: UiSchema,
}

/// Editable metadata of a resource, with the form it is edited in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetadataEditView {
    /// Schema document with all references inlined.
    pub schema: serde_json::Value,
    pub ui_schema: UiSchema,
    /// Raw metadata values, not flattened.
    pub metadata: Instance,
}

/// Result of a style visual-mode update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiVisualStyle {
    /// Whether a style was updated.
    pub updated: bool,
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    #[must_use]
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}
