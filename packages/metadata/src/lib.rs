#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Metadata schema flattening, grouping, and UI schema building.
//!
//! The metadata view of a resource is produced in two steps:
//!
//! 1. [`flatten::flatten_instance`] walks the resource's metadata values
//!    together with the schema, keeping only set fields and normalizing
//!    dates and enumerated values for display.
//! 2. [`groups::assign_groups`] partitions the flattened fields into the
//!    display groups declared through the `geonode-ui:group` UI option.
//!
//! The metadata editor additionally needs the schema with its `$ref`
//! pointers inlined ([`openapi::resolve_refs`]) and a UI schema
//! ([`ui_schema`]).

pub mod flatten;
pub mod groups;
pub mod normalize;
pub mod openapi;
pub mod ui_schema;

use thiserror::Error;

pub use flatten::flatten_instance;
pub use groups::{GroupFilter, assign_groups, assign_groups_filtered};

/// Errors from walking a metadata schema.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// A schema fragment has no `type` key.
    #[error("Schema for field '{field}' has no type")]
    MissingType {
        /// Field whose fragment is malformed.
        field: String,
    },

    /// An `object` typed fragment has no `properties`.
    #[error("Object schema for field '{field}' has no properties")]
    MissingProperties {
        /// Field whose fragment is malformed.
        field: String,
    },

    /// The schema declares an object but the value is something else.
    #[error("Field '{field}' is declared as an object but holds a non-object value")]
    NotAnObject {
        /// Field whose value does not match its schema.
        field: String,
    },

    /// A `$ref` points at nothing.
    #[error("Unresolved schema reference: {reference}")]
    UnresolvedRef {
        /// The `$ref` value.
        reference: String,
    },

    /// `$ref` chains nest deeper than [`openapi::MAX_REF_DEPTH`].
    #[error("Schema reference nesting exceeds {max} levels at {reference}")]
    RefDepthExceeded {
        /// The `$ref` value being resolved when the limit was hit.
        reference: String,
        /// The depth limit.
        max: usize,
    },

    /// The schema document does not match the schema types.
    #[error("Invalid schema document: {0}")]
    Json(#[from] serde_json::Error),
}
