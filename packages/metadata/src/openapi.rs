//! Inlining of `$ref` pointers in the schema document.
//!
//! The metadata schema endpoint serves an OpenAPI-style document where
//! shared definitions are referenced as `{"$ref": "#/components/schemas/X"}`.
//! The form renderer and the flattener both need the references replaced
//! by the definitions they point to.

use geonode_metadata_models::MetadataSchema;
use serde_json::{Map, Value};

use crate::MetadataError;

/// Key marking a reference object.
pub const REF_KEY: &str = "$ref";

/// Maximum number of nested references followed before giving up.
pub const MAX_REF_DEPTH: usize = 32;

/// Whether `document` contains any `$ref` key.
#[must_use]
pub fn has_refs(document: &Value) -> bool {
    match document {
        Value::Array(items) => items.iter().any(has_refs),
        Value::Object(fields) => fields
            .iter()
            .any(|(key, value)| key == REF_KEY || has_refs(value)),
        _ => false,
    }
}

/// Returns a copy of `document` with every reference object replaced by
/// the definition it points at.
///
/// Reference targets are looked up in the original document, and
/// references inside a definition are resolved too.
///
/// # Errors
///
/// * [`MetadataError::UnresolvedRef`] if a pointer has no target
/// * [`MetadataError::RefDepthExceeded`] if references nest deeper than
///   [`MAX_REF_DEPTH`] (e.g. a self-referencing definition)
pub fn resolve_refs(document: &Value) -> Result<Value, MetadataError> {
    resolve(document, document, 0)
}

/// Resolves references and deserializes the result as a [`MetadataSchema`].
///
/// # Errors
///
/// See [`resolve_refs`]; additionally [`MetadataError::Json`] if the
/// resolved document is not a valid schema.
pub fn parse_schema(document: &Value) -> Result<MetadataSchema, MetadataError> {
    let resolved = resolve_refs(document)?;
    Ok(serde_json::from_value(resolved)?)
}

fn resolve(node: &Value, root: &Value, depth: usize) -> Result<Value, MetadataError> {
    match node {
        Value::Array(items) => items
            .iter()
            .map(|item| resolve(item, root, depth))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(fields) => {
            if let Some(reference) = fields.get(REF_KEY) {
                let reference = reference.as_str().unwrap_or_default();
                if depth >= MAX_REF_DEPTH {
                    return Err(MetadataError::RefDepthExceeded {
                        reference: reference.to_string(),
                        max: MAX_REF_DEPTH,
                    });
                }
                let target = lookup(root, reference).ok_or_else(|| {
                    MetadataError::UnresolvedRef {
                        reference: reference.to_string(),
                    }
                })?;
                return resolve(target, root, depth + 1);
            }
            fields
                .iter()
                .map(|(key, value)| Ok((key.clone(), resolve(value, root, depth)?)))
                .collect::<Result<Map<_, _>, MetadataError>>()
                .map(Value::Object)
        }
        other => Ok(other.clone()),
    }
}

/// Looks up a local `#/a/b` reference as a JSON pointer.
fn lookup<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let pointer = reference.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(root);
    }
    root.pointer(pointer)
}
