//! Resource records and metadata schemas the server reads from.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use geonode_metadata_models::{Instance, Resource};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Language whose schema is served when the requested one is missing.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Errors from reading the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with that key.
    #[error("{what} not found")]
    NotFound {
        /// Description of the missing record.
        what: String,
    },

    /// Reading a record failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record is not valid JSON or has the wrong shape.
    #[error("Invalid record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Access to resources, their metadata values, and the metadata schema.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Looks up a resource by primary key.
    async fn get_resource(&self, pk: i64) -> Result<Resource, StoreError>;

    /// Returns the raw metadata schema document for a two-letter language
    /// code.
    async fn get_schema(&self, lang: &str) -> Result<serde_json::Value, StoreError>;

    /// Returns the metadata values of a resource.
    async fn build_schema_instance(&self, resource: &Resource) -> Result<Instance, StoreError>;

    /// Stores new metadata values for a resource and returns the full
    /// resulting instance. Top-level fields present in `metadata` replace
    /// the stored ones; other fields are kept.
    async fn update_metadata(&self, pk: i64, metadata: Instance) -> Result<Instance, StoreError>;
}

/// A resource file: `{"resource": {...}, "metadata": {...}}`.
#[derive(Debug, Serialize, Deserialize)]
struct ResourceRecord {
    resource: Resource,
    #[serde(default)]
    metadata: Instance,
}

/// Store backed by a directory of JSON files:
///
/// ```text
/// <root>/resources/<pk>.json
/// <root>/schemas/<lang>.json
/// ```
#[derive(Debug, Clone)]
pub struct FileMetadataStore {
    root: PathBuf,
}

impl FileMetadataStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Uses `METADATA_DATA_DIR`, defaulting to `data`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var("METADATA_DATA_DIR").unwrap_or_else(|_| "data".to_string()))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, pk: i64) -> PathBuf {
        self.root.join("resources").join(format!("{pk}.json"))
    }

    async fn read_record(&self, pk: i64) -> Result<ResourceRecord, StoreError> {
        let path = self.record_path(pk);
        let bytes = read_optional(&path).await?.ok_or_else(|| StoreError::NotFound {
            what: format!("Resource {pk}"),
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl MetadataStore for FileMetadataStore {
    async fn get_resource(&self, pk: i64) -> Result<Resource, StoreError> {
        Ok(self.read_record(pk).await?.resource)
    }

    async fn get_schema(&self, lang: &str) -> Result<serde_json::Value, StoreError> {
        let schemas = self.root.join("schemas");

        if let Some(bytes) = read_optional(&schemas.join(format!("{lang}.json"))).await? {
            return Ok(serde_json::from_slice(&bytes)?);
        }

        log::debug!("No metadata schema for '{lang}', using '{DEFAULT_LANGUAGE}'");
        let bytes = read_optional(&schemas.join(format!("{DEFAULT_LANGUAGE}.json")))
            .await?
            .ok_or_else(|| StoreError::NotFound {
                what: format!("Metadata schema for '{lang}'"),
            })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn build_schema_instance(&self, resource: &Resource) -> Result<Instance, StoreError> {
        Ok(self.read_record(resource.pk).await?.metadata)
    }

    async fn update_metadata(&self, pk: i64, metadata: Instance) -> Result<Instance, StoreError> {
        let mut record = self.read_record(pk).await?;
        record.metadata.extend(metadata);

        let bytes = serde_json::to_vec_pretty(&record)?;
        tokio::fs::write(self.record_path(pk), bytes).await?;
        log::debug!("Updated metadata of resource {pk}");

        Ok(record.metadata)
    }
}
