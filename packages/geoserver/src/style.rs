//! GeoServer style records.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::{GeoServerError, rest_endpoint};

/// Style metadata key that makes the style editor open in visual mode.
pub const FORCE_VISUAL_KEY: &str = "msForceVisual";

/// A style as known to GeoServer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub name: String,
    /// Workspace the style belongs to; `None` for global styles.
    pub workspace: Option<String>,
    /// Name of the style body file (e.g. `"roads.sld"`).
    pub filename: String,
    /// Href of the style body (e.g. `".../rest/workspaces/geonode/styles/roads.sld"`).
    pub body_href: String,
}

/// `{"style": {...}}` envelope of the style endpoint.
#[derive(Debug, Deserialize)]
struct StyleEnvelope {
    style: StyleInfo,
}

#[derive(Debug, Deserialize)]
struct StyleInfo {
    name: String,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    workspace: Option<WorkspaceRef>,
}

/// Workspaces are serialized either as a bare name or as `{"name": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkspaceRef {
    Name(String),
    Object { name: String },
}

impl WorkspaceRef {
    fn into_name(self) -> String {
        match self {
            Self::Name(name) | Self::Object { name } => name,
        }
    }
}

impl Style {
    /// Builds a style from a style endpoint response.
    ///
    /// `rest_url` is the REST API root the body href is resolved against.
    ///
    /// # Errors
    ///
    /// Returns [`GeoServerError::Parse`] if the body is not a style record
    /// or `rest_url` is not a valid base URL.
    pub fn from_response(rest_url: &str, body: &Value) -> Result<Self, GeoServerError> {
        let envelope: StyleEnvelope =
            serde_json::from_value(body.clone()).map_err(|e| GeoServerError::Parse {
                message: format!("Invalid style response: {e}"),
            })?;
        let info = envelope.style;
        let workspace = info.workspace.map(WorkspaceRef::into_name);
        let filename = info
            .filename
            .unwrap_or_else(|| format!("{}.sld", info.name));
        let body_href = match &workspace {
            Some(ws) => rest_endpoint(rest_url, &["workspaces", ws, "styles", &filename])?,
            None => rest_endpoint(rest_url, &["styles", &filename])?,
        }
        .to_string();

        Ok(Self {
            name: info.name,
            workspace,
            filename,
            body_href,
        })
    }

    /// Href of the style's JSON record: the body href with its file
    /// extension replaced by `.json`.
    #[must_use]
    pub fn metadata_href(&self) -> String {
        let file_start = self.body_href.rfind('/').map_or(0, |i| i + 1);
        let stem_end = self.body_href[file_start..]
            .rfind('.')
            .filter(|&i| i > 0)
            .map_or(self.body_href.len(), |i| file_start + i);
        format!("{}.json", &self.body_href[..stem_end])
    }
}

/// Request body that sets the visual-mode flag on a style.
#[must_use]
pub fn force_visual_body() -> Value {
    json!({"style": {"metadata": {FORCE_VISUAL_KEY: "true"}}})
}
