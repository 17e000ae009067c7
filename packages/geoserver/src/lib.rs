#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! GeoServer REST client for GeoNode dataset styles.
//!
//! GeoNode publishes every dataset as a GeoServer layer with a style of
//! the same name. The style editor opens in visual mode only when the
//! style's metadata carries `msForceVisual`; [`GeoServerClient::force_visual_mode`]
//! sets that flag after a dataset is created.
//!
//! Connection settings come from the environment, see
//! [`GeoServerConfig::from_env`].

pub mod client;
pub mod style;

use thiserror::Error;

pub use client::GeoServerClient;
pub use style::Style;

/// Statuses accepted as a successful style update.
pub const SUCCESS_STATUSES: &[u16] = &[200, 201, 202];

/// Errors from GeoServer REST calls.
#[derive(Debug, Error)]
pub enum GeoServerError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GeoServer answered with an unexpected status.
    #[error("Failed to update style {style} : {status}, {body}")]
    FailedRequest {
        /// Style the request was about.
        style: String,
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// GeoServer answered a style lookup with an unexpected status.
    #[error("Failed to fetch style {style} : {status}, {body}")]
    LookupFailed {
        /// Style being looked up.
        style: String,
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// Connection settings for the GeoServer REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoServerConfig {
    /// GeoServer root URL without the `/rest` suffix
    /// (e.g. `"http://localhost:8080/geoserver"`).
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl Default for GeoServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/geoserver".to_string(),
            username: "admin".to_string(),
            password: "geoserver".to_string(),
        }
    }
}

impl GeoServerConfig {
    /// Reads `GEOSERVER_URL`, `GEOSERVER_USER`, and `GEOSERVER_PASSWORD`,
    /// falling back to the GeoNode development defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("GEOSERVER_URL").unwrap_or(defaults.base_url),
            username: std::env::var("GEOSERVER_USER").unwrap_or(defaults.username),
            password: std::env::var("GEOSERVER_PASSWORD").unwrap_or(defaults.password),
        }
    }

    /// Root of the REST API.
    #[must_use]
    pub fn rest_url(&self) -> String {
        format!("{}/rest", self.base_url.trim_end_matches('/'))
    }
}

/// Appends `segments` to the REST root, percent-encoding each one.
///
/// # Errors
///
/// Returns [`GeoServerError::Parse`] if `rest_url` is not a base URL.
pub fn rest_endpoint(rest_url: &str, segments: &[&str]) -> Result<reqwest::Url, GeoServerError> {
    let mut url = reqwest::Url::parse(rest_url).map_err(|e| GeoServerError::Parse {
        message: format!("Invalid GeoServer URL {rest_url}: {e}"),
    })?;
    url.path_segments_mut()
        .map_err(|()| GeoServerError::Parse {
            message: format!("GeoServer URL {rest_url} cannot have a path"),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
