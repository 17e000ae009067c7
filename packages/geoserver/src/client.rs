//! Authenticated access to the GeoServer style endpoints.

use geonode_metadata_models::Resource;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::style::{Style, force_visual_body};
use crate::{GeoServerConfig, GeoServerError, SUCCESS_STATUSES, rest_endpoint};

/// GeoServer REST client.
#[derive(Debug, Clone)]
pub struct GeoServerClient {
    http: reqwest::Client,
    config: GeoServerConfig,
}

impl GeoServerClient {
    /// Creates a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoServerError::Http`] if the HTTP client cannot be built.
    pub fn new(config: GeoServerConfig) -> Result<Self, GeoServerError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config })
    }

    /// Creates a client from [`GeoServerConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns [`GeoServerError::Http`] if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, GeoServerError> {
        Self::new(GeoServerConfig::from_env())
    }

    #[must_use]
    pub const fn config(&self) -> &GeoServerConfig {
        &self.config
    }

    /// Fetches a style by name, from `workspace` or from the global styles.
    ///
    /// Returns `Ok(None)` if GeoServer does not know the style.
    ///
    /// # Errors
    ///
    /// Returns [`GeoServerError`] if the request fails, GeoServer answers
    /// with anything other than 200 or 404, or the body is not a style.
    pub async fn get_style(
        &self,
        name: &str,
        workspace: Option<&str>,
    ) -> Result<Option<Style>, GeoServerError> {
        let rest_url = self.config.rest_url();
        let file = format!("{name}.json");
        let url = match workspace {
            Some(ws) => rest_endpoint(&rest_url, &["workspaces", ws, "styles", &file])?,
            None => rest_endpoint(&rest_url, &["styles", &file])?,
        };

        log::debug!("Fetching style {url}");
        let resp = self
            .http
            .get(url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::OK => {
                let body: serde_json::Value = resp.json().await?;
                Style::from_response(&rest_url, &body).map(Some)
            }
            status => Err(GeoServerError::LookupFailed {
                style: name.to_string(),
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            }),
        }
    }

    /// Fetches a style from `workspace`, falling back to the global style
    /// of the same name.
    ///
    /// # Errors
    ///
    /// See [`Self::get_style`].
    pub async fn find_style(
        &self,
        name: &str,
        workspace: Option<&str>,
    ) -> Result<Option<Style>, GeoServerError> {
        let in_workspace = match workspace {
            Some(_) => self.get_style(name, workspace).await?,
            None => None,
        };
        match in_workspace {
            Some(style) => Ok(Some(style)),
            None => self.get_style(name, None).await,
        }
    }

    /// Sets the visual-mode flag on `style` with a single `PUT`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoServerError::FailedRequest`] carrying the status code
    /// and response body if GeoServer answers with a status outside
    /// [`SUCCESS_STATUSES`], or [`GeoServerError::Http`] if the request
    /// fails.
    pub async fn set_visual_mode(&self, style: &Style) -> Result<(), GeoServerError> {
        let href = style.metadata_href();
        log::debug!("Forcing visual mode on style {} via {href}", style.name);

        let resp = self
            .http
            .put(&href)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(force_visual_body().to_string())
            .send()
            .await?;

        let status = resp.status().as_u16();
        if SUCCESS_STATUSES.contains(&status) {
            return Ok(());
        }

        Err(GeoServerError::FailedRequest {
            style: style.name.clone(),
            status,
            body: resp.text().await.unwrap_or_default(),
        })
    }

    /// Makes the style of a dataset open in visual mode.
    ///
    /// Returns `Ok(false)` without touching GeoServer for non-dataset
    /// resources, and `Ok(false)` if the dataset has no style.
    ///
    /// # Errors
    ///
    /// See [`Self::find_style`] and [`Self::set_visual_mode`].
    pub async fn force_visual_mode(&self, resource: &Resource) -> Result<bool, GeoServerError> {
        if !resource.is_dataset() {
            return Ok(false);
        }

        let Some(style) = self
            .find_style(&resource.name, resource.workspace.as_deref())
            .await?
        else {
            log::warn!("No style found for dataset {}", resource.name);
            return Ok(false);
        };

        self.set_visual_mode(&style).await?;
        log::info!("Style {} now opens in visual mode", style.name);
        Ok(true)
    }
}
