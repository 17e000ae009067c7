#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for GeoNode resource metadata.
//!
//! Serves the grouped metadata view of a resource, the metadata schema and
//! UI schema for the editor form, metadata edits, and the endpoint that switches a
//! dataset's style to visual editing mode on GeoServer.

mod handlers;
pub mod store;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use geonode_geoserver::GeoServerClient;

use crate::store::{FileMetadataStore, MetadataStore};

/// Shared application state.
pub struct AppState {
    /// Resource records and metadata schemas.
    pub store: Arc<dyn MetadataStore>,
    /// GeoServer REST client for style updates.
    pub geoserver: GeoServerClient,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/metadata/schema", web::get().to(handlers::schema))
            .route("/metadata/ui-schema", web::get().to(handlers::ui_schema))
            .route("/metadata/{pk}", web::get().to(handlers::metadata))
            .route("/metadata/{pk}", web::patch().to(handlers::update_metadata))
            .route("/metadata/{pk}/edit", web::get().to(handlers::metadata_edit))
            .route(
                "/resources/{pk}/visual-style",
                web::post().to(handlers::visual_style),
            ),
    );
}

/// Starts the metadata API server.
///
/// Reads resources and schemas from [`FileMetadataStore::from_env`] and
/// talks to the GeoServer configured through the `GEOSERVER_*`
/// environment variables. Binds to `BIND_ADDR`:`PORT` (default
/// `127.0.0.1:8080`). The caller provides the async runtime.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the GeoServer client cannot be
/// built, or the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let store = FileMetadataStore::from_env();
    log::info!("Reading metadata from {}", store.root().display());

    let geoserver = GeoServerClient::from_env().map_err(std::io::Error::other)?;
    log::info!("Using GeoServer at {}", geoserver.config().base_url);

    let state = web::Data::new(AppState {
        store: Arc::new(store),
        geoserver,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
