//! HTTP handler functions for the metadata API.

use actix_web::http::header::ACCEPT_LANGUAGE;
use actix_web::{HttpRequest, HttpResponse, web};
use geonode_metadata::openapi::resolve_refs;
use geonode_metadata::ui_schema::{default_ui_schema, extract_ui_schema, merge_ui_schema};
use geonode_metadata::{MetadataError, assign_groups, flatten_instance};
use geonode_metadata_models::{Instance, MetadataSchema, UiSchema};
use geonode_server_models::{
    ApiError, ApiHealth, ApiMetadataEditView, ApiMetadataView, ApiSchemaView, ApiVisualStyle,
};

use crate::AppState;
use crate::store::{DEFAULT_LANGUAGE, StoreError};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/metadata/{pk}`
///
/// Returns the resource and its set metadata fields, flattened and
/// partitioned into display groups. The schema language follows the
/// `Accept-Language` header.
pub async fn metadata(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: HttpRequest,
) -> HttpResponse {
    let pk = path.into_inner();
    let lang = request_language(&req);

    let schema = match load_schema(&state, &lang).await {
        Ok(schema) => schema,
        Err(response) => return response,
    };

    let resource = match state.store.get_resource(pk).await {
        Ok(resource) => resource,
        Err(e) => return store_error(&e),
    };

    let instance = match state.store.build_schema_instance(&resource).await {
        Ok(instance) => instance,
        Err(e) => return store_error(&e),
    };

    match flatten_instance(&instance, &schema.properties) {
        Ok(flattened) => HttpResponse::Ok().json(ApiMetadataView {
            resource,
            metadata_groups: assign_groups(&flattened),
        }),
        Err(e) => metadata_error(&e),
    }
}

/// `GET /api/metadata/{pk}/edit`
///
/// Returns the raw metadata values of a resource together with the schema
/// and UI schema of the editor form.
pub async fn metadata_edit(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: HttpRequest,
) -> HttpResponse {
    let pk = path.into_inner();
    let lang = request_language(&req);

    let (schema, ui_schema) = match editor_schema(&state, &lang).await {
        Ok(view) => view,
        Err(response) => return response,
    };

    let resource = match state.store.get_resource(pk).await {
        Ok(resource) => resource,
        Err(e) => return store_error(&e),
    };

    match state.store.build_schema_instance(&resource).await {
        Ok(metadata) => HttpResponse::Ok().json(ApiMetadataEditView {
            schema,
            ui_schema,
            metadata,
        }),
        Err(e) => store_error(&e),
    }
}

/// `PATCH /api/metadata/{pk}`
///
/// Stores the submitted metadata fields and returns the resulting values.
pub async fn update_metadata(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<Instance>,
) -> HttpResponse {
    let pk = path.into_inner();

    match state.store.update_metadata(pk, body.into_inner()).await {
        Ok(metadata) => {
            log::info!("Updated metadata of resource {pk}");
            HttpResponse::Ok().json(metadata)
        }
        Err(e) => store_error(&e),
    }
}

/// `GET /api/metadata/schema`
///
/// Returns the schema with references inlined, and the UI schema built
/// from its `ui:*` hints on top of the editor defaults.
pub async fn schema(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let lang = request_language(&req);

    match editor_schema(&state, &lang).await {
        Ok((schema, ui_schema)) => HttpResponse::Ok().json(ApiSchemaView { schema, ui_schema }),
        Err(response) => response,
    }
}

/// `GET /api/metadata/ui-schema`
pub async fn ui_schema() -> HttpResponse {
    HttpResponse::Ok().json(default_ui_schema())
}

/// `POST /api/resources/{pk}/visual-style`
///
/// Makes the GeoServer style of a dataset open in visual mode.
pub async fn visual_style(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let pk = path.into_inner();

    let resource = match state.store.get_resource(pk).await {
        Ok(resource) => resource,
        Err(e) => return store_error(&e),
    };

    match state.geoserver.force_visual_mode(&resource).await {
        Ok(updated) => HttpResponse::Ok().json(ApiVisualStyle { updated }),
        Err(e) => {
            log::error!("Failed to update style of resource {pk}: {e}");
            HttpResponse::BadGateway().json(ApiError::new(e))
        }
    }
}

/// Two-letter language code from `Accept-Language`.
fn request_language(req: &HttpRequest) -> String {
    req.headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| value.len() >= 2 && value.is_char_boundary(2))
        .map_or_else(|| DEFAULT_LANGUAGE.to_string(), |value| value[..2].to_lowercase())
}

async fn load_schema(state: &AppState, lang: &str) -> Result<MetadataSchema, HttpResponse> {
    let document = state
        .store
        .get_schema(lang)
        .await
        .map_err(|e| store_error(&e))?;
    geonode_metadata::openapi::parse_schema(&document).map_err(|e| metadata_error(&e))
}

/// Resolved schema document and the merged UI schema for the editor.
async fn editor_schema(
    state: &AppState,
    lang: &str,
) -> Result<(serde_json::Value, UiSchema), HttpResponse> {
    let document = state
        .store
        .get_schema(lang)
        .await
        .map_err(|e| store_error(&e))?;

    let resolved = resolve_refs(&document).map_err(|e| metadata_error(&e))?;
    let parsed: MetadataSchema = serde_json::from_value(resolved.clone())
        .map_err(|e| metadata_error(&MetadataError::Json(e)))?;

    let ui_schema = merge_ui_schema(default_ui_schema(), extract_ui_schema(&parsed.properties));
    Ok((resolved, ui_schema))
}

fn store_error(e: &StoreError) -> HttpResponse {
    match e {
        StoreError::NotFound { .. } => HttpResponse::NotFound().json(ApiError::new(e)),
        _ => {
            log::error!("Failed to read metadata store: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to read metadata store"))
        }
    }
}

fn metadata_error(e: &MetadataError) -> HttpResponse {
    log::error!("Invalid metadata schema: {e}");
    HttpResponse::InternalServerError().json(ApiError::new(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::App;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use async_trait::async_trait;
    use geonode_geoserver::{GeoServerClient, GeoServerConfig};
    use geonode_metadata_models::{Instance, Resource, ResourceType};
    use serde_json::{Value, json};

    use crate::store::MetadataStore;

    #[derive(Default)]
    struct FixtureStore {
        updates: std::sync::Mutex<Vec<(i64, Instance)>>,
    }

    #[async_trait]
    impl MetadataStore for FixtureStore {
        async fn get_resource(&self, pk: i64) -> Result<Resource, StoreError> {
            let resource_type = match pk {
                1 => ResourceType::Dataset,
                2 => ResourceType::Document,
                _ => {
                    return Err(StoreError::NotFound {
                        what: format!("Resource {pk}"),
                    });
                }
            };
            Ok(Resource {
                pk,
                title: "Roads".to_string(),
                resource_type,
                name: "roads".to_string(),
                workspace: Some("geonode".to_string()),
            })
        }

        async fn get_schema(&self, lang: &str) -> Result<Value, StoreError> {
            let title = if lang == "it" { "Titolo" } else { "Title" };
            Ok(json!({
                "properties": {
                    "title": {"type": "string", "title": title},
                    "date": {"type": "string", "format": "date-time"},
                    "category": {"$ref": "#/components/Category"},
                    "srid": {"type": "string", "ui:options": {"geonode-ui:group": "Location"}}
                },
                "components": {"Category": {
                    "type": "string",
                    "oneOf": [{"const": "transportation", "title": "Transportation"}]
                }}
            }))
        }

        async fn build_schema_instance(&self, _resource: &Resource) -> Result<Instance, StoreError> {
            Ok(serde_json::from_value(json!({
                "title": "Roads",
                "date": "2020-01-02T03:04:05Z",
                "category": "transportation",
                "srid": "EPSG:4326",
                "abstract": ""
            }))?)
        }

        async fn update_metadata(
            &self,
            pk: i64,
            metadata: Instance,
        ) -> Result<Instance, StoreError> {
            let resource = self.get_resource(pk).await?;
            let mut instance = self.build_schema_instance(&resource).await?;
            instance.extend(metadata.clone());
            self.updates.lock().unwrap().push((pk, metadata));
            Ok(instance)
        }
    }

    fn state() -> web::Data<AppState> {
        state_with(Arc::new(FixtureStore::default()))
    }

    fn state_with(store: Arc<FixtureStore>) -> web::Data<AppState> {
        web::Data::new(AppState {
            store,
            geoserver: GeoServerClient::new(GeoServerConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                ..GeoServerConfig::default()
            })
            .unwrap(),
        })
    }

    #[actix_web::test]
    async fn metadata_view_groups_flattened_fields() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/metadata/1")
            .insert_header((ACCEPT_LANGUAGE, "it-IT,it;q=0.9"))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        let general = &body["metadataGroups"]["General"];
        assert_eq!(general["title"]["value"], json!("Roads"));
        assert_eq!(general["title"]["schema"]["title"], json!("Titolo"));
        assert_eq!(general["date"]["value"], json!("2020-01-02"));
        assert_eq!(general["category"]["value"], json!("Transportation"));
        assert!(general.get("abstract").is_none());
        assert_eq!(body["metadataGroups"]["Location"]["srid"]["value"], json!("EPSG:4326"));
        assert_eq!(body["resource"]["resourceType"], json!("dataset"));
    }

    #[actix_web::test]
    async fn unknown_resource_is_not_found() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = actix_test::TestRequest::get().uri("/api/metadata/99").to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn schema_view_inlines_refs_and_builds_ui_schema() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = actix_test::TestRequest::get().uri("/api/metadata/schema").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["schema"]["properties"]["category"]["type"], json!("string"));
        assert_eq!(
            body["uiSchema"]["srid"]["ui:options"]["geonode-ui:group"],
            json!("Location")
        );
        assert_eq!(body["uiSchema"]["pk"]["ui:widget"], json!("hidden"));
        assert_eq!(body["uiSchema"]["gn:layout"][0]["id"], json!("basic"));
    }

    #[actix_web::test]
    async fn visual_style_skips_non_datasets() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/resources/2/visual-style")
            .to_request();
        let body: ApiVisualStyle = actix_test::call_and_read_body_json(&app, req).await;

        assert!(!body.updated);
    }

    #[actix_web::test]
    async fn visual_style_reports_unreachable_geoserver_as_bad_gateway() {
        let app =
            actix_test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/resources/1/visual-style")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: ApiError = actix_test::read_body_json(resp).await;
        assert!(body.error.starts_with("HTTP error"), "{}", body.error);
    }

    #[actix_web::test]
    async fn edit_view_returns_raw_metadata_with_editor_schema() {
        let app =
            actix_test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/metadata/1/edit")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["metadata"]["date"], json!("2020-01-02T03:04:05Z"));
        assert_eq!(body["metadata"]["category"], json!("transportation"));
        assert_eq!(body["metadata"]["abstract"], json!(""));
        assert_eq!(body["schema"]["properties"]["category"]["type"], json!("string"));
        assert_eq!(body["uiSchema"]["pk"]["ui:widget"], json!("hidden"));
    }

    #[actix_web::test]
    async fn patch_stores_submitted_fields() {
        let store = Arc::new(FixtureStore::default());
        let app = actix_test::init_service(
            App::new()
                .app_data(state_with(store.clone()))
                .configure(crate::configure),
        )
        .await;

        let req = actix_test::TestRequest::patch()
            .uri("/api/metadata/1")
            .set_json(json!({"abstract": "Main roads"}))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["abstract"], json!("Main roads"));
        assert_eq!(body["title"], json!("Roads"));
        let updates = store.updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, 1);
        assert_eq!(
            serde_json::to_value(&updates[0].1).unwrap(),
            json!({"abstract": "Main roads"})
        );
    }

    #[actix_web::test]
    async fn patch_of_unknown_resource_is_not_found() {
        let app =
            actix_test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = actix_test::TestRequest::patch()
            .uri("/api/metadata/99")
            .set_json(json!({"title": "Nothing"}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn language_defaults_to_english() {
        let req = actix_test::TestRequest::default().to_http_request();
        assert_eq!(request_language(&req), "en");

        let req = actix_test::TestRequest::default()
            .insert_header((ACCEPT_LANGUAGE, "FR-ca"))
            .to_http_request();
        assert_eq!(request_language(&req), "fr");
    }
}
