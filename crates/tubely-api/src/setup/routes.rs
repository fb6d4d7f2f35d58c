//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::constants::ASSETS_PATH;
use tubely_core::Config;
use utoipa::OpenApi;

/// Setup all application routes
///
/// Upload routes carry no framework body limit; the upload pipeline applies the
/// per-kind cap itself once the caller has been authorized.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let upload_routes = Router::new()
        .route(
            &format!("{}/videos/{{videoID}}/thumbnail_upload", API_PREFIX),
            post(handlers::thumbnail_upload::upload_thumbnail),
        )
        .route(
            "/videos/{videoID}/thumbnail",
            post(handlers::thumbnail_upload::upload_thumbnail),
        )
        .route(
            &format!("{}/videos/{{videoID}}/video_upload", API_PREFIX),
            post(handlers::video_upload::upload_video),
        )
        .route(
            "/videos/{videoID}/upload",
            post(handlers::video_upload::upload_video),
        )
        .layer(DefaultBodyLimit::disable())
        .with_state(state);

    Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest_service(ASSETS_PATH, ServeDir::new(&config.upload.assets_root))
        .merge(upload_routes)
        .layer(TraceLayer::new_for_http())
}
