//! trackstash library - flat-file HTTP storage service
//!
//! Exposes CRUD-style endpoints for user profiles, audio tracks, text edits,
//! and raw file storage, backed by JSON files and a directory tree under a
//! single storage root.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::store::JsonStore;

pub mod api;
pub mod config;
pub mod error;
pub mod store;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record maps and uploaded files, all under one storage root
    pub store: Arc<JsonStore>,
    /// Reported by the health endpoint
    pub bot_token: String,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Arc<JsonStore>, bot_token: String) -> Self {
        Self { store, bot_token }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::index))
        .route(
            "/profile/:user_id",
            get(api::get_profile)
                .post(api::update_profile)
                .put(api::update_profile),
        )
        .route("/track/upload", post(api::upload_track))
        .route("/track/search", get(api::search_tracks))
        .route("/track/:track_id", get(api::get_track))
        .route("/edit/upload", post(api::upload_edit))
        .route("/edit/search", get(api::search_edits))
        .route("/edit/:edit_id", get(api::get_edit))
        .route("/file/list/:folder", get(api::list_files))
        .route("/file/download/:folder/:filename", get(api::download_file))
        .merge(api::health_routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Fallback for unmatched routes
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": "This endpoint does not exist. Go to / to see available endpoints.",
        })),
    )
}
