//! Edit endpoints
//!
//! Edits are arbitrary JSON objects stored verbatim; the only schema
//! requirement is the presence of a `content` key.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::api::track::SearchQuery;
use crate::error::ApiError;
use crate::AppState;

/// POST /edit/upload
pub async fn upload_edit(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(data) = body.map_err(|_| ApiError::InvalidEditData)?;
    if !data.is_object() || data.get("content").is_none() {
        return Err(ApiError::InvalidEditData);
    }

    let edit_id = state.store.insert_edit(data).await?;
    info!("edit saved: {}", edit_id);

    Ok(Json(json!({
        "status": "edit saved",
        "edit_id": edit_id,
    })))
}

/// GET /edit/:edit_id
pub async fn get_edit(
    State(state): State<AppState>,
    Path(edit_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .store
        .get_edit(&edit_id)
        .await
        .map(Json)
        .ok_or(ApiError::EditNotFound)
}

/// GET /edit/search?q=
///
/// Free-text search over the serialized rendering of each stored record,
/// not any single field. Missing or empty `q` returns an empty object.
pub async fn search_edits(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Value> {
    if query.q.is_empty() {
        return Json(json!({}));
    }
    Json(Value::Object(state.store.search_edits(&query.q).await))
}
