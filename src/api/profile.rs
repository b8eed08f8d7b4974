//! Profile endpoints
//!
//! Profiles are arbitrary JSON objects keyed by a caller-supplied user ID,
//! replaced wholesale on every update.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

/// GET /profile/:user_id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .store
        .get_profile(&user_id)
        .await
        .map(Json)
        .ok_or(ApiError::ProfileNotFound)
}

/// POST or PUT /profile/:user_id
///
/// The body must be a JSON object; anything else (missing body, invalid
/// JSON, a JSON scalar or array) is rejected with the same 400.
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(data) = body.map_err(|_| ApiError::InvalidData)?;
    if !data.is_object() {
        return Err(ApiError::InvalidData);
    }

    state.store.put_profile(&user_id, data).await?;
    info!("profile saved: {}", user_id);

    Ok(Json(json!({
        "status": "Profile saved",
        "user_id": user_id,
    })))
}
