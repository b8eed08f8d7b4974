//! Track endpoints
//!
//! Uploaded audio (and a few text/image formats) lands on disk under the
//! `tracks/` subfolder; the track map records where each upload lives and
//! the name it arrived under.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::api::files::serve_attachment;
use crate::error::ApiError;
use crate::store::{allowed_file, TrackRecord};
use crate::AppState;

/// Query parameters for track search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// POST /track/upload
///
/// Multipart upload; the `file` field must carry a non-empty filename with
/// an allow-listed extension.
pub async fn upload_track(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let mut multipart = multipart.map_err(|_| ApiError::NoFile)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(ApiError::EmptyFilename);
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload.ok_or(ApiError::NoFile)?;

    if !allowed_file(&filename) {
        return Err(ApiError::FileTypeNotAllowed);
    }

    let path = state.store.save_file(&data, "tracks", &filename).await?;
    let track_id = state
        .store
        .insert_track(TrackRecord {
            path,
            name: filename.clone(),
        })
        .await?;

    info!("track uploaded: {} ({})", track_id, filename);

    Ok(Json(json!({
        "status": "uploaded",
        "track_id": track_id,
    })))
}

/// GET /track/:track_id
///
/// Streams the stored file as an attachment under its original name. The
/// track map is not revalidated against disk; if the file has been removed
/// since upload the read fails and surfaces as a server error.
pub async fn get_track(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
) -> Result<Response, ApiError> {
    let record = state
        .store
        .get_track(&track_id)
        .await
        .ok_or(ApiError::TrackNotFound)?;

    serve_attachment(&record.path, &record.name).await
}

/// GET /track/search?q=
///
/// Case-insensitive substring match on track names. Missing or empty `q`
/// returns an empty object rather than the full map.
pub async fn search_tracks(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Value> {
    if query.q.is_empty() {
        return Json(json!({}));
    }
    Json(Value::Object(state.store.search_tracks(&query.q).await))
}
