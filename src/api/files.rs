//! Generic file browsing under the storage root

use std::path::Path as FsPath;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ApiError;
use crate::AppState;

/// GET /file/list/:folder
///
/// Lists base filenames of regular files directly inside `root/folder`.
/// An absent folder, a non-directory, or a traversal attempt all answer
/// with an empty list and status 200, never an error.
pub async fn list_files(
    State(state): State<AppState>,
    Path(folder): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let Some(folder_path) = state.store.resolve_within_root(&[&folder]) else {
        return Ok(Json(Vec::new()));
    };

    let mut entries = match tokio::fs::read_dir(&folder_path).await {
        Ok(entries) => entries,
        Err(_) => return Ok(Json(Vec::new())),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    Ok(Json(files))
}

/// GET /file/download/:folder/:filename
///
/// Traversal attempts and missing files both answer 404.
pub async fn download_file(
    State(state): State<AppState>,
    Path((folder, filename)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let file_path = state
        .store
        .resolve_within_root(&[&folder, &filename])
        .ok_or(ApiError::FileNotFound)?;

    if tokio::fs::metadata(&file_path).await.is_err() {
        return Err(ApiError::FileNotFound);
    }

    serve_attachment(&file_path, &filename).await
}

/// Read `path` and serve it as an attachment with `download_name` as the
/// suggested filename. A read failure here surfaces as a server error;
/// callers wanting a 404 check existence first.
pub async fn serve_attachment(path: &FsPath, download_name: &str) -> Result<Response, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ApiError::Internal(format!("reading {}: {}", path.display(), e)))?;

    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download_name),
        ),
    ];

    Ok((headers, bytes).into_response())
}
