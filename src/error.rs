//! Error types for trackstash

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error types (storage layer and below)
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// HTTP-facing errors
///
/// Every variant renders as a JSON body with an `error` key. Internal faults
/// are logged in full and reported to the caller with a generic 500 body.
#[derive(Debug)]
pub enum ApiError {
    ProfileNotFound,
    TrackNotFound,
    EditNotFound,
    FileNotFound,
    /// Profile body missing or not a JSON object
    InvalidData,
    /// Edit body missing, not an object, or lacking `content`
    InvalidEditData,
    /// Multipart request without a `file` field
    NoFile,
    EmptyFilename,
    /// Uploaded extension outside the allow-list
    FileTypeNotAllowed,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ProfileNotFound => (StatusCode::NOT_FOUND, "Profile not found"),
            ApiError::TrackNotFound => (StatusCode::NOT_FOUND, "Track not found"),
            ApiError::EditNotFound => (StatusCode::NOT_FOUND, "Edit not found"),
            ApiError::FileNotFound => (StatusCode::NOT_FOUND, "File not found"),
            ApiError::InvalidData => (StatusCode::BAD_REQUEST, "Invalid data"),
            ApiError::InvalidEditData => (StatusCode::BAD_REQUEST, "Invalid edit data"),
            ApiError::NoFile => (StatusCode::BAD_REQUEST, "No file provided"),
            ApiError::EmptyFilename => (StatusCode::BAD_REQUEST, "Empty filename"),
            ApiError::FileTypeNotAllowed => (StatusCode::BAD_REQUEST, "File type not allowed"),
            ApiError::Internal(detail) => {
                error!("internal server error: {}", detail);
                let body = Json(json!({
                    "error": "Server Error",
                    "message": "Something broke on the server.",
                }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}
