//! Root endpoint listing the available API surface

use axum::Json;
use serde_json::{json, Value};

/// GET /
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "API is running successfully 🚀",
        "available_endpoints": [
            "/health",
            "/profile/<user_id>",
            "/track/upload",
            "/track/<track_id>",
            "/track/search?q=",
            "/edit/upload",
            "/edit/<edit_id>",
            "/edit/search?q=",
            "/file/list/<folder>",
            "/file/download/<folder>/<filename>",
        ],
    }))
}
