pub mod auth;
pub mod cron;
pub mod permissions;

use axum::{
    http::{StatusCode, Uri},
    response::Json,
};
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "details": uri.path(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
