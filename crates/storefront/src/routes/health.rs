//! Health check endpoint.

use axum::Json;
use chrono::Utc;
use serde_json::{Value, json};

/// `GET /api/health`
///
/// Liveness only; the storefront has no backing services to probe.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
