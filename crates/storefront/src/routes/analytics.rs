//! Analytics route handlers.
//!
//! `log` always answers 200: availability over durability, the sink drops
//! events when saturated and the client never finds out.

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::services::analytics::{ActivityEvent, ActivityStats};
use crate::state::AppState;

/// Body of `POST /api/analytics/log`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRequest {
    pub event_type: String,
    #[serde(default)]
    pub details: Option<Value>,
}

/// Client IP as reported by the edge, when present.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

/// `POST /api/analytics/log`
#[instrument(skip(state, headers, request))]
pub async fn log(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LogRequest>,
) -> Json<Value> {
    state.analytics().dispatch(ActivityEvent::Client {
        event_type: request.event_type,
        details: request.details,
        ip: client_ip(&headers),
    });

    Json(json!({ "status": "ok" }))
}

/// `GET /api/analytics/stats`
#[instrument(skip(state))]
pub async fn stats(State(state): State<AppState>) -> Json<ActivityStats> {
    Json(state.analytics().stats())
}
