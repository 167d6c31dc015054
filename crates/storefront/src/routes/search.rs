//! Search route handler.
//!
//! Case-insensitive substring match over name and description plus the
//! conjunctive catalog filters. Every search logs an event to the activity
//! sink without blocking the response.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use zahab_core::types::Product;

use crate::catalog::SearchFilters;
use crate::services::analytics::ActivityEvent;
use crate::state::AppState;

/// Body of `POST /api/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub filters: SearchFilters,
}

/// Wire shape of the search response.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub products: Vec<Product>,
    pub count: usize,
}

/// `POST /api/search`
#[instrument(skip(state, request))]
pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Json<SearchResponse> {
    let products: Vec<Product> = state
        .catalog()
        .search(request.query.as_deref(), &request.filters)
        .into_iter()
        .cloned()
        .collect();

    state.analytics().dispatch(ActivityEvent::Search {
        query: request.query,
        results: products.len(),
    });

    let count = products.len();
    Json(SearchResponse { products, count })
}
