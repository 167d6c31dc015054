//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/health               - Health check
//! GET  /api/gold-rates           - Live per-tier retail rates with breakdown
//!
//! # Catalog
//! GET  /api/products             - Full catalog
//! GET  /api/products/facets      - Distinct filter values and weight range
//! GET  /api/products/{id}        - Product detail
//! GET  /api/products/{id}/quote  - Live retail quote for a product
//!
//! # Search
//! POST /api/search               - Text query plus conjunctive filters
//!
//! # Analytics
//! POST /api/analytics/log        - Record a client activity event
//! GET  /api/analytics/stats      - Aggregate counters
//! ```

pub mod analytics;
pub mod health;
pub mod products;
pub mod rates;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/facets", get(products::facets))
        .route("/{id}", get(products::show))
        .route("/{id}/quote", get(products::quote))
}

/// Create the analytics routes router.
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/log", post(analytics::log))
        .route("/stats", get(analytics::stats))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/gold-rates", get(rates::gold_rates))
        .nest("/api/products", product_routes())
        .route("/api/search", post(search::search))
        .nest("/api/analytics", analytics_routes())
}

/// Compose the full application: routes, state, and middleware.
///
/// Used by both the binary and the integration tests, so the tests
/// exercise the same stack the server runs.
pub fn app(state: AppState) -> Router {
    let cors = middleware::cors_layer(state.config());

    routes()
        .layer(axum::middleware::from_fn(
            middleware::request_id::request_id_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
