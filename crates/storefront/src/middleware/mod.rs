//! HTTP middleware for the storefront.

pub mod request_id;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::StorefrontConfig;

/// Build the CORS layer from the configured allow-list.
///
/// An empty list means any origin: the rates and catalog endpoints are
/// public, unauthenticated data.
#[must_use]
pub fn cors_layer(config: &StorefrontConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
