//! Shared helpers for the Zahab integration tests.
//!
//! Tests spawn the real router on an ephemeral port and exercise it over
//! HTTP with `reqwest`. Provider behavior is driven by small axum stub
//! servers spawned the same way, so the resolver's fallback chain is
//! tested against real sockets.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::expect_used)]

use std::time::Duration;

use secrecy::SecretString;
use zahab_storefront::config::{ProviderConfig, StorefrontConfig};
use zahab_storefront::routes;
use zahab_storefront::state::AppState;

/// An endpoint on the discard port: connections are refused immediately,
/// standing in for an unreachable provider.
pub const DEAD_ENDPOINT: &str = "http://127.0.0.1:9";

/// Build a test configuration with explicit provider endpoints.
///
/// `goldapi_key: None` makes the resolver skip the primary tier, matching
/// a deployment with no key configured.
#[must_use]
pub fn test_config(
    goldapi_url: &str,
    goldapi_key: Option<&str>,
    coingecko_url: &str,
) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().expect("loopback address"),
        port: 0,
        providers: ProviderConfig {
            goldapi_url: goldapi_url.to_string(),
            goldapi_key: goldapi_key.map(SecretString::from),
            coingecko_url: coingecko_url.to_string(),
            timeout: Duration::from_secs(2),
        },
        cors_origins: vec![],
        analytics_queue_capacity: 64,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A configuration where every provider tier fails, forcing the fallback
/// constant.
#[must_use]
pub fn fallback_only_config() -> StorefrontConfig {
    test_config(DEAD_ENDPOINT, None, DEAD_ENDPOINT)
}

/// Spawn the storefront app on an ephemeral port; returns its base URL.
pub async fn spawn_app(config: StorefrontConfig) -> String {
    let state = AppState::new(config).expect("failed to build app state");
    let app = routes::app(state);
    spawn_router(app).await
}

/// Spawn any axum router (the app or a provider stub) on an ephemeral
/// port; returns its base URL.
pub async fn spawn_router(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let addr = listener.local_addr().expect("listener has a local addr");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("test server error");
    });

    format!("http://{addr}")
}
