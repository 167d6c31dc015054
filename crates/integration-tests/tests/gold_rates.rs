//! Integration tests for the gold-rates endpoint and the provider
//! fallback chain.
//!
//! Provider tiers are exercised with local axum stubs; the "unreachable"
//! cases point at the discard port so connections are refused for real.

#![allow(clippy::unwrap_used)]

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use zahab_core::pricing::{PricingTable, Purity, TROY_OUNCE_GRAMS, USD_TO_AED, round2};
use zahab_integration_tests::{DEAD_ENDPOINT, spawn_app, spawn_router, test_config};

/// GoldAPI stub: succeeds only when the access-token header is present.
fn goldapi_stub(price_per_ounce: f64) -> Router {
    Router::new().route(
        "/",
        get(move |headers: HeaderMap| async move {
            if headers.contains_key("x-access-token") {
                Json(json!({ "price": price_per_ounce })).into_response()
            } else {
                StatusCode::UNAUTHORIZED.into_response()
            }
        }),
    )
}

/// CoinGecko stub returning the given USD-per-ounce price.
fn coingecko_stub(usd_per_ounce: f64) -> Router {
    Router::new().route(
        "/",
        get(move || async move { Json(json!({ "pax-gold": { "usd": usd_per_ounce } })) }),
    )
}

/// A provider stub that answers 500 to everything.
fn failing_stub() -> Router {
    Router::new().route("/", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
}

/// A provider stub that answers 200 but without the expected price field.
fn missing_field_stub() -> Router {
    Router::new().route("/", get(|| async { Json(json!({ "metal": "XAU" })) }))
}

async fn get_rates(base_url: &str) -> (StatusCode, HeaderMap, Value) {
    let response = reqwest::get(format!("{base_url}/api/gold-rates"))
        .await
        .unwrap();
    let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
    let mut headers = HeaderMap::new();
    for (name, value) in response.headers() {
        if let Ok(name) = axum::http::HeaderName::from_bytes(name.as_str().as_bytes()) {
            if let Ok(value) = axum::http::HeaderValue::from_bytes(value.as_bytes()) {
                headers.insert(name, value);
            }
        }
    }
    let body: Value = response.json().await.unwrap();
    (status, headers, body)
}

// =============================================================================
// Fallback Tier
// =============================================================================

#[tokio::test]
async fn test_all_providers_down_returns_fallback_rates() {
    let base_url = spawn_app(test_config(DEAD_ENDPOINT, None, DEAD_ENDPOINT)).await;
    let (status, headers, body) = get_rates(&base_url).await;

    // Never a 5xx for provider failure
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fallback_mock");

    // Fallback spot is 254.50 AED/g; anchors from the pricing table
    assert_eq!(body["breakdown"]["spotPricePerGram"], 254.5);
    assert_eq!(body["24K"], 322.88);
    assert_eq!(body["18K"], 282.32);
    assert_eq!(body["Silver"], 3.8);

    assert_eq!(
        headers.get("cache-control").and_then(|v| v.to_str().ok()),
        Some("s-maxage=300, stale-while-revalidate")
    );
}

#[tokio::test]
async fn test_fallback_breakdown_carries_all_tiers() {
    let base_url = spawn_app(test_config(DEAD_ENDPOINT, None, DEAD_ENDPOINT)).await;
    let (_, _, body) = get_rates(&base_url).await;

    for tier in ["24K", "22K", "21K", "18K"] {
        let breakdown = &body["breakdown"][tier];
        for field in ["spotPrice", "retailMarkup", "makingCharge", "total"] {
            assert!(
                breakdown[field].is_number(),
                "missing breakdown field {tier}.{field}"
            );
        }
    }
    assert_eq!(body["breakdown"]["24K"]["spotPrice"], 254.5);
    assert_eq!(body["breakdown"]["24K"]["retailMarkup"], 45.0);
    assert_eq!(body["breakdown"]["24K"]["makingCharge"], 8.0);
    assert_eq!(body["breakdown"]["18K"]["total"], 282.32);
}

// =============================================================================
// Secondary Tier
// =============================================================================

#[tokio::test]
async fn test_secondary_used_when_no_primary_key() {
    let coingecko = spawn_router(coingecko_stub(2154.12)).await;
    let base_url = spawn_app(test_config(DEAD_ENDPOINT, None, &coingecko)).await;
    let (status, _, body) = get_rates(&base_url).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "coingecko");

    let expected_spot = 2154.12 * USD_TO_AED / TROY_OUNCE_GRAMS;
    assert_eq!(body["breakdown"]["spotPricePerGram"], round2(expected_spot));

    let expected_24k = PricingTable::default()
        .retail_quote(expected_spot, Purity::K24, 1.0)
        .unwrap()
        .total;
    assert!((body["24K"].as_f64().unwrap() - round2(expected_24k)).abs() < 1e-9);
}

#[tokio::test]
async fn test_secondary_used_when_primary_returns_error_status() {
    let goldapi = spawn_router(failing_stub()).await;
    let coingecko = spawn_router(coingecko_stub(2000.0)).await;
    let base_url = spawn_app(test_config(&goldapi, Some("test-key"), &coingecko)).await;
    let (_, _, body) = get_rates(&base_url).await;

    assert_eq!(body["source"], "coingecko");
}

#[tokio::test]
async fn test_secondary_used_when_primary_response_lacks_price() {
    let goldapi = spawn_router(missing_field_stub()).await;
    let coingecko = spawn_router(coingecko_stub(2000.0)).await;
    let base_url = spawn_app(test_config(&goldapi, Some("test-key"), &coingecko)).await;
    let (_, _, body) = get_rates(&base_url).await;

    assert_eq!(body["source"], "coingecko");
}

#[tokio::test]
async fn test_fallback_used_when_secondary_response_lacks_price() {
    let coingecko = spawn_router(missing_field_stub()).await;
    let base_url = spawn_app(test_config(DEAD_ENDPOINT, None, &coingecko)).await;
    let (_, _, body) = get_rates(&base_url).await;

    assert_eq!(body["source"], "fallback_mock");
    assert_eq!(body["24K"], 322.88);
}

// =============================================================================
// Primary Tier
// =============================================================================

#[tokio::test]
async fn test_primary_used_when_key_configured_and_provider_healthy() {
    // 7915.84 AED/oz is ~254.50 AED/g after the troy-ounce conversion
    let goldapi = spawn_router(goldapi_stub(7915.84)).await;
    let coingecko = spawn_router(coingecko_stub(2000.0)).await;
    let base_url = spawn_app(test_config(&goldapi, Some("test-key"), &coingecko)).await;
    let (status, _, body) = get_rates(&base_url).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "goldapi");
    assert_eq!(
        body["breakdown"]["spotPricePerGram"],
        round2(7915.84 / TROY_OUNCE_GRAMS)
    );
}

#[tokio::test]
async fn test_primary_skipped_without_key_even_if_reachable() {
    // The goldapi stub rejects unauthenticated calls, but the resolver
    // must not even try it without a configured key
    let goldapi = spawn_router(goldapi_stub(7915.84)).await;
    let coingecko = spawn_router(coingecko_stub(2100.0)).await;
    let base_url = spawn_app(test_config(&goldapi, None, &coingecko)).await;
    let (_, _, body) = get_rates(&base_url).await;

    assert_eq!(body["source"], "coingecko");
}
