//! Gold rates endpoint.
//!
//! `GET /api/gold-rates` resolves the current spot price, derives the
//! retail total for every purity tier, and returns the full breakdown.
//! All numeric fields are rounded to 2 decimal places for display here at
//! the presentation boundary; the calculator itself never rounds.
//!
//! Provider failure never surfaces as a non-200: the resolver falls back
//! internally and the `source` tag is the only signal of degraded
//! accuracy.

use axum::{Json, extract::State, http::header, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;
use zahab_core::pricing::{PricingTable, Purity, round2};

use crate::error::Result;
use crate::rates::RateSource;
use crate::services::analytics::ActivityEvent;
use crate::state::AppState;

/// Freshness window for intermediary caches: rates are good for 5 minutes.
const CACHE_CONTROL_VALUE: &str = "s-maxage=300, stale-while-revalidate";

/// Wire shape of `GET /api/gold-rates`.
#[derive(Debug, Serialize)]
pub struct GoldRatesResponse {
    #[serde(rename = "24K")]
    pub k24: f64,
    #[serde(rename = "22K")]
    pub k22: f64,
    #[serde(rename = "21K")]
    pub k21: f64,
    #[serde(rename = "18K")]
    pub k18: f64,
    #[serde(rename = "Silver")]
    pub silver: f64,
    pub timestamp: DateTime<Utc>,
    pub source: RateSource,
    pub breakdown: Breakdown,
}

/// Per-tier derivation detail.
#[derive(Debug, Serialize)]
pub struct Breakdown {
    #[serde(rename = "spotPricePerGram")]
    pub spot_price_per_gram: f64,
    #[serde(rename = "24K")]
    pub k24: TierBreakdown,
    #[serde(rename = "22K")]
    pub k22: TierBreakdown,
    #[serde(rename = "21K")]
    pub k21: TierBreakdown,
    #[serde(rename = "18K")]
    pub k18: TierBreakdown,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierBreakdown {
    pub spot_price: f64,
    pub retail_markup: f64,
    pub making_charge: f64,
    pub total: f64,
}

fn tier_breakdown(
    table: &PricingTable,
    spot_per_gram: f64,
    purity: Purity,
) -> Result<TierBreakdown> {
    let quote = table.retail_quote(spot_per_gram, purity, 1.0)?;
    Ok(TierBreakdown {
        spot_price: round2(quote.spot_price),
        retail_markup: round2(quote.retail_markup),
        making_charge: round2(quote.making_charge),
        total: round2(quote.total),
    })
}

/// `GET /api/gold-rates`
#[instrument(skip(state))]
pub async fn gold_rates(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let spot = state.resolver().resolve().await;
    let table = state.pricing();

    let k24 = tier_breakdown(table, spot.value, Purity::K24)?;
    let k22 = tier_breakdown(table, spot.value, Purity::K22)?;
    let k21 = tier_breakdown(table, spot.value, Purity::K21)?;
    let k18 = tier_breakdown(table, spot.value, Purity::K18)?;

    let body = GoldRatesResponse {
        k24: k24.total,
        k22: k22.total,
        k21: k21.total,
        k18: k18.total,
        silver: round2(table.silver_rate),
        timestamp: spot.timestamp,
        source: spot.source,
        breakdown: Breakdown {
            spot_price_per_gram: round2(spot.value),
            k24,
            k22,
            k21,
            k18,
        },
    };

    // Non-blocking: the response never waits on the sink
    state
        .analytics()
        .dispatch(ActivityEvent::RateServed { source: spot.source });

    Ok((
        [(header::CACHE_CONTROL, CACHE_CONTROL_VALUE)],
        Json(body),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_breakdown_rounds_for_display() {
        let table = PricingTable::default();
        let breakdown = tier_breakdown(&table, 254.50, Purity::K18).unwrap();
        assert!((breakdown.spot_price - 190.88).abs() < f64::EPSILON);
        assert!((breakdown.total - 282.32).abs() < f64::EPSILON);
    }

    #[test]
    fn test_response_wire_keys() {
        let table = PricingTable::default();
        let k24 = tier_breakdown(&table, 254.50, Purity::K24).unwrap();
        let k22 = tier_breakdown(&table, 254.50, Purity::K22).unwrap();
        let k21 = tier_breakdown(&table, 254.50, Purity::K21).unwrap();
        let k18 = tier_breakdown(&table, 254.50, Purity::K18).unwrap();

        let body = GoldRatesResponse {
            k24: k24.total,
            k22: k22.total,
            k21: k21.total,
            k18: k18.total,
            silver: round2(table.silver_rate),
            timestamp: Utc::now(),
            source: RateSource::FallbackMock,
            breakdown: Breakdown {
                spot_price_per_gram: 254.50,
                k24,
                k22,
                k21,
                k18,
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["24K"], 322.88);
        assert_eq!(json["source"], "fallback_mock");
        assert_eq!(json["breakdown"]["spotPricePerGram"], 254.5);
        assert_eq!(json["breakdown"]["24K"]["retailMarkup"], 45.0);
        assert_eq!(json["breakdown"]["18K"]["total"], 282.32);
    }
}
