//! Catalog route handlers.
//!
//! The catalog itself is inert data; the interesting handler is `quote`,
//! which resolves a live spot price and runs the weighted calculator for
//! one product.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use zahab_core::pricing::{JewelryQuote, Metal, round2};
use zahab_core::types::Product;

use crate::catalog::Facets;
use crate::error::{AppError, Result};
use crate::rates::RateSource;
use crate::state::AppState;

/// `GET /api/products`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog().all().to_vec())
}

/// `GET /api/products/facets`
#[instrument(skip(state))]
pub async fn facets(State(state): State<AppState>) -> Json<Facets> {
    Json(state.catalog().facets())
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<u32>) -> Result<Json<Product>> {
    state.catalog().get(id).cloned().map(Json).ok_or_else(|| {
        AppError::NotFound("Product not found".to_string())
    })
}

/// Query parameters for the quote endpoint.
#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    /// Weight in grams; defaults to the product's base weight.
    pub weight: Option<f64>,
}

/// Wire shape of `GET /api/products/{id}/quote`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub product_id: u32,
    pub product_code: String,
    pub source: RateSource,
    pub spot_price_per_gram: f64,
    pub weight_in_grams: f64,
    pub quote: QuoteBreakdown,
}

/// Rounded jewelry quote breakdown.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    pub metal_cost: f64,
    pub making_cost: f64,
    pub subtotal: f64,
    pub vat: f64,
    pub total: f64,
    pub price_per_gram: f64,
}

impl From<JewelryQuote> for QuoteBreakdown {
    fn from(quote: JewelryQuote) -> Self {
        Self {
            metal_cost: round2(quote.metal_cost),
            making_cost: round2(quote.making_cost),
            subtotal: round2(quote.subtotal),
            vat: round2(quote.vat),
            total: round2(quote.total),
            price_per_gram: round2(quote.price_per_gram),
        }
    }
}

/// `GET /api/products/{id}/quote?weight=...`
///
/// Resolves the current spot price and prices the product at the requested
/// weight. Gold products go through the karat calculator; silver products
/// through the flat silver form. A non-positive or non-finite weight is
/// rejected with 400 before any arithmetic runs.
#[instrument(skip(state))]
pub async fn quote(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(params): Query<QuoteParams>,
) -> Result<Json<QuoteResponse>> {
    let product = state
        .catalog()
        .get(id)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?
        .clone();

    let weight = params.weight.unwrap_or(product.base_weight);
    let spot = state.resolver().resolve().await;
    let table = state.pricing();

    let breakdown = match product.purity {
        Metal::Gold(purity) => {
            table.jewelry_quote(spot.value, purity, weight, product.making_charge)?
        }
        Metal::Silver => table.silver_jewelry_quote(weight, product.making_charge)?,
    };

    Ok(Json(QuoteResponse {
        product_id: product.id,
        product_code: product.product_code,
        source: spot.source,
        spot_price_per_gram: round2(spot.value),
        weight_in_grams: weight,
        quote: breakdown.into(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use zahab_core::pricing::{PricingTable, Purity};

    #[test]
    fn test_quote_breakdown_rounds_all_fields() {
        let table = PricingTable::default();
        let quote = table
            .jewelry_quote(254.50, Purity::K18, 3.6, 1.6)
            .unwrap();
        let breakdown = QuoteBreakdown::from(quote);

        // metal: (190.875 + 60) * 3.6 = 903.15; making: 18 * 1.6 * 3.6 = 103.68
        assert!((breakdown.metal_cost - 903.15).abs() < f64::EPSILON);
        assert!((breakdown.making_cost - 103.68).abs() < f64::EPSILON);
        assert!((breakdown.subtotal - 1006.83).abs() < f64::EPSILON);
        assert!((breakdown.vat - 50.34).abs() < f64::EPSILON);
        assert!((breakdown.total - 1057.17).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quote_response_wire_keys() {
        let response = QuoteResponse {
            product_id: 8,
            product_code: "ZJ-G-301".to_string(),
            source: RateSource::Goldapi,
            spot_price_per_gram: 254.50,
            weight_in_grams: 3.6,
            quote: QuoteBreakdown {
                metal_cost: 903.15,
                making_cost: 103.68,
                subtotal: 1006.83,
                vat: 50.34,
                total: 1057.17,
                price_per_gram: 282.32,
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["productId"], 8);
        assert_eq!(json["spotPricePerGram"], 254.5);
        assert_eq!(json["quote"]["pricePerGram"], 282.32);
    }
}
