//! Rate source resolver: live gold spot price with tiered fallback.
//!
//! Produces a single current spot price per gram of gold in AED, degrading
//! gracefully when upstream providers are unavailable:
//!
//! 1. Primary: GoldAPI-style provider (AED per troy ounce, token header).
//!    Skipped entirely when no API key is configured.
//! 2. Secondary: CoinGecko-style provider (USD per troy ounce, no auth),
//!    converted via the fixed USD->AED rate.
//! 3. Fallback: a hardcoded constant, tagged `fallback_mock` so the UI can
//!    signal reduced confidence.
//!
//! Attempts are strictly sequential; a failed attempt is logged and the
//! next tier is tried. There is no retry and no caching here - the
//! three-tier chain is the only resilience mechanism, and `resolve` is
//! infallible by construction. Each provider call carries an explicit HTTP
//! timeout so a hung upstream cannot stall the request.

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zahab_core::pricing::{TROY_OUNCE_GRAMS, USD_TO_AED};

use crate::config::ProviderConfig;

/// Spot price returned when every provider tier fails, AED per gram.
pub const FALLBACK_SPOT_AED_PER_GRAM: f64 = 254.50;

/// Which tier produced a spot price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    Goldapi,
    Coingecko,
    FallbackMock,
}

/// A resolved spot price: AED per gram, with provenance.
///
/// Computed fresh per request; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpotPrice {
    /// AED per gram, always finite and > 0.
    pub value: f64,
    pub source: RateSource,
    pub timestamp: DateTime<Utc>,
}

/// Why a single provider attempt produced no usable price.
///
/// Every variant is treated identically by the resolver (log and fall
/// through); the distinction exists for the logs.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No API key configured for this provider.
    #[error("no API key configured")]
    MissingKey,

    /// Network-level failure or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("unexpected status: {0}")]
    Status(u16),

    /// Response parsed but the expected price field was absent.
    #[error("price field missing from response")]
    MissingPrice,

    /// Provider returned a price that is not finite and positive.
    #[error("unusable price from provider: {0}")]
    InvalidPrice(f64),
}

/// GoldAPI-style response body. Only the price field matters.
#[derive(Debug, Deserialize)]
struct GoldApiResponse {
    /// AED per troy ounce.
    price: Option<f64>,
}

/// CoinGecko simple-price response body for the `pax-gold` id.
#[derive(Debug, Deserialize)]
struct CoinGeckoResponse {
    #[serde(rename = "pax-gold")]
    pax_gold: Option<PaxGoldPrice>,
}

#[derive(Debug, Deserialize)]
struct PaxGoldPrice {
    /// USD per troy ounce.
    usd: Option<f64>,
}

/// Resolves the current gold spot price across the provider tiers.
///
/// Cheaply cloneable; holds a shared `reqwest::Client`.
#[derive(Clone)]
pub struct RateResolver {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl RateResolver {
    /// Create a resolver with a per-call timeout from the provider config.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: ProviderConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Resolve the current spot price, AED per gram.
    ///
    /// Never fails: provider errors are logged and absorbed by the fallback
    /// chain, so callers always receive a usable number.
    pub async fn resolve(&self) -> SpotPrice {
        let timestamp = Utc::now();

        match self.fetch_goldapi().await {
            Ok(value) => {
                return SpotPrice {
                    value,
                    source: RateSource::Goldapi,
                    timestamp,
                };
            }
            Err(err) => {
                tracing::warn!(error = %err, "primary gold rate provider failed, trying secondary");
            }
        }

        match self.fetch_coingecko().await {
            Ok(value) => SpotPrice {
                value,
                source: RateSource::Coingecko,
                timestamp,
            },
            Err(err) => {
                tracing::warn!(error = %err, "secondary gold rate provider failed, using fallback");
                SpotPrice {
                    value: FALLBACK_SPOT_AED_PER_GRAM,
                    source: RateSource::FallbackMock,
                    timestamp,
                }
            }
        }
    }

    /// Primary tier: AED per troy ounce behind an access-token header.
    async fn fetch_goldapi(&self) -> Result<f64, ProviderError> {
        let key = self
            .config
            .goldapi_key
            .as_ref()
            .ok_or(ProviderError::MissingKey)?;

        let response = self
            .client
            .get(&self.config.goldapi_url)
            .header("x-access-token", key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: GoldApiResponse = response.json().await?;
        let per_ounce = body.price.ok_or(ProviderError::MissingPrice)?;
        validated(per_ounce / TROY_OUNCE_GRAMS)
    }

    /// Secondary tier: USD per troy ounce, converted via the fixed peg.
    async fn fetch_coingecko(&self) -> Result<f64, ProviderError> {
        let response = self
            .client
            .get(&self.config.coingecko_url)
            .query(&[("ids", "pax-gold"), ("vs_currencies", "usd")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: CoinGeckoResponse = response.json().await?;
        let usd_per_ounce = body
            .pax_gold
            .and_then(|p| p.usd)
            .ok_or(ProviderError::MissingPrice)?;
        validated(usd_per_ounce * USD_TO_AED / TROY_OUNCE_GRAMS)
    }
}

/// A parsed price must be finite and > 0 or it counts as missing.
fn validated(per_gram: f64) -> Result<f64, ProviderError> {
    if !per_gram.is_finite() || per_gram <= 0.0 {
        return Err(ProviderError::InvalidPrice(per_gram));
    }
    Ok(per_gram)
}
