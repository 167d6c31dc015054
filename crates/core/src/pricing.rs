//! Retail gold price computation.
//!
//! The derivation is the same six steps for every quote:
//!
//! 1. Purity adjustment: `spot_per_gram * fraction(purity)`
//! 2. Add the per-gram retail markup for the tier
//! 3. Making charge: `base_making_charge(purity) * multiplier`
//! 4. Subtotal: sum of the three
//! 5. VAT: `subtotal * vat_rate`
//! 6. Total: `subtotal + vat`
//!
//! All arithmetic is `f64` with no intermediate rounding; [`round2`] is the
//! single rounding point and is applied only at the presentation boundary.
//! The constant tables live in [`PricingTable`] and are passed into every
//! computation so alternate per-market tables stay possible.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grams per troy ounce. Upstream providers quote per troy ounce.
pub const TROY_OUNCE_GRAMS: f64 = 31.1035;

/// Fixed USD -> AED conversion (the dirham is pegged to the dollar).
pub const USD_TO_AED: f64 = 3.6725;

/// Errors from the price calculator.
///
/// The calculator rejects non-finite or non-positive spot prices and
/// weights up front instead of letting NaN propagate through the
/// arithmetic into a rendered price.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PricingError {
    /// Spot price must be finite and greater than zero.
    #[error("invalid spot price: {0} (must be finite and > 0)")]
    InvalidSpotPrice(f64),

    /// Weight must be finite and greater than zero.
    #[error("invalid weight: {0} grams (must be finite and > 0)")]
    InvalidWeight(f64),
}

/// Karat purity tier for gold products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purity {
    #[serde(rename = "24K")]
    K24,
    #[serde(rename = "22K")]
    K22,
    #[serde(rename = "21K")]
    K21,
    #[serde(rename = "18K")]
    K18,
}

impl Purity {
    /// All tiers, in display order.
    pub const ALL: [Self; 4] = [Self::K24, Self::K22, Self::K21, Self::K18];

    /// Fractional gold content of this tier. 24K is exactly 1.0.
    #[must_use]
    pub const fn fraction(self) -> f64 {
        match self {
            Self::K24 => 1.0,
            Self::K22 => 22.0 / 24.0,
            Self::K21 => 21.0 / 24.0,
            Self::K18 => 18.0 / 24.0,
        }
    }

    /// Wire label, e.g. `"24K"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::K24 => "24K",
            Self::K22 => "22K",
            Self::K21 => "21K",
            Self::K18 => "18K",
        }
    }
}

impl std::fmt::Display for Purity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What a product is made of.
///
/// Silver is priced off a flat per-gram rate and its own markup/making
/// constants; the karat-conversion table never applies to it.
///
/// Serializes as the bare label (`"24K"` .. `"18K"`, `"Silver"`), the wire
/// format the storefront has always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metal {
    Gold(Purity),
    Silver,
}

impl Serialize for Metal {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Metal {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        match label.as_str() {
            "24K" => Ok(Self::Gold(Purity::K24)),
            "22K" => Ok(Self::Gold(Purity::K22)),
            "21K" => Ok(Self::Gold(Purity::K21)),
            "18K" => Ok(Self::Gold(Purity::K18)),
            "Silver" => Ok(Self::Silver),
            other => Err(serde::de::Error::unknown_variant(
                other,
                &["24K", "22K", "21K", "18K", "Silver"],
            )),
        }
    }
}

impl Metal {
    /// Wire label, e.g. `"22K"` or `"Silver"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gold(purity) => purity.label(),
            Self::Silver => "Silver",
        }
    }
}

impl std::fmt::Display for Metal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable pricing constants for one market.
///
/// Injected into every computation rather than read from global state, so
/// the calculator stays a pure function and a future market can carry its
/// own table.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingTable {
    /// Retail markup per gram by tier (24K, 22K, 21K, 18K), AED/g.
    pub retail_markup: [f64; 4],
    /// Base making charge per gram by tier (24K, 22K, 21K, 18K), AED/g.
    pub base_making_charge: [f64; 4],
    /// Flat VAT rate applied to the pre-tax subtotal.
    pub vat_rate: f64,
    /// Flat silver rate, AED/g.
    pub silver_rate: f64,
    /// Silver retail markup, AED/g.
    pub silver_markup: f64,
    /// Silver base making charge, AED/g.
    pub silver_making_charge: f64,
}

impl Default for PricingTable {
    /// The Dubai retail table: 5% VAT, AED-denominated constants.
    fn default() -> Self {
        Self {
            retail_markup: [45.0, 50.0, 55.0, 60.0],
            base_making_charge: [8.0, 12.0, 15.0, 18.0],
            vat_rate: 0.05,
            silver_rate: 3.80,
            silver_markup: 8.0,
            silver_making_charge: 3.0,
        }
    }
}

impl PricingTable {
    const fn tier_index(purity: Purity) -> usize {
        match purity {
            Purity::K24 => 0,
            Purity::K22 => 1,
            Purity::K21 => 2,
            Purity::K18 => 3,
        }
    }

    /// Retail markup for a tier, AED/g.
    #[must_use]
    pub const fn retail_markup(&self, purity: Purity) -> f64 {
        self.retail_markup[Self::tier_index(purity)]
    }

    /// Base making charge for a tier, AED/g.
    #[must_use]
    pub const fn base_making_charge(&self, purity: Purity) -> f64 {
        self.base_making_charge[Self::tier_index(purity)]
    }

    /// Per-gram retail breakdown for one purity tier.
    ///
    /// `multiplier` scales the base making charge; products carry their own
    /// multiplier (1.0 for standard work, higher for intricate pieces). It
    /// is deliberately not validated - only the spot price is.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidSpotPrice`] if `spot_per_gram` is not
    /// finite or not greater than zero.
    pub fn retail_quote(
        &self,
        spot_per_gram: f64,
        purity: Purity,
        multiplier: f64,
    ) -> Result<RetailQuote, PricingError> {
        validate_spot(spot_per_gram)?;

        let spot_price = spot_per_gram * purity.fraction();
        let retail_markup = self.retail_markup(purity);
        let making_charge = self.base_making_charge(purity) * multiplier;
        let subtotal = spot_price + retail_markup + making_charge;
        let vat = subtotal * self.vat_rate;

        Ok(RetailQuote {
            spot_price,
            retail_markup,
            making_charge,
            subtotal,
            vat,
            total: subtotal + vat,
        })
    }

    /// Per-gram retail breakdown for silver.
    ///
    /// Same step structure as the gold quote with the flat silver rate in
    /// place of the purity-adjusted spot; no karat fraction applies.
    #[must_use]
    pub fn silver_quote(&self, multiplier: f64) -> RetailQuote {
        let making_charge = self.silver_making_charge * multiplier;
        let subtotal = self.silver_rate + self.silver_markup + making_charge;
        let vat = subtotal * self.vat_rate;

        RetailQuote {
            spot_price: self.silver_rate,
            retail_markup: self.silver_markup,
            making_charge,
            subtotal,
            vat,
            total: subtotal + vat,
        }
    }

    /// Weight-scaled quote for a gold jewelry piece.
    ///
    /// Metal cost (purity-adjusted spot plus markup) and making cost are
    /// each scaled by `weight_grams` before VAT. `price_per_gram` is the
    /// unweighted per-gram total, returned for display.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidSpotPrice`] for a non-finite or
    /// non-positive spot price, [`PricingError::InvalidWeight`] for a
    /// non-finite or non-positive weight.
    pub fn jewelry_quote(
        &self,
        spot_per_gram: f64,
        purity: Purity,
        weight_grams: f64,
        multiplier: f64,
    ) -> Result<JewelryQuote, PricingError> {
        validate_weight(weight_grams)?;
        let per_gram = self.retail_quote(spot_per_gram, purity, multiplier)?;
        Ok(self.scale(&per_gram, weight_grams))
    }

    /// Weight-scaled quote for a silver piece.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidWeight`] for a non-finite or
    /// non-positive weight.
    pub fn silver_jewelry_quote(
        &self,
        weight_grams: f64,
        multiplier: f64,
    ) -> Result<JewelryQuote, PricingError> {
        validate_weight(weight_grams)?;
        let per_gram = self.silver_quote(multiplier);
        Ok(self.scale(&per_gram, weight_grams))
    }

    fn scale(&self, per_gram: &RetailQuote, weight_grams: f64) -> JewelryQuote {
        let metal_cost = (per_gram.spot_price + per_gram.retail_markup) * weight_grams;
        let making_cost = per_gram.making_charge * weight_grams;
        let subtotal = metal_cost + making_cost;
        let vat = subtotal * self.vat_rate;

        JewelryQuote {
            metal_cost,
            making_cost,
            subtotal,
            vat,
            total: subtotal + vat,
            price_per_gram: per_gram.total,
        }
    }
}

/// Per-gram retail price breakdown.
///
/// Every intermediate step is carried so callers can render the full
/// breakdown. Values are unrounded; round with [`round2`] at display time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RetailQuote {
    /// Purity-adjusted spot price, AED/g.
    pub spot_price: f64,
    /// Retail markup, AED/g.
    pub retail_markup: f64,
    /// Adjusted making charge, AED/g.
    pub making_charge: f64,
    /// Pre-tax subtotal, AED/g.
    pub subtotal: f64,
    /// VAT amount, AED/g.
    pub vat: f64,
    /// Final per-gram retail price, AED/g.
    pub total: f64,
}

/// Weight-scaled price breakdown for a jewelry piece.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JewelryQuote {
    /// Metal cost: (purity-adjusted spot + markup) * weight, AED.
    pub metal_cost: f64,
    /// Making cost: adjusted making charge * weight, AED.
    pub making_cost: f64,
    /// Pre-tax subtotal, AED.
    pub subtotal: f64,
    /// VAT amount, AED.
    pub vat: f64,
    /// Final retail price, AED.
    pub total: f64,
    /// Unweighted per-gram total, AED/g, for display.
    pub price_per_gram: f64,
}

/// Round to 2 decimal places for display, half away from zero.
///
/// The single rounding point in the codebase - quote arithmetic never
/// rounds intermediates.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn validate_spot(spot_per_gram: f64) -> Result<(), PricingError> {
    if !spot_per_gram.is_finite() || spot_per_gram <= 0.0 {
        return Err(PricingError::InvalidSpotPrice(spot_per_gram));
    }
    Ok(())
}

fn validate_weight(weight_grams: f64) -> Result<(), PricingError> {
    if !weight_grams.is_finite() || weight_grams <= 0.0 {
        return Err(PricingError::InvalidWeight(weight_grams));
    }
    Ok(())
}
