//! Catalog product model.
//!
//! Products are inert catalog rows: the calculator consumes their purity,
//! weight, and making-charge multiplier, but nothing here is ever mutated.
//! Wire field names are camelCase, matching the storefront's JSON format.

use serde::{Deserialize, Serialize};

use crate::pricing::Metal;

/// Whether a product is investment metal or fabricated jewelry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Bullion,
    Jewelry,
}

/// Catalog browse category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Coins,
    Bars,
    Silver,
    Jewelry,
}

/// Stock availability of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Availability {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Made to Order")]
    MadeToOrder,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub image: String,
    /// Additional gallery images, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    pub purity: Metal,
    /// Default weight in grams, used when a quote request names no weight.
    pub base_weight: f64,
    /// Human-readable weight label (e.g. "1 oz", "10g"), if it differs
    /// from the bare gram count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_weight: Option<String>,
    /// Alternate purchasable weights in grams, if the piece comes in sizes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_weights: Option<Vec<f64>>,
    /// Making-charge multiplier applied to the tier's base making charge.
    /// 1.0 for standard work, higher for intricate pieces.
    pub making_charge: f64,
    pub product_type: ProductType,
    pub category: Category,
    pub description: String,
    pub manufacturer: String,
    pub availability: Availability,
    /// Unique SKU-style code; uniqueness is asserted when the catalog seeds.
    pub product_code: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pricing::Purity;

    fn sample() -> Product {
        Product {
            id: 1,
            name: "Emirates Sovereign Coin".to_string(),
            image: "/images/sovereign.jpg".to_string(),
            images: None,
            purity: Metal::Gold(Purity::K24),
            base_weight: 7.98,
            display_weight: None,
            custom_weights: None,
            making_charge: 1.0,
            product_type: ProductType::Bullion,
            category: Category::Coins,
            description: "24K gold sovereign coin".to_string(),
            manufacturer: "Emirates Mint".to_string(),
            availability: Availability::InStock,
            product_code: "ZB-C-001".to_string(),
        }
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["baseWeight"], 7.98);
        assert_eq!(json["makingCharge"], 1.0);
        assert_eq!(json["productCode"], "ZB-C-001");
        assert_eq!(json["purity"], "24K");
        assert_eq!(json["productType"], "bullion");
        assert_eq!(json["availability"], "In Stock");
        // Optional fields are omitted, not null
        assert!(json.get("images").is_none());
    }

    #[test]
    fn test_product_round_trips() {
        let product = sample();
        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }
}
