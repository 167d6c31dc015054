//! In-memory product catalog.
//!
//! The catalog is an immutable data set seeded at startup and shared via
//! `Arc`. Handlers read it; nothing writes it. Lookup, facet derivation,
//! and conjunctive search filtering all live here so the route handlers
//! stay thin.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use zahab_core::pricing::{Metal, Purity};
use zahab_core::types::{Availability, Category, Product, ProductType};

/// Immutable, cheaply cloneable product catalog.
#[derive(Clone)]
pub struct Catalog {
    products: Arc<[Product]>,
}

/// Conjunctive search filters. Empty vectors mean "no constraint".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    pub purity: Vec<Metal>,
    pub category: Vec<Category>,
    pub availability: Vec<Availability>,
    pub weight_min: Option<f64>,
    pub weight_max: Option<f64>,
}

/// Distinct facet values across the catalog, for filter UIs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub purities: Vec<String>,
    pub categories: Vec<Category>,
    pub availability: Vec<Availability>,
    pub weight_range: WeightRange,
}

/// Min/max base weight across the catalog, grams.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WeightRange {
    pub min: f64,
    pub max: f64,
}

impl Catalog {
    /// Build a catalog from a product list.
    ///
    /// # Panics
    ///
    /// Panics if two products share a `product_code`; the seed data is
    /// static and a duplicate is a programming error caught at startup.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let mut codes = BTreeSet::new();
        for product in &products {
            assert!(
                codes.insert(product.product_code.as_str()),
                "duplicate product code: {}",
                product.product_code
            );
        }
        Self {
            products: products.into(),
        }
    }

    /// The built-in catalog data set.
    #[must_use]
    pub fn seed() -> Self {
        Self::new(seed_products())
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Derive distinct facet values and the weight range.
    #[must_use]
    pub fn facets(&self) -> Facets {
        let mut purities = BTreeSet::new();
        let mut categories = Vec::new();
        let mut availability = Vec::new();

        for product in self.products.iter() {
            purities.insert(product.purity.label());
            if !categories.contains(&product.category) {
                categories.push(product.category);
            }
            if !availability.contains(&product.availability) {
                availability.push(product.availability);
            }
        }

        let min = self
            .products
            .iter()
            .map(|p| p.base_weight)
            .fold(f64::INFINITY, f64::min);
        let max = self
            .products
            .iter()
            .map(|p| p.base_weight)
            .fold(f64::NEG_INFINITY, f64::max);

        Facets {
            purities: purities.into_iter().map(String::from).collect(),
            categories,
            availability,
            weight_range: WeightRange {
                min: if min.is_finite() { min } else { 0.0 },
                max: if max.is_finite() { max } else { 0.0 },
            },
        }
    }

    /// Case-insensitive substring search over name and description, with
    /// conjunctive filters. An empty query matches everything.
    #[must_use]
    pub fn search(&self, query: Option<&str>, filters: &SearchFilters) -> Vec<&Product> {
        let needle = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        self.products
            .iter()
            .filter(|product| {
                needle.as_ref().is_none_or(|needle| {
                    product.name.to_lowercase().contains(needle)
                        || product.description.to_lowercase().contains(needle)
                })
            })
            .filter(|product| {
                filters.purity.is_empty() || filters.purity.contains(&product.purity)
            })
            .filter(|product| {
                filters.category.is_empty() || filters.category.contains(&product.category)
            })
            .filter(|product| {
                filters.availability.is_empty()
                    || filters.availability.contains(&product.availability)
            })
            .filter(|product| filters.weight_min.is_none_or(|min| product.base_weight >= min))
            .filter(|product| filters.weight_max.is_none_or(|max| product.base_weight <= max))
            .collect()
    }
}

/// The seed data set: enough variety to exercise every purity tier and
/// both calculator forms.
#[allow(clippy::too_many_lines)]
fn seed_products() -> Vec<Product> {
    #[allow(clippy::too_many_arguments)]
    fn product(
        id: u32,
        name: &str,
        image: &str,
        purity: Metal,
        base_weight: f64,
        display_weight: Option<&str>,
        custom_weights: Option<Vec<f64>>,
        making_charge: f64,
        product_type: ProductType,
        category: Category,
        description: &str,
        manufacturer: &str,
        availability: Availability,
        product_code: &str,
    ) -> Product {
        Product {
            id,
            name: name.to_string(),
            image: image.to_string(),
            images: None,
            purity,
            base_weight,
            display_weight: display_weight.map(String::from),
            custom_weights,
            making_charge,
            product_type,
            category,
            description: description.to_string(),
            manufacturer: manufacturer.to_string(),
            availability,
            product_code: product_code.to_string(),
        }
    }

    vec![
        product(
            1,
            "Vienna Philharmonic Gold Coin",
            "/images/products/philharmonic-1oz.jpg",
            Metal::Gold(Purity::K24),
            31.1035,
            Some("1 oz"),
            None,
            1.0,
            ProductType::Bullion,
            Category::Coins,
            "24K one-ounce bullion coin, brilliant uncirculated.",
            "Austrian Mint",
            Availability::InStock,
            "ZB-C-001",
        ),
        product(
            2,
            "Cast Gold Bar 10g",
            "/images/products/bar-10g.jpg",
            Metal::Gold(Purity::K24),
            10.0,
            Some("10g"),
            Some(vec![5.0, 10.0, 20.0, 50.0]),
            1.0,
            ProductType::Bullion,
            Category::Bars,
            "24K cast bar with assay certificate.",
            "Emirates Gold",
            Availability::InStock,
            "ZB-B-010",
        ),
        product(
            3,
            "Minted Gold Bar 1g",
            "/images/products/bar-1g.jpg",
            Metal::Gold(Purity::K24),
            1.0,
            Some("1g"),
            None,
            1.2,
            ProductType::Bullion,
            Category::Bars,
            "24K minted gift bar in sealed blister pack.",
            "Emirates Gold",
            Availability::MadeToOrder,
            "ZB-B-001",
        ),
        product(
            4,
            "Classic Bangle",
            "/images/products/bangle-classic.jpg",
            Metal::Gold(Purity::K22),
            18.5,
            None,
            None,
            1.0,
            ProductType::Jewelry,
            Category::Jewelry,
            "22K plain polished bangle, traditional design.",
            "Al Sayegh Jewellers",
            Availability::InStock,
            "ZJ-G-104",
        ),
        product(
            5,
            "Rope Chain 50cm",
            "/images/products/chain-rope.jpg",
            Metal::Gold(Purity::K22),
            12.3,
            None,
            None,
            1.4,
            ProductType::Jewelry,
            Category::Jewelry,
            "22K rope-link chain, 50cm, lobster clasp.",
            "Al Sayegh Jewellers",
            Availability::InStock,
            "ZJ-G-115",
        ),
        product(
            6,
            "Filigree Necklace Set",
            "/images/products/necklace-filigree.jpg",
            Metal::Gold(Purity::K21),
            24.0,
            None,
            None,
            1.8,
            ProductType::Jewelry,
            Category::Jewelry,
            "21K filigree necklace with matching earrings.",
            "Damas Atelier",
            Availability::MadeToOrder,
            "ZJ-G-201",
        ),
        product(
            7,
            "Band Ring",
            "/images/products/ring-band.jpg",
            Metal::Gold(Purity::K21),
            4.2,
            None,
            None,
            1.1,
            ProductType::Jewelry,
            Category::Jewelry,
            "21K plain band ring, high polish.",
            "Damas Atelier",
            Availability::InStock,
            "ZJ-G-210",
        ),
        product(
            8,
            "Solitaire Ring Mount",
            "/images/products/ring-solitaire.jpg",
            Metal::Gold(Purity::K18),
            3.6,
            None,
            None,
            1.6,
            ProductType::Jewelry,
            Category::Jewelry,
            "18K solitaire mount, four-claw setting.",
            "Zahab Workshop",
            Availability::InStock,
            "ZJ-G-301",
        ),
        product(
            9,
            "Curb Bracelet",
            "/images/products/bracelet-curb.jpg",
            Metal::Gold(Purity::K18),
            9.8,
            None,
            None,
            1.3,
            ProductType::Jewelry,
            Category::Jewelry,
            "18K curb-link bracelet, 19cm.",
            "Zahab Workshop",
            Availability::OutOfStock,
            "ZJ-G-310",
        ),
        product(
            10,
            "Silver Bar 100g",
            "/images/products/silver-bar-100g.jpg",
            Metal::Silver,
            100.0,
            Some("100g"),
            None,
            1.0,
            ProductType::Bullion,
            Category::Silver,
            "Fine silver cast bar with serial number.",
            "Emirates Gold",
            Availability::InStock,
            "ZB-S-100",
        ),
        product(
            11,
            "Silver Cuff Bracelet",
            "/images/products/silver-cuff.jpg",
            Metal::Silver,
            32.5,
            None,
            None,
            1.5,
            ProductType::Jewelry,
            Category::Silver,
            "Hand-hammered silver cuff bracelet.",
            "Zahab Workshop",
            Availability::InStock,
            "ZJ-S-021",
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_covers_every_tier_and_silver() {
        let catalog = Catalog::seed();
        for purity in Purity::ALL {
            assert!(
                catalog
                    .all()
                    .iter()
                    .any(|p| p.purity == Metal::Gold(purity)),
                "no seed product for {purity}"
            );
        }
        assert!(catalog.all().iter().any(|p| p.purity == Metal::Silver));
    }

    #[test]
    fn test_get_by_id() {
        let catalog = Catalog::seed();
        assert_eq!(catalog.get(1).map(|p| p.product_code.as_str()), Some("ZB-C-001"));
        assert!(catalog.get(9999).is_none());
    }

    #[test]
    #[should_panic(expected = "duplicate product code")]
    fn test_duplicate_product_code_panics() {
        let mut products = seed_products();
        if let Some(first) = products.first().cloned() {
            products.push(first);
        }
        let _ = Catalog::new(products);
    }

    #[test]
    fn test_search_matches_name_case_insensitive() {
        let catalog = Catalog::seed();
        let results = catalog.search(Some("BANGLE"), &SearchFilters::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results.first().map(|p| p.id), Some(4));
    }

    #[test]
    fn test_search_matches_description() {
        let catalog = Catalog::seed();
        let results = catalog.search(Some("assay certificate"), &SearchFilters::default());
        assert_eq!(results.first().map(|p| p.id), Some(2));
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let catalog = Catalog::seed();
        let results = catalog.search(Some("   "), &SearchFilters::default());
        assert_eq!(results.len(), catalog.all().len());
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let catalog = Catalog::seed();
        let filters = SearchFilters {
            purity: vec![Metal::Gold(Purity::K18)],
            availability: vec![Availability::InStock],
            ..SearchFilters::default()
        };
        let results = catalog.search(None, &filters);
        // The 18K bracelet is out of stock; only the solitaire mount remains
        assert_eq!(results.len(), 1);
        assert_eq!(results.first().map(|p| p.id), Some(8));
    }

    #[test]
    fn test_weight_range_filter() {
        let catalog = Catalog::seed();
        let filters = SearchFilters {
            weight_min: Some(50.0),
            ..SearchFilters::default()
        };
        let results = catalog.search(None, &filters);
        assert!(results.iter().all(|p| p.base_weight >= 50.0));
        assert!(!results.is_empty());
    }

    #[test]
    fn test_facets() {
        let catalog = Catalog::seed();
        let facets = catalog.facets();
        assert!(facets.purities.contains(&"24K".to_string()));
        assert!(facets.purities.contains(&"Silver".to_string()));
        assert!(facets.categories.contains(&Category::Coins));
        assert!(facets.availability.contains(&Availability::MadeToOrder));
        assert!((facets.weight_range.min - 1.0).abs() < f64::EPSILON);
        assert!((facets.weight_range.max - 100.0).abs() < f64::EPSILON);
    }
}
