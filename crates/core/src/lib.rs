//! Zahab Core - Pricing domain for the gold storefront.
//!
//! This crate holds the deterministic retail price computation and the
//! catalog product model shared by the storefront binary and the test
//! crates. It contains no I/O, no HTTP, and no async - every function in
//! here is a pure derivation over its inputs and a fixed pricing table,
//! which keeps the arithmetic independently testable.
//!
//! # Modules
//!
//! - [`pricing`] - Purity tiers, the pricing table, and the quote computations
//! - [`types`] - The catalog `Product` model consumed by the calculator

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use pricing::{
    JewelryQuote, Metal, PricingError, PricingTable, Purity, RetailQuote, round2,
};
pub use types::{Availability, Category, Product, ProductType};
