//! Background services for the storefront.

pub mod analytics;
