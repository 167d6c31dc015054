//! Application state shared across handlers.

use std::sync::Arc;

use zahab_core::PricingTable;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::rates::RateResolver;
use crate::services::analytics::ActivitySink;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; everything inside is either immutable
/// (config, catalog, pricing table) or internally synchronized (resolver
/// client, activity sink).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    resolver: RateResolver,
    pricing: PricingTable,
    analytics: ActivitySink,
}

impl AppState {
    /// Create a new application state with the seeded catalog and the
    /// default (Dubai) pricing table, spawning the activity sink worker.
    ///
    /// # Errors
    ///
    /// Returns error if the resolver's HTTP client fails to build.
    pub fn new(config: StorefrontConfig) -> Result<Self, reqwest::Error> {
        let resolver = RateResolver::new(config.providers.clone())?;
        let analytics = ActivitySink::spawn(config.analytics_queue_capacity);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Catalog::seed(),
                resolver,
                pricing: PricingTable::default(),
                analytics,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the rate resolver.
    #[must_use]
    pub fn resolver(&self) -> &RateResolver {
        &self.inner.resolver
    }

    /// Get a reference to the pricing table.
    #[must_use]
    pub fn pricing(&self) -> &PricingTable {
        &self.inner.pricing
    }

    /// Get a reference to the activity sink.
    #[must_use]
    pub fn analytics(&self) -> &ActivitySink {
        &self.inner.analytics
    }
}
