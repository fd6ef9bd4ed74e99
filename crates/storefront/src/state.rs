//! Application state shared across handlers.

use std::sync::Arc;

use urban_threadz_core::CheckoutPolicy;

use crate::config::StorefrontConfig;
use crate::store::ProductStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the product store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: ProductStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `store` - Product store backing the catalog endpoints
    #[must_use]
    pub fn new(config: StorefrontConfig, store: ProductStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product store.
    #[must_use]
    pub fn store(&self) -> &ProductStore {
        &self.inner.store
    }

    /// Shipping and tax rules for cart summaries.
    #[must_use]
    pub fn checkout_policy(&self) -> &CheckoutPolicy {
        &self.inner.config.checkout
    }
}
