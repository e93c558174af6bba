//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::VariantLookup;
use crate::shopify::{AdminClient, ShopifyError, StorefrontClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration and the Shopify clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: StorefrontClient,
    admin: Option<AdminClient>,
    variant_lookup: VariantLookup,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The Admin API client is only built when `SHOPIFY_ADMIN_TOKEN` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ShopifyError> {
        let storefront = StorefrontClient::new(&config.shopify)?;
        let admin = AdminClient::from_config(&config.shopify)?;
        let variant_lookup = VariantLookup::new(storefront.clone());

        if admin.is_none() {
            tracing::info!("SHOPIFY_ADMIN_TOKEN not set, wholesale orders disabled");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront,
                admin,
                variant_lookup,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Get the Shopify Admin API client, if configured.
    #[must_use]
    pub fn admin(&self) -> Option<&AdminClient> {
        self.inner.admin.as_ref()
    }

    /// Get the first-variant lookup service.
    #[must_use]
    pub fn variant_lookup(&self) -> &VariantLookup {
        &self.inner.variant_lookup
    }
}
