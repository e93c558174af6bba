//! Command implementations.

pub mod product;
pub mod tags;
pub mod variant;

use orchard_core::ShopifyGid;
use orchard_storefront::config::{ConfigError, ShopifyConfig};
use orchard_storefront::shopify::{AdminClient, ShopifyError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `SHOPIFY_ADMIN_TOKEN` is not set.
    #[error("SHOPIFY_ADMIN_TOKEN must be set for Admin API commands")]
    MissingAdminToken,

    /// The Admin API rejected the request.
    #[error(transparent)]
    Shopify(#[from] ShopifyError),

    /// An argument could not be parsed.
    #[error("Invalid {0}: {1}")]
    InvalidArgument(&'static str, String),
}

/// Build an Admin API client from the environment.
pub fn admin_client() -> Result<AdminClient, CliError> {
    let config = ShopifyConfig::from_env()?;
    AdminClient::from_config(&config)?.ok_or(CliError::MissingAdminToken)
}

/// Accept a numeric ID or a global ID for `resource`.
pub fn resolve_gid(resource: &'static str, input: &str) -> Result<String, CliError> {
    let input = input.trim();

    if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(ShopifyGid::new(resource, input).to_string());
    }

    match ShopifyGid::parse(input) {
        Ok(gid) if gid.is(resource) => Ok(gid.to_string()),
        Ok(gid) => Err(CliError::InvalidArgument(
            "id",
            format!("expected a {resource} ID, got {gid}"),
        )),
        Err(e) => Err(CliError::InvalidArgument("id", e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_numeric_id() {
        assert_eq!(
            resolve_gid("Product", "1234").ok().as_deref(),
            Some("gid://shopify/Product/1234")
        );
    }

    #[test]
    fn test_resolve_full_gid() {
        assert_eq!(
            resolve_gid("ProductVariant", " gid://shopify/ProductVariant/9 ").ok().as_deref(),
            Some("gid://shopify/ProductVariant/9")
        );
    }

    #[test]
    fn test_resolve_rejects_other_resource() {
        assert!(matches!(
            resolve_gid("Product", "gid://shopify/Collection/5"),
            Err(CliError::InvalidArgument("id", _))
        ));
    }

    #[test]
    fn test_resolve_rejects_garbage() {
        assert!(resolve_gid("Product", "").is_err());
        assert!(resolve_gid("Product", "wildflower-honey").is_err());
    }
}
