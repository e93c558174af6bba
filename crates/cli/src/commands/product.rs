//! `orchard product` commands.

use orchard_storefront::shopify::NewProduct;

use super::{CliError, admin_client};

/// Create a product and log its ID, handle and default variant.
pub async fn create(
    title: String,
    vendor: Option<String>,
    product_type: Option<String>,
    tags: Vec<String>,
) -> Result<(), CliError> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(CliError::InvalidArgument("title", "must not be empty".to_string()));
    }

    let client = admin_client()?;

    tracing::info!("Creating product: {}", title);
    let product = client
        .create_product(NewProduct {
            title,
            vendor,
            product_type,
            tags: tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        })
        .await?;

    tracing::info!("Product created successfully!");
    tracing::info!("  ID: {}", product.id);
    tracing::info!("  Handle: {}", product.handle);
    match product.default_variant_id {
        Some(variant_id) => tracing::info!("  Default variant: {}", variant_id),
        None => tracing::warn!("Shopify returned no default variant"),
    }

    Ok(())
}
