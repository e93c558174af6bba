//! Shopify Admin API client for wholesale product setup.
//!
//! Wholesale buyers order custom products that do not exist in the catalog.
//! Each order creates a product, prices and weighs its default variant, and
//! tags it so merchandisers can find it later. The same three mutations back
//! the `orchard` CLI.

pub mod queries;

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{info, instrument};

use crate::config::ShopifyConfig;
use crate::shopify::graphql::GraphQLTransport;
use crate::shopify::types::{CreatedProduct, NewProduct, UpdatedVariant, VariantUpdate};
use crate::shopify::{GraphQLError, ShopifyError, join_user_errors};

use queries::{
    ProductCreate, ProductVariantsBulkUpdate, TagsAdd, UserErrorFields, product_create,
    product_variants_bulk_update, tags_add,
};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Client for the Shopify Admin API.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<GraphQLTransport>,
}

impl AdminClient {
    /// Create an Admin API client with an explicit access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig, access_token: SecretString) -> Result<Self, ShopifyError> {
        let transport = GraphQLTransport::new(
            config.admin_url(),
            ACCESS_TOKEN_HEADER,
            access_token,
            config.request_timeout,
        )?;

        Ok(Self {
            inner: Arc::new(transport),
        })
    }

    /// Create a client if an Admin API token is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if a token is configured but the HTTP client cannot
    /// be built.
    pub fn from_config(config: &ShopifyConfig) -> Result<Option<Self>, ShopifyError> {
        config
            .admin_token
            .clone()
            .map(|token| Self::new(config, token))
            .transpose()
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, product), fields(title = %product.title))]
    pub async fn create_product(&self, product: NewProduct) -> Result<CreatedProduct, ShopifyError> {
        let variables = product_create::Variables {
            product: product_create::ProductCreateInput {
                title: product.title,
                vendor: product.vendor,
                product_type: product.product_type,
                tags: product.tags,
            },
        };

        let data = self.inner.execute::<ProductCreate>(variables).await?;

        let payload = data.product_create.ok_or_else(|| failure("Product creation failed"))?;
        check_user_errors(&payload.user_errors)?;

        let created = payload
            .product
            .ok_or_else(|| failure("Product creation failed"))?;

        info!(product_id = %created.id, handle = %created.handle, "Created product");

        Ok(CreatedProduct {
            default_variant_id: created.variants.nodes.into_iter().next().map(|v| v.id),
            id: created.id,
            handle: created.handle,
            title: created.title,
        })
    }

    /// Update a variant's price and/or shipping weight.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, update))]
    pub async fn update_variant(
        &self,
        product_id: &str,
        variant_id: &str,
        update: VariantUpdate,
    ) -> Result<UpdatedVariant, ShopifyError> {
        use product_variants_bulk_update::{
            InventoryItemInput, InventoryItemMeasurementInput, ProductVariantsBulkInput,
            Variables, WeightInput,
        };

        let inventory_item = update.weight.map(|weight| InventoryItemInput {
            measurement: InventoryItemMeasurementInput {
                weight: WeightInput {
                    value: weight.value,
                    unit: weight.unit,
                },
            },
        });

        let variables = Variables {
            product_id: product_id.to_string(),
            variants: vec![ProductVariantsBulkInput {
                id: variant_id.to_string(),
                price: update.price.map(|p| p.round_dp(2).to_string()),
                inventory_item,
            }],
        };

        let data = self
            .inner
            .execute::<ProductVariantsBulkUpdate>(variables)
            .await?;

        let payload = data
            .product_variants_bulk_update
            .ok_or_else(|| failure("Variant update failed"))?;
        check_user_errors(&payload.user_errors)?;

        payload
            .product_variants
            .and_then(|variants| variants.into_iter().next())
            .map(|variant| UpdatedVariant {
                id: variant.id,
                title: variant.title,
                price: variant.price,
            })
            .ok_or_else(|| failure("Variant update failed"))
    }

    /// Add tags to a product (or any taggable resource).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self))]
    pub async fn add_tags(&self, id: &str, tags: &[String]) -> Result<String, ShopifyError> {
        let variables = tags_add::Variables {
            id: id.to_string(),
            tags: tags.to_vec(),
        };

        let data = self.inner.execute::<TagsAdd>(variables).await?;

        let payload = data.tags_add.ok_or_else(|| failure("Adding tags failed"))?;
        check_user_errors(&payload.user_errors)?;

        payload
            .node
            .map(|node| node.id)
            .ok_or_else(|| failure("Adding tags failed"))
    }
}

fn check_user_errors(errors: &[UserErrorFields]) -> Result<(), ShopifyError> {
    if errors.is_empty() {
        return Ok(());
    }
    Err(ShopifyError::UserError(join_user_errors(
        errors
            .iter()
            .map(|e| (e.field.as_deref(), e.message.as_str())),
    )))
}

fn failure(message: &str) -> ShopifyError {
    ShopifyError::GraphQL(vec![GraphQLError::message(message)])
}
