//! Shopify Storefront API client implementation.
//!
//! Executes the static operations in [`queries`] over the shared
//! [`GraphQLTransport`]. Caches products, collections and menus using
//! `moka` (5-minute TTL); carts and mutations are never cached.

mod cache;
mod conversions;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use orchard_core::{Email, ProductRef};
use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::{debug, instrument};

use crate::config::ShopifyConfig;
use crate::shopify::graphql::GraphQLTransport;
use crate::shopify::types::{
    Cart, CartLineInput, CartLineUpdateInput, Collection, CollectionConnection, Menu,
    NewsletterSubscriber, Product, ProductConnection, ProductSortKey, SubscribeOutcome,
};
use crate::shopify::{GraphQLError, ShopifyError, join_user_errors};

use cache::CacheValue;
use conversions::{
    convert_cart, convert_collection, convert_collection_connection, convert_line_input,
    convert_line_update, convert_menu, convert_product, convert_product_connection,
    convert_user_errors,
};
use queries::cart_fields::{CartPayload, CartUserErrorFields};
use queries::{
    AddToCart, CreateCart, CustomerCreate, GetCart, GetCollectionByHandle, GetCollections,
    GetFirstVariant, GetMenu, GetProductByHandle, GetProductRecommendations, GetProducts,
    RemoveFromCart, UpdateCartLines, add_to_cart, create_cart, customer_create, get_cart,
    get_collection_by_handle, get_collections, get_first_variant, get_menu,
    get_product_by_handle, get_product_recommendations, get_products, remove_from_cart,
    update_cart_lines,
};

/// Header carrying the server-side Storefront token.
///
/// Private access tokens use a different header than public tokens.
const PRIVATE_TOKEN_HEADER: &str = "Shopify-Storefront-Private-Token";

/// Length of the throwaway password given to newsletter-only customers.
const NEWSLETTER_PASSWORD_LENGTH: usize = 32;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides access to products, collections, menus, cart operations and
/// newsletter signup. Catalog reads are cached for 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    transport: GraphQLTransport,
    cache: Cache<String, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let transport = GraphQLTransport::new(
            config.storefront_url(),
            PRIVATE_TOKEN_HEADER,
            config.storefront_private_token.clone(),
            config.request_timeout,
        )?;

        Ok(Self {
            inner: Arc::new(StorefrontClientInner { transport, cache }),
        })
    }

    async fn cached(&self, key: &str) -> Option<CacheValue> {
        self.inner.cache.get(key).await
    }

    async fn store(&self, key: String, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_by_handle(&self, handle: &str) -> Result<Product, ShopifyError> {
        let cache_key = format!("product:{handle}");

        if let Some(CacheValue::Product(product)) = self.cached(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let variables = get_product_by_handle::Variables {
            handle: handle.to_string(),
            image_count: 10,
            variant_count: 50,
        };

        let data = self
            .inner
            .transport
            .execute::<GetProductByHandle>(variables)
            .await?;

        let product_data = data
            .product
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;

        let product = convert_product(product_data);

        self.store(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a paginated list of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        first: i64,
        after: Option<String>,
        sort_key: Option<ProductSortKey>,
        reverse: bool,
    ) -> Result<ProductConnection, ShopifyError> {
        let cache_key = format!(
            "products:{first}:{}:{sort_key:?}:{reverse}",
            after.as_deref().unwrap_or("")
        );

        if let Some(CacheValue::Products(products)) = self.cached(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let variables = get_products::Variables {
            first,
            after,
            sort_key: sort_key.map(|key| match key {
                ProductSortKey::Title => get_products::ProductSortKeys::Title,
                ProductSortKey::CreatedAt => get_products::ProductSortKeys::CreatedAt,
                ProductSortKey::BestSelling => get_products::ProductSortKeys::BestSelling,
                ProductSortKey::Price => get_products::ProductSortKeys::Price,
            }),
            reverse: Some(reverse),
        };

        let data = self.inner.transport.execute::<GetProducts>(variables).await?;

        let connection = convert_product_connection(data.products);

        self.store(cache_key, CacheValue::Products(connection.clone()))
            .await;

        Ok(connection)
    }

    /// Get product recommendations.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product_recommendations(
        &self,
        product_id: &str,
    ) -> Result<Vec<Product>, ShopifyError> {
        let cache_key = format!("recommendations:{product_id}");

        if let Some(CacheValue::Recommendations(products)) = self.cached(&cache_key).await {
            debug!("Cache hit for recommendations");
            return Ok(products);
        }

        let variables = get_product_recommendations::Variables {
            product_id: product_id.to_string(),
        };

        let data = self
            .inner
            .transport
            .execute::<GetProductRecommendations>(variables)
            .await?;

        let products: Vec<Product> = data
            .product_recommendations
            .map(|recs| recs.into_iter().map(convert_product).collect())
            .unwrap_or_default();

        self.store(cache_key, CacheValue::Recommendations(products.clone()))
            .await;

        Ok(products)
    }

    /// Resolve a product to the ID of its first variant.
    ///
    /// Never cached: each lookup issues exactly one request.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::NotFound`] if the product does not exist or
    /// has no variants, or an error if the API request fails.
    #[instrument(skip(self), fields(product = %product))]
    pub async fn get_first_variant_id(&self, product: &ProductRef) -> Result<String, ShopifyError> {
        let variables = match product {
            ProductRef::Id(gid) => get_first_variant::Variables {
                id: Some(gid.to_string()),
                handle: None,
            },
            ProductRef::Handle(handle) => get_first_variant::Variables {
                id: None,
                handle: Some(handle.clone()),
            },
        };

        let data = self
            .inner
            .transport
            .execute::<GetFirstVariant>(variables)
            .await?;

        let found = data
            .product
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {product}")))?;

        found
            .variants
            .nodes
            .into_iter()
            .next()
            .map(|variant| variant.id)
            .ok_or_else(|| ShopifyError::NotFound(format!("Product has no variants: {}", found.id)))
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// Get a collection by its handle with one page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection is not found or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection_by_handle(
        &self,
        handle: &str,
        product_count: i64,
        after: Option<String>,
    ) -> Result<Collection, ShopifyError> {
        let cache_key = format!(
            "collection:{handle}:{product_count}:{}",
            after.as_deref().unwrap_or("")
        );

        if let Some(CacheValue::Collection(collection)) = self.cached(&cache_key).await {
            debug!("Cache hit for collection");
            return Ok(*collection);
        }

        let variables = get_collection_by_handle::Variables {
            handle: handle.to_string(),
            product_count,
            after,
        };

        let data = self
            .inner
            .transport
            .execute::<GetCollectionByHandle>(variables)
            .await?;

        let collection_data = data
            .collection
            .ok_or_else(|| ShopifyError::NotFound(format!("Collection not found: {handle}")))?;

        let collection = convert_collection(collection_data);

        self.store(
            cache_key,
            CacheValue::Collection(Box::new(collection.clone())),
        )
        .await;

        Ok(collection)
    }

    /// Get a paginated list of collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(
        &self,
        first: i64,
        after: Option<String>,
    ) -> Result<CollectionConnection, ShopifyError> {
        let cache_key = format!("collections:{first}:{}", after.as_deref().unwrap_or(""));

        if let Some(CacheValue::Collections(collections)) = self.cached(&cache_key).await {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let variables = get_collections::Variables { first, after };

        let data = self
            .inner
            .transport
            .execute::<GetCollections>(variables)
            .await?;

        let connection = convert_collection_connection(data.collections);

        self.store(cache_key, CacheValue::Collections(connection.clone()))
            .await;

        Ok(connection)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Get a navigation menu by handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the menu does not exist or the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_menu(&self, handle: &str) -> Result<Menu, ShopifyError> {
        let cache_key = format!("menu:{handle}");

        if let Some(CacheValue::Menu(menu)) = self.cached(&cache_key).await {
            debug!("Cache hit for menu");
            return Ok(menu);
        }

        let variables = get_menu::Variables {
            handle: handle.to_string(),
        };

        let data = self.inner.transport.execute::<GetMenu>(variables).await?;

        let menu = data
            .menu
            .map(convert_menu)
            .ok_or_else(|| ShopifyError::NotFound(format!("Menu not found: {handle}")))?;

        self.store(cache_key, CacheValue::Menu(menu.clone())).await;

        Ok(menu)
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Create a new cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails or user errors are returned.
    #[instrument(skip(self, lines))]
    pub async fn create_cart(
        &self,
        lines: Option<Vec<CartLineInput>>,
    ) -> Result<Cart, ShopifyError> {
        let variables = create_cart::Variables {
            input: create_cart::CartInput {
                lines: lines.map(|l| l.into_iter().map(convert_line_input).collect()),
                note: None,
            },
        };

        let data = self.inner.transport.execute::<CreateCart>(variables).await?;

        cart_from_payload(data.cart_create, "Failed to create cart")
    }

    /// Get an existing cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is not found or the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &str) -> Result<Cart, ShopifyError> {
        let variables = get_cart::Variables {
            cart_id: cart_id.to_string(),
        };

        let data = self.inner.transport.execute::<GetCart>(variables).await?;

        data.cart
            .map(convert_cart)
            .ok_or_else(|| ShopifyError::NotFound(format!("Cart not found: {cart_id}")))
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_to_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = add_to_cart::Variables {
            cart_id: cart_id.to_string(),
            lines: lines.into_iter().map(convert_line_input).collect(),
        };

        let data = self.inner.transport.execute::<AddToCart>(variables).await?;

        cart_from_payload(data.cart_lines_add, "Failed to add to cart")
    }

    /// Update cart line quantities.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_cart(
        &self,
        cart_id: &str,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = update_cart_lines::Variables {
            cart_id: cart_id.to_string(),
            lines: lines.into_iter().map(convert_line_update).collect(),
        };

        let data = self
            .inner
            .transport
            .execute::<UpdateCartLines>(variables)
            .await?;

        cart_from_payload(data.cart_lines_update, "Failed to update cart")
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_from_cart(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
    ) -> Result<Cart, ShopifyError> {
        let variables = remove_from_cart::Variables {
            cart_id: cart_id.to_string(),
            line_ids,
        };

        let data = self
            .inner
            .transport
            .execute::<RemoveFromCart>(variables)
            .await?;

        cart_from_payload(data.cart_lines_remove, "Failed to remove from cart")
    }

    // =========================================================================
    // Newsletter
    // =========================================================================

    /// Subscribe an address by creating a customer with marketing consent.
    ///
    /// The customer gets a random password they never see; Shopify requires
    /// one. An address that already belongs to a customer is reported as
    /// [`SubscribeOutcome::AlreadySubscribed`] rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify rejects the
    /// customer for any reason other than a duplicate address.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn subscribe_newsletter(
        &self,
        email: &Email,
    ) -> Result<SubscribeOutcome, ShopifyError> {
        let variables = customer_create::Variables {
            input: customer_create::CustomerCreateInput {
                email: email.to_string(),
                password: generate_password(),
                accepts_marketing: true,
            },
        };

        let data = self
            .inner
            .transport
            .execute::<CustomerCreate>(variables)
            .await?;

        let Some(payload) = data.customer_create else {
            return Err(ShopifyError::GraphQL(vec![GraphQLError::message(
                "Failed to create customer",
            )]));
        };

        if payload.customer_user_errors.iter().any(is_taken_error) {
            return Ok(SubscribeOutcome::AlreadySubscribed);
        }

        if !payload.customer_user_errors.is_empty() {
            return Err(ShopifyError::UserError(join_user_errors(
                payload
                    .customer_user_errors
                    .iter()
                    .map(|e| (e.field.as_deref(), e.message.as_str())),
            )));
        }

        payload
            .customer
            .map(|c| {
                SubscribeOutcome::Subscribed(NewsletterSubscriber {
                    id: c.id,
                    email: c.email,
                    accepts_marketing: c.accepts_marketing,
                })
            })
            .ok_or_else(|| {
                ShopifyError::GraphQL(vec![GraphQLError::message("Failed to create customer")])
            })
    }
}

/// Unwrap a cart mutation payload, surfacing `userErrors` as one message.
fn cart_from_payload(payload: Option<CartPayload>, failure: &str) -> Result<Cart, ShopifyError> {
    if let Some(result) = payload {
        if result.cart.is_none() && result.user_errors.iter().any(is_missing_cart_error) {
            return Err(ShopifyError::NotFound(convert_user_errors(
                &result.user_errors,
            )));
        }

        if !result.user_errors.is_empty() {
            return Err(ShopifyError::UserError(convert_user_errors(
                &result.user_errors,
            )));
        }

        if let Some(cart) = result.cart {
            return Ok(convert_cart(cart));
        }
    }

    Err(ShopifyError::GraphQL(vec![GraphQLError::message(failure)]))
}

/// Shopify reports an expired or checked-out cart as an `INVALID` error
/// on the `cartId` argument.
fn is_missing_cart_error(error: &CartUserErrorFields) -> bool {
    error
        .field
        .as_ref()
        .and_then(|field| field.last())
        .is_some_and(|field| field == "cartId")
        || error.message.to_lowercase().contains("cart does not exist")
}

fn is_taken_error(error: &customer_create::CustomerUserErrorFields) -> bool {
    error.code.as_deref() == Some("TAKEN")
        || error.message.to_lowercase().contains("already been taken")
}

fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(NEWSLETTER_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}
