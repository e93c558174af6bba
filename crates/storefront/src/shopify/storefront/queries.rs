//! GraphQL operation definitions for the Shopify Storefront API.
//!
//! Each operation lives in a document under `graphql/storefront/queries/`.
//! The submodules hold the variables and response shapes for one operation;
//! shapes shared by several operations are defined once at the top.

use serde::{Deserialize, Serialize};

use crate::shopify::graphql::graphql_operation;

const PRODUCTS_DOCUMENT: &str =
    include_str!("../../../graphql/storefront/queries/products.graphql");
const COLLECTIONS_DOCUMENT: &str =
    include_str!("../../../graphql/storefront/queries/collections.graphql");
const CART_DOCUMENT: &str = include_str!("../../../graphql/storefront/queries/cart.graphql");
const CUSTOMER_DOCUMENT: &str =
    include_str!("../../../graphql/storefront/queries/customer.graphql");
const MENU_DOCUMENT: &str = include_str!("../../../graphql/storefront/queries/menu.graphql");

// =============================================================================
// Shared response shapes
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyFields {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFields {
    pub id: Option<String>,
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoFields {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// A connection selected with `nodes { ... }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nodes<T> {
    pub nodes: Vec<T>,
}

/// A connection selected with `nodes { ... } pageInfo { ... }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub nodes: Vec<T>,
    pub page_info: PageInfoFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedOptionFields {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeFields {
    pub min_variant_price: MoneyFields,
    pub max_variant_price: MoneyFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionValueFields {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOptionFields {
    pub id: String,
    pub name: String,
    pub option_values: Vec<OptionValueFields>,
}

/// `VariantFields`; collection listings select a subset, so optional
/// fields may be absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantFields {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub quantity_available: Option<i64>,
    pub sku: Option<String>,
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
    pub price: MoneyFields,
    pub compare_at_price: Option<MoneyFields>,
    #[serde(default)]
    pub selected_options: Vec<SelectedOptionFields>,
    pub image: Option<ImageFields>,
}

/// `ProductFields` plus the image and variant connections each query adds.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_html: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Option<String>,
    pub available_for_sale: bool,
    pub price_range: PriceRangeFields,
    pub compare_at_price_range: Option<PriceRangeFields>,
    pub featured_image: Option<ImageFields>,
    #[serde(default)]
    pub options: Vec<ProductOptionFields>,
    pub images: Option<Nodes<ImageFields>>,
    pub variants: Option<Nodes<VariantFields>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionFields {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_html: String,
    pub image: Option<ImageFields>,
    pub products: Option<Connection<ProductFields>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdFields {
    pub id: String,
}

// =============================================================================
// Product operations
// =============================================================================

graphql_operation!(
    /// Fetch one product page by handle.
    GetProductByHandle,
    get_product_by_handle,
    PRODUCTS_DOCUMENT
);

pub mod get_product_by_handle {
    use super::{Deserialize, ProductFields, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub handle: String,
        pub image_count: i64,
        pub variant_count: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductFields>,
    }
}

graphql_operation!(
    /// Fetch a page of products.
    GetProducts,
    get_products,
    PRODUCTS_DOCUMENT
);

pub mod get_products {
    use super::{Connection, Deserialize, ProductFields, Serialize};

    #[derive(Debug, Clone, Copy, Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum ProductSortKeys {
        Title,
        CreatedAt,
        BestSelling,
        Price,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
        pub sort_key: Option<ProductSortKeys>,
        pub reverse: Option<bool>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Connection<ProductFields>,
    }
}

graphql_operation!(
    /// Fetch related products for a product page.
    GetProductRecommendations,
    get_product_recommendations,
    PRODUCTS_DOCUMENT
);

pub mod get_product_recommendations {
    use super::{Deserialize, ProductFields, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_recommendations: Option<Vec<ProductFields>>,
    }
}

graphql_operation!(
    /// Resolve a product (by ID or handle) to its first variant ID.
    GetFirstVariant,
    get_first_variant,
    PRODUCTS_DOCUMENT
);

pub mod get_first_variant {
    use super::{Deserialize, IdFields, Nodes, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub id: Option<String>,
        pub handle: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct FirstVariantProduct {
        pub id: String,
        pub variants: Nodes<IdFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<FirstVariantProduct>,
    }
}

// =============================================================================
// Collection operations
// =============================================================================

graphql_operation!(
    /// Fetch a collection and one page of its products.
    GetCollectionByHandle,
    get_collection_by_handle,
    COLLECTIONS_DOCUMENT
);

pub mod get_collection_by_handle {
    use super::{CollectionFields, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub handle: String,
        pub product_count: i64,
        pub after: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<CollectionFields>,
    }
}

graphql_operation!(
    /// Fetch a page of collections.
    GetCollections,
    get_collections,
    COLLECTIONS_DOCUMENT
);

pub mod get_collections {
    use super::{CollectionFields, Connection, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collections: Connection<CollectionFields>,
    }
}

// =============================================================================
// Navigation
// =============================================================================

graphql_operation!(
    /// Fetch a navigation menu by handle.
    GetMenu,
    get_menu,
    MENU_DOCUMENT
);

pub mod get_menu {
    use super::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MenuItemFields {
        pub title: String,
        pub url: Option<String>,
        #[serde(rename = "type")]
        pub kind: String,
        #[serde(default)]
        pub items: Vec<MenuItemFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MenuFields {
        pub handle: String,
        pub title: String,
        pub items: Vec<MenuItemFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub menu: Option<MenuFields>,
    }
}

// =============================================================================
// Cart operations
// =============================================================================

pub mod cart_fields {
    use super::{Deserialize, MoneyFields, Nodes, SelectedOptionFields, Serialize};

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartImageFields {
        pub url: String,
        pub alt_text: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MerchandiseProductFields {
        pub id: String,
        pub handle: String,
        pub title: String,
        pub featured_image: Option<CartImageFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MerchandiseFields {
        pub id: String,
        pub title: String,
        pub available_for_sale: bool,
        pub price: MoneyFields,
        pub selected_options: Vec<SelectedOptionFields>,
        pub image: Option<CartImageFields>,
        pub product: MerchandiseProductFields,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartLineCostFields {
        pub amount_per_quantity: MoneyFields,
        pub total_amount: MoneyFields,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CartLineFields {
        pub id: String,
        pub quantity: i64,
        pub cost: CartLineCostFields,
        pub merchandise: MerchandiseFields,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartCostFields {
        pub subtotal_amount: MoneyFields,
        pub total_amount: MoneyFields,
        pub total_tax_amount: Option<MoneyFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct DiscountCodeFields {
        pub code: String,
        pub applicable: bool,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartFields {
        pub id: String,
        pub checkout_url: String,
        pub note: Option<String>,
        pub total_quantity: i64,
        pub cost: CartCostFields,
        #[serde(default)]
        pub discount_codes: Vec<DiscountCodeFields>,
        pub lines: Nodes<CartLineFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CartUserErrorFields {
        pub code: Option<String>,
        pub field: Option<Vec<String>>,
        pub message: String,
    }

    /// Payload shared by every cart mutation.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartPayload {
        pub cart: Option<CartFields>,
        pub user_errors: Vec<CartUserErrorFields>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct AttributeInput {
        pub key: String,
        pub value: String,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartLineInput {
        pub merchandise_id: String,
        pub quantity: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub attributes: Option<Vec<AttributeInput>>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct CartLineUpdateInput {
        pub id: String,
        pub quantity: i64,
    }
}

graphql_operation!(
    /// Create a cart, optionally with initial lines.
    CreateCart,
    create_cart,
    CART_DOCUMENT
);

pub mod create_cart {
    use super::cart_fields::{CartLineInput, CartPayload};
    use super::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct CartInput {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub lines: Option<Vec<CartLineInput>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub note: Option<String>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CartInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CartPayload>,
    }
}

graphql_operation!(
    /// Fetch a cart by ID.
    GetCart,
    get_cart,
    CART_DOCUMENT
);

pub mod get_cart {
    use super::cart_fields::CartFields;
    use super::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<CartFields>,
    }
}

graphql_operation!(
    /// Add lines to a cart.
    AddToCart,
    add_to_cart,
    CART_DOCUMENT
);

pub mod add_to_cart {
    use super::cart_fields::{CartLineInput, CartPayload};
    use super::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<CartPayload>,
    }
}

graphql_operation!(
    /// Change line quantities.
    UpdateCartLines,
    update_cart_lines,
    CART_DOCUMENT
);

pub mod update_cart_lines {
    use super::cart_fields::{CartLineUpdateInput, CartPayload};
    use super::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub lines: Vec<CartLineUpdateInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_update: Option<CartPayload>,
    }
}

graphql_operation!(
    /// Remove lines from a cart.
    RemoveFromCart,
    remove_from_cart,
    CART_DOCUMENT
);

pub mod remove_from_cart {
    use super::cart_fields::CartPayload;
    use super::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub line_ids: Vec<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_remove: Option<CartPayload>,
    }
}

// =============================================================================
// Customer operations
// =============================================================================

graphql_operation!(
    /// Create a customer; used for newsletter signups.
    CustomerCreate,
    customer_create,
    CUSTOMER_DOCUMENT
);

pub mod customer_create {
    use super::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CustomerCreateInput {
        pub email: String,
        pub password: String,
        pub accepts_marketing: bool,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CustomerCreateInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CustomerFields {
        pub id: String,
        pub email: Option<String>,
        pub accepts_marketing: bool,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CustomerUserErrorFields {
        pub code: Option<String>,
        pub field: Option<Vec<String>>,
        pub message: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CustomerCreatePayload {
        pub customer: Option<CustomerFields>,
        pub customer_user_errors: Vec<CustomerUserErrorFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub customer_create: Option<CustomerCreatePayload>,
    }
}
