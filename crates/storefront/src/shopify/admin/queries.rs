//! GraphQL operation definitions for the Shopify Admin API.

use serde::{Deserialize, Serialize};

use crate::shopify::graphql::graphql_operation;

const PRODUCTS_DOCUMENT: &str = include_str!("../../../graphql/admin/queries/products.graphql");

#[derive(Debug, Clone, Deserialize)]
pub struct UserErrorFields {
    pub field: Option<Vec<String>>,
    pub message: String,
}

graphql_operation!(
    /// Create a product with its default variant.
    ProductCreate,
    product_create,
    PRODUCTS_DOCUMENT
);

pub mod product_create {
    use super::{Deserialize, Serialize, UserErrorFields};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductCreateInput {
        pub title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub vendor: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub product_type: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub tags: Vec<String>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub product: ProductCreateInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct VariantId {
        pub id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct VariantNodes {
        pub nodes: Vec<VariantId>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CreatedProductFields {
        pub id: String,
        pub handle: String,
        pub title: String,
        pub variants: VariantNodes,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductCreatePayload {
        pub product: Option<CreatedProductFields>,
        pub user_errors: Vec<UserErrorFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_create: Option<ProductCreatePayload>,
    }
}

graphql_operation!(
    /// Update price and shipping weight on existing variants.
    ProductVariantsBulkUpdate,
    product_variants_bulk_update,
    PRODUCTS_DOCUMENT
);

pub mod product_variants_bulk_update {
    use super::{Deserialize, Serialize, UserErrorFields};
    use crate::shopify::types::WeightUnit;

    #[derive(Debug, Clone, Serialize)]
    pub struct WeightInput {
        pub value: f64,
        pub unit: WeightUnit,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct InventoryItemMeasurementInput {
        pub weight: WeightInput,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct InventoryItemInput {
        pub measurement: InventoryItemMeasurementInput,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductVariantsBulkInput {
        pub id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub price: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub inventory_item: Option<InventoryItemInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
        pub variants: Vec<ProductVariantsBulkInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct VariantFields {
        pub id: String,
        pub title: String,
        pub price: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductVariantsBulkUpdatePayload {
        pub product_variants: Option<Vec<VariantFields>>,
        pub user_errors: Vec<UserErrorFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_variants_bulk_update: Option<ProductVariantsBulkUpdatePayload>,
    }
}

graphql_operation!(
    /// Add tags to any taggable resource.
    TagsAdd,
    tags_add,
    PRODUCTS_DOCUMENT
);

pub mod tags_add {
    use super::{Deserialize, Serialize, UserErrorFields};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub id: String,
        pub tags: Vec<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct NodeFields {
        pub id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TagsAddPayload {
        pub node: Option<NodeFields>,
        pub user_errors: Vec<UserErrorFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub tags_add: Option<TagsAddPayload>,
    }
}
