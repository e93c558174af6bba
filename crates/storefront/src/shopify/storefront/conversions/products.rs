//! Product type conversion functions.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::shopify::types::{
    PageInfo, PriceRange, Product, ProductConnection, ProductOption, ProductVariant,
    SelectedOption,
};

use super::super::queries::{
    Connection, PageInfoFields, PriceRangeFields, ProductFields, VariantFields,
};
use super::{convert_image, convert_money};

pub fn convert_product(product: ProductFields) -> Product {
    let created_at = product.created_at.as_deref().and_then(parse_timestamp);

    Product {
        id: product.id,
        handle: product.handle,
        title: product.title,
        description: product.description,
        description_html: product.description_html,
        available_for_sale: product.available_for_sale,
        kind: product.product_type,
        vendor: product.vendor,
        tags: product.tags,
        created_at,
        price_range: convert_price_range(product.price_range),
        compare_at_price_range: product.compare_at_price_range.map(convert_price_range),
        featured_image: product.featured_image.map(convert_image),
        images: product
            .images
            .map(|images| images.nodes.into_iter().map(convert_image).collect())
            .unwrap_or_default(),
        options: product
            .options
            .into_iter()
            .map(|o| ProductOption {
                id: o.id,
                name: o.name,
                values: o.option_values.into_iter().map(|v| v.name).collect(),
            })
            .collect(),
        variants: product
            .variants
            .map(|variants| variants.nodes.into_iter().map(convert_variant).collect())
            .unwrap_or_default(),
    }
}

pub fn convert_product_connection(connection: Connection<ProductFields>) -> ProductConnection {
    ProductConnection {
        products: connection.nodes.into_iter().map(convert_product).collect(),
        page_info: convert_page_info(connection.page_info),
    }
}

pub fn convert_page_info(page_info: PageInfoFields) -> PageInfo {
    PageInfo {
        has_next_page: page_info.has_next_page,
        has_previous_page: page_info.has_previous_page,
        start_cursor: page_info.start_cursor,
        end_cursor: page_info.end_cursor,
    }
}

fn convert_variant(variant: VariantFields) -> ProductVariant {
    ProductVariant {
        id: variant.id,
        title: variant.title,
        available_for_sale: variant.available_for_sale,
        quantity_available: variant.quantity_available,
        sku: variant.sku.filter(|s| !s.is_empty()),
        weight: variant.weight,
        weight_unit: variant.weight_unit,
        price: convert_money(variant.price),
        compare_at_price: variant.compare_at_price.map(convert_money),
        selected_options: variant
            .selected_options
            .into_iter()
            .map(|o| SelectedOption {
                name: o.name,
                value: o.value,
            })
            .collect(),
        image: variant.image.map(convert_image),
    }
}

fn convert_price_range(range: PriceRangeFields) -> PriceRange {
    PriceRange {
        min_variant_price: convert_money(range.min_variant_price),
        max_variant_price: convert_money(range.max_variant_price),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            warn!(value = %raw, error = %e, "Unparseable product timestamp");
            None
        }
    }
}
