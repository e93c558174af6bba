//! Cart view models.

use super::{ImageView, format_money};
use crate::shopify::types::{Cart, CartLine};

/// Shopify's title for the only variant of a product without options.
const DEFAULT_VARIANT_TITLE: &str = "Default Title";

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub variant_title: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<ImageView>,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub total: String,
    pub tax: Option<String>,
    pub discount_codes: Vec<String>,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: "$0.00".to_string(),
            total: "$0.00".to_string(),
            tax: None,
            discount_codes: Vec::new(),
            item_count: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines.iter().map(CartItemView::from).collect(),
            subtotal: format_money(&cart.cost.subtotal),
            total: format_money(&cart.cost.total),
            tax: cart.cost.total_tax.as_ref().map(format_money),
            discount_codes: cart
                .discount_codes
                .iter()
                .filter(|d| d.applicable)
                .map(|d| d.code.clone())
                .collect(),
            item_count: u32::try_from(cart.total_quantity).unwrap_or(0),
        }
    }
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        let merchandise = &line.merchandise;
        let image = merchandise
            .image
            .as_ref()
            .or(merchandise.product.featured_image.as_ref())
            .map(|img| ImageView::from_image(img, &merchandise.product.title));

        Self {
            id: line.id.clone(),
            handle: merchandise.product.handle.clone(),
            title: merchandise.product.title.clone(),
            variant_title: Some(merchandise.title.clone())
                .filter(|t| t != DEFAULT_VARIANT_TITLE),
            quantity: u32::try_from(line.quantity).unwrap_or(1),
            price: format_money(&line.cost.amount_per_quantity),
            line_price: format_money(&line.cost.total_amount),
            image,
        }
    }
}
