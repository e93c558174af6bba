//! Type conversion functions for Shopify Storefront API responses.

pub mod cart;
pub mod collections;
pub mod menu;
pub mod products;

pub use cart::{convert_cart, convert_line_input, convert_line_update, convert_user_errors};
pub use collections::{convert_collection, convert_collection_connection};
pub use menu::convert_menu;
pub use products::{convert_page_info, convert_product, convert_product_connection};

use crate::shopify::types::{Image, Money};

use super::queries::{ImageFields, MoneyFields};

fn convert_money(money: MoneyFields) -> Money {
    Money {
        amount: money.amount,
        currency_code: money.currency_code,
    }
}

fn convert_image(image: ImageFields) -> Image {
    Image {
        id: image.id,
        url: image.url,
        alt_text: image.alt_text,
        width: image.width,
        height: image.height,
    }
}
