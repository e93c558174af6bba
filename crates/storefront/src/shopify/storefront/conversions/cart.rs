//! Cart type conversion functions.

use crate::shopify::join_user_errors;
use crate::shopify::types::{
    Cart, CartCost, CartDiscountCode, CartLine, CartLineCost, CartLineInput, CartLineUpdateInput,
    CartMerchandise, CartMerchandiseProduct, Image, SelectedOption,
};

use super::super::queries::cart_fields::{
    self, CartFields, CartImageFields, CartLineFields, CartUserErrorFields,
};
use super::convert_money;

pub fn convert_cart(cart: CartFields) -> Cart {
    Cart {
        id: cart.id,
        checkout_url: cart.checkout_url,
        note: cart.note,
        total_quantity: cart.total_quantity,
        cost: CartCost {
            subtotal: convert_money(cart.cost.subtotal_amount),
            total: convert_money(cart.cost.total_amount),
            total_tax: cart.cost.total_tax_amount.map(convert_money),
        },
        discount_codes: cart
            .discount_codes
            .into_iter()
            .map(|d| CartDiscountCode {
                code: d.code,
                applicable: d.applicable,
            })
            .collect(),
        lines: cart.lines.nodes.into_iter().map(convert_line).collect(),
    }
}

fn convert_line(line: CartLineFields) -> CartLine {
    let merchandise = line.merchandise;
    CartLine {
        id: line.id,
        quantity: line.quantity,
        cost: CartLineCost {
            amount_per_quantity: convert_money(line.cost.amount_per_quantity),
            total_amount: convert_money(line.cost.total_amount),
        },
        merchandise: CartMerchandise {
            id: merchandise.id,
            title: merchandise.title,
            available_for_sale: merchandise.available_for_sale,
            price: convert_money(merchandise.price),
            selected_options: merchandise
                .selected_options
                .into_iter()
                .map(|o| SelectedOption {
                    name: o.name,
                    value: o.value,
                })
                .collect(),
            image: merchandise.image.map(convert_cart_image),
            product: CartMerchandiseProduct {
                id: merchandise.product.id,
                handle: merchandise.product.handle,
                title: merchandise.product.title,
                featured_image: merchandise.product.featured_image.map(convert_cart_image),
            },
        },
    }
}

fn convert_cart_image(image: CartImageFields) -> Image {
    Image {
        id: None,
        url: image.url,
        alt_text: image.alt_text,
        width: None,
        height: None,
    }
}

pub fn convert_line_input(line: CartLineInput) -> cart_fields::CartLineInput {
    cart_fields::CartLineInput {
        merchandise_id: line.merchandise_id,
        quantity: line.quantity,
        attributes: line.attributes.map(|attrs| {
            attrs
                .into_iter()
                .map(|a| cart_fields::AttributeInput {
                    key: a.key,
                    value: a.value,
                })
                .collect()
        }),
    }
}

pub fn convert_line_update(line: CartLineUpdateInput) -> cart_fields::CartLineUpdateInput {
    cart_fields::CartLineUpdateInput {
        id: line.id,
        quantity: line.quantity,
    }
}

/// Join cart `userErrors` into one message.
pub fn convert_user_errors(errors: &[CartUserErrorFields]) -> String {
    for error in errors {
        tracing::debug!(code = ?error.code, field = ?error.field, "Cart user error");
    }
    join_user_errors(
        errors
            .iter()
            .map(|e| (e.field.as_deref(), e.message.as_str())),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cart() {
        let json = serde_json::json!({
            "id": "gid://shopify/Cart/c1",
            "checkoutUrl": "https://orchard.myshopify.com/cart/c/c1",
            "note": null,
            "totalQuantity": 2,
            "cost": {
                "subtotalAmount": { "amount": "16.0", "currencyCode": "USD" },
                "totalAmount": { "amount": "16.0", "currencyCode": "USD" },
                "totalTaxAmount": null
            },
            "discountCodes": [],
            "lines": { "nodes": [{
                "id": "gid://shopify/CartLine/1",
                "quantity": 2,
                "cost": {
                    "amountPerQuantity": { "amount": "8.0", "currencyCode": "USD" },
                    "totalAmount": { "amount": "16.0", "currencyCode": "USD" }
                },
                "merchandise": {
                    "id": "gid://shopify/ProductVariant/1",
                    "title": "Jar",
                    "availableForSale": true,
                    "price": { "amount": "8.0", "currencyCode": "USD" },
                    "selectedOptions": [{ "name": "Packaging", "value": "Jar" }],
                    "image": null,
                    "product": {
                        "id": "gid://shopify/Product/1",
                        "handle": "wildflower-honey",
                        "title": "Wildflower Honey",
                        "featuredImage": { "url": "https://cdn.shopify.com/h.jpg", "altText": "Jar" }
                    }
                }
            }] }
        });

        let cart = convert_cart(serde_json::from_value(json).unwrap());
        assert_eq!(cart.total_quantity, 2);
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].merchandise.product.handle, "wildflower-honey");
        assert_eq!(
            cart.lines[0]
                .merchandise
                .product
                .featured_image
                .as_ref()
                .unwrap()
                .alt_text
                .as_deref(),
            Some("Jar")
        );
    }

    #[test]
    fn test_convert_user_errors() {
        let errors = vec![CartUserErrorFields {
            code: Some("INVALID".to_string()),
            field: Some(vec!["lines".to_string(), "0".to_string(), "quantity".to_string()]),
            message: "Quantity must be positive".to_string(),
        }];
        assert_eq!(
            convert_user_errors(&errors),
            "lines.0.quantity: Quantity must be positive"
        );
    }
}
