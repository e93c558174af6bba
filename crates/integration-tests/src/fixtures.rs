//! JSON builders shaped like Storefront and Admin API responses.

use serde_json::{Value, json};

fn money(amount: &str) -> Value {
    json!({ "amount": amount, "currencyCode": "USD" })
}

/// A product with one variant, as returned in listings.
#[must_use]
pub fn product(handle: &str, title: &str, price: &str, available: bool, created_at: &str) -> Value {
    let id = format!("gid://shopify/Product/{handle}");
    json!({
        "id": id,
        "handle": handle,
        "title": title,
        "description": format!("{title} from the orchard."),
        "descriptionHtml": format!("<p>{title} from the orchard.</p>"),
        "vendor": "Orchard",
        "productType": "Pantry",
        "tags": [],
        "createdAt": created_at,
        "availableForSale": available,
        "priceRange": { "minVariantPrice": money(price), "maxVariantPrice": money(price) },
        "compareAtPriceRange": null,
        "featuredImage": null,
        "options": [{ "id": "gid://shopify/ProductOption/1", "name": "Title", "optionValues": [{ "name": "Default Title" }] }],
        "images": { "nodes": [] },
        "variants": { "nodes": [{
            "id": format!("gid://shopify/ProductVariant/{handle}"),
            "title": "Default Title",
            "availableForSale": available,
            "quantityAvailable": if available { 5 } else { 0 },
            "sku": null,
            "weight": 1.0,
            "weightUnit": "POUNDS",
            "price": money(price),
            "compareAtPrice": null,
            "selectedOptions": [{ "name": "Title", "value": "Default Title" }],
            "image": null
        }] }
    })
}

/// A collection holding `products` on a single page.
#[must_use]
pub fn collection(handle: &str, title: &str, products: Vec<Value>) -> Value {
    json!({
        "id": format!("gid://shopify/Collection/{handle}"),
        "handle": handle,
        "title": title,
        "description": "",
        "descriptionHtml": "",
        "image": null,
        "products": {
            "nodes": products,
            "pageInfo": { "hasNextPage": false, "hasPreviousPage": false, "startCursor": null, "endCursor": null }
        }
    })
}

/// A cart with one line per `(variant_id, quantity)`.
#[must_use]
pub fn cart(id: &str, lines: &[(&str, i64)]) -> Value {
    let nodes: Vec<Value> = lines
        .iter()
        .enumerate()
        .map(|(i, (variant_id, quantity))| {
            json!({
                "id": format!("gid://shopify/CartLine/{i}"),
                "quantity": quantity,
                "cost": { "amountPerQuantity": money("8.00"), "totalAmount": money("8.00") },
                "merchandise": {
                    "id": variant_id,
                    "title": "Default Title",
                    "availableForSale": true,
                    "price": money("8.00"),
                    "selectedOptions": [],
                    "image": null,
                    "product": { "id": "gid://shopify/Product/1", "handle": "honey", "title": "Wildflower Honey", "featuredImage": null }
                }
            })
        })
        .collect();
    let total: i64 = lines.iter().map(|(_, q)| q).sum();

    json!({
        "id": id,
        "checkoutUrl": "https://orchard-test.myshopify.com/cart/c/abc",
        "note": null,
        "totalQuantity": total,
        "cost": { "subtotalAmount": money("8.00"), "totalAmount": money("8.00"), "totalTaxAmount": null },
        "discountCodes": [],
        "lines": { "nodes": nodes }
    })
}

/// A cart mutation payload without user errors.
#[must_use]
pub fn cart_payload(cart: Value) -> Value {
    json!({ "cart": cart, "userErrors": [] })
}
