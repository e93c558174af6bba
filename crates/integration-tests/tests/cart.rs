//! Cart flow: session-held cart IDs against a fake Storefront API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use orchard_integration_tests::{TestApp, data, fixtures};
use serde_json::{Value, json};

const CART_ID: &str = "gid://shopify/Cart/abc123";

/// A fake cart store: one cart, created on demand.
fn cart_backend() -> impl Fn(&str, &Value) -> Value + Send + Sync + 'static {
    let lines: Arc<Mutex<Vec<(String, i64)>>> = Arc::new(Mutex::new(Vec::new()));

    move |operation: &str, variables: &Value| {
        let mut lines = lines.lock().unwrap();
        let render = |lines: &[(String, i64)]| {
            let borrowed: Vec<(&str, i64)> = lines.iter().map(|(v, q)| (v.as_str(), *q)).collect();
            fixtures::cart(CART_ID, &borrowed)
        };

        match operation {
            "CreateCart" | "AddToCart" => {
                let new_lines = if operation == "CreateCart" {
                    &variables["input"]["lines"]
                } else {
                    &variables["lines"]
                };
                for line in new_lines.as_array().into_iter().flatten() {
                    lines.push((
                        line["merchandiseId"].as_str().unwrap_or_default().to_string(),
                        line["quantity"].as_i64().unwrap_or(1),
                    ));
                }
                let key = if operation == "CreateCart" { "cartCreate" } else { "cartLinesAdd" };
                let mut body = serde_json::Map::new();
                body.insert(key.to_string(), fixtures::cart_payload(render(lines.as_slice())));
                data(Value::Object(body))
            }
            "GetCart" => {
                if lines.is_empty() {
                    data(json!({ "cart": null }))
                } else {
                    data(json!({ "cart": render(lines.as_slice()) }))
                }
            }
            "RemoveFromCart" => {
                lines.clear();
                data(json!({ "cartLinesRemove": fixtures::cart_payload(render(lines.as_slice())) }))
            }
            _ => data(json!({ "menu": null })),
        }
    }
}

#[tokio::test]
async fn test_add_creates_cart_and_returns_count() {
    let app = TestApp::spawn(false, cart_backend()).await;

    let response = app
        .post_form("/cart/add", "variant_id=gid%3A%2F%2Fshopify%2FProductVariant%2F7&quantity=2")
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("hx-trigger"), Some("cart-updated"));
    assert_eq!(response.body.trim(), "2");

    let created = app.shopify.calls_to("CreateCart");
    assert_eq!(created.len(), 1);
    assert_eq!(
        created[0].variables["input"]["lines"][0]["merchandiseId"],
        "gid://shopify/ProductVariant/7"
    );
}

#[tokio::test]
async fn test_second_add_reuses_session_cart() {
    let app = TestApp::spawn(false, cart_backend()).await;

    app.post_form("/cart/add", "variant_id=v1&quantity=1").await;
    let response = app.post_form("/cart/add", "variant_id=v2&quantity=1").await;

    assert_eq!(response.body.trim(), "2");
    assert_eq!(app.shopify.calls_to("CreateCart").len(), 1);
    let added = app.shopify.calls_to("AddToCart");
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].variables["cartId"], CART_ID);
}

#[tokio::test]
async fn test_add_opens_cart_panel() {
    let app = TestApp::spawn(false, cart_backend()).await;

    app.post_form("/cart/add", "variant_id=v1").await;
    let panel = app.get("/ui/panels/cart").await;

    assert_eq!(panel.status, StatusCode::OK);
    assert!(panel.body.contains("panel--cart is-open"));
    assert!(panel.body.contains("Wildflower Honey"));
}

#[tokio::test]
async fn test_count_without_cart_is_empty() {
    let app = TestApp::spawn(false, cart_backend()).await;

    let response = app.get("/cart/count").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.trim().is_empty());
    assert!(app.shopify.calls_to("GetCart").is_empty());
}

#[tokio::test]
async fn test_remove_returns_items_fragment() {
    let app = TestApp::spawn(false, cart_backend()).await;

    app.post_form("/cart/add", "variant_id=v1").await;
    let response = app
        .post_form("/cart/remove", "line_id=gid%3A%2F%2Fshopify%2FCartLine%2F0")
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("hx-trigger"), Some("cart-updated"));
    assert!(response.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_checkout_redirects_to_shopify() {
    let app = TestApp::spawn(false, cart_backend()).await;

    app.post_form("/cart/add", "variant_id=v1").await;
    let response = app.get("/checkout").await;

    assert!(response.status.is_redirection());
    assert_eq!(
        response.header("location"),
        Some("https://orchard-test.myshopify.com/cart/c/abc")
    );
}

#[tokio::test]
async fn test_panel_toggle_switches_panels() {
    let app = TestApp::spawn(false, cart_backend()).await;

    let contact = app.post_form("/ui/panels/contact/toggle", "").await;
    assert_eq!(contact.header("hx-trigger"), Some("panels-changed"));
    assert!(contact.body.contains("panel--contact is-open"));
    assert!(contact.body.contains("hello@orchard.test"));

    app.post_form("/ui/panels/cart/toggle", "").await;
    let contact = app.get("/ui/panels/contact").await;
    assert!(!contact.body.contains("is-open"));

    let unknown = app.post_form("/ui/panels/drawer/toggle", "").await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_recreates_cart_shopify_no_longer_knows() {
    let app = TestApp::spawn(false, |operation: &str, variables: &Value| match operation {
        "CreateCart" => {
            let quantity = variables["input"]["lines"][0]["quantity"].as_i64().unwrap_or(1);
            data(json!({
                "cartCreate": fixtures::cart_payload(fixtures::cart(CART_ID, &[("v1", quantity)]))
            }))
        }
        "AddToCart" => data(json!({
            "cartLinesAdd": {
                "cart": null,
                "userErrors": [{
                    "code": "INVALID",
                    "field": ["cartId"],
                    "message": "The specified cart does not exist."
                }]
            }
        })),
        _ => data(json!({ "menu": null })),
    })
    .await;

    app.post_form("/cart/add", "variant_id=v1&quantity=1").await;
    let response = app.post_form("/cart/add", "variant_id=v1&quantity=3").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.trim(), "3");
    assert_eq!(
        app.shopify.operations().iter().filter(|op| *op != "GetMenu").collect::<Vec<_>>(),
        ["CreateCart", "AddToCart", "CreateCart"]
    );
}
