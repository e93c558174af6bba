//! Catalog pages rendered against a fake Storefront API.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use orchard_integration_tests::{TestApp, data, fixtures};
use serde_json::{Value, json};

fn honey_collection() -> Value {
    fixtures::collection(
        "pantry",
        "Pantry",
        vec![
            fixtures::product("plum-jam", "Plum Jam", "9.00", true, "2024-03-01T00:00:00Z"),
            fixtures::product("apple-butter", "Apple Butter", "12.00", false, "2024-01-01T00:00:00Z"),
            fixtures::product("cider", "Cider", "6.50", true, "2024-02-01T00:00:00Z"),
        ],
    )
}

fn responder(operation: &str, _variables: &Value) -> Value {
    match operation {
        "GetCollectionByHandle" => data(json!({ "collection": honey_collection() })),
        "GetMenu" => data(json!({ "menu": null })),
        _ => data(Value::Null),
    }
}

fn position(body: &str, needle: &str) -> usize {
    body.find(needle)
        .unwrap_or_else(|| panic!("{needle} not rendered"))
}

#[tokio::test]
async fn test_collection_sorts_by_title() {
    let app = TestApp::spawn(false, responder).await;

    let response = app.get("/collections/pantry?sort=title-ascending").await;

    assert_eq!(response.status, StatusCode::OK);
    let apple = position(&response.body, "Apple Butter");
    let cider = position(&response.body, "Cider</h3>");
    let plum = position(&response.body, "Plum Jam");
    assert!(apple < cider && cider < plum);
}

#[tokio::test]
async fn test_collection_sorts_by_price_descending() {
    let app = TestApp::spawn(false, responder).await;

    let response = app.get("/collections/pantry?sort=price-descending").await;

    let apple = position(&response.body, "Apple Butter");
    let plum = position(&response.body, "Plum Jam");
    let cider = position(&response.body, "Cider</h3>");
    assert!(apple < plum && plum < cider);
}

#[tokio::test]
async fn test_collection_filters_out_of_stock() {
    let app = TestApp::spawn(false, responder).await;

    let response = app.get("/collections/pantry?stock=out-of-stock").await;

    assert!(response.body.contains("Apple Butter"));
    assert!(!response.body.contains("Plum Jam"));
    assert!(response.body.contains("Showing 1 of 3 products"));
}

#[tokio::test]
async fn test_unknown_sort_falls_back_to_manual() {
    let app = TestApp::spawn(false, responder).await;

    let response = app.get("/collections/pantry?sort=sideways&stock=maybe").await;

    assert_eq!(response.status, StatusCode::OK);
    let plum = position(&response.body, "Plum Jam");
    let apple = position(&response.body, "Apple Butter");
    let cider = position(&response.body, "Cider</h3>");
    assert!(plum < apple && apple < cider);
    assert!(response.body.contains("Showing 3 of 3 products"));
}

#[tokio::test]
async fn test_missing_collection_is_not_found() {
    let app = TestApp::spawn(false, |operation: &str, _: &Value| match operation {
        "GetCollectionByHandle" => data(json!({ "collection": null })),
        _ => data(json!({ "menu": null })),
    })
    .await;

    let response = app.get("/collections/nope").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pages_carry_security_headers() {
    let app = TestApp::spawn(false, responder).await;

    let response = app.get("/collections/pantry").await;

    let csp = response.header("content-security-policy").unwrap();
    assert!(csp.contains("script-src 'self' https://unpkg.com 'nonce-"));
    assert!(response.header("x-request-id").is_some());
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn(false, responder).await;

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}
