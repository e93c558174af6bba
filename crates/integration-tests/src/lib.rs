//! Integration test harness for the Orchard storefront.
//!
//! [`FakeShopify`] is an axum server on an ephemeral localhost port that
//! answers GraphQL requests by `operationName`. [`TestApp`] points a real
//! storefront router at it and drives requests with
//! [`tower::ServiceExt::oneshot`], carrying the session cookie between
//! requests like a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p orchard-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::routing::post;
use axum::{Json, response::Response};
use orchard_core::carousel::CarouselConfig;
use orchard_storefront::config::{AnalyticsConfig, ContactConfig, ShopifyConfig, StorefrontConfig};
use orchard_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

pub mod fixtures;

/// Answers one GraphQL operation: `(operation_name, variables) -> body`.
pub type Responder = dyn Fn(&str, &Value) -> Value + Send + Sync;

/// A GraphQL request the fake server received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: String,
    pub variables: Value,
}

#[derive(Clone)]
struct FakeState {
    responder: Arc<Responder>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    latency: Arc<Mutex<HashMap<String, Duration>>>,
}

/// In-process stand-in for the Shopify Storefront and Admin GraphQL APIs.
pub struct FakeShopify {
    addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    latency: Arc<Mutex<HashMap<String, Duration>>>,
}

impl FakeShopify {
    /// Start the fake server. Operations the responder does not know should
    /// return `{"data": null}`-style bodies or GraphQL errors.
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&str, &Value) -> Value + Send + Sync + 'static,
    {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let latency = Arc::new(Mutex::new(HashMap::new()));
        let state = FakeState {
            responder: Arc::new(responder),
            calls: Arc::clone(&calls),
            latency: Arc::clone(&latency),
        };

        let app = Router::new()
            .route("/storefront", post(graphql))
            .route("/admin", post(graphql))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            calls,
            latency,
        }
    }

    /// Storefront GraphQL URL.
    #[must_use]
    pub fn storefront_url(&self) -> String {
        format!("http://{}/storefront", self.addr)
    }

    /// Admin GraphQL URL.
    #[must_use]
    pub fn admin_url(&self) -> String {
        format!("http://{}/admin", self.addr)
    }

    /// Delay every response to `operation` by `delay`.
    pub fn set_latency(&self, operation: &str, delay: Duration) {
        self.latency
            .lock()
            .unwrap()
            .insert(operation.to_string(), delay);
    }

    /// Operation names received so far, in order.
    #[must_use]
    pub fn operations(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.operation.clone())
            .collect()
    }

    /// Calls received for one operation.
    #[must_use]
    pub fn calls_to(&self, operation: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .cloned()
            .collect()
    }
}

async fn graphql(State(state): State<FakeState>, Json(body): Json<Value>) -> Json<Value> {
    let operation = body["operationName"].as_str().unwrap_or_default().to_string();
    let variables = body["variables"].clone();

    state.calls.lock().unwrap().push(RecordedCall {
        operation: operation.clone(),
        variables: variables.clone(),
    });

    let delay = state.latency.lock().unwrap().get(&operation).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    Json((state.responder)(&operation, &variables))
}

/// Storefront configuration pointed at `shopify`.
#[must_use]
pub fn test_config(shopify: &FakeShopify, with_admin: bool) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        shopify: ShopifyConfig {
            store: "orchard-test.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            storefront_private_token: SecretString::from("shpat_storefront_test_token"),
            storefront_endpoint: Some(shopify.storefront_url()),
            admin_token: with_admin.then(|| SecretString::from("shpat_admin_test_token")),
            admin_endpoint: Some(shopify.admin_url()),
            request_timeout: Duration::from_secs(5),
        },
        carousel: CarouselConfig::default(),
        analytics: AnalyticsConfig::default(),
        contact: ContactConfig {
            email: Some("hello@orchard.test".to_string()),
            phone: None,
        },
        sentry_dsn: None,
        sentry_environment: "test".to_string(),
    }
}

/// Address the rate limiter sees for every test request; `oneshot` has no
/// peer address.
const CLIENT_IP: &str = "203.0.113.7";

/// A storefront router plus the cookie jar of one visitor.
pub struct TestApp {
    pub router: Router,
    pub shopify: Arc<FakeShopify>,
    cookie: Mutex<Option<String>>,
}

/// A response with its body read into memory.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// A header value as a string, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The body parsed as JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

impl TestApp {
    /// Build the storefront against a fresh fake Shopify.
    pub async fn spawn<F>(with_admin: bool, responder: F) -> Self
    where
        F: Fn(&str, &Value) -> Value + Send + Sync + 'static,
    {
        let shopify = FakeShopify::start(responder).await;
        let state = AppState::new(test_config(&shopify, with_admin)).unwrap();

        Self {
            router: orchard_storefront::app(state),
            shopify: Arc::new(shopify),
            cookie: Mutex::new(None),
        }
    }

    /// Another visitor on the same storefront, with an empty cookie jar.
    #[must_use]
    pub fn another_visitor(&self) -> Self {
        Self {
            router: self.router.clone(),
            shopify: Arc::clone(&self.shopify),
            cookie: Mutex::new(None),
        }
    }

    /// `GET` a path.
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::get(uri)
            .header("x-forwarded-for", CLIENT_IP)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// `POST` a URL-encoded form.
    pub async fn post_form(&self, uri: &str, form: &str) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("x-forwarded-for", CLIENT_IP)
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a request, attaching and then remembering the session cookie.
    pub async fn send(&self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = self.cookie.lock().unwrap().clone() {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response: Response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            *self.cookie.lock().unwrap() = Some(set_cookie.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// A GraphQL response carrying `data`.
#[must_use]
pub fn data(value: Value) -> Value {
    json!({ "data": value })
}
