//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Home page
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (Storefront API reachable)
//!
//! # Catalog
//! GET  /products                    - Product listing (?sort=&after=)
//! GET  /products/{handle}           - Product detail (?<Option name>=<value> selects a variant)
//! GET  /products/{handle}/quick-view - Quick view fragment (HTMX)
//! GET  /products/{handle}/variant   - First variant lookup (JSON, ?instance=)
//! GET  /collections                 - Collection listing
//! GET  /collections/{handle}        - Collection detail (?sort=&stock=&after=)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                        - Cart page
//! POST /cart/add                    - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update                 - Update quantity (returns cart_items fragment)
//! POST /cart/remove                 - Remove item (returns cart_items fragment)
//! GET  /cart/count                  - Cart count badge (fragment)
//! GET  /checkout                    - Redirect to Shopify checkout
//!
//! # Forms (rate limited)
//! POST /newsletter                  - Newsletter signup (fragment)
//! GET  /wholesale                   - Wholesale custom order form
//! POST /wholesale                   - Create custom product and add it to the cart
//!
//! # UI panels
//! GET  /ui/panels/{panel}           - Current panel fragment (cart, contact)
//! POST /ui/panels/{panel}/toggle    - Toggle a panel and return its fragment
//! ```

pub mod cart;
pub mod collections;
pub mod health;
pub mod home;
pub mod newsletter;
pub mod panels;
pub mod products;
pub mod wholesale;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::mutation_rate_limiter;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{handle}", get(products::show))
        .route("/{handle}/quick-view", get(products::quick_view))
        .route("/{handle}/variant", get(products::variant))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{handle}", get(collections::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the UI panel routes router.
pub fn panel_routes() -> Router<AppState> {
    Router::new()
        .route("/{panel}", get(panels::show))
        .route("/{panel}/toggle", post(panels::toggle))
}

/// Routes that create records in Shopify, behind the rate limiter.
pub fn form_routes() -> Router<AppState> {
    Router::new()
        .route("/newsletter", post(newsletter::subscribe))
        .route("/wholesale", get(wholesale::form).post(wholesale::submit))
        .layer(mutation_rate_limiter())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .nest("/collections", collection_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(cart::checkout))
        .nest("/ui/panels", panel_routes())
        .merge(form_routes())
}
