//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The Shopify cart ID lives in the session; Shopify holds the cart itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::session::{cart_id, clear_cart_id, set_cart_id};
use crate::shopify::ShopifyError;
use crate::shopify::types::{Cart, CartLineInput, CartLineUpdateInput};
use crate::state::AppState;
use crate::ui::{Layout, Panel, Panels};
use crate::views::CartView;

/// HTMX event fired whenever the cart changes.
pub const CART_UPDATED: &str = "cart-updated";

const MAX_LINE_QUANTITY: u32 = 99;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub variant_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Fetch the visitor's cart, if they have one Shopify still knows about.
///
/// A cart ID that Shopify no longer recognizes (expired or completed
/// checkout) is dropped from the session.
pub async fn current_cart(state: &AppState, session: &Session) -> Option<Cart> {
    let id = cart_id(session).await?;

    match state.storefront().get_cart(&id).await {
        Ok(cart) => Some(cart),
        Err(ShopifyError::NotFound(_)) => {
            clear_cart_id(session).await;
            None
        }
        Err(e) => {
            tracing::warn!(cart_id = %id, error = %e, "Failed to fetch cart");
            None
        }
    }
}

/// Add lines to the visitor's cart, creating a cart if needed.
///
/// # Errors
///
/// Returns an error if Shopify rejects the lines or the session cannot be
/// updated.
pub async fn add_lines(
    state: &AppState,
    session: &Session,
    lines: Vec<CartLineInput>,
) -> Result<Cart, AppError> {
    let cart = match cart_id(session).await {
        Some(id) => match state.storefront().add_to_cart(&id, lines.clone()).await {
            Err(ShopifyError::NotFound(_)) => {
                tracing::info!(cart_id = %id, "Stored cart is gone, creating a new one");
                state.storefront().create_cart(Some(lines)).await?
            }
            other => other?,
        },
        None => state.storefront().create_cart(Some(lines)).await?,
    };

    set_cart_id(session, &cart.id).await?;
    Ok(cart)
}

/// Display cart page.
#[instrument(skip(state, session, layout))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
) -> impl IntoResponse {
    let cart = current_cart(&state, &session)
        .await
        .map_or_else(CartView::empty, |cart| CartView::from(&cart));

    CartShowTemplate { layout, cart }
}

/// Add item to cart (HTMX).
///
/// Opens the cart aside and returns the updated count badge with a
/// `cart-updated` trigger so other fragments refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let quantity = form.quantity.unwrap_or(1).clamp(1, MAX_LINE_QUANTITY);
    let line = CartLineInput {
        merchandise_id: form.variant_id.clone(),
        quantity: i64::from(quantity),
        attributes: None,
    };

    match add_lines(&state, &session, vec![line]).await {
        Ok(cart) => {
            add_breadcrumb("cart", "Added to cart", &[("variant_id", form.variant_id.as_str())]);

            let mut panels = Panels::load(&session).await;
            panels.set(Panel::Cart, true);
            if let Err(e) = panels.store(&session).await {
                tracing::warn!(error = %e, "Failed to open cart panel");
            }

            let count = u32::try_from(cart.total_quantity).unwrap_or(0);
            (
                AppendHeaders([("HX-Trigger", CART_UPDATED)]),
                CartCountTemplate { count },
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to add item to cart");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html("<span class=\"form-error\">Could not add to cart</span>"),
            )
                .into_response()
        }
    }
}

/// Update cart item quantity (HTMX). A quantity of zero removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let Some(id) = cart_id(&session).await else {
        return CartItemsTemplate {
            cart: CartView::empty(),
        }
        .into_response();
    };

    let line_update = CartLineUpdateInput {
        id: form.line_id,
        quantity: i64::from(form.quantity.min(MAX_LINE_QUANTITY)),
    };

    let result = state.storefront().update_cart(&id, vec![line_update]).await;
    cart_items_response(&state, &session, result).await
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let Some(id) = cart_id(&session).await else {
        return CartItemsTemplate {
            cart: CartView::empty(),
        }
        .into_response();
    };

    let result = state
        .storefront()
        .remove_from_cart(&id, vec![form.line_id])
        .await;
    cart_items_response(&state, &session, result).await
}

/// Render the items fragment after a mutation.
///
/// On failure the current cart is re-rendered unchanged.
async fn cart_items_response(
    state: &AppState,
    session: &Session,
    result: Result<Cart, ShopifyError>,
) -> Response {
    match result {
        Ok(cart) => (
            AppendHeaders([("HX-Trigger", CART_UPDATED)]),
            CartItemsTemplate {
                cart: CartView::from(&cart),
            },
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Cart mutation failed");
            let cart = current_cart(state, session)
                .await
                .map_or_else(CartView::empty, |cart| CartView::from(&cart));
            CartItemsTemplate { cart }.into_response()
        }
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let count = current_cart(&state, &session)
        .await
        .map_or(0, |cart| u32::try_from(cart.total_quantity).unwrap_or(0));

    CartCountTemplate { count }
}

/// Redirect to Shopify checkout.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Redirect {
    match current_cart(&state, &session).await {
        Some(cart) if cart.total_quantity > 0 => Redirect::to(&cart.checkout_url),
        _ => Redirect::to("/cart"),
    }
}
