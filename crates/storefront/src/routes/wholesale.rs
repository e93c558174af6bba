//! Wholesale custom order handlers.
//!
//! Requires `SHOPIFY_ADMIN_TOKEN`; without it both routes answer 503.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::cart::add_lines;
use crate::services::wholesale::{WholesaleRequest, create_custom_product};
use crate::shopify::{AdminClient, ShopifyError};
use crate::shopify::types::{AttributeInput, CartLineInput};
use crate::state::AppState;
use crate::ui::Layout;

const MAX_QUANTITY: u32 = 10_000;

/// Wholesale order form data.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct WholesaleForm {
    #[serde(default)]
    pub title: String,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    #[serde(default)]
    pub price: String,
    pub weight: Option<String>,
    pub weight_unit: Option<String>,
    pub quantity: Option<u32>,
    pub notes: Option<String>,
}

/// Wholesale order page template.
#[derive(Template, WebTemplate)]
#[template(path = "wholesale.html")]
pub struct WholesaleTemplate {
    pub layout: Layout,
    pub form: WholesaleForm,
    pub error: Option<String>,
    pub created: Option<String>,
}

fn admin(state: &AppState) -> Result<&AdminClient> {
    state
        .admin()
        .ok_or_else(|| AppError::Unavailable("SHOPIFY_ADMIN_TOKEN not configured".to_string()))
}

/// Display the wholesale order form.
#[instrument(skip(state, layout))]
pub async fn form(State(state): State<AppState>, layout: Layout) -> Result<impl IntoResponse> {
    admin(&state)?;

    Ok(WholesaleTemplate {
        layout,
        form: WholesaleForm::default(),
        error: None,
        created: None,
    })
}

/// Create a custom product and add it to the visitor's cart.
///
/// Validation problems re-render the form with a message. Admin API
/// failures are shown as a generic message built from Shopify's
/// `userErrors`.
#[instrument(skip(state, session, layout, form), fields(title = %form.title))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<WholesaleForm>,
) -> Result<impl IntoResponse> {
    let admin = admin(&state)?;

    let request = match WholesaleRequest::parse(
        &form.title,
        form.vendor.as_deref(),
        form.product_type.as_deref(),
        &form.price,
        form.weight.as_deref(),
        form.weight_unit.as_deref(),
    ) {
        Ok(request) => request,
        Err(message) => {
            return Ok(WholesaleTemplate {
                layout,
                form,
                error: Some(message),
                created: None,
            });
        }
    };

    let product = match create_custom_product(admin, request).await {
        Ok(product) => product,
        Err(e) => {
            tracing::error!(error = %e, "Wholesale product setup failed");
            return Ok(WholesaleTemplate {
                layout,
                form,
                error: Some(format!("We could not set up this order: {}", failure_reason(&e))),
                created: None,
            });
        }
    };

    let quantity = form.quantity.unwrap_or(1).clamp(1, MAX_QUANTITY);
    let attributes = form
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|notes| {
            vec![AttributeInput {
                key: "Notes".to_string(),
                value: notes.to_string(),
            }]
        });

    add_lines(
        &state,
        &session,
        vec![CartLineInput {
            merchandise_id: product.variant_id.clone(),
            quantity: i64::from(quantity),
            attributes,
        }],
    )
    .await?;

    Ok(WholesaleTemplate {
        layout,
        form: WholesaleForm::default(),
        error: None,
        created: Some(product.handle),
    })
}

/// Reason shown to the buyer. Only mutation `userErrors` are specific
/// enough (and safe) to repeat.
fn failure_reason(error: &ShopifyError) -> String {
    match error {
        ShopifyError::UserError(message) => message.clone(),
        _ => "please try again later".to_string(),
    }
}
