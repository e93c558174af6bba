//! Newsletter subscription route handler.
//!
//! Signups create a Shopify customer with marketing consent. An address
//! that already belongs to a customer is shown the same success message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use orchard_core::Email;
use serde::Deserialize;
use tracing::instrument;

use crate::shopify::types::SubscribeOutcome;
use crate::state::AppState;

/// Newsletter subscription form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    pub email: String,
}

/// Success fragment template (replaces the form via HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "newsletter/subscribe_success.html")]
pub struct SubscribeSuccessTemplate {
    pub email: String,
}

/// Error fragment template (replaces the form via HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "newsletter/subscribe_error.html")]
pub struct SubscribeErrorTemplate {
    pub message: String,
    pub email: String,
}

/// Subscribe to newsletter (HTMX).
#[instrument(skip(state, form))]
pub async fn subscribe(
    State(state): State<AppState>,
    Form(form): Form<SubscribeForm>,
) -> impl IntoResponse {
    let Ok(email) = Email::parse(&form.email) else {
        return SubscribeErrorTemplate {
            message: "Please enter a valid email address.".to_string(),
            email: form.email.trim().to_string(),
        }
        .into_response();
    };

    match state.storefront().subscribe_newsletter(&email).await {
        Ok(SubscribeOutcome::Subscribed(subscriber)) => {
            tracing::info!(customer_id = %subscriber.id, "Newsletter subscription successful");
            SubscribeSuccessTemplate {
                email: email.to_string(),
            }
            .into_response()
        }
        Ok(SubscribeOutcome::AlreadySubscribed) => {
            tracing::info!("Email already belongs to a customer, treating as success");
            SubscribeSuccessTemplate {
                email: email.to_string(),
            }
            .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Newsletter subscription failed");
            SubscribeErrorTemplate {
                message: "Something went wrong. Please try again.".to_string(),
                email: email.to_string(),
            }
            .into_response()
        }
    }
}
