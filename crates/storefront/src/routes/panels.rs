//! Cart aside and contact slide-over fragments.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use axum::response::{AppendHeaders, IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::config::ContactConfig;
use crate::error::{AppError, Result};
use crate::routes::cart::current_cart;
use crate::state::AppState;
use crate::ui::{Panel, Panels};
use crate::views::CartView;

/// Panel fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/panel.html")]
pub struct PanelTemplate {
    pub kind: &'static str,
    pub open: bool,
    pub cart: CartView,
    pub contact: ContactConfig,
}

fn parse_panel(name: &str) -> Result<Panel> {
    name.parse()
        .map_err(|_| AppError::NotFound(format!("panel {name}")))
}

async fn render(state: &AppState, session: &Session, panel: Panel, open: bool) -> PanelTemplate {
    let cart = if open && panel == Panel::Cart {
        current_cart(state, session)
            .await
            .map_or_else(CartView::empty, |cart| CartView::from(&cart))
    } else {
        CartView::empty()
    };

    PanelTemplate {
        kind: panel.as_str(),
        open,
        cart,
        contact: state.config().contact.clone(),
    }
}

/// Render a panel in its current state.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(panel): Path<String>,
) -> Result<PanelTemplate> {
    let panel = parse_panel(&panel)?;
    let open = Panels::load(&session).await.is_open(panel);
    Ok(render(&state, &session, panel, open).await)
}

/// HTMX event fired when any panel changes, so the other panel can
/// re-render closed.
pub const PANELS_CHANGED: &str = "panels-changed";

/// Toggle a panel, persist the new state and render it.
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Path(panel): Path<String>,
) -> Result<impl IntoResponse> {
    let panel = parse_panel(&panel)?;

    let mut panels = Panels::load(&session).await;
    let open = panels.toggle(panel);
    panels.store(&session).await?;

    Ok((
        AppendHeaders([("HX-Trigger", PANELS_CHANGED)]),
        render(&state, &session, panel, open).await,
    ))
}
