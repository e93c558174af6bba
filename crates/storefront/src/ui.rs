//! Page chrome shared by every full-page template.
//!
//! [`Layout`] carries everything `base.html` needs: navigation menus,
//! analytics IDs, contact details, the CSP nonce and the visitor's panel
//! state. Handlers receive it as an extractor and pass it into their
//! template explicitly, so templates never reach for global state.

use std::fmt;
use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::config::{AnalyticsConfig, ContactConfig};
use crate::middleware::CspNonce;
use crate::middleware::session::keys;
use crate::shopify::types::MenuItem;
use crate::state::AppState;

/// Shopify menu handle for the header navigation.
pub const HEADER_MENU: &str = "main-menu";
/// Shopify menu handle for the footer navigation.
pub const FOOTER_MENU: &str = "footer";

/// An overlay panel the visitor can open and close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// Cart aside.
    Cart,
    /// Contact slide-over.
    Contact,
}

impl Panel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Contact => "contact",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Panel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cart" => Ok(Self::Cart),
            "contact" => Ok(Self::Contact),
            other => Err(format!("unknown panel: {other}")),
        }
    }
}

/// Open/closed state of the overlay panels, kept in the session.
///
/// At most one panel is open: opening one closes the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panels {
    pub cart_open: bool,
    pub contact_open: bool,
}

impl Panels {
    /// Whether `panel` is open.
    #[must_use]
    pub const fn is_open(self, panel: Panel) -> bool {
        match panel {
            Panel::Cart => self.cart_open,
            Panel::Contact => self.contact_open,
        }
    }

    /// Flip `panel`. Returns its new state.
    pub const fn toggle(&mut self, panel: Panel) -> bool {
        let open = !self.is_open(panel);
        self.set(panel, open);
        open
    }

    /// Open or close `panel`.
    pub const fn set(&mut self, panel: Panel, open: bool) {
        match panel {
            Panel::Cart => {
                self.cart_open = open;
                if open {
                    self.contact_open = false;
                }
            }
            Panel::Contact => {
                self.contact_open = open;
                if open {
                    self.cart_open = false;
                }
            }
        }
    }

    /// Read the panel state from the session. Missing or unreadable state
    /// means everything is closed.
    pub async fn load(session: &Session) -> Self {
        session
            .get::<Self>(keys::PANELS)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// Persist the panel state.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn store(self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::PANELS, self).await
    }
}

/// Data shared by every full page.
#[derive(Debug, Clone)]
pub struct Layout {
    pub header_menu: Vec<MenuItem>,
    pub footer_menu: Vec<MenuItem>,
    pub analytics: AnalyticsConfig,
    pub contact: ContactConfig,
    pub nonce: String,
    pub panels: Panels,
}

impl Layout {
    /// Assemble the layout for one request.
    ///
    /// Menus come from the cached Storefront client; a failed menu fetch
    /// renders an empty navigation instead of failing the page.
    pub async fn build(state: &AppState, session: &Session, nonce: CspNonce) -> Self {
        let (header_menu, footer_menu) =
            tokio::join!(menu_items(state, HEADER_MENU), menu_items(state, FOOTER_MENU));

        Self {
            header_menu,
            footer_menu,
            analytics: state.config().analytics.clone(),
            contact: state.config().contact.clone(),
            nonce: nonce.0,
            panels: Panels::load(session).await,
        }
    }
}

async fn menu_items(state: &AppState, handle: &str) -> Vec<MenuItem> {
    match state.storefront().get_menu(handle).await {
        Ok(menu) => menu.items,
        Err(e) => {
            tracing::warn!(menu = handle, error = %e, "Failed to load menu");
            Vec::new()
        }
    }
}

impl FromRequestParts<AppState> for Layout {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        let nonce = parts
            .extensions
            .get::<CspNonce>()
            .cloned()
            .unwrap_or_else(|| CspNonce(String::new()));

        Ok(Self::build(state, &session, nonce).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_state() {
        let mut panels = Panels::default();
        assert!(panels.toggle(Panel::Cart));
        assert!(panels.cart_open);
        assert!(!panels.toggle(Panel::Cart));
        assert!(!panels.cart_open);
    }

    #[test]
    fn test_opening_one_panel_closes_the_other() {
        let mut panels = Panels::default();
        panels.toggle(Panel::Contact);
        panels.toggle(Panel::Cart);
        assert_eq!(
            panels,
            Panels {
                cart_open: true,
                contact_open: false
            }
        );
    }

    #[test]
    fn test_closing_leaves_other_closed() {
        let mut panels = Panels {
            cart_open: true,
            contact_open: false,
        };
        panels.set(Panel::Cart, false);
        assert_eq!(panels, Panels::default());
    }

    #[test]
    fn test_panel_parsing() {
        assert_eq!("cart".parse::<Panel>(), Ok(Panel::Cart));
        assert_eq!("contact".parse::<Panel>(), Ok(Panel::Contact));
        assert!("drawer".parse::<Panel>().is_err());
        assert_eq!(Panel::Contact.to_string(), "contact");
    }
}
