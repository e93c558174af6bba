//! Menu conversion functions.

use url::Url;

use crate::shopify::types::{Menu, MenuItem};

use super::super::queries::get_menu::{MenuFields, MenuItemFields};

pub fn convert_menu(menu: MenuFields) -> Menu {
    Menu {
        handle: menu.handle,
        title: menu.title,
        items: menu.items.into_iter().map(convert_item).collect(),
    }
}

fn convert_item(item: MenuItemFields) -> MenuItem {
    let url = item
        .url
        .map_or_else(|| "#".to_string(), |url| storefront_path(&item.kind, &url));

    MenuItem {
        title: item.title,
        url,
        items: item.items.into_iter().map(convert_item).collect(),
    }
}

/// Shopify returns absolute `myshopify.com` URLs for internal links; the
/// headless storefront serves the same paths on its own host. `HTTP` items
/// are external links and stay absolute.
fn storefront_path(kind: &str, url: &str) -> String {
    if kind == "HTTP" {
        return url.to_string();
    }
    match Url::parse(url) {
        Ok(parsed) => {
            let mut path = parsed.path().to_string();
            if let Some(query) = parsed.query() {
                path.push('?');
                path.push_str(query);
            }
            path
        }
        Err(_) => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_links_become_paths() {
        assert_eq!(
            storefront_path("COLLECTION", "https://orchard.myshopify.com/collections/honey"),
            "/collections/honey"
        );
        assert_eq!(
            storefront_path("SEARCH", "https://orchard.myshopify.com/search?q=jam"),
            "/search?q=jam"
        );
    }

    #[test]
    fn test_external_links_stay_absolute() {
        assert_eq!(
            storefront_path("HTTP", "https://instagram.com/orchard"),
            "https://instagram.com/orchard"
        );
    }

    #[test]
    fn test_relative_urls_pass_through() {
        assert_eq!(storefront_path("PAGE", "/pages/about"), "/pages/about");
    }
}
