//! Template view models.
//!
//! Route handlers convert Shopify domain types into these flat, display-ready
//! structs so templates never format money or pick images themselves.

pub mod carousel;
pub mod cart;

pub use carousel::CarouselTrack;
pub use cart::{CartItemView, CartView};

use orchard_core::catalog::{SortOption, StockFilter};

use crate::shopify::types::{Image, Money, Product, ProductVariant};

/// Image display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
}

impl ImageView {
    /// Build from a Shopify image, falling back to `fallback_alt`.
    #[must_use]
    pub fn from_image(image: &Image, fallback_alt: &str) -> Self {
        Self {
            url: image.url.clone(),
            alt: image
                .alt_text
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| fallback_alt.to_string()),
        }
    }
}

/// Format a Shopify money value for display (`$12.50`).
#[must_use]
pub fn format_money(money: &Money) -> String {
    money
        .to_price()
        .map_or_else(|| format!("{} {}", money.amount, money.currency_code), |p| p.to_string())
}

/// Product tile used by listings, scrollers and recommendation carousels.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub featured_image: Option<ImageView>,
    pub hover_image: Option<ImageView>,
    pub product_type: Option<String>,
    pub available: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        let featured_image = product
            .featured_image
            .as_ref()
            .or_else(|| product.images.first())
            .map(|img| ImageView::from_image(img, &product.title));

        let hover_image = product
            .images
            .get(1)
            .map(|img| ImageView::from_image(img, &product.title));

        Self {
            id: product.id.clone(),
            handle: product.handle.clone(),
            title: product.title.clone(),
            price: format_money(&product.price_range.min_variant_price),
            compare_at_price: compare_at(
                &product.price_range.min_variant_price,
                product
                    .compare_at_price_range
                    .as_ref()
                    .map(|r| &r.min_variant_price),
            ),
            featured_image,
            hover_image,
            product_type: Some(product.kind.clone()).filter(|k| !k.is_empty()),
            available: product.available_for_sale,
        }
    }
}

/// Variant display data for option pickers and add-to-cart forms.
#[derive(Debug, Clone)]
pub struct VariantView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub available: bool,
}

impl From<&ProductVariant> for VariantView {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            id: variant.id.clone(),
            title: variant.title.clone(),
            price: format_money(&variant.price),
            compare_at_price: compare_at(&variant.price, variant.compare_at_price.as_ref()),
            available: variant.available_for_sale,
        }
    }
}

/// One entry of a `<select>` menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Sort menu entries with `current` selected.
#[must_use]
pub fn sort_choices(current: SortOption) -> Vec<Choice> {
    SortOption::ALL
        .into_iter()
        .map(|option| Choice {
            value: option.as_str(),
            label: option.label(),
            selected: option == current,
        })
        .collect()
}

/// Stock filter entries with `current` selected.
#[must_use]
pub fn stock_choices(current: StockFilter) -> Vec<Choice> {
    StockFilter::ALL
        .into_iter()
        .map(|filter| Choice {
            value: filter.as_str(),
            label: filter.label(),
            selected: filter == current,
        })
        .collect()
}

/// Build a listing URL, omitting default parameters.
#[must_use]
pub fn listing_href(
    path: &str,
    sort: SortOption,
    stock: StockFilter,
    after: Option<&str>,
) -> String {
    let mut params = Vec::new();
    if sort != SortOption::default() {
        params.push(format!("sort={}", sort.as_str()));
    }
    if stock != StockFilter::default() {
        params.push(format!("stock={}", stock.as_str()));
    }
    if let Some(cursor) = after {
        params.push(format!("after={}", urlencoding::encode(cursor)));
    }

    if params.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", params.join("&"))
    }
}

/// Show a compare-at price only when it is above the selling price.
fn compare_at(price: &Money, compare_at: Option<&Money>) -> Option<String> {
    let compare_at = compare_at?;
    let selling = price.to_price()?;
    let original = compare_at.to_price()?;
    (original.amount > selling.amount).then(|| original.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(amount: &str) -> Money {
        Money {
            amount: amount.to_string(),
            currency_code: "USD".to_string(),
        }
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(&money("12.5")), "$12.50");
        assert_eq!(format_money(&money("abc")), "abc USD");
    }

    #[test]
    fn test_compare_at_only_when_higher() {
        assert_eq!(
            compare_at(&money("10.00"), Some(&money("15.00"))),
            Some("$15.00".to_string())
        );
        assert_eq!(compare_at(&money("10.00"), Some(&money("0.0"))), None);
        assert_eq!(compare_at(&money("10.00"), Some(&money("10.00"))), None);
        assert_eq!(compare_at(&money("10.00"), None), None);
    }

    #[test]
    fn test_listing_href() {
        assert_eq!(
            listing_href("/collections/cider", SortOption::Manual, StockFilter::All, None),
            "/collections/cider"
        );
        assert_eq!(
            listing_href(
                "/collections/cider",
                SortOption::PriceDescending,
                StockFilter::InStock,
                Some("eyJsYXN0X2lkIjo=")
            ),
            "/collections/cider?sort=price-descending&stock=in-stock&after=eyJsYXN0X2lkIjo%3D"
        );
    }

    #[test]
    fn test_sort_choices_mark_current() {
        let choices = sort_choices(SortOption::TitleAscending);
        assert_eq!(choices.len(), SortOption::ALL.len());
        assert_eq!(
            choices.iter().filter(|c| c.selected).map(|c| c.value).collect::<Vec<_>>(),
            vec!["title-ascending"]
        );
    }

    #[test]
    fn test_image_alt_fallback() {
        let image = Image {
            id: None,
            url: "https://cdn.shopify.com/a.jpg".to_string(),
            alt_text: Some("  ".to_string()),
            width: None,
            height: None,
        };
        assert_eq!(ImageView::from_image(&image, "Honey").alt, "Honey");
    }
}
