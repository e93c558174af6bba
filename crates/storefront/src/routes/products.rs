//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use orchard_core::ProductRef;
use orchard_core::catalog::{SortOption, StockFilter};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::session::lookup_scope;
use crate::services::variant_lookup::{DEFAULT_INSTANCE, LOOKUP_FAILED};
use crate::shopify::types::{Product, ProductSortKey, ProductVariant};
use crate::state::AppState;
use crate::ui::Layout;
use crate::views::{
    CarouselTrack, Choice, ImageView, ProductCard, VariantView, listing_href, sort_choices,
};

/// Products per listing page.
const PAGE_SIZE: i64 = 24;

/// Option name Shopify gives products that have no real options.
const DEFAULT_OPTION_NAME: &str = "Title";

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub sort: Option<String>,
    pub after: Option<String>,
}

/// Variant lookup query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct VariantQuery {
    pub instance: Option<String>,
}

/// JSON body of the variant lookup endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantLookupResponse {
    pub variant_id: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

/// One value of a product option, as a link that selects it.
#[derive(Debug, Clone)]
pub struct OptionValueView {
    pub value: String,
    pub selected: bool,
    pub available: bool,
    pub href: String,
}

/// A product option (e.g. "Packaging") and its values.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub name: String,
    pub values: Vec<OptionValueView>,
}

/// Product detail display data.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub card: ProductCard,
    pub description_html: String,
    pub vendor: String,
    pub images: Vec<ImageView>,
    pub options: Vec<OptionView>,
    pub selected_variant: Option<VariantView>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCard>,
    pub sort_choices: Vec<Choice>,
    pub next_page: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductDetail,
    pub recommendations: CarouselTrack<ProductCard>,
}

/// Quick view fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/quick_view.html")]
pub struct QuickViewTemplate {
    pub product: ProductDetail,
}

/// Display product listing page.
///
/// Sorting is done by Shopify here since the full catalog is paginated.
#[instrument(skip(state, layout))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
    layout: Layout,
) -> impl IntoResponse {
    let sort = SortOption::parse_or_default(query.sort.as_deref());
    let (sort_key, reverse) = remote_sort(sort);

    let (products, next_page) = match state
        .storefront()
        .get_products(PAGE_SIZE, query.after, sort_key, reverse)
        .await
    {
        Ok(connection) => {
            let next = connection
                .page_info
                .has_next_page
                .then_some(connection.page_info.end_cursor)
                .flatten()
                .map(|cursor| listing_href("/products", sort, StockFilter::All, Some(&cursor)));
            (
                connection.products.iter().map(ProductCard::from).collect(),
                next,
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch products");
            (Vec::new(), None)
        }
    };

    ProductsIndexTemplate {
        layout,
        products,
        sort_choices: sort_choices(sort),
        next_page,
    }
}

/// Display product detail page.
///
/// Any query parameter named after a product option selects that option's
/// value, e.g. `?Packaging=Gift%20box`.
#[instrument(skip(state, layout, selections))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(selections): Query<Vec<(String, String)>>,
    layout: Layout,
) -> Result<impl IntoResponse> {
    let product = state.storefront().get_product_by_handle(&handle).await?;

    let recommendations = state
        .storefront()
        .get_product_recommendations(&product.id)
        .await
        .map_or_else(
            |e| {
                tracing::warn!(error = %e, "Failed to fetch recommendations");
                Vec::new()
            },
            |products| products.iter().map(ProductCard::from).collect::<Vec<_>>(),
        );

    Ok(ProductShowTemplate {
        recommendations: CarouselTrack::new(
            "recommendations",
            &recommendations,
            &state.config().carousel,
        ),
        product: product_detail(&product, &selections),
        layout,
    })
}

/// Display quick view fragment (for HTMX).
#[instrument(skip(state))]
pub async fn quick_view(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse> {
    let product = state.storefront().get_product_by_handle(&handle).await?;

    Ok(QuickViewTemplate {
        product: product_detail(&product, &[]),
    })
}

/// Resolve a product's first variant ID (JSON).
///
/// Lookups are sequenced per visitor and `instance`: if the same instance
/// issues a newer lookup before this one completes, this response reports
/// the newer lookup's state instead of its own result.
#[instrument(skip(state, session))]
pub async fn variant(
    State(state): State<AppState>,
    session: Session,
    Path(handle): Path<String>,
    Query(query): Query<VariantQuery>,
) -> Json<VariantLookupResponse> {
    let instance = query
        .instance
        .as_deref()
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .unwrap_or(DEFAULT_INSTANCE);

    let scope = match lookup_scope(&session).await {
        Ok(scope) => scope,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read lookup scope from session");
            return Json(VariantLookupResponse {
                variant_id: None,
                loading: false,
                error: Some(LOOKUP_FAILED.to_string()),
            });
        }
    };

    let lookup = state
        .variant_lookup()
        .resolve(&scope, instance, &ProductRef::parse(&handle))
        .await;

    Json(VariantLookupResponse {
        variant_id: lookup.value,
        loading: lookup.loading,
        error: lookup.error,
    })
}

/// Map a sort option onto the Storefront API's product sort keys.
fn remote_sort(sort: SortOption) -> (Option<ProductSortKey>, bool) {
    match sort {
        SortOption::Manual => (None, false),
        SortOption::BestSelling => (Some(ProductSortKey::BestSelling), false),
        SortOption::TitleAscending => (Some(ProductSortKey::Title), false),
        SortOption::TitleDescending => (Some(ProductSortKey::Title), true),
        SortOption::PriceAscending => (Some(ProductSortKey::Price), false),
        SortOption::PriceDescending => (Some(ProductSortKey::Price), true),
        SortOption::CreatedAscending => (Some(ProductSortKey::CreatedAt), false),
        SortOption::CreatedDescending => (Some(ProductSortKey::CreatedAt), true),
    }
}

/// Pick the variant to show: the one matching the requested options, else
/// the first available one, else the first.
fn select_variant<'a>(
    product: &'a Product,
    selections: &[(String, String)],
) -> Option<&'a ProductVariant> {
    let requested = selections
        .iter()
        .any(|(name, _)| product.options.iter().any(|o| o.name.eq_ignore_ascii_case(name)));

    requested
        .then(|| product.variant_for_options(selections))
        .flatten()
        .or_else(|| product.variants.iter().find(|v| v.available_for_sale))
        .or_else(|| product.variants.first())
}

fn product_detail(product: &Product, selections: &[(String, String)]) -> ProductDetail {
    let selected = select_variant(product, selections);

    let options = product
        .options
        .iter()
        .filter(|o| !(o.name == DEFAULT_OPTION_NAME && o.values.len() <= 1))
        .map(|option| OptionView {
            name: option.name.clone(),
            values: option
                .values
                .iter()
                .map(|value| OptionValueView {
                    value: value.clone(),
                    selected: selected.is_some_and(|v| v.has_option(&option.name, value)),
                    available: product
                        .variants
                        .iter()
                        .any(|v| v.available_for_sale && v.has_option(&option.name, value)),
                    href: option_href(&product.handle, selected, &option.name, value),
                })
                .collect(),
        })
        .collect();

    ProductDetail {
        card: ProductCard::from(product),
        description_html: product.description_html.clone(),
        vendor: product.vendor.clone(),
        images: product
            .images
            .iter()
            .map(|img| ImageView::from_image(img, &product.title))
            .collect(),
        options,
        selected_variant: selected.map(VariantView::from),
    }
}

/// Link that keeps the current variant's other options and sets `name`.
fn option_href(
    handle: &str,
    current: Option<&ProductVariant>,
    name: &str,
    value: &str,
) -> String {
    let mut pairs: Vec<(&str, &str)> = current
        .map(|v| {
            v.selected_options
                .iter()
                .filter(|o| !o.name.eq_ignore_ascii_case(name))
                .map(|o| (o.name.as_str(), o.value.as_str()))
                .collect()
        })
        .unwrap_or_default();
    pairs.push((name, value));

    let query = pairs
        .iter()
        .map(|(n, v)| format!("{}={}", urlencoding::encode(n), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("/products/{}?{query}", urlencoding::encode(handle))
}
