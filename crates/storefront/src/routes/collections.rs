//! Collection route handlers.
//!
//! A collection page fetches one page of products from Shopify and then
//! sorts and filters that page in memory (`?sort=` and `?stock=`), so the
//! shopper can reorder what they see without another API round trip.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use orchard_core::catalog::{SortOption, StockFilter, arrange};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::shopify::types::Collection;
use crate::state::AppState;
use crate::ui::Layout;
use crate::views::{
    Choice, ImageView, ProductCard, listing_href, sort_choices, stock_choices,
};

/// Products fetched per collection page.
const PAGE_SIZE: i64 = 24;

/// Collections per listing page.
const COLLECTIONS_PER_PAGE: i64 = 50;

/// Collection page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CollectionQuery {
    pub sort: Option<String>,
    pub stock: Option<String>,
    pub after: Option<String>,
}

/// Collection summary for the listing page.
#[derive(Debug, Clone)]
pub struct CollectionCard {
    pub handle: String,
    pub title: String,
    pub description: String,
    pub image: Option<ImageView>,
}

impl From<&Collection> for CollectionCard {
    fn from(collection: &Collection) -> Self {
        Self {
            handle: collection.handle.clone(),
            title: collection.title.clone(),
            description: collection.description.clone(),
            image: collection
                .image
                .as_ref()
                .map(|img| ImageView::from_image(img, &collection.title)),
        }
    }
}

/// Collection listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/index.html")]
pub struct CollectionsIndexTemplate {
    pub layout: Layout,
    pub collections: Vec<CollectionCard>,
}

/// Collection detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/show.html")]
pub struct CollectionShowTemplate {
    pub layout: Layout,
    pub collection: CollectionCard,
    pub description_html: String,
    pub products: Vec<ProductCard>,
    pub fetched_count: usize,
    pub sort_choices: Vec<Choice>,
    pub stock_choices: Vec<Choice>,
    pub next_page: Option<String>,
}

/// Display collection listing page.
#[instrument(skip(state, layout))]
pub async fn index(State(state): State<AppState>, layout: Layout) -> impl IntoResponse {
    let collections = state
        .storefront()
        .get_collections(COLLECTIONS_PER_PAGE, None)
        .await
        .map_or_else(
            |e| {
                tracing::error!(error = %e, "Failed to fetch collections");
                Vec::new()
            },
            |connection| {
                connection
                    .collections
                    .iter()
                    .map(CollectionCard::from)
                    .collect()
            },
        );

    CollectionsIndexTemplate {
        layout,
        collections,
    }
}

/// Display collection detail page.
#[instrument(skip(state, layout))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(query): Query<CollectionQuery>,
    layout: Layout,
) -> Result<impl IntoResponse> {
    let sort = SortOption::parse_or_default(query.sort.as_deref());
    let stock = StockFilter::parse_or_default(query.stock.as_deref());

    let collection = state
        .storefront()
        .get_collection_by_handle(&handle, PAGE_SIZE, query.after)
        .await?;

    let products = arrange(&collection.products, sort, stock);

    let path = format!("/collections/{handle}");
    let next_page = collection
        .page_info
        .as_ref()
        .filter(|info| info.has_next_page)
        .and_then(|info| info.end_cursor.as_deref())
        .map(|cursor| listing_href(&path, sort, stock, Some(cursor)));

    Ok(CollectionShowTemplate {
        layout,
        collection: CollectionCard::from(&collection),
        description_html: collection.description_html.clone(),
        products: products.iter().map(ProductCard::from).collect(),
        fetched_count: collection.products.len(),
        sort_choices: sort_choices(sort),
        stock_choices: stock_choices(stock),
        next_page,
    })
}
