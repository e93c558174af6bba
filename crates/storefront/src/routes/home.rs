//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use chrono::{Datelike, NaiveDate, Utc};
use tracing::instrument;

use crate::filters;
use crate::state::AppState;
use crate::ui::Layout;
use crate::views::{CarouselTrack, ImageView, ProductCard};

// =============================================================================
// Static marketing content
// =============================================================================

/// The hero banner at the top of the home page.
#[derive(Debug, Clone)]
pub struct Hero {
    pub eyebrow: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub button_text: &'static str,
    pub button_url: &'static str,
    pub image_path: &'static str,
    pub image_alt: &'static str,
}

pub const HERO: Hero = Hero {
    eyebrow: "Picked this week",
    title: "From our trees to your table",
    subtitle: "Small-batch preserves, cider and honey from family orchards.",
    button_text: "Shop the harvest",
    button_url: "/collections/frontpage",
    image_path: "/static/images/hero/orchard-rows.svg",
    image_alt: "Rows of apple trees at golden hour",
};

/// A seasonal section shown between two calendar dates (inclusive).
///
/// Windows may wrap the year end (e.g. Dec 1 to Jan 6).
#[derive(Debug, Clone)]
pub struct SeasonalSection {
    pub title: &'static str,
    pub body: &'static str,
    pub button_text: &'static str,
    pub button_url: &'static str,
    pub image_path: &'static str,
    pub image_alt: &'static str,
    /// `(month, day)` the section first appears.
    pub starts: (u32, u32),
    /// `(month, day)` the section last appears.
    pub ends: (u32, u32),
}

impl SeasonalSection {
    /// Whether the section should be shown on `date`.
    #[must_use]
    pub fn is_active(&self, date: NaiveDate) -> bool {
        let today = (date.month(), date.day());
        if self.starts <= self.ends {
            self.starts <= today && today <= self.ends
        } else {
            today >= self.starts || today <= self.ends
        }
    }
}

pub const HOLIDAY: SeasonalSection = SeasonalSection {
    title: "Holiday gift boxes",
    body: "Hand-packed crates of preserves and cider, shipped in time for the holidays.",
    button_text: "Build a gift box",
    button_url: "/collections/holiday",
    image_path: "/static/images/holiday/gift-crate.svg",
    image_alt: "Wooden gift crate with jars of preserves",
    starts: (11, 15),
    ends: (1, 6),
};

const GALLERY: [(&str, &str); 6] = [
    ("/static/images/gallery/blossom.svg", "Apple blossom in spring"),
    ("/static/images/gallery/harvest.svg", "Crates of fresh-picked apples"),
    ("/static/images/gallery/press.svg", "The cider press"),
    ("/static/images/gallery/hives.svg", "Beehives between the rows"),
    ("/static/images/gallery/kitchen.svg", "Jars cooling in the kitchen"),
    ("/static/images/gallery/market.svg", "Our stall at the farmers market"),
];

/// Collection feeding the home product scroller.
const FEATURED_COLLECTION: &str = "frontpage";

/// Products shown in the home scroller.
const FEATURED_COUNT: i64 = 12;

fn gallery_images() -> Vec<ImageView> {
    GALLERY
        .iter()
        .map(|(url, alt)| ImageView {
            url: (*url).to_string(),
            alt: (*alt).to_string(),
        })
        .collect()
}

// =============================================================================
// Handler
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub hero: Hero,
    pub holiday: Option<SeasonalSection>,
    pub featured: CarouselTrack<ProductCard>,
    pub gallery: CarouselTrack<ImageView>,
}

/// Display the home page.
#[instrument(skip(state, layout))]
pub async fn home(State(state): State<AppState>, layout: Layout) -> impl IntoResponse {
    let featured = state
        .storefront()
        .get_collection_by_handle(FEATURED_COLLECTION, FEATURED_COUNT, None)
        .await
        .map_or_else(
            |e| {
                tracing::error!(error = %e, "Failed to fetch featured collection");
                Vec::new()
            },
            |collection| collection.products.iter().map(ProductCard::from).collect::<Vec<_>>(),
        );

    let carousel = &state.config().carousel;
    let today = Utc::now().date_naive();

    HomeTemplate {
        layout,
        hero: HERO,
        holiday: HOLIDAY.is_active(today).then_some(HOLIDAY),
        featured: CarouselTrack::new("featured-products", &featured, carousel),
        gallery: CarouselTrack::new("gallery", &gallery_images(), carousel),
    }
}
