//! Server-side half of the auto-scrolling carousel.
//!
//! The track renders its tiles twice in a row. `static/js/carousel.js` reads
//! the JSON config from `data-carousel` and drives the offset with the same
//! transitions as [`orchard_core::carousel::Carousel`], wrapping by exactly
//! one copy's width so the loop is seamless.

use orchard_core::carousel::{CarouselConfig, loop_track};

/// A carousel ready to render.
#[derive(Debug, Clone)]
pub struct CarouselTrack<T> {
    /// DOM id of the track element.
    pub id: String,
    /// Tiles, already duplicated once.
    pub tiles: Vec<T>,
    /// Number of tiles in one copy.
    pub copy_len: usize,
    /// `CarouselConfig` serialized for the `data-carousel` attribute.
    pub config_json: String,
}

impl<T: Clone> CarouselTrack<T> {
    /// Build a track from one copy of the tiles.
    #[must_use]
    pub fn new(id: impl Into<String>, tiles: &[T], config: &CarouselConfig) -> Self {
        Self {
            id: id.into(),
            tiles: loop_track(tiles),
            copy_len: tiles.len(),
            config_json: serde_json::to_string(config).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to serialize carousel config");
                "{}".to_string()
            }),
        }
    }
}

impl<T> CarouselTrack<T> {
    /// Whether there is nothing to scroll.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.copy_len == 0
    }

    /// Whether `index` falls in the second (decorative) copy.
    ///
    /// Templates mark those tiles `aria-hidden` so screen readers only see
    /// each product once.
    #[must_use]
    pub const fn is_clone(&self, index: usize) -> bool {
        index >= self.copy_len
    }
}
