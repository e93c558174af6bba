//! Auto-scrolling, drag-to-scroll carousel state machine.
//!
//! Every horizontally scrolling strip on the storefront (product scroller,
//! recommendations, gallery) shares this one model. The rendered track holds
//! its tile sequence twice; the offset wraps back by exactly one copy's width
//! so the loop has no visible jump.
//!
//! # Transitions
//!
//! ```text
//!                 pointer_down
//!   Auto ─────────────────────────▶ Dragging
//!    ▲  ▲                              │
//!    │  └──────── pointer_up ──────────┘  (resumes from current offset)
//!    │
//!  toggle
//!    ▼
//!  Paused  (pointer_up keeps it paused)
//! ```
//!
//! The browser driver (`static/js/carousel.js`) performs the same
//! transitions using the [`CarouselConfig`] serialized into the page.

use serde::{Deserialize, Serialize};

/// Tunables shared between the server-rendered markup and the browser driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselConfig {
    /// Pixels advanced per tick while auto-scrolling.
    pub step_px: f64,
    /// Tick interval in milliseconds.
    pub tick_ms: u64,
    /// Scale applied to pointer travel while dragging.
    pub drag_multiplier: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            step_px: 1.0,
            tick_ms: 20,
            drag_multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    start_x: f64,
    offset_at_start: f64,
}

/// Scroll state of one carousel instance.
///
/// `content_width` is the width of a single copy of the content. The offset
/// always satisfies `0 <= offset < content_width` (or is `0` while the width
/// is unknown).
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    config: CarouselConfig,
    content_width: f64,
    offset: f64,
    auto_scrolling: bool,
    user_paused: bool,
    drag: Option<Drag>,
}

impl Carousel {
    /// Create a carousel at offset zero, auto-scrolling.
    #[must_use]
    pub const fn new(config: CarouselConfig, content_width: f64) -> Self {
        Self {
            config,
            content_width,
            offset: 0.0,
            auto_scrolling: true,
            user_paused: false,
            drag: None,
        }
    }

    /// Current scroll offset in pixels.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Whether the tick advances the offset.
    #[must_use]
    pub const fn is_auto_scrolling(&self) -> bool {
        self.auto_scrolling
    }

    /// Whether a pointer drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the manual toggle has suspended auto-scroll.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.user_paused
    }

    /// The configuration this carousel was built with.
    #[must_use]
    pub const fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Jump to an offset, wrapped into range.
    pub fn scroll_to(&mut self, offset: f64) {
        self.offset = self.wrap(offset);
    }

    /// Re-measure the width of one content copy.
    pub fn resize(&mut self, content_width: f64) {
        self.content_width = content_width;
        self.offset = self.wrap(self.offset);
        if let Some(drag) = self.drag.as_mut() {
            drag.offset_at_start = wrap_into(drag.offset_at_start, content_width);
        }
    }

    /// Advance one tick. Returns the new offset.
    ///
    /// A no-op while dragging or paused.
    pub fn tick(&mut self) -> f64 {
        if self.auto_scrolling && self.drag.is_none() {
            self.offset = self.wrap(self.offset + self.config.step_px);
        }
        self.offset
    }

    /// Start a drag at pointer position `x`. Suspends auto-scroll.
    pub fn pointer_down(&mut self, x: f64) {
        self.drag = Some(Drag {
            start_x: x,
            offset_at_start: self.offset,
        });
        self.auto_scrolling = false;
    }

    /// Move the pointer to `x`. Ignored unless a drag is in progress.
    ///
    /// Dragging right (positive travel) scrolls toward the start of the track.
    pub fn pointer_move(&mut self, x: f64) {
        if let Some(drag) = self.drag {
            let delta = (x - drag.start_x) * self.config.drag_multiplier;
            self.offset = self.wrap(drag.offset_at_start - delta);
        }
    }

    /// End a drag. Auto-scroll resumes from the current offset unless the
    /// manual toggle has paused it.
    pub fn pointer_up(&mut self) {
        self.drag = None;
        self.auto_scrolling = !self.user_paused;
    }

    /// The pointer left the track; treated as a release.
    pub fn pointer_leave(&mut self) {
        if self.drag.is_some() {
            self.pointer_up();
        }
    }

    /// Manually suspend or resume auto-scroll, independent of drag state.
    pub fn toggle(&mut self) {
        self.user_paused = !self.user_paused;
        self.auto_scrolling = !self.user_paused && self.drag.is_none();
    }

    fn wrap(&self, offset: f64) -> f64 {
        wrap_into(offset, self.content_width)
    }
}

fn wrap_into(offset: f64, width: f64) -> f64 {
    if width.is_nan() || width <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    let wrapped = offset.rem_euclid(width);
    // rem_euclid can round up to `width` for tiny negative inputs
    if wrapped >= width { 0.0 } else { wrapped }
}

/// Duplicate a tile sequence once for seamless looping.
#[must_use]
pub fn loop_track<T: Clone>(items: &[T]) -> Vec<T> {
    let mut track = Vec::with_capacity(items.len() * 2);
    track.extend_from_slice(items);
    track.extend_from_slice(items);
    track
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel(step_px: f64, width: f64) -> Carousel {
        Carousel::new(
            CarouselConfig {
                step_px,
                tick_ms: 20,
                drag_multiplier: 2.0,
            },
            width,
        )
    }

    #[test]
    fn test_tick_advances_by_step() {
        let mut c = carousel(3.0, 100.0);
        assert!((c.tick() - 3.0).abs() < f64::EPSILON);
        assert!((c.tick() - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_offset_stays_in_range_for_all_tick_counts() {
        let mut c = carousel(7.0, 250.0);
        for _ in 0..10_000 {
            let offset = c.tick();
            assert!((0.0..250.0).contains(&offset), "offset {offset} out of range");
        }
    }

    #[test]
    fn test_step_wider_than_content_still_wraps() {
        let mut c = carousel(250.0, 100.0);
        assert!((c.tick() - 50.0).abs() < f64::EPSILON);
        assert!(c.tick().abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_step_holds_offset() {
        let mut c = carousel(0.0, 100.0);
        c.scroll_to(30.0);
        assert!((c.tick() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_full_loop_returns_to_start() {
        let mut c = carousel(1.5, 600.0);
        c.scroll_to(42.0);
        let start = c.offset();
        let ticks = (600.0 / 1.5) as usize;
        for _ in 0..ticks {
            c.tick();
        }
        assert!((c.offset() - start).abs() < 1e-9);
    }

    #[test]
    fn test_drag_resume() {
        let mut c = carousel(1.0, 1000.0);
        c.scroll_to(500.0);

        c.pointer_down(100.0);
        assert!(c.is_dragging());
        assert!(!c.is_auto_scrolling());

        c.pointer_move(150.0);
        c.pointer_up();

        assert!(c.is_auto_scrolling());
        assert!(!c.is_dragging());
        // 50px of travel at multiplier 2.0
        assert!((c.offset() - 400.0).abs() < f64::EPSILON);

        // Resumes from the dragged offset rather than resetting
        assert!((c.tick() - 401.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drag_past_start_wraps() {
        let mut c = carousel(1.0, 300.0);
        c.scroll_to(10.0);
        c.pointer_down(0.0);
        c.pointer_move(20.0);
        assert!((c.offset() - 270.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tick_is_noop_while_dragging() {
        let mut c = carousel(5.0, 100.0);
        c.pointer_down(0.0);
        assert!(c.tick().abs() < f64::EPSILON);
    }

    #[test]
    fn test_pointer_move_without_drag_is_ignored() {
        let mut c = carousel(5.0, 100.0);
        c.pointer_move(80.0);
        assert!(c.offset().abs() < f64::EPSILON);
    }

    #[test]
    fn test_toggle_pauses_and_survives_drag() {
        let mut c = carousel(5.0, 100.0);
        c.toggle();
        assert!(c.is_paused());
        assert!(c.tick().abs() < f64::EPSILON);

        c.pointer_down(0.0);
        c.pointer_up();
        assert!(!c.is_auto_scrolling());

        c.toggle();
        assert!(c.is_auto_scrolling());
        assert!((c.tick() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_toggle_during_drag_defers_resume_to_release() {
        let mut c = carousel(5.0, 100.0);
        c.toggle();
        c.pointer_down(0.0);
        c.toggle();
        assert!(!c.is_auto_scrolling());
        c.pointer_leave();
        assert!(c.is_auto_scrolling());
    }

    #[test]
    fn test_unknown_width_keeps_offset_at_zero() {
        let mut c = carousel(5.0, 0.0);
        assert!(c.tick().abs() < f64::EPSILON);
        c.resize(50.0);
        assert!((c.tick() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_rewraps_offset() {
        let mut c = carousel(1.0, 100.0);
        c.scroll_to(90.0);
        c.resize(60.0);
        assert!((c.offset() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_loop_track_duplicates_once() {
        assert_eq!(loop_track(&[1, 2, 3]), vec![1, 2, 3, 1, 2, 3]);
        assert!(loop_track::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_config_serializes_for_driver() {
        let json = serde_json::to_string(&CarouselConfig::default()).unwrap_or_default();
        assert_eq!(json, r#"{"stepPx":1.0,"tickMs":20,"dragMultiplier":2.0}"#);
    }
}
