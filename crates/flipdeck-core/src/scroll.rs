#![forbid(unsafe_code)]

//! Scroll tracker: window scroll offset to drone target X.
//!
//! `progress = clamp(scroll_y / max(1, document_height - viewport_height), 0, 1)`
//! mapped linearly onto `[min_x, max_x]`. Pure, O(1) and idempotent, so hosts
//! may call it on every scroll and resize event.

/// Scroll state plus the world interval it maps onto.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollTracker {
    min_x: f64,
    max_x: f64,
    scroll_y: f64,
    viewport_height: f64,
    document_height: f64,
}

impl ScrollTracker {
    /// Create a tracker for the world interval `[min_x, max_x]`.
    #[must_use]
    pub fn new(min_x: f64, max_x: f64) -> Self {
        Self {
            min_x,
            max_x,
            scroll_y: 0.0,
            viewport_height: 0.0,
            document_height: 0.0,
        }
    }

    /// Record a new scroll offset.
    pub fn set_scroll(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y;
    }

    /// Record new viewport/document heights.
    pub fn set_extent(&mut self, viewport_height: f64, document_height: f64) {
        self.viewport_height = viewport_height;
        self.document_height = document_height;
    }

    #[inline]
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    #[inline]
    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    #[inline]
    #[must_use]
    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    /// Largest reachable scroll offset, never below 1.
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport_height).max(1.0)
    }

    /// Normalized scroll progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let p = self.scroll_y / self.max_scroll();
        if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
    }

    /// Drone target X for the current scroll state.
    #[must_use]
    pub fn target_x(&self) -> f64 {
        self.x_at(self.progress())
    }

    /// Map a progress value onto the world interval.
    #[must_use]
    pub fn x_at(&self, progress: f64) -> f64 {
        self.min_x + (self.max_x - self.min_x) * progress.clamp(0.0, 1.0)
    }
}
