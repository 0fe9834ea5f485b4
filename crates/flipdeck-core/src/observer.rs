#![forbid(unsafe_code)]

//! Section observer: which section is dominant in the viewport.
//!
//! The observer keeps the last visibility ratio of every section. Each call
//! to [`SectionObserver::observe`] recomputes all ratios for the new scroll
//! state and reports, in section order, every section whose ratio rose from
//! below the threshold to at or above it. Falling crossings are not
//! reported.
//!
//! The ratio is `visible / min(section height, viewport height)`, so a
//! section taller than the viewport can still become dominant.

use tracing::trace;

use crate::logging::TARGET_OBSERVER;

/// Vertical extent of one section in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBounds {
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    #[must_use]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Evenly stacked sections of equal height starting at 0.
    #[must_use]
    pub fn stacked(count: usize, height: f64) -> Vec<Self> {
        (0..count)
            .map(|i| Self::new(i as f64 * height, height))
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Visibility ratio for a viewport starting at `scroll_y`.
    #[must_use]
    pub fn visibility(&self, scroll_y: f64, viewport_height: f64) -> f64 {
        let denom = self.height.min(viewport_height);
        if denom.is_nan() || denom <= 0.0 {
            return 0.0;
        }
        let visible = self.bottom().min(scroll_y + viewport_height) - self.top.max(scroll_y);
        (visible.max(0.0) / denom).clamp(0.0, 1.0)
    }

    /// Scroll offset that centers this section (`block: "center"`),
    /// clamped to `[0, max_scroll]`.
    #[must_use]
    pub fn center_scroll(&self, viewport_height: f64, max_scroll: f64) -> f64 {
        let y = self.top + self.height / 2.0 - viewport_height / 2.0;
        y.clamp(0.0, max_scroll.max(0.0))
    }
}

/// Threshold-crossing detector over a fixed set of sections.
#[derive(Debug, Clone)]
pub struct SectionObserver {
    sections: Vec<SectionBounds>,
    ratios: Vec<f64>,
    threshold: f64,
}

impl SectionObserver {
    /// Create an observer with every ratio starting at zero.
    #[must_use]
    pub fn new(sections: Vec<SectionBounds>, threshold: f64) -> Self {
        let ratios = vec![0.0; sections.len()];
        Self {
            sections,
            ratios,
            threshold,
        }
    }

    /// Replace section geometry. Must keep the section count; a mismatched
    /// layout is ignored and `false` is returned.
    pub fn set_layout(&mut self, sections: Vec<SectionBounds>) -> bool {
        if sections.len() != self.sections.len() {
            trace!(
                target: TARGET_OBSERVER,
                expected = self.sections.len(),
                got = sections.len(),
                "layout ignored: section count mismatch"
            );
            return false;
        }
        self.sections = sections;
        true
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Bounds of section `index`.
    #[must_use]
    pub fn section(&self, index: usize) -> Option<SectionBounds> {
        self.sections.get(index).copied()
    }

    /// Last computed ratio of section `index`.
    #[must_use]
    pub fn ratio(&self, index: usize) -> Option<f64> {
        self.ratios.get(index).copied()
    }

    /// Whether a ratio counts as dominant.
    #[inline]
    #[must_use]
    pub fn is_dominant(&self, ratio: f64) -> bool {
        ratio >= self.threshold
    }

    /// Recompute ratios and return the sections that just crossed the
    /// threshold upwards.
    pub fn observe(&mut self, scroll_y: f64, viewport_height: f64) -> Vec<usize> {
        let mut crossed = Vec::new();
        for (index, (bounds, last)) in self.sections.iter().zip(self.ratios.iter_mut()).enumerate()
        {
            let ratio = bounds.visibility(scroll_y, viewport_height);
            if ratio >= self.threshold && *last < self.threshold {
                crossed.push(index);
            }
            *last = ratio;
        }
        if !crossed.is_empty() {
            trace!(
                target: TARGET_OBSERVER,
                scroll_y,
                viewport_height,
                crossed = ?crossed,
                "sections crossed visibility threshold"
            );
        }
        crossed
    }
}
