#![forbid(unsafe_code)]

//! Canonical host input for a [`Deck`](crate::Deck).
//!
//! Hosts translate whatever their platform delivers (DOM events, replayed
//! traces, synthetic test input) into [`DeckInput`] values. Key names follow
//! DOM `KeyboardEvent.key` spelling.

use crate::observer::SectionBounds;

/// Keyboard navigation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Next,
    Previous,
}

impl NavKey {
    /// Map a DOM key name onto a navigation intent.
    ///
    /// `ArrowDown`, `PageDown` and `ArrowRight` advance; `ArrowUp`, `PageUp`
    /// and `ArrowLeft` go back. Every other key is ignored.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" | "PageDown" | "ArrowRight" => Some(Self::Next),
            "ArrowUp" | "PageUp" | "ArrowLeft" => Some(Self::Previous),
            _ => None,
        }
    }
}

/// How the host should perform a scroll request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollBehavior {
    /// Jump without animation.
    Instant,
    /// Let the host animate the scroll.
    Smooth,
}

impl ScrollBehavior {
    /// DOM `ScrollIntoViewOptions.behavior` spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Instant => "instant",
            Self::Smooth => "smooth",
        }
    }
}

/// One host input.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckInput {
    /// Window scroll offset changed.
    Scroll { y: f64 },
    /// Viewport or document size changed.
    Resize {
        viewport_height: f64,
        document_height: f64,
    },
    /// Section geometry changed (fonts loaded, images decoded, ...).
    Layout(Vec<SectionBounds>),
    /// Keyboard navigation.
    Key(NavKey),
    /// Click on an auto-generated indicator dot.
    DotClick(usize),
    /// Click on a nav link or a `[data-goto]` button.
    NavLinkClick(usize),
    /// Intersection report from a host-side observer.
    Intersection { index: usize, ratio: f64 },
}
