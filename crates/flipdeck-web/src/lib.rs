#![forbid(unsafe_code)]

//! `flipdeck-web` provides the host-side building blocks for running a
//! [`Deck`](flipdeck_core::Deck) in a browser.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page pushes scroll, resize, click and
//!   key input; nothing is read from the DOM here.
//! - **Deterministic time**: the host advances a monotonic clock explicitly,
//!   so identical input scripts replay to identical outputs.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate does not bind to `wasm-bindgen`; `flipdeck-wasm` wraps
//! [`step_deck::StepDeck`] with a JS API.

#[cfg(feature = "input-parser")]
pub mod input_parser;
pub mod step_deck;

use std::collections::VecDeque;

use flipdeck_core::{ConfigError, DeckInput, DeckOutput, PassiveRenderer, RenderSignals};
use web_time::Duration;

/// Log target for the web driver.
pub const TARGET_WEB: &str = "flipdeck.web";

/// Web driver error type.
#[derive(Debug, thiserror::Error)]
pub enum WebDeckError {
    /// `step` was called before `init` succeeded.
    #[error("deck not initialized: call init() after set_layout()")]
    NotInitialized,
    /// `init` was called before any page layout was supplied.
    #[error("no page layout supplied")]
    MissingLayout,
    /// The deck configuration was rejected.
    #[error("invalid deck configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias for the web driver.
pub type Result<T> = std::result::Result<T, WebDeckError>;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time. Moving backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }
}

/// Host-driven input queue.
///
/// The host pushes [`DeckInput`] values as DOM events arrive; the step
/// driver drains them in arrival order on the next step.
#[derive(Debug, Default, Clone)]
pub struct HostInputQueue {
    queue: VecDeque<DeckInput>,
}

impl HostInputQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a canonical input into the queue.
    pub fn push_input(&mut self, input: DeckInput) {
        self.queue.push_back(input);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drain all pending inputs.
    pub fn drain_inputs(&mut self) -> impl Iterator<Item = DeckInput> + '_ {
        self.queue.drain(..)
    }
}

/// Captured outputs for host consumption.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WebOutputs {
    /// Host requests in the order the deck issued them.
    pub requests: Vec<DeckOutput>,
    /// Signals handed to the renderer on the last step.
    pub last_signals: Option<RenderSignals>,
    /// Renders captured since the last take.
    pub frames_rendered: u64,
}

impl WebOutputs {
    /// Whether nothing was captured since the last take.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty() && self.frames_rendered == 0
    }
}

/// Renderer that captures signals into [`WebOutputs`].
#[derive(Debug)]
pub struct SignalCapture<'a> {
    outputs: &'a mut WebOutputs,
}

impl<'a> SignalCapture<'a> {
    #[must_use]
    pub fn new(outputs: &'a mut WebOutputs) -> Self {
        Self { outputs }
    }
}

impl PassiveRenderer for SignalCapture<'_> {
    fn render(&mut self, signals: &RenderSignals) {
        self.outputs.last_signals = Some(*signals);
        self.outputs.frames_rendered += 1;
    }
}
