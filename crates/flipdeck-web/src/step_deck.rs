#![forbid(unsafe_code)]

//! Step driver: one call per display frame from the host's animation loop.
//!
//! ```text
//! set_layout ─▶ init ─▶ ┌─ push_input* ─ advance_time ─ step ─ take_outputs ─┐
//!                       └────────────────────────────────────────────────────┘
//! ```
//!
//! Each [`StepDeck::step`] drains queued inputs in arrival order, then
//! advances the deck by the clock time elapsed since the previous step and
//! renders once. Stepping twice without advancing time renders a zero-length
//! frame.

use flipdeck_core::{
    Deck, DeckConfig, DeckInput, DisplaySetup, PageLayout, navigation::NavPhase,
};
use tracing::{debug, trace};
use web_time::Duration;

use crate::{DeterministicClock, HostInputQueue, SignalCapture, TARGET_WEB, WebDeckError, WebOutputs};

/// Result of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Inputs drained and handled on this step.
    pub inputs_processed: u32,
    /// Time the deck was advanced by.
    pub dt: Duration,
    /// Frame counter after this step.
    pub frame_idx: u64,
    pub current_index: usize,
    pub transitioning: bool,
}

/// Host-driven deck with a deterministic clock and an input queue.
#[derive(Debug)]
pub struct StepDeck {
    config: DeckConfig,
    displays: DisplaySetup,
    layout: Option<PageLayout>,
    deck: Option<Deck>,
    clock: DeterministicClock,
    last_step: Duration,
    queue: HostInputQueue,
    outputs: WebOutputs,
    frame_idx: u64,
}

impl StepDeck {
    #[must_use]
    pub fn new(config: DeckConfig, displays: DisplaySetup) -> Self {
        Self {
            config,
            displays,
            layout: None,
            deck: None,
            clock: DeterministicClock::new(),
            last_step: Duration::ZERO,
            queue: HostInputQueue::new(),
            outputs: WebOutputs::default(),
            frame_idx: 0,
        }
    }

    /// Supply page geometry. Before `init` this is the startup layout; after
    /// it, the change is queued as resize, layout and scroll inputs.
    pub fn set_layout(&mut self, layout: PageLayout) {
        if self.deck.is_some() {
            self.queue.push_input(DeckInput::Resize {
                viewport_height: layout.viewport_height,
                document_height: layout.document_height,
            });
            self.queue.push_input(DeckInput::Layout(layout.sections.clone()));
            self.queue.push_input(DeckInput::Scroll { y: layout.scroll_y });
        }
        self.layout = Some(layout);
    }

    /// Build the deck and capture its startup requests.
    ///
    /// # Errors
    ///
    /// [`WebDeckError::MissingLayout`] before `set_layout`, or
    /// [`WebDeckError::Config`] when the configuration is rejected.
    pub fn init(&mut self) -> crate::Result<()> {
        if self.deck.is_some() {
            return Ok(());
        }
        let layout = self.layout.clone().ok_or(WebDeckError::MissingLayout)?;
        let sections = layout.sections.len();
        let mut deck = Deck::new(self.config.clone(), layout, self.displays.clone())?;
        self.outputs.requests.extend(deck.take_outputs());
        self.last_step = self.clock.now();
        self.deck = Some(deck);
        debug!(target: TARGET_WEB, sections, "step deck initialized");
        Ok(())
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.deck.is_some()
    }

    /// Queue one input for the next step.
    pub fn push_input(&mut self, input: DeckInput) {
        self.queue.push_input(input);
    }

    /// Advance the host clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Set the host clock to an absolute monotonic timestamp.
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Handle queued inputs, advance and render one frame.
    ///
    /// # Errors
    ///
    /// [`WebDeckError::NotInitialized`] before `init` succeeded.
    pub fn step(&mut self) -> crate::Result<StepResult> {
        let deck = self.deck.as_mut().ok_or(WebDeckError::NotInitialized)?;

        let mut inputs_processed = 0u32;
        for input in self.queue.drain_inputs() {
            deck.handle(input);
            inputs_processed = inputs_processed.saturating_add(1);
        }

        let now = self.clock.now();
        let dt = now.saturating_sub(self.last_step);
        self.last_step = now;
        deck.frame(dt, &mut SignalCapture::new(&mut self.outputs));
        self.outputs.requests.extend(deck.take_outputs());
        self.frame_idx += 1;

        trace!(
            target: TARGET_WEB,
            frame_idx = self.frame_idx,
            inputs_processed,
            dt_us = dt.as_micros() as u64,
            "step"
        );
        Ok(StepResult {
            inputs_processed,
            dt,
            frame_idx: self.frame_idx,
            current_index: deck.current_index(),
            transitioning: deck.is_transitioning(),
        })
    }

    /// Drain everything captured since the last take.
    pub fn take_outputs(&mut self) -> WebOutputs {
        std::mem::take(&mut self.outputs)
    }

    #[must_use]
    pub fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    #[must_use]
    pub fn deck(&self) -> Option<&Deck> {
        self.deck.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> Option<NavPhase> {
        self.deck.as_ref().map(Deck::phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipdeck_core::{DeckOutput, NavKey, ScrollBehavior};
    use pretty_assertions::assert_eq;

    const FRAME: Duration = Duration::from_millis(16);

    fn ready() -> StepDeck {
        let mut driver = StepDeck::new(DeckConfig::default(), DisplaySetup::all("0,0"));
        driver.set_layout(PageLayout::stacked(4, 800.0, 800.0));
        driver.init().unwrap();
        driver
    }

    #[test]
    fn step_before_init_fails() {
        let mut driver = StepDeck::new(DeckConfig::default(), DisplaySetup::none());
        assert!(matches!(driver.step(), Err(WebDeckError::NotInitialized)));
        assert!(matches!(driver.init(), Err(WebDeckError::MissingLayout)));
    }

    #[test]
    fn invalid_config_surfaces_on_init() {
        let config = DeckConfig {
            flip_fps: 0.0,
            ..DeckConfig::default()
        };
        let mut driver = StepDeck::new(config, DisplaySetup::none());
        driver.set_layout(PageLayout::stacked(4, 800.0, 800.0));
        assert!(matches!(driver.init(), Err(WebDeckError::Config(_))));
        assert!(!driver.is_initialized());
    }

    #[test]
    fn init_captures_startup_requests() {
        let mut driver = ready();
        let outputs = driver.take_outputs();
        assert_eq!(
            outputs.requests,
            vec![
                DeckOutput::ActiveNav(0),
                DeckOutput::ScrollIntoView {
                    index: 0,
                    behavior: ScrollBehavior::Instant,
                    y: 0.0,
                },
            ]
        );
        assert_eq!(outputs.frames_rendered, 0);
    }

    #[test]
    fn step_uses_clock_delta() {
        let mut driver = ready();
        driver.advance_time(FRAME);
        let first = driver.step().unwrap();
        assert_eq!(first.dt, FRAME);
        assert_eq!(first.frame_idx, 1);
        let second = driver.step().unwrap();
        assert_eq!(second.dt, Duration::ZERO);
        driver.set_time(Duration::from_millis(50));
        assert_eq!(driver.step().unwrap().dt, Duration::from_millis(34));
        assert_eq!(driver.take_outputs().frames_rendered, 3);
    }

    #[test]
    fn queued_inputs_drain_on_step() {
        let mut driver = ready();
        driver.push_input(DeckInput::Key(NavKey::Next));
        driver.push_input(DeckInput::Key(NavKey::Next));
        let result = driver.step().unwrap();
        assert_eq!(result.inputs_processed, 2);
        assert!(result.transitioning);
        assert_eq!(driver.phase(), Some(NavPhase::Transitioning { current: 0, next: 1 }));

        for _ in 0..80 {
            driver.advance_time(FRAME);
            driver.step().unwrap();
        }
        let outputs = driver.take_outputs();
        assert!(outputs.requests.contains(&DeckOutput::ScrollIntoView {
            index: 1,
            behavior: ScrollBehavior::Instant,
            y: 800.0,
        }));
        assert_eq!(driver.deck().map(Deck::current_index), Some(1));
        assert!(outputs.last_signals.is_some_and(|s| !s.overlay.visible));
    }

    #[test]
    fn relayout_after_init_is_queued() {
        let mut driver = ready();
        driver.take_outputs();
        let mut layout = PageLayout::stacked(4, 1000.0, 900.0);
        layout.scroll_y = 2050.0;
        driver.set_layout(layout);
        let result = driver.step().unwrap();
        assert_eq!(result.inputs_processed, 3);
        assert_eq!(result.current_index, 2);
    }
}
