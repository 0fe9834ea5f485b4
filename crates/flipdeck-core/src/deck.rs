#![forbid(unsafe_code)]

//! The deck session: one owned value that wires every component together.
//!
//! The host owns a [`Deck`] for the lifetime of the page. It pushes
//! [`DeckInput`]s as they arrive, calls [`Deck::advance`] once per display
//! frame with the elapsed time, and drains [`DeckOutput`]s it must carry out
//! (scroll requests, nav highlight, counter text).
//!
//! # Tick order
//!
//! Within one `advance(dt)`:
//!
//! 1. settle timer of the navigation controller;
//! 2. flip animator (a finished committing flip commits its jump here);
//! 3. metric tasks, sampled at the new clock value;
//! 4. render smoothing of drone X and barrier angle, sharing `dt`.
//!
//! # Startup
//!
//! [`Deck::new`] applies scene mode 0, activates nav entry 0 and requests an
//! instant scroll to section 0, in that order.

use tracing::{debug, trace};
use web_time::Duration;

use crate::config::{ConfigError, DeckConfig};
use crate::event::{DeckInput, ScrollBehavior};
use crate::logging::TARGET_DECK;
use crate::metric::{DisplayId, MetricBoard};
use crate::navigation::{NavCommand, NavEvent, NavPhase, NavigationController, PendingJump};
use crate::observer::{SectionBounds, SectionObserver};
use crate::render::{Backdrop, PassiveRenderer, RenderSignals};
use crate::scene::SceneModeApplier;
use crate::scroll::ScrollTracker;
use crate::transition::{OverlayState, TransitionAnimator};

/// Page geometry at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub sections: Vec<SectionBounds>,
    pub viewport_height: f64,
    pub document_height: f64,
    pub scroll_y: f64,
}

impl PageLayout {
    /// `count` full-height sections stacked from the top, scrolled to 0.
    #[must_use]
    pub fn stacked(count: usize, section_height: f64, viewport_height: f64) -> Self {
        Self {
            sections: SectionBounds::stacked(count, section_height),
            viewport_height,
            document_height: count as f64 * section_height,
            scroll_y: 0.0,
        }
    }
}

/// Which counter slots exist on the page, with their initial text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplaySetup {
    slots: Vec<(DisplayId, String)>,
}

impl DisplaySetup {
    /// No counters at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// All six slots, each showing `initial_text`.
    #[must_use]
    pub fn all(initial_text: &str) -> Self {
        DisplayId::ALL
            .into_iter()
            .fold(Self::none(), |setup, id| setup.with(id, initial_text))
    }

    /// Add (or replace) one slot.
    #[must_use]
    pub fn with(mut self, id: DisplayId, initial_text: impl Into<String>) -> Self {
        let text = initial_text.into();
        match self.slots.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = text,
            None => self.slots.push((id, text)),
        }
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Request for the host, in the order it must be carried out.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckOutput {
    /// Scroll section `index` to the viewport center (`y` is the resolved
    /// document offset).
    ScrollIntoView {
        index: usize,
        behavior: ScrollBehavior,
        y: f64,
    },
    /// Mark nav link and dot `index` active, every other one inactive.
    ActiveNav(usize),
    /// New text for a counter slot.
    DisplayText { id: DisplayId, text: String },
}

/// Session state of one presentation.
#[derive(Debug)]
pub struct Deck {
    config: DeckConfig,
    now: Duration,
    scroll: ScrollTracker,
    observer: SectionObserver,
    nav: NavigationController,
    flips: TransitionAnimator<PendingJump>,
    scenes: SceneModeApplier,
    board: MetricBoard,
    backdrop: Backdrop,
    active_nav: Option<usize>,
    outputs: Vec<DeckOutput>,
}

impl Deck {
    /// Build a deck and run the startup sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when `config` fails
    /// [`DeckConfig::validate`].
    pub fn new(
        config: DeckConfig,
        layout: PageLayout,
        displays: DisplaySetup,
    ) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let PageLayout {
            sections,
            viewport_height,
            document_height,
            scroll_y,
        } = layout;

        let mut scroll = ScrollTracker::new(config.world_min_x, config.world_max_x);
        scroll.set_extent(viewport_height, document_height);
        scroll.set_scroll(scroll_y);

        let mut observer = SectionObserver::new(sections, config.visibility_threshold);
        let section_count = observer.len();
        // Startup defines section 0 as current; initial crossings only prime ratios.
        let primed = observer.observe(scroll_y, viewport_height);
        trace!(target: TARGET_DECK, primed = ?primed, "observer primed");

        let mut backdrop = Backdrop::new(config.world_min_x);
        backdrop.set_drone_target(scroll.target_x());

        let mut deck = Self {
            now: Duration::ZERO,
            nav: NavigationController::new(section_count, config.settle_delay()),
            flips: TransitionAnimator::new(config.flip_timing()),
            scenes: SceneModeApplier::new(config.scenes.clone()),
            board: MetricBoard::new(displays.slots, config.metric_duration()),
            config,
            scroll,
            observer,
            backdrop,
            active_nav: None,
            outputs: Vec::new(),
        };

        debug!(target: TARGET_DECK, section_count, "deck started");
        let mut startup = vec![NavCommand::ApplySceneMode(0)];
        if section_count > 0 {
            startup.push(NavCommand::SetActiveNav(0));
            startup.push(NavCommand::ScrollIntoView {
                index: 0,
                behavior: ScrollBehavior::Instant,
            });
        }
        deck.apply_commands(startup);
        Ok(deck)
    }

    /// Route one host input.
    pub fn handle(&mut self, input: DeckInput) {
        trace!(target: TARGET_DECK, input = ?input, "input");
        match input {
            DeckInput::Scroll { y } => {
                self.scroll.set_scroll(y);
                self.rescan();
            }
            DeckInput::Resize {
                viewport_height,
                document_height,
            } => {
                self.scroll.set_extent(viewport_height, document_height);
                self.rescan();
            }
            DeckInput::Layout(sections) => {
                if self.observer.set_layout(sections) {
                    self.rescan();
                }
            }
            DeckInput::Key(key) => match self.nav.key_target(key) {
                Some(target) => self.dispatch(NavEvent::UserNavigated(target)),
                None => debug!(target: TARGET_DECK, key = ?key, "key ignored: no target"),
            },
            DeckInput::DotClick(index) => self.dispatch(NavEvent::UserNavigated(index)),
            DeckInput::NavLinkClick(index) => self.request_scroll(index, ScrollBehavior::Smooth),
            DeckInput::Intersection { index, ratio } => {
                if self.observer.is_dominant(ratio) {
                    self.dispatch(NavEvent::ScrollObserved(index));
                }
            }
        }
    }

    /// Advance the deck clock by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
        self.nav.tick(dt);

        if let Some(jump) = self.flips.tick(dt) {
            let commands = self.nav.complete_jump(jump);
            self.apply_commands(commands);
        }

        for id in self.board.tick(self.now) {
            if let Some(text) = self.board.text(id) {
                self.outputs.push(DeckOutput::DisplayText {
                    id,
                    text: text.to_owned(),
                });
            }
        }

        self.backdrop.tick(dt.as_secs_f64(), self.config.smoothing());
    }

    /// Advance by `dt` and hand the resulting signals to `renderer`.
    pub fn frame<R: PassiveRenderer + ?Sized>(&mut self, dt: Duration, renderer: &mut R) {
        self.advance(dt);
        renderer.render(&self.signals());
    }

    /// Snapshot for the renderer.
    #[must_use]
    pub fn signals(&self) -> RenderSignals {
        RenderSignals::capture(&self.backdrop, self.flips.overlay())
    }

    /// Drain pending host requests.
    pub fn take_outputs(&mut self) -> Vec<DeckOutput> {
        std::mem::take(&mut self.outputs)
    }

    #[must_use]
    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    /// Deck clock: total time advanced so far.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.nav.section_count()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.nav.current_index()
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.nav.is_transitioning()
    }

    #[must_use]
    pub fn phase(&self) -> NavPhase {
        self.nav.phase()
    }

    /// Index of the highlighted nav entry and dot.
    #[must_use]
    pub fn active_dot(&self) -> Option<usize> {
        self.active_nav
    }

    #[must_use]
    pub fn overlay(&self) -> OverlayState {
        self.flips.overlay()
    }

    #[must_use]
    pub fn metrics(&self) -> &MetricBoard {
        &self.board
    }

    #[must_use]
    pub fn scroll(&self) -> &ScrollTracker {
        &self.scroll
    }

    fn rescan(&mut self) {
        self.backdrop.set_drone_target(self.scroll.target_x());
        let crossed = self
            .observer
            .observe(self.scroll.scroll_y(), self.scroll.viewport_height());
        for index in crossed {
            self.dispatch(NavEvent::ScrollObserved(index));
        }
    }

    fn dispatch(&mut self, event: NavEvent) {
        let commands = self.nav.dispatch(event);
        self.apply_commands(commands);
    }

    fn apply_commands(&mut self, commands: Vec<NavCommand>) {
        for command in commands {
            match command {
                NavCommand::SetActiveNav(index) => {
                    self.active_nav = Some(index);
                    self.outputs.push(DeckOutput::ActiveNav(index));
                }
                NavCommand::ApplySceneMode(index) => {
                    self.scenes
                        .apply(index, &mut self.backdrop, &mut self.board, self.now);
                }
                NavCommand::BeginFlip {
                    direction,
                    on_complete,
                } => {
                    // The nav guard admits one committing flip at a time, so it
                    // always starts or queues.
                    self.flips.begin(direction, on_complete);
                }
                NavCommand::ScrollIntoView { index, behavior } => {
                    self.request_scroll(index, behavior);
                }
            }
        }
    }

    fn request_scroll(&mut self, index: usize, behavior: ScrollBehavior) {
        let Some(bounds) = self.observer.section(index) else {
            debug!(target: TARGET_DECK, index, "scroll request ignored: no such section");
            return;
        };
        let max_scroll = (self.scroll.document_height() - self.scroll.viewport_height()).max(0.0);
        let y = bounds.center_scroll(self.scroll.viewport_height(), max_scroll);
        debug!(
            target: TARGET_DECK,
            index,
            behavior = behavior.as_str(),
            y,
            "scroll requested"
        );
        self.outputs.push(DeckOutput::ScrollIntoView { index, behavior, y });
    }
}
