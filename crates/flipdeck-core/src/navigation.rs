#![forbid(unsafe_code)]

//! Navigation controller: the single owner of the current section.
//!
//! Two trigger families feed one [`NavigationController::dispatch`]:
//!
//! - [`NavEvent::ScrollObserved`]: scroll is ground truth. The index,
//!   nav highlight and scene mode change immediately; the flip that follows
//!   is decorative and carries no completion.
//! - [`NavEvent::UserNavigated`]: an explicit jump. Guarded by the
//!   transitioning flag; the index changes only when the flip's completion
//!   comes back through [`NavigationController::complete_jump`], and the
//!   flag stays raised for a short settle delay after that.
//!
//! The controller never performs side effects. It returns an ordered list of
//! [`NavCommand`]s for the deck to carry out.
//!
//! # State Machine
//!
//! ```text
//!            UserNavigated(i)                 complete_jump             settle elapsed
//!   Idle(c) ─────────────────▶ Transitioning(c → i) ─────────▶ Settling(i) ─────────▶ Idle(i)
//!     │  ▲
//!     └──┘ ScrollObserved(j): c = j immediately (allowed in every state)
//! ```
//!
//! # Invariants
//!
//! 1. `current_index < section_count` whenever `section_count > 0`.
//! 2. At most one explicit jump is in flight; requests that arrive while
//!    transitioning are dropped, never queued.
//! 3. Requests for the current index or outside `[0, N-1]` are dropped.

use tracing::debug;
use web_time::Duration;

use crate::event::{NavKey, ScrollBehavior};
use crate::logging::TARGET_NAV;
use crate::transition::FlipDirection;

/// Inbound navigation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    /// The observer saw section `index` become dominant.
    ScrollObserved(usize),
    /// The user asked to jump to section `index`.
    UserNavigated(usize),
}

/// An explicit jump waiting for its flip to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingJump {
    pub target: usize,
    pub direction: FlipDirection,
}

/// Side effect requested by the controller, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    /// Highlight nav link and dot `index`.
    SetActiveNav(usize),
    /// Apply the scene mode for `index`.
    ApplySceneMode(usize),
    /// Play a flip; hand `on_complete` back through `complete_jump`.
    BeginFlip {
        direction: FlipDirection,
        on_complete: Option<PendingJump>,
    },
    /// Bring section `index` into view.
    ScrollIntoView {
        index: usize,
        behavior: ScrollBehavior,
    },
}

/// Coarse controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPhase {
    Idle { current: usize },
    Transitioning { current: usize, next: usize },
    Settling { current: usize },
}

/// Owner of `current_index` and `transitioning`.
#[derive(Debug, Clone)]
pub struct NavigationController {
    section_count: usize,
    current: usize,
    pending: Option<PendingJump>,
    settle_remaining: Option<Duration>,
    settle_delay: Duration,
}

impl NavigationController {
    /// Start idle at section 0.
    #[must_use]
    pub fn new(section_count: usize, settle_delay: Duration) -> Self {
        Self {
            section_count,
            current: 0,
            pending: None,
            settle_remaining: None,
            settle_delay,
        }
    }

    #[inline]
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[inline]
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.section_count
    }

    /// Whether explicit navigation is currently locked out.
    #[inline]
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some() || self.settle_remaining.is_some()
    }

    /// The jump waiting on its flip, if any.
    #[must_use]
    pub fn pending(&self) -> Option<PendingJump> {
        self.pending
    }

    #[must_use]
    pub fn phase(&self) -> NavPhase {
        match (self.pending, self.settle_remaining) {
            (Some(jump), _) => NavPhase::Transitioning {
                current: self.current,
                next: jump.target,
            },
            (None, Some(_)) => NavPhase::Settling {
                current: self.current,
            },
            (None, None) => NavPhase::Idle {
                current: self.current,
            },
        }
    }

    /// Target index of a keyboard intent relative to the current section.
    /// `None` when the intent would leave the index space below zero.
    #[must_use]
    pub fn key_target(&self, key: NavKey) -> Option<usize> {
        match key {
            NavKey::Next => self.current.checked_add(1),
            NavKey::Previous => self.current.checked_sub(1),
        }
    }

    /// Route one navigation event.
    pub fn dispatch(&mut self, event: NavEvent) -> Vec<NavCommand> {
        match event {
            NavEvent::ScrollObserved(index) => self.observe(index),
            NavEvent::UserNavigated(index) => self.navigate(index),
        }
    }

    fn observe(&mut self, index: usize) -> Vec<NavCommand> {
        if index >= self.section_count || index == self.current {
            return Vec::new();
        }
        let direction = FlipDirection::between(self.current, index);
        debug!(
            target: TARGET_NAV,
            from = self.current,
            to = index,
            sign = direction.sign(),
            transitioning = self.is_transitioning(),
            "section observed"
        );
        self.current = index;
        vec![
            NavCommand::SetActiveNav(index),
            NavCommand::ApplySceneMode(index),
            NavCommand::BeginFlip {
                direction,
                on_complete: None,
            },
        ]
    }

    fn navigate(&mut self, index: usize) -> Vec<NavCommand> {
        if index >= self.section_count || index == self.current || self.is_transitioning() {
            debug!(
                target: TARGET_NAV,
                requested = index,
                current = self.current,
                transitioning = self.is_transitioning(),
                "navigation request dropped"
            );
            return Vec::new();
        }
        let jump = PendingJump {
            target: index,
            direction: FlipDirection::between(self.current, index),
        };
        debug!(
            target: TARGET_NAV,
            from = self.current,
            to = index,
            sign = jump.direction.sign(),
            "jump started"
        );
        self.pending = Some(jump);
        vec![NavCommand::BeginFlip {
            direction: jump.direction,
            on_complete: Some(jump),
        }]
    }

    /// Commit a jump whose flip has finished.
    ///
    /// A token that does not match the pending jump is ignored.
    pub fn complete_jump(&mut self, jump: PendingJump) -> Vec<NavCommand> {
        if self.pending != Some(jump) {
            debug!(target: TARGET_NAV, target_index = jump.target, "stale jump completion ignored");
            return Vec::new();
        }
        self.pending = None;
        self.current = jump.target;
        self.settle_remaining = (!self.settle_delay.is_zero()).then_some(self.settle_delay);
        debug!(
            target: TARGET_NAV,
            current = self.current,
            settle_ms = self.settle_delay.as_millis() as u64,
            "jump committed"
        );
        vec![
            NavCommand::ScrollIntoView {
                index: jump.target,
                behavior: ScrollBehavior::Instant,
            },
            NavCommand::SetActiveNav(jump.target),
            NavCommand::ApplySceneMode(jump.target),
        ]
    }

    /// Advance the settle timer.
    pub fn tick(&mut self, dt: Duration) {
        let Some(remaining) = self.settle_remaining else {
            return;
        };
        let remaining = remaining.saturating_sub(dt);
        if remaining.is_zero() {
            self.settle_remaining = None;
            debug!(target: TARGET_NAV, current = self.current, "transition settled");
        } else {
            self.settle_remaining = Some(remaining);
        }
    }
}
