#![forbid(unsafe_code)]

//! Transition animator: the page-flip overlay.
//!
//! A flip is two keyframe tracks played over a fixed number of frames on the
//! single shared overlay:
//!
//! - **rotation**: `from` at frame 0, `from + 15%` of the sweep at the
//!   midpoint, `from ± π` at the end, cubic ease-in-out inside each segment;
//! - **alpha**: `0.18 → 0.10 → 0.0`, linear, with the middle key at 5/8 of
//!   the run.
//!
//! Before the first frame the overlay is shown with its rotation preset to
//! `0` (forward) or `π` (backward), so consecutive flips read as one
//! continuous page turn.
//!
//! # Invariants
//!
//! 1. A running flip is never cancelled, restarted or retargeted.
//! 2. The completion token handed to [`TransitionAnimator::begin`] is
//!    returned from [`TransitionAnimator::tick`] exactly once, on the tick
//!    the flip ends, after the overlay has been hidden.
//! 3. At most one flip is queued, and only a flip that carries a completion
//!    token. A decorative flip requested while busy is dropped.

use std::f64::consts::PI;

use tracing::{debug, trace};
use web_time::Duration;

use crate::animation::{Animation, KeyframeTrack, ease_in_out_cubic};
use crate::logging::TARGET_FLIP;

/// Share of the sweep covered by the rotation's middle key.
const ROTATION_MID_SHARE: f64 = 0.15;
/// Position of the rotation's middle key along the run.
const ROTATION_MID_AT: f64 = 0.5;
/// Position of the fade's middle key along the run.
const FADE_MID_AT: f64 = 0.625;
/// Overlay alpha as keyed at frame 0, middle, end.
const FADE_KEYS: [f64; 3] = [0.18, 0.10, 0.0];
/// Alpha shown between `begin` and the first tick.
const PRESET_ALPHA: f64 = 0.14;

/// Sweep direction of a flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlipDirection {
    /// Toward a higher section index.
    Forward,
    /// Toward a lower section index.
    Backward,
}

impl FlipDirection {
    /// Direction of travel from `from` to `to`.
    #[must_use]
    pub fn between(from: usize, to: usize) -> Self {
        if to > from {
            Self::Forward
        } else {
            Self::Backward
        }
    }

    /// `+1` forward, `-1` backward.
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    /// Preset rotation before the sweep starts.
    #[must_use]
    pub fn start_rotation(self) -> f64 {
        match self {
            Self::Forward => 0.0,
            Self::Backward => PI,
        }
    }
}

/// Visible state of the overlay plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayState {
    pub visible: bool,
    pub rotation_y: f64,
    pub alpha: f64,
}

impl OverlayState {
    #[must_use]
    pub const fn hidden() -> Self {
        Self {
            visible: false,
            rotation_y: 0.0,
            alpha: PRESET_ALPHA,
        }
    }
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::hidden()
    }
}

/// Frame count and frame rate of a flip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipTiming {
    pub frames: f64,
    pub fps: f64,
}

impl Default for FlipTiming {
    fn default() -> Self {
        Self {
            frames: 80.0,
            fps: 90.0,
        }
    }
}

impl FlipTiming {
    /// Wall-clock length of one flip.
    #[must_use]
    pub fn duration(&self) -> Duration {
        if !(self.fps > 0.0 && self.frames > 0.0) {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(self.frames / self.fps).unwrap_or(Duration::MAX)
    }
}

/// One page flip: two keyframe tracks on a shared frame clock.
#[derive(Debug, Clone)]
pub struct FlipAnimation {
    direction: FlipDirection,
    timing: FlipTiming,
    elapsed: Duration,
    rotation: KeyframeTrack,
    fade: KeyframeTrack,
}

impl FlipAnimation {
    #[must_use]
    pub fn new(direction: FlipDirection, timing: FlipTiming) -> Self {
        let from = direction.start_rotation();
        let to = from + f64::from(direction.sign()) * PI;
        let frames = timing.frames.max(0.0);
        let rotation = KeyframeTrack::new()
            .key(0.0, from)
            .key(frames * ROTATION_MID_AT, from + ROTATION_MID_SHARE * (to - from))
            .key(frames, to)
            .easing(ease_in_out_cubic);
        let fade = KeyframeTrack::new()
            .key(0.0, FADE_KEYS[0])
            .key(frames * FADE_MID_AT, FADE_KEYS[1])
            .key(frames, FADE_KEYS[2]);
        Self {
            direction,
            timing,
            elapsed: Duration::ZERO,
            rotation,
            fade,
        }
    }

    #[inline]
    #[must_use]
    pub fn direction(&self) -> FlipDirection {
        self.direction
    }

    /// Current (fractional) frame, clamped to the run length.
    #[must_use]
    pub fn frame(&self) -> f64 {
        (self.elapsed.as_secs_f64() * self.timing.fps).clamp(0.0, self.timing.frames.max(0.0))
    }

    #[must_use]
    pub fn rotation_y(&self) -> f64 {
        self.rotation.sample(self.frame())
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.fade.sample(self.frame())
    }
}

impl Animation for FlipAnimation {
    fn tick(&mut self, dt: Duration) {
        if self.is_complete() {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.timing.duration()
    }
}

/// What happened to a `begin` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginOutcome {
    /// The flip started on this call.
    Started,
    /// The overlay is busy with a decorative flip; this one plays next.
    Queued,
    /// The overlay is busy and the request was dropped.
    Dropped,
}

#[derive(Debug, Clone)]
struct ActiveFlip<T> {
    animation: FlipAnimation,
    on_complete: Option<T>,
}

/// Plays flips on the shared overlay and hands back completion tokens.
#[derive(Debug, Clone)]
pub struct TransitionAnimator<T> {
    timing: FlipTiming,
    overlay: OverlayState,
    active: Option<ActiveFlip<T>>,
    queued: Option<(FlipDirection, T)>,
}

impl<T> TransitionAnimator<T> {
    #[must_use]
    pub fn new(timing: FlipTiming) -> Self {
        Self {
            timing,
            overlay: OverlayState::hidden(),
            active: None,
            queued: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn overlay(&self) -> OverlayState {
        self.overlay
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    #[inline]
    #[must_use]
    pub fn has_queued(&self) -> bool {
        self.queued.is_some()
    }

    /// The flip currently on the overlay.
    #[must_use]
    pub fn current(&self) -> Option<&FlipAnimation> {
        self.active.as_ref().map(|a| &a.animation)
    }

    /// Request a flip. `on_complete` is returned from [`Self::tick`] when
    /// this flip ends.
    pub fn begin(&mut self, direction: FlipDirection, on_complete: Option<T>) -> BeginOutcome {
        let Some(active) = self.active.as_ref() else {
            self.start(direction, on_complete);
            return BeginOutcome::Started;
        };
        match on_complete {
            Some(token) if active.on_complete.is_none() && self.queued.is_none() => {
                debug!(target: TARGET_FLIP, sign = direction.sign(), "flip queued behind decorative flip");
                self.queued = Some((direction, token));
                BeginOutcome::Queued
            }
            _ => {
                debug!(target: TARGET_FLIP, sign = direction.sign(), "flip dropped: overlay busy");
                BeginOutcome::Dropped
            }
        }
    }

    /// Advance the running flip. Returns the completion token of a flip that
    /// ended on this tick.
    pub fn tick(&mut self, dt: Duration) -> Option<T> {
        let active = self.active.as_mut()?;
        active.animation.tick(dt);
        self.overlay.rotation_y = active.animation.rotation_y();
        self.overlay.alpha = active.animation.alpha();
        trace!(
            target: TARGET_FLIP,
            frame = active.animation.frame(),
            rotation_y = self.overlay.rotation_y,
            alpha = self.overlay.alpha,
            "flip frame"
        );
        if !active.animation.is_complete() {
            return None;
        }

        let finished = self.active.take()?;
        self.overlay.visible = false;
        debug!(
            target: TARGET_FLIP,
            sign = finished.animation.direction().sign(),
            committing = finished.on_complete.is_some(),
            "flip finished"
        );
        if let Some((direction, token)) = self.queued.take() {
            self.start(direction, Some(token));
        }
        finished.on_complete
    }

    fn start(&mut self, direction: FlipDirection, on_complete: Option<T>) {
        let animation = FlipAnimation::new(direction, self.timing);
        self.overlay = OverlayState {
            visible: true,
            rotation_y: direction.start_rotation(),
            alpha: PRESET_ALPHA,
        };
        debug!(
            target: TARGET_FLIP,
            sign = direction.sign(),
            committing = on_complete.is_some(),
            "flip started"
        );
        self.active = Some(ActiveFlip {
            animation,
            on_complete,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_nanos(11_111_111);

    fn run_to_end<T>(animator: &mut TransitionAnimator<T>) -> Vec<T> {
        let mut tokens = Vec::new();
        for _ in 0..200 {
            if let Some(token) = animator.tick(FRAME) {
                tokens.push(token);
            }
        }
        tokens
    }

    #[test]
    fn default_timing_is_80_frames_at_90_fps() {
        let d = FlipTiming::default().duration();
        assert!((d.as_secs_f64() - 80.0 / 90.0).abs() < 1e-9);
    }

    #[test]
    fn unrepresentable_duration_saturates() {
        let timing = FlipTiming {
            frames: 80.0,
            fps: 1e-300,
        };
        assert_eq!(timing.duration(), Duration::MAX);
        let mut flip = FlipAnimation::new(FlipDirection::Forward, timing);
        flip.tick(Duration::from_millis(16));
        assert!(!flip.is_complete());
        assert_eq!(FlipTiming { frames: f64::NAN, fps: 90.0 }.duration(), Duration::ZERO);
    }

    #[test]
    fn rotation_mid_key_is_fifteen_percent() {
        let mut flip = FlipAnimation::new(FlipDirection::Forward, FlipTiming::default());
        flip.tick(Duration::from_secs_f64(40.0 / 90.0));
        assert!((flip.frame() - 40.0).abs() < 1e-6);
        assert!((flip.rotation_y() - 0.15 * PI).abs() < 1e-6);
    }

    #[test]
    fn backward_flip_sweeps_from_pi_to_zero() {
        let mut flip = FlipAnimation::new(FlipDirection::Backward, FlipTiming::default());
        assert_eq!(flip.rotation_y(), PI);
        flip.tick(Duration::from_secs(1));
        assert!(flip.is_complete());
        assert_eq!(flip.rotation_y(), 0.0);
        assert_eq!(flip.alpha(), 0.0);
    }

    #[test]
    fn fade_keys_follow_frames() {
        let mut flip = FlipAnimation::new(FlipDirection::Forward, FlipTiming::default());
        assert_eq!(flip.alpha(), 0.18);
        flip.tick(Duration::from_secs_f64(50.0 / 90.0));
        assert!((flip.alpha() - 0.10).abs() < 1e-6);
    }

    #[test]
    fn begin_presets_overlay() {
        let mut animator: TransitionAnimator<()> = TransitionAnimator::new(FlipTiming::default());
        assert!(!animator.overlay().visible);
        assert_eq!(animator.begin(FlipDirection::Backward, None), BeginOutcome::Started);
        let overlay = animator.overlay();
        assert!(overlay.visible);
        assert_eq!(overlay.rotation_y, PI);
        assert_eq!(overlay.alpha, 0.14);
    }

    #[test]
    fn completion_fires_once_and_hides_overlay() {
        let mut animator = TransitionAnimator::new(FlipTiming::default());
        animator.begin(FlipDirection::Forward, Some(7_u32));
        let tokens = run_to_end(&mut animator);
        assert_eq!(tokens, vec![7]);
        assert!(!animator.overlay().visible);
        assert!(!animator.is_playing());
    }

    #[test]
    fn decorative_request_while_busy_is_dropped() {
        let mut animator: TransitionAnimator<u32> = TransitionAnimator::new(FlipTiming::default());
        animator.begin(FlipDirection::Forward, Some(1));
        assert_eq!(animator.begin(FlipDirection::Backward, None), BeginOutcome::Dropped);
        assert_eq!(animator.current().map(FlipAnimation::direction), Some(FlipDirection::Forward));
    }

    #[test]
    fn committing_request_queues_behind_decorative_flip() {
        let mut animator = TransitionAnimator::new(FlipTiming::default());
        animator.begin(FlipDirection::Forward, None);
        assert_eq!(animator.begin(FlipDirection::Backward, Some(3_u32)), BeginOutcome::Queued);
        assert_eq!(animator.begin(FlipDirection::Forward, Some(4)), BeginOutcome::Dropped);

        // First sweep ends without a token and hands over to the queued flip.
        let mut first_end = None;
        for i in 0..100 {
            assert_eq!(animator.tick(FRAME), None);
            if animator.current().map(FlipAnimation::direction) == Some(FlipDirection::Backward) {
                first_end = Some(i);
                break;
            }
        }
        assert!(first_end.is_some());
        assert!(animator.overlay().visible);
        assert_eq!(run_to_end(&mut animator), vec![3]);
    }

    #[test]
    fn running_flip_is_not_retargeted() {
        let mut animator: TransitionAnimator<u32> = TransitionAnimator::new(FlipTiming::default());
        animator.begin(FlipDirection::Forward, None);
        for _ in 0..10 {
            animator.tick(FRAME);
        }
        let before = animator.current().map(FlipAnimation::frame);
        animator.begin(FlipDirection::Backward, None);
        assert_eq!(animator.current().map(FlipAnimation::frame), before);
    }
}
