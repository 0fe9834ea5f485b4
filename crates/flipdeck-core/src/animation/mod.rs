#![forbid(unsafe_code)]

//! Animation primitives: easing curves, keyframe tracks and timed tweens.
//!
//! Everything here is driven by host-supplied time. Nothing reads a wall
//! clock, so identical tick sequences always produce identical values.
//!
//! # Invariants
//!
//! 1. Easing functions map `[0, 1]` onto `[0, 1]` with `f(0) == 0` and
//!    `f(1) == 1`. Inputs outside the unit interval are clamped first.
//! 2. The easing curves exported here are monotonic, so an eased value never
//!    overshoots its target.
//! 3. [`Animation::tick`] on a completed animation is a no-op.

pub mod keyframes;
pub mod tween;

use web_time::Duration;

pub use keyframes::{Keyframe, KeyframeTrack};
pub use tween::Tween;

/// Easing curve: normalized time in, normalized progress out.
pub type EasingFn = fn(f64) -> f64;

/// A time-driven animation advanced by explicit deltas.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation reached its end.
    fn is_complete(&self) -> bool;
}

/// Identity curve.
#[inline]
#[must_use]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-in: `t^3`.
#[inline]
#[must_use]
pub fn ease_in_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * t
}

/// Cubic ease-out: `1 - (1 - t)^3`.
#[inline]
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Cubic ease-in-out: ease-in over the first half, mirrored ease-out over
/// the second.
#[inline]
#[must_use]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t >= 0.5 {
        (1.0 - ease_in_cubic((1.0 - t) * 2.0)) * 0.5 + 0.5
    } else {
        ease_in_cubic(t * 2.0) * 0.5
    }
}

/// Frame-rate independent exponential approach: move `current` toward
/// `target` by `min(1, dt * rate)` of the remaining distance.
#[inline]
#[must_use]
pub fn approach(current: f64, target: f64, dt_secs: f64, rate: f64) -> f64 {
    let factor = (dt_secs * rate).clamp(0.0, 1.0);
    current + (target - current) * factor
}
