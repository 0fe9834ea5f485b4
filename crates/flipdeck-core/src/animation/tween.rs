#![forbid(unsafe_code)]

//! Timestamp-anchored tween between two scalar values.
//!
//! Unlike a dt-accumulating [`Animation`](super::Animation), a [`Tween`]
//! remembers when it started and is sampled against an absolute monotonic
//! timestamp. That makes it a finite, non-restartable sequence of values:
//! once `now - start >= duration` every sample returns the target.

use web_time::Duration;

use super::EasingFn;

/// Eased interpolation from `from` to `to` anchored at `start`.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f64,
    to: f64,
    start: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Tween {
    /// Create a tween. A zero `duration` completes on the first sample.
    #[must_use]
    pub fn new(from: f64, to: f64, start: Duration, duration: Duration, easing: EasingFn) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing,
        }
    }

    /// Normalized time `k = clamp((now - start) / duration, 0, 1)`.
    #[must_use]
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Value at `now`. Exactly `to` once complete.
    #[must_use]
    pub fn sample(&self, now: Duration) -> f64 {
        let k = self.progress(now);
        if k >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * (self.easing)(k)
    }

    /// Whether the tween has reached its target at `now`.
    #[must_use]
    pub fn is_complete_at(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }

    #[inline]
    #[must_use]
    pub fn from(&self) -> f64 {
        self.from
    }

    #[inline]
    #[must_use]
    pub fn to(&self) -> f64 {
        self.to
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> Duration {
        self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{ease_out_cubic, linear};

    const MS_600: Duration = Duration::from_millis(600);

    #[test]
    fn samples_endpoints() {
        let tween = Tween::new(6.0, 35.0, Duration::ZERO, MS_600, ease_out_cubic);
        assert_eq!(tween.sample(Duration::ZERO), 6.0);
        assert_eq!(tween.sample(MS_600), 35.0);
        assert_eq!(tween.sample(Duration::from_secs(5)), 35.0);
    }

    #[test]
    fn samples_before_start_hold_from() {
        let tween = Tween::new(1.0, 2.0, Duration::from_secs(1), MS_600, linear);
        assert_eq!(tween.sample(Duration::ZERO), 1.0);
        assert!(!tween.is_complete_at(Duration::ZERO));
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let tween = Tween::new(1.0, 2.0, Duration::ZERO, Duration::ZERO, linear);
        assert!(tween.is_complete_at(Duration::ZERO));
        assert_eq!(tween.sample(Duration::ZERO), 2.0);
    }

    #[test]
    fn completion_is_exact_at_duration() {
        let start = Duration::from_millis(100);
        let tween = Tween::new(0.0, 1.0, start, MS_600, ease_out_cubic);
        assert!(!tween.is_complete_at(Duration::from_millis(699)));
        assert!(tween.is_complete_at(Duration::from_millis(700)));
    }
}
