#![forbid(unsafe_code)]

//! Keyframe tracks: piecewise interpolation over a frame axis.
//!
//! A [`KeyframeTrack`] holds `(frame, value)` pairs and samples them at an
//! arbitrary (fractional) frame. When an easing curve is attached it is
//! applied to the normalized position *within each key segment*, not to the
//! track as a whole, so a mid-track key is always hit exactly.
//!
//! # Invariants
//!
//! 1. Keys are always sorted by frame (maintained on insertion; equal frames
//!    keep insertion order).
//! 2. Sampling before the first key yields the first value; sampling after
//!    the last key yields the last value.
//! 3. Sampling exactly at a key frame yields that key's value.
//!
//! # Failure Modes
//!
//! - Empty track: samples as `0.0`.
//! - Two keys on the same frame: the later key wins for samples at or past
//!   that frame (zero-length segments are skipped).

use super::EasingFn;

/// A single `(frame, value)` key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub frame: f64,
    pub value: f64,
}

/// Piecewise-interpolated track over a frame axis.
#[derive(Debug, Clone, Default)]
pub struct KeyframeTrack {
    keys: Vec<Keyframe>,
    easing: Option<EasingFn>,
}

impl KeyframeTrack {
    /// Create an empty, linearly interpolated track.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key (builder pattern).
    #[must_use]
    pub fn key(mut self, frame: f64, value: f64) -> Self {
        self.insert(frame, value);
        self
    }

    /// Apply `easing` inside every key segment (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Insert a key, keeping the track sorted.
    pub fn insert(&mut self, frame: f64, value: f64) {
        let pos = self.keys.partition_point(|k| k.frame <= frame);
        self.keys.insert(pos, Keyframe { frame, value });
    }

    /// Frame of the last key (`0.0` for an empty track).
    #[must_use]
    pub fn last_frame(&self) -> f64 {
        self.keys.last().map_or(0.0, |k| k.frame)
    }

    /// Number of keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the track has no keys.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sample the track at `frame`.
    #[must_use]
    pub fn sample(&self, frame: f64) -> f64 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if frame <= first.frame {
            return first.value;
        }
        if frame >= last.frame {
            return last.value;
        }

        // First key strictly after `frame`; its predecessor starts the segment.
        let hi = self.keys.partition_point(|k| k.frame <= frame);
        let a = self.keys[hi - 1];
        let b = self.keys[hi];
        let span = b.frame - a.frame;
        if span <= 0.0 {
            return b.value;
        }
        let mut gradient = (frame - a.frame) / span;
        if let Some(ease) = self.easing {
            gradient = ease(gradient);
        }
        a.value + (b.value - a.value) * gradient
    }
}
