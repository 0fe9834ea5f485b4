#![forbid(unsafe_code)]

//! Policy-as-data configuration for a deck.
//!
//! Every tunable of the state machine lives in one [`DeckConfig`] that can be
//! loaded from TOML or JSON at startup (feature `config`). Fields missing from
//! a file keep their defaults.
//!
//! ```toml
//! # flipdeck.toml
//! world_min_x = -90.0
//! world_max_x = 90.0
//! settle_delay_ms = 120
//!
//! [[scenes]]
//! barrier_target_angle = 0.0
//! metrics = { wait = 6.0, throughput = 35.0, queue_length = 1.2 }
//! ```
//!
//! # Defaults
//!
//! `DeckConfig::default()` reproduces the shipped presentation exactly: world
//! interval `[-90, 90]`, threshold 0.55, 120 ms settle, 80 frames at 90 fps,
//! 600 ms counters, smoothing rates 4 and 6, and the four-section scene table.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::render::Smoothing;
use crate::scene::SceneTable;
use crate::transition::FlipTiming;

/// Longest page flip a config may ask for.
pub const MAX_FLIP_SECS: f64 = 60.0;

/// Top-level deck configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct DeckConfig {
    /// World X at scroll progress 0.
    pub world_min_x: f64,
    /// World X at scroll progress 1.
    pub world_max_x: f64,
    /// Visibility ratio at which a section becomes dominant.
    pub visibility_threshold: f64,
    /// Lockout after an explicit jump commits.
    pub settle_delay_ms: u64,
    /// Length of a page flip in animation frames.
    pub flip_frames: f64,
    /// Animation frame rate of a page flip.
    pub flip_fps: f64,
    /// Counter easing duration.
    pub metric_duration_ms: u64,
    /// Drone approach rate, per second.
    pub drone_smoothing: f64,
    /// Barrier approach rate, per second.
    pub barrier_smoothing: f64,
    /// Scene mode per section index.
    pub scenes: SceneTable,
}

impl Default for DeckConfig {
    fn default() -> Self {
        let smoothing = Smoothing::default();
        let timing = FlipTiming::default();
        Self {
            world_min_x: -90.0,
            world_max_x: 90.0,
            visibility_threshold: 0.55,
            settle_delay_ms: 120,
            flip_frames: timing.frames,
            flip_fps: timing.fps,
            metric_duration_ms: 600,
            drone_smoothing: smoothing.drone_rate,
            barrier_smoothing: smoothing.barrier_rate,
            scenes: SceneTable::default(),
        }
    }
}

impl DeckConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize as a single JSON line.
    #[cfg(feature = "config")]
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Validate all parameters. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.world_min_x.is_finite() || !self.world_max_x.is_finite() {
            errors.push("world_min_x and world_max_x must be finite".into());
        }
        if !(self.visibility_threshold > 0.0 && self.visibility_threshold <= 1.0) {
            errors.push(format!(
                "visibility_threshold must be in (0, 1], got {}",
                self.visibility_threshold
            ));
        }
        if !(self.flip_frames.is_finite() && self.flip_frames > 0.0) {
            errors.push(format!("flip_frames must be > 0, got {}", self.flip_frames));
        }
        if !(self.flip_fps.is_finite() && self.flip_fps > 0.0) {
            errors.push(format!("flip_fps must be > 0, got {}", self.flip_fps));
        }
        let flip_secs = self.flip_frames / self.flip_fps;
        if !(flip_secs <= MAX_FLIP_SECS) {
            errors.push(format!(
                "flip_frames / flip_fps must be at most {MAX_FLIP_SECS} s, got {flip_secs}"
            ));
        }
        if self.metric_duration_ms == 0 {
            errors.push("metric_duration_ms must be > 0".into());
        }
        if !(self.drone_smoothing >= 0.0) {
            errors.push(format!("drone_smoothing must be >= 0, got {}", self.drone_smoothing));
        }
        if !(self.barrier_smoothing >= 0.0) {
            errors.push(format!(
                "barrier_smoothing must be >= 0, got {}",
                self.barrier_smoothing
            ));
        }
        for (index, mode) in self.scenes.iter().enumerate() {
            if !mode.barrier_target_angle.is_finite() {
                errors.push(format!("scenes[{index}].barrier_target_angle must be finite"));
            }
        }

        errors
    }

    /// Return `self` if it validates cleanly.
    pub fn validated(self) -> ConfigResult<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub fn metric_duration(&self) -> Duration {
        Duration::from_millis(self.metric_duration_ms)
    }

    #[must_use]
    pub fn flip_timing(&self) -> FlipTiming {
        FlipTiming {
            frames: self.flip_frames,
            fps: self.flip_fps,
        }
    }

    #[must_use]
    pub fn smoothing(&self) -> Smoothing {
        Smoothing {
            drone_rate: self.drone_smoothing,
            barrier_rate: self.barrier_smoothing,
        }
    }
}

/// Errors that can occur when loading a deck configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
