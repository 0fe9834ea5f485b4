#![forbid(unsafe_code)]

//! Scene modes: the backdrop configuration associated with each section.
//!
//! A [`SceneTable`] is a pure lookup from section index to
//! [`SceneModeConfig`]. The [`SceneModeApplier`] writes a looked-up config
//! into the shared [`Backdrop`] and [`MetricBoard`]. Applying the same index
//! twice yields the same targets; nothing accumulates.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use tracing::debug;
use web_time::Duration;

use crate::logging::TARGET_SCENE;
use crate::metric::{DisplayGroup, MetricBoard, MetricKind};
use crate::render::Backdrop;

/// Barrier pole lowered across the road.
pub const BARRIER_CLOSED: f64 = 0.0;
/// Barrier pole raised.
pub const BARRIER_OPEN: f64 = -std::f64::consts::FRAC_PI_2;

/// Target values for the three counters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct MetricTargets {
    /// Average wait, hours.
    pub wait: f64,
    /// Vehicles per hour.
    pub throughput: f64,
    /// Queue length, kilometres.
    pub queue_length: f64,
}

impl MetricTargets {
    #[must_use]
    pub const fn new(wait: f64, throughput: f64, queue_length: f64) -> Self {
        Self {
            wait,
            throughput,
            queue_length,
        }
    }

    #[must_use]
    pub fn get(&self, metric: MetricKind) -> f64 {
        match metric {
            MetricKind::Wait => self.wait,
            MetricKind::Throughput => self.throughput,
            MetricKind::QueueLength => self.queue_length,
        }
    }
}

/// Backdrop parameters for one section.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct SceneModeConfig {
    /// Barrier pivot angle, radians.
    pub barrier_target_angle: f64,
    pub metrics: MetricTargets,
    /// Also drive the mirrored display group.
    #[cfg_attr(feature = "config", serde(default))]
    pub mirror_metrics: bool,
}

impl SceneModeConfig {
    #[must_use]
    pub const fn new(barrier_target_angle: f64, metrics: MetricTargets, mirror_metrics: bool) -> Self {
        Self {
            barrier_target_angle,
            metrics,
            mirror_metrics,
        }
    }
}

/// Index-ordered scene-mode table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(transparent))]
pub struct SceneTable {
    modes: Vec<SceneModeConfig>,
}

impl Default for SceneTable {
    fn default() -> Self {
        Self::new(vec![
            SceneModeConfig::new(BARRIER_CLOSED, MetricTargets::new(6.0, 35.0, 1.2), false),
            SceneModeConfig::new(BARRIER_CLOSED, MetricTargets::new(14.0, 12.0, 6.8), false),
            SceneModeConfig::new(BARRIER_OPEN, MetricTargets::new(5.0, 38.0, 0.9), false),
            SceneModeConfig::new(BARRIER_OPEN, MetricTargets::new(3.0, 45.0, 0.2), true),
        ])
    }
}

impl SceneTable {
    #[must_use]
    pub fn new(modes: Vec<SceneModeConfig>) -> Self {
        Self { modes }
    }

    /// Config for section `index`; `None` past the end of the table.
    #[must_use]
    pub fn lookup(&self, index: usize) -> Option<&SceneModeConfig> {
        self.modes.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneModeConfig> {
        self.modes.iter()
    }
}

/// Writes scene modes into the backdrop and the metric board.
#[derive(Debug, Clone, Default)]
pub struct SceneModeApplier {
    table: SceneTable,
}

impl SceneModeApplier {
    #[must_use]
    pub fn new(table: SceneTable) -> Self {
        Self { table }
    }

    #[must_use]
    pub fn table(&self) -> &SceneTable {
        &self.table
    }

    /// Apply the mode for `index`. Indices without a table entry leave every
    /// target untouched and return `None`.
    pub fn apply(
        &self,
        index: usize,
        backdrop: &mut Backdrop,
        board: &mut MetricBoard,
        now: Duration,
    ) -> Option<SceneModeConfig> {
        let Some(mode) = self.table.lookup(index).copied() else {
            debug!(target: TARGET_SCENE, index, "no scene mode for section");
            return None;
        };
        backdrop.set_barrier_target(mode.barrier_target_angle);
        board.animate_group(DisplayGroup::Primary, mode.metrics, now);
        if mode.mirror_metrics {
            board.animate_group(DisplayGroup::Mirror, mode.metrics, now);
        }
        debug!(
            target: TARGET_SCENE,
            index,
            barrier_target_angle = mode.barrier_target_angle,
            mirror = mode.mirror_metrics,
            "scene mode applied"
        );
        Some(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::DisplayId;

    const MS_600: Duration = Duration::from_millis(600);

    fn stage() -> (Backdrop, MetricBoard) {
        (
            Backdrop::new(-90.0),
            MetricBoard::new(DisplayId::ALL.map(|id| (id, "0,0")), MS_600),
        )
    }

    #[test]
    fn default_table_matches_sections() {
        let table = SceneTable::default();
        assert_eq!(table.len(), 4);
        let open = table.lookup(2).copied();
        assert_eq!(
            open,
            Some(SceneModeConfig::new(BARRIER_OPEN, MetricTargets::new(5.0, 38.0, 0.9), false))
        );
        let first = table.lookup(0).copied();
        assert_eq!(
            first,
            Some(SceneModeConfig::new(0.0, MetricTargets::new(6.0, 35.0, 1.2), false))
        );
        assert!(table.lookup(4).is_none());
    }

    #[test]
    fn apply_sets_barrier_and_primary_metrics() {
        let applier = SceneModeApplier::default();
        let (mut backdrop, mut board) = stage();
        applier.apply(2, &mut backdrop, &mut board, Duration::ZERO);
        assert_eq!(backdrop.barrier_target_angle(), -std::f64::consts::FRAC_PI_2);
        board.tick(MS_600);
        let m = |metric| board.text(DisplayId::new(DisplayGroup::Primary, metric)).map(str::to_owned);
        assert_eq!(m(MetricKind::Wait).as_deref(), Some("5,0"));
        assert_eq!(m(MetricKind::Throughput).as_deref(), Some("38,0"));
        assert_eq!(m(MetricKind::QueueLength).as_deref(), Some("0,9"));
        let mirror = DisplayId::new(DisplayGroup::Mirror, MetricKind::Wait);
        assert_eq!(board.text(mirror), Some("0,0"));
    }

    #[test]
    fn mirrored_mode_drives_both_groups() {
        let applier = SceneModeApplier::default();
        let (mut backdrop, mut board) = stage();
        applier.apply(3, &mut backdrop, &mut board, Duration::ZERO);
        board.tick(MS_600);
        for group in [DisplayGroup::Primary, DisplayGroup::Mirror] {
            assert_eq!(board.text(DisplayId::new(group, MetricKind::Throughput)), Some("45,0"));
        }
    }

    #[test]
    fn apply_is_idempotent() {
        let applier = SceneModeApplier::default();
        let (mut backdrop, mut board) = stage();
        let first = applier.apply(1, &mut backdrop, &mut board, Duration::ZERO);
        let target_after_first = backdrop.barrier_target_angle();
        let second = applier.apply(1, &mut backdrop, &mut board, Duration::ZERO);
        assert_eq!(first, second);
        assert_eq!(backdrop.barrier_target_angle(), target_after_first);
        let wait = DisplayId::new(DisplayGroup::Primary, MetricKind::Wait);
        assert_eq!(board.display(wait).and_then(|d| d.target()), Some(14.0));
    }

    #[test]
    fn index_past_table_is_noop() {
        let applier = SceneModeApplier::default();
        let (mut backdrop, mut board) = stage();
        applier.apply(2, &mut backdrop, &mut board, Duration::ZERO);
        assert!(applier.apply(9, &mut backdrop, &mut board, Duration::ZERO).is_none());
        assert_eq!(backdrop.barrier_target_angle(), BARRIER_OPEN);
    }
}
