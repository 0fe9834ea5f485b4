#![forbid(unsafe_code)]

//! Metric animator: eased counters rendered with a decimal comma.
//!
//! Each [`MetricDisplay`] owns the text currently shown in one display slot
//! and at most one running [`Tween`]. [`MetricDisplay::animate`] reads the
//! start value back from that text, so a call that lands while another tween
//! is still running continues from whatever is on screen (last caller wins).
//!
//! # Invariants
//!
//! 1. The ease-out curve is monotonic: displayed values never overshoot.
//! 2. A task is dropped on the first tick where `k == 1`; the final text is
//!    exactly the target formatted with one decimal.
//! 3. Displays are independent; ticking one never touches another.
//!
//! # Failure Modes
//!
//! - Malformed or non-finite display text parses as `0`.
//! - A missing display slot skips the whole group it belongs to.

use std::fmt;

use tracing::{debug, trace};
use web_time::Duration;

use crate::animation::{Tween, ease_out_cubic};
use crate::logging::TARGET_METRIC;
use crate::scene::MetricTargets;

/// Which set of counters a display belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayGroup {
    /// Always-visible counters (`m1..m3`).
    Primary,
    /// Result-section copies (`r1..r3`), only driven by mirrored scene modes.
    Mirror,
}

/// Which metric a display shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Wait,
    Throughput,
    QueueLength,
}

impl MetricKind {
    pub const ALL: [Self; 3] = [Self::Wait, Self::Throughput, Self::QueueLength];

    fn ordinal(self) -> usize {
        match self {
            Self::Wait => 0,
            Self::Throughput => 1,
            Self::QueueLength => 2,
        }
    }
}

/// Identity of one display slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayId {
    pub group: DisplayGroup,
    pub metric: MetricKind,
}

impl DisplayId {
    /// All six slots in element-id order.
    pub const ALL: [Self; 6] = [
        Self::new(DisplayGroup::Primary, MetricKind::Wait),
        Self::new(DisplayGroup::Primary, MetricKind::Throughput),
        Self::new(DisplayGroup::Primary, MetricKind::QueueLength),
        Self::new(DisplayGroup::Mirror, MetricKind::Wait),
        Self::new(DisplayGroup::Mirror, MetricKind::Throughput),
        Self::new(DisplayGroup::Mirror, MetricKind::QueueLength),
    ];

    #[must_use]
    pub const fn new(group: DisplayGroup, metric: MetricKind) -> Self {
        Self { group, metric }
    }

    /// DOM element id (`m1`..`m3`, `r1`..`r3`).
    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match (self.group, self.metric) {
            (DisplayGroup::Primary, MetricKind::Wait) => "m1",
            (DisplayGroup::Primary, MetricKind::Throughput) => "m2",
            (DisplayGroup::Primary, MetricKind::QueueLength) => "m3",
            (DisplayGroup::Mirror, MetricKind::Wait) => "r1",
            (DisplayGroup::Mirror, MetricKind::Throughput) => "r2",
            (DisplayGroup::Mirror, MetricKind::QueueLength) => "r3",
        }
    }

    /// Inverse of [`DisplayId::element_id`].
    #[must_use]
    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.element_id() == id)
    }

    fn slot(self) -> usize {
        let base = match self.group {
            DisplayGroup::Primary => 0,
            DisplayGroup::Mirror => 3,
        };
        base + self.metric.ordinal()
    }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// Parse displayed text as a number. The first `,` is read as the decimal
/// point; anything unparseable or non-finite is `0`.
#[must_use]
pub fn parse_display(text: &str) -> f64 {
    let normalized = text.trim().replacen(',', ".", 1);
    if normalized.is_empty() {
        return 0.0;
    }
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Format a value with one decimal and a comma separator.
///
/// Exact ties round away from zero (`0.25` shows `0,3`), and anything that
/// rounds to zero shows as `0,0` without a sign.
#[must_use]
pub fn format_display(value: f64) -> String {
    // Only multiples of 0.25 that are not multiples of 0.5 sit exactly on a
    // tenths tie; `{:.1}` would round those to even.
    let is_tie = (value * 4.0).fract() == 0.0 && (value * 2.0).fract() != 0.0;
    let rounded = if is_tie {
        (value * 10.0).round() / 10.0
    } else {
        value
    };
    let text = format!("{rounded:.1}");
    match text.strip_prefix('-') {
        Some(unsigned) if unsigned.bytes().all(|b| b == b'0' || b == b'.') => {
            unsigned.replacen('.', ",", 1)
        }
        _ => text.replacen('.', ",", 1),
    }
}

/// One counter on screen.
#[derive(Debug, Clone)]
pub struct MetricDisplay {
    text: String,
    task: Option<Tween>,
}

impl MetricDisplay {
    #[must_use]
    pub fn new(initial_text: impl Into<String>) -> Self {
        Self {
            text: initial_text.into(),
            task: None,
        }
    }

    /// Currently displayed text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Target of the running task, if any.
    #[must_use]
    pub fn target(&self) -> Option<f64> {
        self.task.as_ref().map(Tween::to)
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.task.is_some()
    }

    /// Start easing toward `target`, replacing any running task.
    pub fn animate(&mut self, target: f64, now: Duration, duration: Duration) {
        let from = parse_display(&self.text);
        self.task = Some(Tween::new(from, target, now, duration, ease_out_cubic));
    }

    /// Write the value for `now`. Returns `true` when the text changed.
    pub fn tick(&mut self, now: Duration) -> bool {
        let Some(task) = self.task else {
            return false;
        };
        let text = format_display(task.sample(now));
        if task.is_complete_at(now) {
            self.task = None;
        }
        if text == self.text {
            return false;
        }
        self.text = text;
        true
    }
}

/// The set of display slots that exist on the page.
#[derive(Debug, Clone)]
pub struct MetricBoard {
    slots: [Option<MetricDisplay>; 6],
    duration: Duration,
}

impl MetricBoard {
    /// Create a board with the given slots present.
    #[must_use]
    pub fn new<I, S>(displays: I, duration: Duration) -> Self
    where
        I: IntoIterator<Item = (DisplayId, S)>,
        S: Into<String>,
    {
        let mut slots: [Option<MetricDisplay>; 6] = Default::default();
        for (id, text) in displays {
            slots[id.slot()] = Some(MetricDisplay::new(text));
        }
        Self { slots, duration }
    }

    #[must_use]
    pub fn display(&self, id: DisplayId) -> Option<&MetricDisplay> {
        self.slots[id.slot()].as_ref()
    }

    /// Displayed text of slot `id`.
    #[must_use]
    pub fn text(&self, id: DisplayId) -> Option<&str> {
        self.display(id).map(MetricDisplay::text)
    }

    /// Whether all three slots of `group` exist.
    #[must_use]
    pub fn has_group(&self, group: DisplayGroup) -> bool {
        MetricKind::ALL
            .iter()
            .all(|&m| self.display(DisplayId::new(group, m)).is_some())
    }

    /// Animate every metric of `group` toward `targets`. Returns `false`
    /// (and does nothing) when any slot of the group is missing.
    pub fn animate_group(&mut self, group: DisplayGroup, targets: MetricTargets, now: Duration) -> bool {
        if !self.has_group(group) {
            debug!(target: TARGET_METRIC, ?group, "metric group skipped: display missing");
            return false;
        }
        for metric in MetricKind::ALL {
            let id = DisplayId::new(group, metric);
            if let Some(display) = self.slots[id.slot()].as_mut() {
                display.animate(targets.get(metric), now, self.duration);
            }
        }
        trace!(
            target: TARGET_METRIC,
            ?group,
            wait = targets.wait,
            throughput = targets.throughput,
            queue_length = targets.queue_length,
            "metric group animating"
        );
        true
    }

    /// Advance every running task. Returns the slots whose text changed.
    pub fn tick(&mut self, now: Duration) -> Vec<DisplayId> {
        DisplayId::ALL
            .into_iter()
            .filter(|id| {
                self.slots[id.slot()]
                    .as_mut()
                    .is_some_and(|display| display.tick(now))
            })
            .collect()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.slots.iter().flatten().any(MetricDisplay::is_animating)
    }
}
