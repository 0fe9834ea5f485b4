#![forbid(unsafe_code)]

//! Log targets and optional subscriber setup.
//!
//! Every event emitted by the core carries one of the targets below so hosts
//! can filter by component (`RUST_LOG=flipdeck.nav=debug`). State transitions
//! log at `debug`, per-frame detail at `trace`. Dropped user intents are not
//! errors and log at `debug`.

/// Navigation controller transitions and dropped requests.
pub const TARGET_NAV: &str = "flipdeck.nav";
/// Page-flip overlay lifecycle.
pub const TARGET_FLIP: &str = "flipdeck.flip";
/// Scene-mode lookups.
pub const TARGET_SCENE: &str = "flipdeck.scene";
/// Metric display tasks.
pub const TARGET_METRIC: &str = "flipdeck.metric";
/// Section visibility crossings.
pub const TARGET_OBSERVER: &str = "flipdeck.observer";
/// Deck session wiring (inputs, outputs, render ticks).
pub const TARGET_DECK: &str = "flipdeck.deck";

/// Install a global JSON subscriber filtered by `RUST_LOG` (falling back to
/// `default_filter`).
///
/// Returns `false` when a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber(default_filter: &str) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
