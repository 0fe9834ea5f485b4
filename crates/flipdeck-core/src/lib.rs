#![forbid(unsafe_code)]

//! Core: the scroll-to-section state machine behind a flipdeck presentation.
//!
//! # Role in flipdeck
//! `flipdeck-core` owns every piece of section-aware state. The host (a web
//! page, a test, a replay tool) pushes [`DeckInput`] values and advances time
//! explicitly; the core answers with ordered [`DeckOutput`] requests and a
//! [`RenderSignals`] snapshot per frame.
//!
//! # Primary responsibilities
//! - **Scroll tracking**: scroll offset to progress to drone target X.
//! - **Section observation**: visibility ratios and threshold crossings.
//! - **Navigation**: the single authoritative current index and the
//!   explicit-jump guard.
//! - **Transitions**: the non-interruptible page-flip overlay.
//! - **Scene modes**: barrier angle and metric targets per section.
//!
//! # How it fits in the system
//! `flipdeck-web` wraps a [`Deck`] with a deterministic host clock and input
//! queue; `flipdeck-wasm` exposes that driver through `wasm-bindgen`. The 3D
//! backdrop itself is an external [`PassiveRenderer`].

pub mod animation;
pub mod config;
pub mod deck;
pub mod event;
pub mod logging;
pub mod metric;
pub mod navigation;
pub mod observer;
pub mod render;
pub mod scene;
pub mod scroll;
pub mod transition;

pub use config::{ConfigError, ConfigResult, DeckConfig};
pub use deck::{Deck, DeckOutput, DisplaySetup, PageLayout};
pub use event::{DeckInput, NavKey, ScrollBehavior};
pub use navigation::{NavCommand, NavEvent, NavigationController, PendingJump};
pub use observer::{SectionBounds, SectionObserver};
pub use render::{CameraPose, PassiveRenderer, RenderSignals};
pub use scene::{MetricTargets, SceneModeConfig, SceneTable};
pub use transition::{FlipDirection, OverlayState, TransitionAnimator};
