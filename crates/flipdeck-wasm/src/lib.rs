#![forbid(unsafe_code)]

//! WASM runner for the flipdeck scroll presentation.
//!
//! The page script owns the DOM and the 3D canvas. It forwards scroll,
//! resize, click and key events as encoded JSON, drives [`DeckRunner`] from
//! `requestAnimationFrame`, applies the returned host commands and feeds the
//! flat render signals to its scene.

mod session;

pub use session::{DeckSession, HostCommand};

#[cfg(target_arch = "wasm32")]
mod wasm;
