//! Platform-independent runner logic behind the `wasm-bindgen` exports.
//!
//! Everything crossing the JS boundary is JSON text or plain numbers; this
//! module owns the conversions so they can be tested natively.

use flipdeck_core::metric::DisplayId;
use flipdeck_core::{
    DeckConfig, DeckOutput, DisplaySetup, PageLayout, RenderSignals, SectionBounds,
};
use flipdeck_web::input_parser::parse_encoded_input;
use flipdeck_web::step_deck::{StepDeck, StepResult};
use flipdeck_web::{TARGET_WEB, WebDeckError};
use serde::{Deserialize, Serialize};
use tracing::debug;
use web_time::Duration;

/// Longest frame the runner will feed the deck in one step.
const MAX_FRAME_MS: f64 = 1000.0;

#[derive(Debug, Deserialize)]
struct LayoutJson {
    sections: Vec<SectionJson>,
    viewport_height: f64,
    document_height: f64,
    #[serde(default)]
    scroll_y: f64,
}

#[derive(Debug, Deserialize)]
struct SectionJson {
    top: f64,
    height: f64,
}

/// One host request in the shape the page script consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HostCommand {
    ScrollIntoView {
        index: usize,
        behavior: &'static str,
        y: f64,
    },
    ActiveNav {
        index: usize,
    },
    DisplayText {
        id: &'static str,
        text: String,
    },
}

impl From<DeckOutput> for HostCommand {
    fn from(output: DeckOutput) -> Self {
        match output {
            DeckOutput::ScrollIntoView { index, behavior, y } => Self::ScrollIntoView {
                index,
                behavior: behavior.as_str(),
                y,
            },
            DeckOutput::ActiveNav(index) => Self::ActiveNav { index },
            DeckOutput::DisplayText { id, text } => Self::DisplayText {
                id: id.element_id(),
                text,
            },
        }
    }
}

/// Deck session as seen from the page script.
#[derive(Debug)]
pub struct DeckSession {
    driver: StepDeck,
    pending: Vec<HostCommand>,
    last_signals: Option<RenderSignals>,
}

impl DeckSession {
    /// Create a session. `displays` lists `(element id, initial text)` pairs
    /// for the counters present on the page; unknown ids are skipped.
    #[must_use]
    pub fn new(config: DeckConfig, displays: &[(String, String)]) -> Self {
        let setup = displays
            .iter()
            .fold(DisplaySetup::none(), |setup, (element_id, text)| {
                match DisplayId::from_element_id(element_id) {
                    Some(id) => setup.with(id, text.as_str()),
                    None => {
                        debug!(target: TARGET_WEB, element_id = %element_id, "unknown display id skipped");
                        setup
                    }
                }
            });
        Self {
            driver: StepDeck::new(config, setup),
            pending: Vec::new(),
            last_signals: None,
        }
    }

    /// Create a session from an optional JSON config. Falls back to the
    /// defaults when the config is absent, unparseable or fails validation.
    #[must_use]
    pub fn from_config_json(config_json: Option<&str>, displays: &[(String, String)]) -> Self {
        let config = match config_json.map(|json| DeckConfig::from_json_str(json)?.validated()) {
            Some(Ok(config)) => config,
            Some(Err(err)) => {
                debug!(target: TARGET_WEB, error = %err, "config rejected, using defaults");
                DeckConfig::default()
            }
            None => DeckConfig::default(),
        };
        Self::new(config, displays)
    }

    /// Supply page geometry as JSON. Returns `false` when the JSON does not
    /// match the layout schema.
    pub fn set_layout_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<LayoutJson>(json) {
            Ok(layout) => {
                self.driver.set_layout(PageLayout {
                    sections: layout
                        .sections
                        .into_iter()
                        .map(|s| SectionBounds::new(s.top, s.height))
                        .collect(),
                    viewport_height: layout.viewport_height,
                    document_height: layout.document_height,
                    scroll_y: layout.scroll_y,
                });
                true
            }
            Err(err) => {
                debug!(target: TARGET_WEB, error = %err, "layout rejected");
                false
            }
        }
    }

    /// Build the deck.
    pub fn init(&mut self) -> flipdeck_web::Result<()> {
        self.driver.init()?;
        self.collect();
        Ok(())
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.driver.is_initialized()
    }

    /// Push one encoded input. Returns `false` when it was rejected or has
    /// no deck mapping.
    pub fn push_encoded_input(&mut self, json: &str) -> bool {
        match parse_encoded_input(json) {
            Ok(Some(input)) => {
                self.driver.push_input(input);
                true
            }
            Ok(None) => false,
            Err(err) => {
                debug!(target: TARGET_WEB, error = %err, "encoded input rejected");
                false
            }
        }
    }

    /// Advance the host clock by `dt_ms`, capped at one second per call.
    /// Non-finite and non-positive values are ignored.
    pub fn advance_ms(&mut self, dt_ms: f64) {
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        let secs = dt_ms.min(MAX_FRAME_MS) / 1000.0;
        self.driver.advance_time(Duration::from_secs_f64(secs));
    }

    pub fn step(&mut self) -> flipdeck_web::Result<StepResult> {
        let result = self.driver.step()?;
        self.collect();
        Ok(result)
    }

    /// Drain host commands issued since the last take.
    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.pending)
    }

    /// Drained commands as a JSON array.
    pub fn take_commands_json(&mut self) -> String {
        serde_json::to_string(&self.take_commands()).unwrap_or_else(|_| "[]".to_owned())
    }

    /// Last rendered signals in [`RenderSignals::to_flat`] layout.
    #[must_use]
    pub fn render_signals(&self) -> [f32; 11] {
        self.last_signals
            .map(|s| s.to_flat())
            .or_else(|| self.driver.deck().map(|d| d.signals().to_flat()))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.driver.deck().map(flipdeck_core::Deck::current_index)
    }

    #[must_use]
    pub fn frame_idx(&self) -> u64 {
        self.driver.frame_idx()
    }

    fn collect(&mut self) {
        let outputs = self.driver.take_outputs();
        if outputs.last_signals.is_some() {
            self.last_signals = outputs.last_signals;
        }
        self.pending
            .extend(outputs.requests.into_iter().map(HostCommand::from));
    }
}
