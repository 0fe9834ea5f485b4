//! `wasm-bindgen` exports for the DeckRunner.

use js_sys::{Array, Float32Array, Object, Reflect};
use wasm_bindgen::prelude::*;

use crate::session::DeckSession;

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn install_panic_hook() {
    use std::sync::Once;
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let global = js_sys::global();
            if let Ok(console) = Reflect::get(&global, &"console".into()) {
                if let Ok(error) = Reflect::get(&console, &"error".into()) {
                    if let Ok(f) = error.dyn_into::<js_sys::Function>() {
                        let _ = f.call1(&console, &JsValue::from_str(&format!("{info}")));
                    }
                }
            }
        }));
    });
}

/// Read `[[id, text], ...]` pairs from a JS array. Malformed entries are
/// skipped.
fn display_pairs(displays: &Array) -> Vec<(String, String)> {
    displays
        .iter()
        .filter_map(|entry| {
            let pair = entry.dyn_into::<Array>().ok()?;
            Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
        })
        .collect()
}

/// WASM deck runner.
///
/// Host-driven: JavaScript controls the loop via `requestAnimationFrame`,
/// pushing encoded inputs and advancing time each frame.
#[wasm_bindgen]
pub struct DeckRunner {
    inner: DeckSession,
}

#[wasm_bindgen]
impl DeckRunner {
    /// Create a runner. `config_json` may be `undefined` for defaults;
    /// `displays` is an array of `[elementId, initialText]` pairs.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>, displays: Array) -> Self {
        install_panic_hook();
        Self {
            inner: DeckSession::from_config_json(config_json.as_deref(), &display_pairs(&displays)),
        }
    }

    /// Supply page geometry:
    /// ```json
    /// { "sections": [{ "top": 0, "height": 900 }, ...],
    ///   "viewport_height": 900, "document_height": 3600, "scroll_y": 0 }
    /// ```
    #[wasm_bindgen(js_name = setLayout)]
    pub fn set_layout(&mut self, json: &str) -> bool {
        self.inner.set_layout_json(json)
    }

    /// Build the deck. Returns `false` until a valid layout was supplied.
    pub fn init(&mut self) -> bool {
        self.inner.init().is_ok()
    }

    /// Push a JSON-encoded input event.
    #[wasm_bindgen(js_name = pushEncodedInput)]
    pub fn push_encoded_input(&mut self, json: &str) -> bool {
        self.inner.push_encoded_input(json)
    }

    /// Advance deterministic clock by `dt_ms` milliseconds.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) {
        self.inner.advance_ms(dt_ms);
    }

    /// Process pending inputs and advance one frame.
    pub fn step(&mut self) -> JsValue {
        if !self.inner.is_initialized() && self.inner.init().is_err() {
            let obj = Object::new();
            set_js(&obj, "ready", JsValue::from(false));
            set_js(&obj, "inputs_processed", JsValue::from(0u32));
            set_js(&obj, "frame_idx", JsValue::from(0u32));
            return obj.into();
        }
        let obj = Object::new();
        match self.inner.step() {
            Ok(result) => {
                set_js(&obj, "ready", JsValue::from(true));
                set_js(&obj, "inputs_processed", JsValue::from(result.inputs_processed));
                set_js(&obj, "frame_idx", JsValue::from(result.frame_idx as u32));
                set_js(&obj, "current_index", JsValue::from(result.current_index as u32));
                set_js(&obj, "transitioning", JsValue::from(result.transitioning));
            }
            Err(_) => {
                set_js(&obj, "ready", JsValue::from(false));
                set_js(&obj, "inputs_processed", JsValue::from(0u32));
                set_js(&obj, "frame_idx", JsValue::from(self.inner.frame_idx() as u32));
            }
        }
        obj.into()
    }

    /// Host commands issued since the last call, as a JSON array string.
    #[wasm_bindgen(js_name = takeCommands)]
    pub fn take_commands(&mut self) -> String {
        self.inner.take_commands_json()
    }

    /// Render signals of the last frame:
    /// `[barrierAngle, droneX, camX, camY, camZ, rotX, rotY, rotZ,
    ///   overlayVisible, overlayRotationY, overlayAlpha]`.
    #[wasm_bindgen(js_name = renderSignals)]
    pub fn render_signals(&self) -> Float32Array {
        Float32Array::from(&self.inner.render_signals()[..])
    }

    /// Current section index, or `-1` before init.
    #[wasm_bindgen(js_name = currentIndex)]
    pub fn current_index(&self) -> i32 {
        self.inner
            .current_index()
            .and_then(|i| i32::try_from(i).ok())
            .unwrap_or(-1)
    }
}
