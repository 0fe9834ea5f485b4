#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use flipdeck_core::{DeckConfig, DeckInput, DeckOutput, DisplaySetup, PageLayout};
use flipdeck_web::step_deck::StepDeck;
use wasm_bindgen_test::wasm_bindgen_test;
use web_time::Duration;

fn ready() -> StepDeck {
    let mut driver = StepDeck::new(DeckConfig::default(), DisplaySetup::all("0,0"));
    driver.set_layout(PageLayout::stacked(4, 800.0, 800.0));
    driver.init().unwrap();
    driver
}

#[wasm_bindgen_test]
fn step_deck_runs_on_wasm() {
    let mut driver = ready();
    driver.push_input(DeckInput::DotClick(3));
    for _ in 0..70 {
        driver.advance_time(Duration::from_millis(16));
        driver.step().unwrap();
    }
    let outputs = driver.take_outputs();
    assert!(outputs.requests.contains(&DeckOutput::ActiveNav(3)));
    assert_eq!(outputs.frames_rendered, 70);
}

#[wasm_bindgen_test]
fn zero_dt_step_is_stable() {
    let mut driver = ready();
    let before = driver.step().unwrap();
    let after = driver.step().unwrap();
    assert_eq!(before.current_index, after.current_index);
    assert_eq!(after.dt, Duration::ZERO);
}
