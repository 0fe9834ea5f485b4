#![no_main]

use arbitrary::Arbitrary;
use flipdeck_core::{
    Deck, DeckConfig, DeckInput, DisplaySetup, NavKey, PageLayout, SectionBounds,
};
use libfuzzer_sys::fuzz_target;
use web_time::Duration;

#[derive(Debug, Arbitrary)]
enum Op {
    Scroll(f32),
    Resize(u16, u16),
    Relayout(Vec<(u16, u16)>),
    Next,
    Previous,
    Dot(u8),
    NavLink(u8),
    Intersection(u8, u8),
    Frame(u16),
}

#[derive(Debug, Arbitrary)]
struct Session {
    sections: u8,
    section_height: u16,
    ops: Vec<Op>,
}

fuzz_target!(|session: Session| {
    let count = usize::from(session.sections % 12);
    let height = f64::from(session.section_height.max(1));
    let Ok(mut deck) = Deck::new(
        DeckConfig::default(),
        PageLayout::stacked(count, height, height),
        DisplaySetup::all("0,0"),
    ) else {
        return;
    };

    for op in session.ops {
        let input = match op {
            Op::Scroll(y) => DeckInput::Scroll { y: f64::from(y) },
            Op::Resize(vh, dh) => DeckInput::Resize {
                viewport_height: f64::from(vh),
                document_height: f64::from(dh),
            },
            Op::Relayout(bounds) => DeckInput::Layout(
                bounds
                    .into_iter()
                    .map(|(top, h)| SectionBounds::new(f64::from(top), f64::from(h)))
                    .collect(),
            ),
            Op::Next => DeckInput::Key(NavKey::Next),
            Op::Previous => DeckInput::Key(NavKey::Previous),
            Op::Dot(i) => DeckInput::DotClick(usize::from(i)),
            Op::NavLink(i) => DeckInput::NavLinkClick(usize::from(i)),
            Op::Intersection(i, r) => DeckInput::Intersection {
                index: usize::from(i),
                ratio: f64::from(r) / 255.0,
            },
            Op::Frame(ms) => {
                deck.advance(Duration::from_millis(u64::from(ms)));
                continue;
            }
        };
        deck.handle(input);

        // Post-conditions that must always hold:
        if count > 0 {
            assert!(deck.current_index() < count, "current index OOB");
        }
        let signals = deck.signals();
        assert!(signals.drone_target_x.is_finite(), "drone target not finite");
        assert!((0.0..=1.0).contains(&signals.overlay.alpha), "overlay alpha OOB");
    }
    let _ = deck.take_outputs();
});
