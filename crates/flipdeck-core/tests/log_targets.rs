//! Structured log compliance: every state transition is reported under its
//! component target with the fields hosts filter on.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use flipdeck_core::logging::{TARGET_DECK, TARGET_FLIP, TARGET_METRIC, TARGET_NAV, TARGET_SCENE};
use flipdeck_core::metric::{DisplayGroup, DisplayId, MetricKind};
use flipdeck_core::{Deck, DeckConfig, DeckInput, DisplaySetup, PageLayout};
use tracing_subscriber::layer::SubscriberExt;
use web_time::Duration;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map_or("", String::as_str)
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_tracing<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: events.clone(),
    });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn find<'a>(events: &'a [CapturedEvent], target: &str, message: &str) -> Vec<&'a CapturedEvent> {
    events
        .iter()
        .filter(|e| e.target == target && e.message() == message)
        .collect()
}

fn new_deck(displays: DisplaySetup) -> Deck {
    Deck::new(
        DeckConfig::default(),
        PageLayout::stacked(4, 800.0, 800.0),
        displays,
    )
    .expect("default config is valid")
}

#[test]
fn explicit_jump_logs_full_lifecycle() {
    let events = with_captured_tracing(|| {
        let mut deck = new_deck(DisplaySetup::all("0,0"));
        deck.handle(DeckInput::DotClick(2));
        for _ in 0..80 {
            deck.advance(Duration::from_millis(16));
        }
    });

    let started = find(&events, TARGET_NAV, "jump started");
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].fields.get("to").map(String::as_str), Some("2"));
    assert_eq!(started[0].fields.get("sign").map(String::as_str), Some("1"));
    assert_eq!(started[0].level, tracing::Level::DEBUG);

    assert_eq!(find(&events, TARGET_FLIP, "flip started").len(), 1);
    let finished = find(&events, TARGET_FLIP, "flip finished");
    assert_eq!(finished.len(), 1);
    assert_eq!(
        finished[0].fields.get("committing").map(String::as_str),
        Some("true")
    );
    assert_eq!(find(&events, TARGET_NAV, "jump committed").len(), 1);
    assert_eq!(find(&events, TARGET_NAV, "transition settled").len(), 1);
    assert!(!find(&events, TARGET_SCENE, "scene mode applied").is_empty());
    assert!(!find(&events, TARGET_DECK, "scroll requested").is_empty());
}

#[test]
fn dropped_requests_log_at_debug() {
    let events = with_captured_tracing(|| {
        let mut deck = new_deck(DisplaySetup::all("0,0"));
        deck.handle(DeckInput::DotClick(1));
        deck.handle(DeckInput::DotClick(3));
    });
    let dropped = find(&events, TARGET_NAV, "navigation request dropped");
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].level, tracing::Level::DEBUG);
    assert_eq!(dropped[0].fields.get("requested").map(String::as_str), Some("3"));
    assert_eq!(
        dropped[0].fields.get("transitioning").map(String::as_str),
        Some("true")
    );
}

#[test]
fn missing_display_group_is_reported() {
    let only_mirror = DisplaySetup::none()
        .with(DisplayId::new(DisplayGroup::Mirror, MetricKind::Wait), "0,0");
    let events = with_captured_tracing(|| {
        let _deck = new_deck(only_mirror);
    });
    let skipped = find(&events, TARGET_METRIC, "metric group skipped: display missing");
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].fields.get("group").map(String::as_str), Some("Primary"));
}

#[test]
fn no_events_above_debug_in_normal_operation() {
    let events = with_captured_tracing(|| {
        let mut deck = new_deck(DisplaySetup::all("0,0"));
        for y in [0.0, 400.0, 900.0, 1700.0, 2400.0, 100.0] {
            deck.handle(DeckInput::Scroll { y });
            deck.advance(Duration::from_millis(16));
        }
        deck.handle(DeckInput::NavLinkClick(9));
    });
    assert!(!events.is_empty());
    assert!(
        events
            .iter()
            .all(|e| e.level >= tracing::Level::DEBUG),
        "unexpected info/warn/error events"
    );
}
