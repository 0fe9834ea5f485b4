//! Benchmarks for the per-frame deck path.
//!
//! Run with: cargo bench -p flipdeck-core --bench deck_tick_bench
//!
//! The frame budget at 90 fps is ~11 ms; the deck tick should stay in the
//! low microseconds even while a flip and six counters run concurrently.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use flipdeck_core::render::NullRenderer;
use flipdeck_core::{Deck, DeckConfig, DeckInput, DisplaySetup, PageLayout};
use web_time::Duration;

const FRAME: Duration = Duration::from_nanos(11_111_111);

fn new_deck(sections: usize) -> Deck {
    let mut deck = Deck::new(
        DeckConfig::default(),
        PageLayout::stacked(sections, 800.0, 800.0),
        DisplaySetup::all("0,0"),
    )
    .expect("default config is valid");
    deck.take_outputs();
    deck
}

fn bench_idle_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("deck/frame");

    group.bench_function("idle", |b| {
        let mut deck = new_deck(4);
        let mut renderer = NullRenderer;
        b.iter(|| {
            deck.frame(black_box(FRAME), &mut renderer);
            black_box(deck.take_outputs())
        })
    });

    group.bench_function("flip_and_counters", |b| {
        b.iter_batched(
            || {
                let mut deck = new_deck(4);
                deck.handle(DeckInput::Scroll { y: 2400.0 });
                deck
            },
            |mut deck| {
                let mut renderer = NullRenderer;
                for _ in 0..80 {
                    deck.frame(FRAME, &mut renderer);
                }
                black_box(deck.take_outputs())
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_scroll_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("deck/scroll");

    for sections in [4usize, 32] {
        group.bench_function(format!("sweep_{sections}_sections"), |b| {
            let mut deck = new_deck(sections);
            let max = (sections as f64 - 1.0) * 800.0;
            b.iter(|| {
                let mut y = 0.0;
                while y <= max {
                    deck.handle(DeckInput::Scroll { y: black_box(y) });
                    y += 97.0;
                }
                black_box(deck.take_outputs())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_idle_frame, bench_scroll_scan);
criterion_main!(benches);
