//! Sender loop hot path benchmarks.
//!
//! Measures the per-cycle work a session does between sleeps:
//! - Picking the next action
//! - Encoding the resulting message to a text frame
//!
//! Run with: cargo bench --bench behavior
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use guest_swarm::session::random_name;
use guest_swarm::{Action, Behavior, ClientMessage};
use rand::SeedableRng;
use rand::rngs::StdRng;

// ============================================================================
// Benchmark: Action Selection
// ============================================================================

fn bench_next_action(c: &mut Criterion) {
    let behavior = Behavior::default();
    let mut rng = StdRng::seed_from_u64(0);

    c.bench_function("next_action", |b| {
        b.iter(|| black_box(behavior.next_action(&mut rng)));
    });

    c.bench_function("random_name", |b| {
        b.iter(|| black_box(random_name(&mut rng)));
    });
}

// ============================================================================
// Benchmark: Message Encoding
// ============================================================================

fn bench_cycle_encode(c: &mut Criterion) {
    let behavior = Behavior::default();
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("cycle_encode", |b| {
        b.iter(|| {
            let message = match behavior.next_action(&mut rng) {
                Action::Guess(choice) => ClientMessage::SetGuess(choice),
                Action::RemoveName => ClientMessage::RemoveName,
            };
            black_box(message.to_frame())
        });
    });
}

criterion_group!(benches, bench_next_action, bench_cycle_encode);
criterion_main!(benches);
