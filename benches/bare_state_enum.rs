use criterion::{criterion_group, criterion_main, Criterion};

use troika_trail_cores::bare_state::enumerate_bare_states;
use troika_trail_cores::mixed_state::enumerate_in_kernel_pairs;

fn bench_bare_state_enumeration(c: &mut Criterion) {
    c.bench_function("enumerate_bare_states budget=8", |b| {
        b.iter(|| enumerate_bare_states(1, 1, 8).take(200).count())
    });
}

fn bench_mixed_state_enumeration(c: &mut Criterion) {
    c.bench_function("enumerate_in_kernel_pairs budget=8", |b| {
        b.iter(|| enumerate_in_kernel_pairs(1, 1, 8).take(200).count())
    });
}

criterion_group!(benches, bench_bare_state_enumeration, bench_mixed_state_enumeration);
criterion_main!(benches);
