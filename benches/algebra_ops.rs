use criterion::{black_box, criterion_group, criterion_main, Criterion};

use troika_trail_cores::sbox::sbox;
use troika_trail_cores::state::TroikaState;

fn sample_state() -> TroikaState {
    let mut s = TroikaState::ZERO;
    s.set_trit(0, 0, 0, 1);
    s.set_trit(4, 2, 13, 2);
    s.set_trit(8, 1, 26, 1);
    s
}

fn bench_linear_layer(c: &mut Criterion) {
    let s = sample_state();
    c.bench_function("l", |b| b.iter(|| black_box(s).l()));
    c.bench_function("inv_l", |b| b.iter(|| black_box(s).inv_l()));
}

fn bench_sbox_lookup(c: &mut Criterion) {
    let table = sbox();
    c.bench_function("transitions_from", |b| {
        b.iter(|| table.transitions_from(black_box(14)))
    });
}

criterion_group!(benches, bench_linear_layer, bench_sbox_lookup);
criterion_main!(benches);
