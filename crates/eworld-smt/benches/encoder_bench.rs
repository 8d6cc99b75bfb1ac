use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eworld_ir::grid::Dimension;
use eworld_ir::variables::VariableSpace;

fn space(side: u32) -> VariableSpace {
    VariableSpace::new(Dimension::new(side).unwrap())
}

fn bench_encode_world_small(c: &mut Criterion) {
    let vs = space(8);
    c.bench_function("encode_world_8x8", |b| {
        b.iter(|| eworld_smt::encoder::encode_world(black_box(&vs)))
    });
}

fn bench_encode_world_large(c: &mut Criterion) {
    let vs = space(64);
    c.bench_function("encode_world_64x64", |b| {
        b.iter(|| eworld_smt::encoder::encode_world(black_box(&vs)))
    });
}

criterion_group!(benches, bench_encode_world_small, bench_encode_world_large);
criterion_main!(benches);
