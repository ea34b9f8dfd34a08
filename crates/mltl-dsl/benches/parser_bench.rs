use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SMALL: &str = "F[0,2](a & b) | G[1,3]!c";
const NESTED: &str = "(a U[0,3] (b R[1,4] F[0,2](c & !d))) & G[0,5](p | q U[2,6] r)";

fn long_chain() -> String {
    (0..256)
        .map(|i| format!("x{i}"))
        .collect::<Vec<_>>()
        .join(" & ")
}

fn bench_parse_small(c: &mut Criterion) {
    c.bench_function("parse_small", |b| {
        b.iter(|| mltl_dsl::parse(black_box(SMALL)).unwrap())
    });
}

fn bench_parse_nested(c: &mut Criterion) {
    c.bench_function("parse_nested", |b| {
        b.iter(|| mltl_dsl::parse(black_box(NESTED)).unwrap())
    });
}

fn bench_parse_chain(c: &mut Criterion) {
    let chain = long_chain();
    c.bench_function("parse_chain_256", |b| {
        b.iter(|| mltl_dsl::parse(black_box(&chain)).unwrap())
    });
}

criterion_group!(benches, bench_parse_small, bench_parse_nested, bench_parse_chain);
criterion_main!(benches);
