use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mltl_dsl::ast::Formula;
use mltl_smt::backends::varisat_backend::VarisatSolver;
use mltl_smt::encoder::{encode_formulas, DEFAULT_MAX_HORIZON};
use mltl_smt::solver::SmtSolver;

fn parse_all(sources: &[&str]) -> Vec<Formula> {
    sources.iter().map(|s| mltl_dsl::parse(s).unwrap()).collect()
}

fn bench_encode_wide_windows(c: &mut Criterion) {
    let formulas = parse_all(&["G[0,64](a | b)", "F[0,64](!a & !b)"]);
    c.bench_function("encode_wide_windows", |b| {
        b.iter(|| encode_formulas(black_box(&formulas), DEFAULT_MAX_HORIZON).unwrap())
    });
}

fn bench_encode_until_release(c: &mut Criterion) {
    let formulas = parse_all(&["a U[0,32] b", "c R[0,32] (a | d)"]);
    c.bench_function("encode_until_release_32", |b| {
        b.iter(|| encode_formulas(black_box(&formulas), DEFAULT_MAX_HORIZON).unwrap())
    });
}

fn bench_varisat_check(c: &mut Criterion) {
    let formulas = parse_all(&["G[0,16](a U[0,4] b)", "F[0,16]G[0,4]!b", "G[0,20](a | c)"]);
    let encoding = encode_formulas(&formulas, DEFAULT_MAX_HORIZON).unwrap();
    c.bench_function("varisat_check_nested", |b| {
        b.iter(|| {
            let mut solver = VarisatSolver::new();
            encoding.assert_into(&mut solver).unwrap();
            solver.check_sat().unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_encode_wide_windows,
    bench_encode_until_release,
    bench_varisat_check
);
criterion_main!(benches);
