use criterion::{criterion_group, criterion_main, Criterion};
use lumi_pmf::{discretize, DiscretePmf, InteractionPmfTable, MixtureConfig};

fn sample_source() -> DiscretePmf {
    discretize(
        |x| (-0.272581 - 1.933719 * x).exp() + (-2.107228 - 0.198227 * x).exp(),
        -0.5,
        19.5,
    )
    .unwrap()
}

fn bench_table_build(c: &mut Criterion) {
    let source = sample_source();
    let config = MixtureConfig {
        max_measurements: 200,
        max_interactions: 80,
    };
    c.bench_function("table_build", |b| {
        b.iter(|| {
            let _ = InteractionPmfTable::build(&source, &config).unwrap();
        })
    });
}

fn bench_poisson_mixture(c: &mut Criterion) {
    let source = sample_source();
    let config = MixtureConfig {
        max_measurements: 200,
        max_interactions: 80,
    };
    let table = InteractionPmfTable::build(&source, &config).unwrap();
    c.bench_function("poisson_mixture", |b| {
        b.iter(|| {
            let _ = table.poisson_mixture(12.4).unwrap();
        })
    });
}

criterion_group!(benches, bench_table_build, bench_poisson_mixture);
criterion_main!(benches);
