//! Tick and index rebuild throughput at several population sizes

use beings::simulation::Environment;
use beings::spatial::PositionIndex;
use beings::SimulationConfig;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

fn populated(count: usize) -> Environment {
    let config = SimulationConfig {
        width: 2000.0,
        height: 2000.0,
        initial_population: count,
        population_ceiling: count * 4,
        seed: Some(7),
        ..SimulationConfig::default()
    };
    let mut env = Environment::new(config).unwrap();
    env.populate_random().unwrap();
    env
}

fn bench_index_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_rebuild");

    for count in [100, 500, 1000, 2000].iter() {
        let env = populated(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| black_box(PositionIndex::build(env.beings())));
        });
    }

    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for count in [100, 500, 1000, 2000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &n| {
            b.iter_batched(
                || populated(n),
                |mut env| {
                    for _ in 0..10 {
                        black_box(env.update(0.01));
                    }
                    env
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_index_rebuild, bench_tick);
criterion_main!(benches);
