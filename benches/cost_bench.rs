use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use teamforge::config::even_group_sizes;
use teamforge::optimizer::Optimizer;
use teamforge::partition::PartitionState;
use teamforge::population::{synthetic, ColumnSchema, RawTable};
use teamforge::scorer::{CostFunction, FairnessCost};

fn setup_state(count: usize, groups: usize) -> PartitionState {
    let categorical: Vec<String> = vec!["female".into(), "remote".into()];
    let continuous: Vec<String> = vec!["age".into(), "tenure".into()];

    let mut rng = fastrand::Rng::with_seed(42);
    let table: RawTable = synthetic::generate(&mut rng, count, &categorical, &continuous);
    let schema = ColumnSchema {
        identifier: "name".to_string(),
        categorical,
        continuous,
        fixed: None,
    };

    let pick = |a: usize, b: usize| vec![format!("person-{}", a), format!("person-{}", b)];
    let together = vec![pick(0, 1), pick(2, 3)];
    let separate = vec![pick(4, 5), pick(6, 7)];

    let mut state = PartitionState::from_table(&table, &schema, together, separate)
        .expect("Failed to build state");
    state.shuffle(Some(7));
    state
        .initialize(&even_group_sizes(count, groups).expect("Bad group count"))
        .expect("Failed to initialize");
    state
}

fn criterion_benchmark(c: &mut Criterion) {
    let state = setup_state(200, 8);
    let view = state.view().expect("Uninitialized state");

    c.bench_function("fairness_cost (200 entities, 8 groups)", |b| {
        b.iter(|| FairnessCost.evaluate(black_box(&view)))
    });

    c.bench_function("optimizer_step (200 entities, 8 groups)", |b| {
        let mut state = state.clone();
        let mut optimizer = Optimizer::with_seed(1);
        b.iter(|| optimizer.step(black_box(&mut state)).expect("Step failed"))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
