use criterion::{Criterion, criterion_group, criterion_main};
use phylogen::characters::CharacterModel;
use phylogen::labels::LabelPolicy;
use phylogen::simulation::{Strategy, TreeGeneratorBuilder};
use std::hint::black_box;

const LEAF_COUNTS: &[(&str, usize)] = &[("n50", 50), ("n200", 200), ("n1000", 1000)];

fn generate(strategy: Strategy, min_leaves: usize) {
    let tree = TreeGeneratorBuilder::new(1.0, 0.5)
        .with_min_leaves(min_leaves)
        .with_labels(LabelPolicy::Enumerated)
        .with_strategy(strategy)
        .with_seed("bench")
        .build()
        .unwrap()
        .generate()
        .unwrap();
    black_box(tree);
}

fn simulation(c: &mut Criterion) {
    for (name, min_leaves) in LEAF_COUNTS {
        c.bench_function(&format!("standard/{name}"), |b| {
            b.iter(|| generate(Strategy::Standard, *min_leaves));
        });
        c.bench_function(&format!("fast/{name}"), |b| {
            b.iter(|| generate(Strategy::Amortized, *min_leaves));
        });
    }
}

fn characters(c: &mut Criterion) {
    let tree = TreeGeneratorBuilder::new(1.0, 0.5)
        .with_min_leaves(100)
        .with_pruning()
        .with_seed("bench")
        .build()
        .unwrap()
        .generate()
        .unwrap();
    let mutation_only = CharacterModel::new(100, 5.0, 1.0).with_decay(1.05);
    let with_hgt = mutation_only.clone().with_hgt(2.0, 1.1);

    c.bench_function("characters/mutation", |b| {
        b.iter(|| {
            let mut tree = tree.clone();
            mutation_only.evolve(&mut tree, Some(&"bench".into())).unwrap();
            black_box(tree);
        });
    });
    c.bench_function("characters/hgt", |b| {
        b.iter(|| {
            let mut tree = tree.clone();
            with_hgt.evolve(&mut tree, Some(&"bench".into())).unwrap();
            black_box(tree);
        });
    });
}

criterion_group!(regression, simulation);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = characters
}
criterion_main!(regression, reporting);
