use phylogen::model::Tree;
use phylogen::newick::to_newick;
use phylogen::rng::{RngSession, Seed};
use phylogen::sampling::perturb_sampling_with;
use phylogen::simulation::TreeGeneratorBuilder;
use phylogen::{GenerationError, perturb_sampling};

fn tree() -> Tree {
    TreeGeneratorBuilder::new(1.0, 0.3)
        .with_min_leaves(40)
        .with_seed("sampling")
        .build()
        .unwrap()
        .generate()
        .unwrap()
}

#[test]
fn test_no_cutoff_is_noop() {
    let mut sampled = tree();
    assert_eq!(perturb_sampling(&mut sampled, None, None).unwrap(), 0);
    assert_eq!(to_newick(&sampled), to_newick(&tree()));
}

#[test]
fn test_zero_cutoff_keeps_everything() {
    let mut sampled = tree();
    let removed = perturb_sampling(&mut sampled, Some(0.0), Some(&Seed::from("zero"))).unwrap();
    assert_eq!(removed, 0);
    assert_eq!(sampled.num_leaves(), tree().num_leaves());
}

#[test]
fn test_full_cutoff_leaves_bare_root() {
    let mut sampled = tree();
    let leaves = sampled.num_leaves();
    let removed = perturb_sampling(&mut sampled, Some(1.0), Some(&Seed::from("all"))).unwrap();
    assert_eq!(removed, leaves);
    assert_eq!(sampled.num_vertices(), 1);
    assert!(sampled.is_valid());
}

#[test]
fn test_half_cutoff_removes_some_leaves() {
    let original = tree();
    let mut sampled = original.clone();
    let removed = perturb_sampling(&mut sampled, Some(0.5), Some(&Seed::from("half"))).unwrap();

    assert!(removed > 0);
    assert!(removed < original.num_leaves());
    assert_eq!(sampled.num_leaves() + removed, original.num_leaves());
    assert!(sampled.is_valid());

    // Surviving leaves keep their names and root distances
    let before = original.root_distances();
    let after = sampled.root_distances();
    for leaf in sampled.leaves() {
        let name = sampled[leaf].name().unwrap();
        let source = original
            .leaves()
            .into_iter()
            .find(|&l| original[l].name() == Some(name))
            .unwrap();
        assert!((after[leaf] - before[source]).abs() < 1e-9);
    }
}

#[test]
fn test_sampling_is_deterministic() {
    let mut a = tree();
    let mut b = tree();
    perturb_sampling(&mut a, Some(0.3), Some(&Seed::from(3u64))).unwrap();
    perturb_sampling(&mut b, Some(0.3), Some(&Seed::from(3u64))).unwrap();
    assert_eq!(to_newick(&a), to_newick(&b));
}

#[test]
fn test_shared_session() {
    let mut rng = RngSession::seeded(&Seed::from("shared"));
    let mut sampled = tree();
    let removed = perturb_sampling_with(&mut sampled, Some(0.25), &mut rng).unwrap();
    assert_eq!(sampled.num_leaves() + removed, tree().num_leaves());
}

#[test]
fn test_invalid_cutoff() {
    for cutoff in [-0.1, 1.5, f64::NAN] {
        let mut sampled = tree();
        let result = perturb_sampling(&mut sampled, Some(cutoff), None);
        assert!(matches!(result, Err(GenerationError::InvalidParameter { name: "sampling", .. })));
        assert_eq!(sampled.num_leaves(), tree().num_leaves());
    }
}
