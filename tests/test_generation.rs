use phylogen::labels::LabelPolicy;
use phylogen::newick::to_newick;
use phylogen::simulation::{MAX_ATTEMPTS, Strategy, TreeGeneratorBuilder};
use phylogen::{GenerationError, TreeOptions, generate_tree, generate_tree_with};

const STRATEGIES: [Strategy; 2] = [Strategy::Standard, Strategy::Amortized];

// --- STOPPING CRITERIA ---
#[test]
fn test_max_time_extant_leaves_reach_max_time() {
    for strategy in STRATEGIES {
        let tree = TreeGeneratorBuilder::new(1.0, 0.5)
            .with_max_time(3.0)
            .with_strategy(strategy)
            .with_seed("max-time")
            .build()
            .unwrap()
            .generate()
            .unwrap();

        assert!(tree.is_valid());
        assert!(tree.num_extant_leaves() > 2);
        let distances = tree.root_distances();
        for leaf in tree.extant_leaves() {
            assert!(
                (distances[leaf] - 3.0).abs() < 1e-6,
                "{strategy}: leaf {leaf} at {}",
                distances[leaf]
            );
        }
        for leaf in tree.leaves() {
            assert!(distances[leaf] <= 3.0 + 1e-6);
        }
    }
}

#[test]
fn test_min_leaves_reached() {
    for strategy in STRATEGIES {
        for seed in 0..10u64 {
            let tree = TreeGeneratorBuilder::new(1.0, 0.5)
                .with_min_leaves(15)
                .with_strategy(strategy)
                .with_seed(seed)
                .build()
                .unwrap()
                .generate()
                .unwrap();
            assert!(tree.is_valid());
            assert!(tree.num_extant_leaves() >= 15);
            assert!(tree.num_leaves() >= 15);
        }
    }
}

#[test]
fn test_both_criteria_stop_at_first() {
    let tree = TreeGeneratorBuilder::new(1.0, 0.0)
        .with_min_leaves(1000)
        .with_max_time(2.0)
        .with_seed("both")
        .build()
        .unwrap()
        .generate()
        .unwrap();
    // Yule with rate 1 is far from 1000 leaves at time 2
    assert!(tree.num_extant_leaves() < 1000);
    assert!((tree.height() - 2.0).abs() < 1e-6);
}

// --- DETERMINISM ---
/// `generate_tree(1.0, 0.5, Some(5), None, Some("myseed"))`
const MYSEED_NEWICK: &str = "(L1:0.5667095088739353,(L2:0.9436069638261285,(L3:0.5551497538984028,\
(((L4:0.09641952496790203,L5:0.09641952496790203):1.4358003063279767,\
(L6:0.12088236794441028,L7:0.12088236794441028):1.4113374633514686):0.3201322563531822,\
L8:1.852352087649061):0.3535513619209904):0.3569646527542879):0.34500017355996443);";

#[test]
fn test_quick_api_is_deterministic() {
    let first = generate_tree(1.0, 0.5, Some(5), None, Some("myseed".into())).unwrap();
    let second = generate_tree(1.0, 0.5, Some(5), None, Some("myseed".into())).unwrap();
    assert_eq!(to_newick(&first), to_newick(&second));
    assert!(first.num_extant_leaves() >= 5);
    assert_eq!(to_newick(&first), MYSEED_NEWICK);
}

#[test]
fn test_named_options() {
    let seed = Some("myseed".into());
    let default = generate_tree_with(1.0, 0.5, Some(5), None, TreeOptions::default(), seed).unwrap();
    assert_eq!(to_newick(&default), MYSEED_NEWICK);

    let options = TreeOptions {
        labels: "none",
        polytomy: 0.5,
        prune: true,
        strategy: "fast",
    };
    let tree = generate_tree_with(1.0, 0.5, Some(8), None, options, Some("named".into())).unwrap();
    assert!(tree.is_valid());
    assert_eq!(tree.num_leaves(), tree.num_extant_leaves());
    assert!(tree.leaves().iter().all(|&leaf| tree[leaf].name().is_none()));
}

#[test]
fn test_unknown_option_names() {
    let labels = TreeOptions {
        labels: "XXX",
        ..TreeOptions::default()
    };
    let err = generate_tree_with(1.0, 0.5, Some(5), None, labels, None).unwrap_err();
    assert!(matches!(err, GenerationError::UnknownLabelPolicy(_)));
    assert!(err.is_configuration_error());

    let strategy = TreeOptions {
        strategy: "slow",
        ..TreeOptions::default()
    };
    let err = generate_tree_with(1.0, 0.5, Some(5), None, strategy, None).unwrap_err();
    assert!(matches!(err, GenerationError::UnknownStrategy(_)));
    assert!(err.is_configuration_error());
}

#[test]
fn test_determinism_per_strategy_and_policy() {
    let policies = [
        Some(LabelPolicy::Enumerated),
        Some(LabelPolicy::Human),
        Some(LabelPolicy::Biological),
        None,
    ];
    for strategy in STRATEGIES {
        for policy in policies {
            let build = || {
                let builder = TreeGeneratorBuilder::new(1.0, 0.4)
                    .with_min_leaves(12)
                    .with_strategy(strategy)
                    .with_seed("determinism");
                let builder = match policy {
                    Some(policy) => builder.with_labels(policy),
                    None => builder.without_labels(),
                };
                builder.build().unwrap().generate().unwrap()
            };
            assert_eq!(to_newick(&build()), to_newick(&build()), "{strategy} / {policy:?}");
        }
    }
}

#[test]
fn test_different_seeds_differ() {
    let a = generate_tree(1.0, 0.5, Some(20), None, Some(1u64.into())).unwrap();
    let b = generate_tree(1.0, 0.5, Some(20), None, Some(2u64.into())).unwrap();
    assert_ne!(to_newick(&a), to_newick(&b));
}

#[test]
fn test_unseeded_generation_works() {
    let tree = generate_tree(1.0, 0.5, Some(6), None, None).unwrap();
    assert!(tree.num_extant_leaves() >= 6);
}

// --- YULE, POLYTOMIES, PRUNING ---
#[test]
fn test_yule_never_dies() {
    for strategy in STRATEGIES {
        for seed in 0..20u64 {
            let tree = TreeGeneratorBuilder::new(1.0, 0.0)
                .with_min_leaves(10)
                .with_strategy(strategy)
                .with_seed(seed)
                .build()
                .unwrap()
                .generate()
                .unwrap();
            assert_eq!(tree.num_extant_leaves(), tree.num_leaves());
            assert_eq!(tree.num_extant_leaves(), 10);
            assert!(tree.is_ultrametric());
            // Strictly binary without polytomies
            for vertex in tree.vertices().iter().filter(|v| v.is_internal()) {
                assert_eq!(vertex.children().len(), 2);
            }
        }
    }
}

#[test]
fn test_polytomies_appear() {
    let tree = TreeGeneratorBuilder::new(1.0, 0.0)
        .with_min_leaves(60)
        .with_polytomy(3.0)
        .with_seed("polytomy")
        .build()
        .unwrap()
        .generate()
        .unwrap();
    assert!(tree.is_valid());
    assert!(
        tree.vertices()
            .iter()
            .any(|v| v.children().len() > 2)
    );
}

#[test]
fn test_pruning_removes_extinct_and_keeps_distances() {
    for strategy in STRATEGIES {
        let unpruned = TreeGeneratorBuilder::new(1.0, 0.6)
            .with_max_time(4.0)
            .with_strategy(strategy)
            .with_seed("prune")
            .build()
            .unwrap()
            .generate()
            .unwrap();
        let pruned = TreeGeneratorBuilder::new(1.0, 0.6)
            .with_max_time(4.0)
            .with_strategy(strategy)
            .with_seed("prune")
            .with_pruning()
            .build()
            .unwrap()
            .generate()
            .unwrap();

        assert!(pruned.is_valid());
        assert!(pruned.vertices().iter().all(|v| !v.is_extinct()));
        assert_eq!(pruned.num_leaves(), unpruned.num_extant_leaves());
        for vertex in pruned.vertices().iter().filter(|v| v.is_internal()) {
            assert!(vertex.children().len() >= 2);
        }

        let distances = pruned.root_distances();
        for leaf in pruned.leaves() {
            assert!((distances[leaf] - 4.0).abs() < 1e-6);
        }
    }
}

#[test]
fn test_pruned_labels_cover_extant_leaves() {
    let tree = TreeGeneratorBuilder::new(1.0, 0.5)
        .with_min_leaves(9)
        .with_pruning()
        .with_seed("labels")
        .build()
        .unwrap()
        .generate()
        .unwrap();
    for leaf in tree.leaves() {
        assert!(tree[leaf].name().is_some());
    }
}

// --- ERRORS ---
#[test]
fn test_missing_stopping_criterion() {
    let result = TreeGeneratorBuilder::new(1.0, 0.5).build();
    assert!(matches!(result, Err(GenerationError::MissingStoppingCriterion)));
    let result = generate_tree(1.0, 0.5, None, None, None);
    assert!(matches!(result, Err(GenerationError::MissingStoppingCriterion)));
}

#[test]
fn test_invalid_parameters() {
    let cases = [
        TreeGeneratorBuilder::new(0.0, 0.5).with_min_leaves(5).build(),
        TreeGeneratorBuilder::new(1.0, -0.5).with_min_leaves(5).build(),
        TreeGeneratorBuilder::new(f64::NAN, 0.5).with_min_leaves(5).build(),
        TreeGeneratorBuilder::new(1.0, 0.5).with_min_leaves(0).build(),
        TreeGeneratorBuilder::new(1.0, 0.5).with_max_time(-1.0).build(),
        TreeGeneratorBuilder::new(1.0, 0.5).with_min_leaves(5).with_polytomy(-1.0).build(),
        TreeGeneratorBuilder::new(1.0, 0.5).with_min_leaves(5).with_max_attempts(0).build(),
    ];
    for result in cases {
        let err = result.unwrap_err();
        assert!(matches!(err, GenerationError::InvalidParameter { .. }), "{err}");
        assert!(err.is_configuration_error());
    }
}

#[test]
fn test_unknown_strategy() {
    assert_eq!("fast".parse::<Strategy>().unwrap(), Strategy::Amortized);
    assert_eq!("amortized".parse::<Strategy>().unwrap(), Strategy::Amortized);
    assert_eq!("standard".parse::<Strategy>().unwrap(), Strategy::Standard);
    assert!(matches!(
        "slow".parse::<Strategy>(),
        Err(GenerationError::UnknownStrategy(name)) if name == "slow"
    ));
}

#[test]
fn test_exhaustion() {
    let result = TreeGeneratorBuilder::new(1.0, 100.0)
        .with_min_leaves(5)
        .with_max_attempts(5)
        .with_seed("doomed")
        .build()
        .unwrap()
        .generate();
    let err = result.unwrap_err();
    assert!(matches!(err, GenerationError::Exhausted { attempts: 5 }));
    assert!(!err.is_configuration_error());
}

#[test]
fn test_default_attempt_budget() {
    assert_eq!(MAX_ATTEMPTS, 3000);
}
