//! Phylogen generates random phylogenetic trees under birth-death
//! processes and evolves discrete characters along them.
//!
//! Core functionality provided:
//! - Simulation: birth-death (or Yule) trees stopped after a minimum number
//!   of extant leaves and/or a maximum time, optionally with polytomies and
//!   with extinct lineages pruned. Two strategies are available, see
//!   [`simulation::Strategy`].
//! - Retry driver: failed attempts (total extinction, at most two extant
//!   leaves) are retried deterministically, up to
//!   [`MAX_ATTEMPTS`](simulation::MAX_ATTEMPTS) times.
//! - Labels: enumerated, human-like or binomial species names, see [`labels`].
//! - Characters: per-character mutation and optional horizontal gene
//!   transfer, see [`characters`].
//! - Sampling: random removal of leaves, see [`sampling`].
//! - Output: Newick (plain or canonically sorted), NEXUS with a binary
//!   character matrix, and CSV wordlists.
//! - Reproducibility: all draws flow through an explicit [`rng::RngSession`]
//!   seeded from a user seed, so the same seed gives the same tree.
//!
//! The tree model uses the arena pattern: vertices are addressed by index,
//! see [`model`].
//!
//! # Usage patterns
//! 1. Quick functions with default settings: [`generate_tree`],
//!    [`evolve_characters`] and [`perturb_sampling`]. [`generate_tree_with`]
//!    takes the label policy and strategy by name.
//! 2. Configure a generator with
//!    [`TreeGeneratorBuilder`](simulation::TreeGeneratorBuilder) for full
//!    control over labels, polytomies, pruning, strategy and seed.
//!
//! ## Example Default Configuration
//! ```
//! use phylogen::generate_tree;
//!
//! let tree = generate_tree(1.0, 0.5, Some(5), None, Some("myseed".into()))?;
//! assert!(tree.num_extant_leaves() >= 5);
//! println!("{}", phylogen::newick::to_newick(&tree));
//! # Ok::<(), phylogen::GenerationError>(())
//! ```
//!
//! ## Example Generator Configuration
//! ```
//! use phylogen::characters::CharacterModel;
//! use phylogen::labels::LabelPolicy;
//! use phylogen::simulation::{Strategy, TreeGeneratorBuilder};
//!
//! let mut tree = TreeGeneratorBuilder::new(1.0, 0.25)
//!     .with_max_time(3.0)
//!     .with_min_leaves(10)
//!     .with_labels(LabelPolicy::Biological)
//!     .with_polytomy(0.5)
//!     .with_pruning()
//!     .with_strategy(Strategy::Amortized)
//!     .with_seed(42u64)
//!     .build()?
//!     .generate()?;
//!
//! let model = CharacterModel::new(20, 5.0, 1.0).with_decay(1.05);
//! phylogen::evolve_characters(&mut tree, &model, Some(&42u64.into()))?;
//! let nexus = phylogen::nexus::to_nexus(&tree)?;
//! assert!(nexus.starts_with("#NEXUS"));
//! # Ok::<(), phylogen::GenerationError>(())
//! ```

pub mod characters;
pub mod config;
pub mod error;
pub mod labels;
pub mod model;
pub mod newick;
pub mod nexus;
pub mod rng;
pub mod sampling;
pub mod simulation;
pub mod wordlist;

pub use crate::error::GenerationError;
pub use crate::sampling::perturb_sampling;

use crate::characters::CharacterModel;
use crate::labels::LabelPolicy;
use crate::model::Tree;
use crate::rng::Seed;
use crate::simulation::{Strategy, TreeGeneratorBuilder};

// ============================================================================
// Quick Generation API
// ============================================================================
/// Generates a birth-death tree with birth rate `birth` and death rate
/// `death`, using default settings: enumerated labels, no polytomies, no
/// pruning and the standard strategy.
///
/// At least one of `min_leaves` and `max_time` must be given.
/// See [`generate_tree_with`] for named labels and strategies, and
/// [`TreeGeneratorBuilder`] for full control.
///
/// # Errors
/// * [`GenerationError::MissingStoppingCriterion`] if neither criterion is given
/// * [`GenerationError::InvalidParameter`] for out-of-range values
/// * [`GenerationError::Exhausted`] if no valid tree was obtained
pub fn generate_tree(
    birth: f64,
    death: f64,
    min_leaves: Option<usize>,
    max_time: Option<f64>,
    seed: Option<Seed>,
) -> Result<Tree, GenerationError> {
    generate_tree_with(birth, death, min_leaves, max_time, TreeOptions::default(), seed)
}

/// Optional generation settings, with label policy and strategy given by name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeOptions<'a> {
    /// `enum`, `human`, `bio` or `none`
    pub labels: &'a str,
    /// Poisson mean of extra children per speciation
    pub polytomy: f64,
    pub prune: bool,
    /// `standard`, or `fast` / `amortized`
    pub strategy: &'a str,
}

impl Default for TreeOptions<'_> {
    fn default() -> Self {
        TreeOptions {
            labels: "enum",
            polytomy: 0.0,
            prune: false,
            strategy: "standard",
        }
    }
}

/// Generates a birth-death tree like [`generate_tree`], with labels,
/// polytomies, pruning and strategy taken from `options`.
///
/// # Errors
/// * [`GenerationError::UnknownLabelPolicy`] for an unrecognized label policy
/// * [`GenerationError::UnknownStrategy`] for an unrecognized strategy
/// * otherwise as [`generate_tree`]
pub fn generate_tree_with(
    birth: f64,
    death: f64,
    min_leaves: Option<usize>,
    max_time: Option<f64>,
    options: TreeOptions<'_>,
    seed: Option<Seed>,
) -> Result<Tree, GenerationError> {
    let labels = LabelPolicy::parse_optional(options.labels)?;
    let strategy: Strategy = options.strategy.parse()?;

    let mut builder = TreeGeneratorBuilder::new(birth, death)
        .with_polytomy(options.polytomy)
        .with_strategy(strategy);
    builder = match labels {
        Some(policy) => builder.with_labels(policy),
        None => builder.without_labels(),
    };
    if options.prune {
        builder = builder.with_pruning();
    }
    if let Some(min_leaves) = min_leaves {
        builder = builder.with_min_leaves(min_leaves);
    }
    if let Some(max_time) = max_time {
        builder = builder.with_max_time(max_time);
    }
    if let Some(seed) = seed {
        builder = builder.with_seed(seed);
    }
    builder.build()?.generate()
}

// ============================================================================
// Quick Character API
// ============================================================================
/// Evolves characters over `tree` according to `model`.
///
/// See [`CharacterModel::evolve`] for full documentation.
pub fn evolve_characters<'t>(
    tree: &'t mut Tree,
    model: &CharacterModel,
    seed: Option<&Seed>,
) -> Result<&'t mut Tree, GenerationError> {
    model.evolve(tree, seed)
}
