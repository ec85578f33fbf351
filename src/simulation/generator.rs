//! Configurable tree generator with a bounded, deterministic retry driver.
//!
//! A [`TreeGenerator`] is configured with [`TreeGeneratorBuilder`] and then
//! produces trees with [`TreeGenerator::generate`]:
//!
//! ```
//! use phylogen::labels::LabelPolicy;
//! use phylogen::simulation::{Strategy, TreeGeneratorBuilder};
//!
//! let generator = TreeGeneratorBuilder::new(1.0, 0.5)
//!     .with_min_leaves(8)
//!     .with_labels(LabelPolicy::Enumerated)
//!     .with_strategy(Strategy::Amortized)
//!     .with_seed("myseed")
//!     .build()?;
//!
//! let tree = generator.generate()?;
//! assert!(tree.num_extant_leaves() >= 8);
//! # Ok::<(), phylogen::GenerationError>(())
//! ```
//!
//! # Retry protocol
//! Every attempt seeds a fresh session from the *current* seed and draws a
//! single uniform number from it, which becomes the seed of the attempt.
//! A failed attempt (total extinction, or at most two extant leaves) makes
//! its seed the current seed. The same initial seed therefore always yields
//! the same chain of attempt seeds and the same tree. Without an initial
//! seed, the first session draws from operating system entropy.

use crate::error::GenerationError;
use crate::labels::{self, LabelPolicy};
use crate::model::Tree;
use crate::rng::{RngSession, Seed};
use crate::simulation::rates::RateModel;
use crate::simulation::{AttemptOutcome, SimulationParams, StoppingCriteria, Strategy, run_attempt};
use tracing::{debug, warn};

/// Maximum number of attempts before giving up with [`GenerationError::Exhausted`].
pub const MAX_ATTEMPTS: usize = 3000;

// =#========================================================================#=
// BUILDER
// =#========================================================================#=
/// Builder for a [`TreeGenerator`].
///
/// Defaults: enumerated labels, no polytomies, no pruning,
/// [`Strategy::Standard`], no seed, [`MAX_ATTEMPTS`] attempts.
/// At least one of [`with_min_leaves`](Self::with_min_leaves) and
/// [`with_max_time`](Self::with_max_time) must be set.
#[derive(Debug, Clone)]
pub struct TreeGeneratorBuilder {
    birth: f64,
    death: f64,
    min_leaves: Option<usize>,
    max_time: Option<f64>,
    labels: Option<LabelPolicy>,
    polytomy: f64,
    prune: bool,
    strategy: Strategy,
    seed: Option<Seed>,
    max_attempts: usize,
}

impl TreeGeneratorBuilder {
    /// Creates a builder for the given birth rate λ and death rate μ.
    pub fn new(birth: f64, death: f64) -> Self {
        TreeGeneratorBuilder {
            birth,
            death,
            min_leaves: None,
            max_time: None,
            labels: Some(LabelPolicy::Enumerated),
            polytomy: 0.0,
            prune: false,
            strategy: Strategy::Standard,
            seed: None,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    /// Stops the simulation once this many extant leaves exist.
    pub fn with_min_leaves(mut self, min_leaves: usize) -> Self {
        self.min_leaves = Some(min_leaves);
        self
    }

    /// Stops the simulation at this time; extant leaves are extended up to it.
    pub fn with_max_time(mut self, max_time: f64) -> Self {
        self.max_time = Some(max_time);
        self
    }

    /// Names leaves according to the given policy (default: enumerated).
    pub fn with_labels(mut self, policy: LabelPolicy) -> Self {
        self.labels = Some(policy);
        self
    }

    /// Leaves the leaves of generated trees unnamed.
    pub fn without_labels(mut self) -> Self {
        self.labels = None;
        self
    }

    /// Sets the Poisson rate of extra children per birth event (default 0).
    pub fn with_polytomy(mut self, lambda: f64) -> Self {
        self.polytomy = lambda;
        self
    }

    /// Removes extinct lineages from generated trees.
    pub fn with_pruning(mut self) -> Self {
        self.prune = true;
        self
    }

    /// Sets the generation strategy (default: [`Strategy::Standard`]).
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Seeds the generator, making [`TreeGenerator::generate`] deterministic.
    pub fn with_seed<S: Into<Seed>>(mut self, seed: S) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Limits the number of attempts (default [`MAX_ATTEMPTS`]).
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Validates the configuration and builds the generator.
    ///
    /// # Errors
    /// * [`GenerationError::MissingStoppingCriterion`] without minimum leaves and maximum time
    /// * [`GenerationError::InvalidParameter`] for out-of-range rates, times or counts
    pub fn build(self) -> Result<TreeGenerator, GenerationError> {
        let stopping = StoppingCriteria::new(self.min_leaves, self.max_time)?;
        let rates = RateModel::new(self.birth, self.death, self.polytomy)?;
        if self.max_attempts == 0 {
            return Err(GenerationError::invalid("max_attempts", "must be at least 1"));
        }

        Ok(TreeGenerator {
            params: SimulationParams {
                rates,
                stopping,
                prune: self.prune,
            },
            strategy: self.strategy,
            labels: self.labels,
            seed: self.seed,
            max_attempts: self.max_attempts,
        })
    }
}

// =#========================================================================#=
// GENERATOR
// =#========================================================================#=
/// A validated generator configuration, see [`TreeGeneratorBuilder`].
#[derive(Debug, Clone)]
pub struct TreeGenerator {
    params: SimulationParams,
    strategy: Strategy,
    labels: Option<LabelPolicy>,
    seed: Option<Seed>,
    max_attempts: usize,
}

impl TreeGenerator {
    /// Returns the rate model of this generator.
    pub fn rates(&self) -> &RateModel {
        &self.params.rates
    }

    /// Returns the stopping criteria of this generator.
    pub fn stopping(&self) -> &StoppingCriteria {
        &self.params.stopping
    }

    /// Returns the generation strategy of this generator.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Generates a tree, retrying failed attempts.
    ///
    /// # Errors
    /// Returns [`GenerationError::Exhausted`] if no attempt within the budget
    /// produced a tree with more than two extant leaves.
    pub fn generate(&self) -> Result<Tree, GenerationError> {
        let mut current = self.seed.clone();

        for attempt in 1..=self.max_attempts {
            let attempt_seed = Seed::Float(RngSession::new(current.as_ref()).uniform());
            let mut rng = RngSession::seeded(&attempt_seed);

            match run_attempt(self.strategy, &self.params, &mut rng) {
                AttemptOutcome::Complete(mut tree) => {
                    if let Some(policy) = self.labels {
                        let mut label_rng = RngSession::seeded(&attempt_seed);
                        labels::label_leaves(&mut tree, policy, &mut label_rng);
                    }
                    debug!(
                        attempt,
                        seed = %attempt_seed,
                        leaves = tree.num_leaves(),
                        "Generated tree"
                    );
                    return Ok(tree);
                }
                outcome => {
                    debug!(attempt, seed = %attempt_seed, outcome = outcome.describe(), "Discarding attempt");
                    current = Some(attempt_seed);
                }
            }
        }

        warn!(attempts = self.max_attempts, "No valid tree within attempt budget");
        Err(GenerationError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}
