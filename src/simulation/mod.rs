//! Birth-death tree simulation.
//!
//! Trees grow from a single root under a continuous-time birth-death (or,
//! with death rate 0, Yule) process until a stopping criterion is met.
//! Two interchangeable strategies are provided:
//! * [`Strategy::Standard`] - recomputes the extant leaves by traversal after every event
//! * [`Strategy::Amortized`] - maintains the extant leaves incrementally and
//!   finalizes branch lengths lazily
//!
//! Both share the same external contract but consume random draws
//! differently, so the same seed yields different trees.
//!
//! Individual attempts may fail (total extinction, or at most two extant
//! leaves); the [`TreeGenerator`] retries them with deterministically derived
//! seeds, see [`generator`].

mod amortized;
pub mod generator;
pub mod rates;
mod standard;

pub use generator::{MAX_ATTEMPTS, TreeGenerator, TreeGeneratorBuilder};
pub use rates::RateModel;

use crate::error::GenerationError;
use crate::model::Tree;
use crate::rng::RngSession;
use std::fmt;
use std::str::FromStr;

// =#========================================================================#=
// STRATEGY
// =#========================================================================#=
/// Algorithm used to grow a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Recomputes the extant leaves by full traversal after every event.
    #[default]
    Standard,
    /// Maintains the extant leaves incrementally, storing creation times in
    /// branch lengths until a vertex stops being extant.
    Amortized,
}

impl FromStr for Strategy {
    type Err = GenerationError;

    /// Parses `standard`, or `fast` / `amortized` (case-insensitive).
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "standard" => Ok(Strategy::Standard),
            "fast" | "amortized" => Ok(Strategy::Amortized),
            _ => Err(GenerationError::UnknownStrategy(name.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Standard => write!(f, "standard"),
            Strategy::Amortized => write!(f, "fast"),
        }
    }
}

// =#========================================================================#=
// STOPPING CRITERIA
// =#========================================================================#=
/// When a simulation stops successfully; at least one criterion is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoppingCriteria {
    min_leaves: Option<usize>,
    max_time: Option<f64>,
}

impl StoppingCriteria {
    /// Creates stopping criteria from a minimum number of extant leaves
    /// and/or a maximum simulation time.
    ///
    /// # Errors
    /// * [`GenerationError::MissingStoppingCriterion`] if both are `None`
    /// * [`GenerationError::InvalidParameter`] if `min_leaves` is 0 or
    ///   `max_time` is not finite and positive
    pub fn new(min_leaves: Option<usize>, max_time: Option<f64>) -> Result<Self, GenerationError> {
        if min_leaves.is_none() && max_time.is_none() {
            return Err(GenerationError::MissingStoppingCriterion);
        }
        if min_leaves == Some(0) {
            return Err(GenerationError::invalid("min_leaves", "must be at least 1"));
        }
        if let Some(max_time) = max_time {
            crate::error::ensure_positive("max_time", max_time)?;
        }
        Ok(StoppingCriteria {
            min_leaves,
            max_time,
        })
    }

    /// Returns the minimum number of extant leaves, if set.
    pub fn min_leaves(&self) -> Option<usize> {
        self.min_leaves
    }

    /// Returns the maximum simulation time, if set.
    pub fn max_time(&self) -> Option<f64> {
        self.max_time
    }

    /// Returns whether `extant` leaves satisfy the minimum-leaf criterion.
    pub(crate) fn enough_leaves(&self, extant: usize) -> bool {
        self.min_leaves.is_some_and(|min| extant >= min)
    }

    /// Returns whether the elapsed time reached the maximum time.
    pub(crate) fn time_is_up(&self, elapsed: f64) -> bool {
        self.max_time.is_some_and(|max| elapsed >= max)
    }
}

// =#========================================================================#=
// ATTEMPTS
// =#========================================================================#=
/// Parameters shared by every attempt of one generator.
#[derive(Debug, Clone)]
pub(crate) struct SimulationParams {
    pub(crate) rates: RateModel,
    pub(crate) stopping: StoppingCriteria,
    pub(crate) prune: bool,
}

/// Result of a single simulation attempt.
#[derive(Debug)]
pub(crate) enum AttemptOutcome {
    /// A usable tree
    Complete(Tree),
    /// Every lineage died out
    Extinct,
    /// The simulation stopped with at most two extant leaves
    Degenerate,
}

impl AttemptOutcome {
    /// Short description for logging.
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            AttemptOutcome::Complete(_) => "complete",
            AttemptOutcome::Extinct => "extinct",
            AttemptOutcome::Degenerate => "degenerate",
        }
    }
}

/// Runs one attempt with the given strategy, including post-processing:
/// degenerate trees are rejected and, if requested, extinct lineages pruned.
pub(crate) fn run_attempt(
    strategy: Strategy,
    params: &SimulationParams,
    rng: &mut RngSession,
) -> AttemptOutcome {
    let grown = match strategy {
        Strategy::Standard => standard::grow(&params.rates, &params.stopping, rng),
        Strategy::Amortized => amortized::grow(&params.rates, &params.stopping, rng),
    };
    let Some(mut tree) = grown else {
        return AttemptOutcome::Extinct;
    };

    if tree.num_extant_leaves() <= 2 {
        return AttemptOutcome::Degenerate;
    }

    if params.prune {
        tree.retain_leaves(|vertex| !vertex.is_extinct());
    }

    AttemptOutcome::Complete(tree)
}
