//! Error types for tree generation and the surrounding tooling.

use thiserror::Error;

/// Errors that can occur while configuring or running a simulation.
///
/// Configuration errors are raised immediately and never retried.
/// Failed attempts (total extinction, degenerate trees) are handled
/// internally by the retry driver and only surface as [`GenerationError::Exhausted`]
/// once the attempt budget is spent.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Neither a minimum leaf count nor a maximum time was given.
    #[error("at least one stopping criterion (minimum leaves or maximum time) is required")]
    MissingStoppingCriterion,

    /// A label policy name could not be recognized.
    #[error("unknown label policy '{0}' (expected one of: enum, human, bio, none)")]
    UnknownLabelPolicy(String),

    /// A generation strategy name could not be recognized.
    #[error("unknown generation strategy '{0}' (expected one of: standard, fast)")]
    UnknownStrategy(String),

    /// A numeric parameter is out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// No valid tree was obtained within the attempt budget.
    #[error("unable to generate a valid tree after {attempts} attempts")]
    Exhausted {
        /// Number of attempts made
        attempts: usize,
    },

    /// Reading or writing failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("invalid configuration file: {0}")]
    Config(#[from] toml::de::Error),
}

impl GenerationError {
    /// Shorthand for building an [`GenerationError::InvalidParameter`].
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        GenerationError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns whether this error stems from invalid input rather than from
    /// running the simulation or from I/O.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            GenerationError::MissingStoppingCriterion
                | GenerationError::UnknownLabelPolicy(_)
                | GenerationError::UnknownStrategy(_)
                | GenerationError::InvalidParameter { .. }
                | GenerationError::Config(_)
        )
    }
}

/// Checks that `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64, GenerationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GenerationError::invalid(
            name,
            format!("must be finite and greater than 0, got {value}"),
        ))
    }
}

/// Checks that `value` is finite and non-negative.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<f64, GenerationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(GenerationError::invalid(
            name,
            format!("must be finite and at least 0, got {value}"),
        ))
    }
}
