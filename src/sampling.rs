//! Random leaf removal, simulating incomplete taxon sampling.

use crate::error::GenerationError;
use crate::model::Tree;
use crate::rng::{RngSession, Seed};
use tracing::debug;

/// Removes each leaf of `tree` with probability `cutoff`.
///
/// One uniform value is drawn per leaf in pre-order; leaves with a draw
/// `<= cutoff` are deleted and the tree is restricted to the remaining
/// leaves (see [`Tree::retain_leaves`]). If every leaf is removed, the tree
/// collapses to a bare root. Without a cutoff this is a no-op.
///
/// The session is reseeded from `seed` (or entropy); use
/// [`perturb_sampling_with`] to continue an existing session instead.
///
/// # Returns
/// The number of removed leaves.
///
/// # Errors
/// Returns [`GenerationError::InvalidParameter`] if `cutoff` lies outside `[0, 1]`.
pub fn perturb_sampling(
    tree: &mut Tree,
    cutoff: Option<f64>,
    seed: Option<&Seed>,
) -> Result<usize, GenerationError> {
    if cutoff.is_none() {
        return Ok(0);
    }
    let mut rng = RngSession::new(seed);
    perturb_sampling_with(tree, cutoff, &mut rng)
}

/// Removes each leaf of `tree` with probability `cutoff`, drawing from an
/// existing session. See [`perturb_sampling`].
pub fn perturb_sampling_with(
    tree: &mut Tree,
    cutoff: Option<f64>,
    rng: &mut RngSession,
) -> Result<usize, GenerationError> {
    let Some(cutoff) = cutoff else {
        return Ok(0);
    };
    if !(0.0..=1.0).contains(&cutoff) {
        return Err(GenerationError::invalid(
            "sampling",
            format!("must lie within [0, 1], got {cutoff}"),
        ));
    }

    let mut removed = vec![false; tree.num_vertices()];
    for leaf in tree.leaves() {
        removed[leaf] = rng.uniform() <= cutoff;
    }

    let count = tree.retain_leaves(|vertex| !removed[vertex.index()]);
    debug!(cutoff, removed = count, remaining = tree.num_leaves(), "Perturbed sampling");
    Ok(count)
}
