//! Standard strategy: the extant leaves are recomputed after every event.

use crate::model::Tree;
use crate::rng::RngSession;
use crate::simulation::StoppingCriteria;
use crate::simulation::rates::RateModel;
use tracing::trace;

/// Grows a tree event by event until a stopping criterion is met.
///
/// Each iteration draws the waiting time for the current extant leaves.
/// If that would pass the maximum time, all extant leaves are extended up
/// to it and the simulation stops. Otherwise a uniformly chosen extant leaf
/// either gives birth or dies, and all extant leaves (new children
/// included) are extended by the waiting time.
///
/// # Returns
/// The grown tree, or `None` if all lineages died out.
pub(crate) fn grow(
    rates: &RateModel,
    stopping: &StoppingCriteria,
    rng: &mut RngSession,
) -> Option<Tree> {
    let mut tree = Tree::new();
    let mut elapsed = 0.0;

    loop {
        let extant = tree.extant_leaves();
        let event_time = rates.waiting_time(extant.len(), rng);

        if let Some(max_time) = stopping.max_time() {
            if elapsed + event_time > max_time {
                let remaining = max_time - elapsed;
                for &leaf in &extant {
                    tree[leaf].extend_branch(remaining);
                }
                trace!(elapsed = max_time, extant = extant.len(), "Reached maximum time");
                return Some(tree);
            }
        }
        elapsed += event_time;

        let chosen = *rng.choose(&extant);
        if rates.is_birth(rng) {
            let brood = rates.brood_size(rng);
            for _ in 0..brood {
                tree.add_child(chosen);
            }
            trace!(elapsed, vertex = chosen, brood, "Birth");
        } else {
            tree[chosen].set_extinct();
            trace!(elapsed, vertex = chosen, "Death");
        }

        let extant = tree.extant_leaves();
        for &leaf in &extant {
            let extended = tree[leaf].branch_length() + event_time;
            let capped = stopping.max_time().map_or(extended, |max| extended.min(max));
            tree[leaf].set_branch_length(capped);
        }

        if extant.is_empty() {
            trace!(elapsed, "All lineages extinct");
            return None;
        }
        if stopping.enough_leaves(extant.len()) || stopping.time_is_up(elapsed) {
            return Some(tree);
        }
    }
}
