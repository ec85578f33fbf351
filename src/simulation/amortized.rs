//! Amortized strategy: the extant leaves are tracked incrementally.
//!
//! While a vertex is extant, its branch length field holds its creation
//! time. When the vertex stops being extant (birth, death, or the end of
//! the simulation) the field is replaced by the elapsed time since creation.

use crate::model::{Tree, VertexIndex};
use crate::rng::RngSession;
use crate::simulation::StoppingCriteria;
use crate::simulation::rates::RateModel;
use tracing::trace;

/// Grows a tree while maintaining the list of extant leaves.
///
/// # Returns
/// The grown tree, or `None` if all lineages died out.
pub(crate) fn grow(
    rates: &RateModel,
    stopping: &StoppingCriteria,
    rng: &mut RngSession,
) -> Option<Tree> {
    let mut tree = Tree::new();
    let mut extant: Vec<VertexIndex> = vec![tree.root_index()];
    let mut elapsed = 0.0;

    loop {
        elapsed += rates.waiting_time(extant.len(), rng);

        if let Some(max_time) = stopping.max_time() {
            if elapsed > max_time {
                finalize(&mut tree, &extant, max_time);
                trace!(elapsed = max_time, extant = extant.len(), "Reached maximum time");
                return Some(tree);
            }
        }

        let slot = rng.index(extant.len());
        let chosen = extant[slot];
        finalize(&mut tree, &[chosen], elapsed);

        if rates.is_birth(rng) {
            let brood = rates.brood_size(rng);
            let first = spawn(&mut tree, chosen, elapsed);
            extant[slot] = first;
            for _ in 1..brood {
                let child = spawn(&mut tree, chosen, elapsed);
                extant.push(child);
            }
            trace!(elapsed, vertex = chosen, brood, "Birth");
        } else {
            tree[chosen].set_extinct();
            extant.swap_remove(slot);
            trace!(elapsed, vertex = chosen, "Death");
        }

        if extant.is_empty() {
            trace!(elapsed, "All lineages extinct");
            return None;
        }
        if stopping.enough_leaves(extant.len()) {
            finalize(&mut tree, &extant, elapsed);
            return Some(tree);
        }
    }
}

/// Adds a child created at time `created`.
fn spawn(tree: &mut Tree, parent: VertexIndex, created: f64) -> VertexIndex {
    let child = tree.add_child(parent);
    tree[child].set_branch_length(created);
    child
}

/// Replaces the stored creation time of each vertex by its lifetime up to `now`.
fn finalize(tree: &mut Tree, vertices: &[VertexIndex], now: f64) {
    for &vertex in vertices {
        let created = tree[vertex].branch_length();
        tree[vertex].set_branch_length(now - created);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Seed;

    #[test]
    fn test_yule_reaches_min_leaves() {
        let rates = RateModel::new(1.0, 0.0, 0.0).unwrap();
        let stopping = StoppingCriteria::new(Some(25), None).unwrap();
        let mut rng = RngSession::seeded(&Seed::from("amortized"));

        let tree = grow(&rates, &stopping, &mut rng).unwrap();
        assert!(tree.is_valid());
        assert_eq!(tree.num_extant_leaves(), 25);
        assert!(tree.is_ultrametric());
    }

    #[test]
    fn test_branch_lengths_are_lifetimes() {
        let rates = RateModel::new(1.0, 0.5, 0.0).unwrap();
        let stopping = StoppingCriteria::new(None, Some(3.0)).unwrap();
        let mut rng = RngSession::seeded(&Seed::from(21u64));

        if let Some(tree) = grow(&rates, &stopping, &mut rng) {
            let distances = tree.root_distances();
            for leaf in tree.extant_leaves() {
                assert!((distances[leaf] - 3.0).abs() < 1e-9);
            }
            for leaf in tree.leaves() {
                assert!(distances[leaf] <= 3.0 + 1e-9);
            }
        }
    }
}
