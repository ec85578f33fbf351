//! Discrete character evolution over a finished tree.
//!
//! Every vertex receives a vector of state ids, one per character. The root
//! starts with states `0..C`; all other vertices are visited in
//! chronological order (root distance, then name, then pre-order rank), so
//! parents and all potential donors are always processed first. A vertex
//! inherits its parent's states and then:
//! 1. **Mutation**: for character `i`, a draw from `Gamma(k / e^i, θ)`
//!    shorter than the branch length assigns a fresh, globally unique state.
//! 2. **Horizontal gene transfer** (optional): for character `i`, a draw from
//!    `Gamma(k_hgt / e^i, θ_hgt)` shorter than the branch length copies the
//!    state of a donor vertex. Donors are drawn among all vertices with a
//!    strictly smaller root distance, favouring phylogenetically close ones.
//!
//! All mutation draws of a vertex precede its HGT draws, which precede its
//! donor draws.

use crate::error::{GenerationError, ensure_positive};
use crate::model::{StateId, Tree, VertexIndex};
use crate::rng::{RngSession, Seed};
use rand::distr::weighted::WeightedIndex;
use rand_distr::Gamma;
use tracing::debug;

/// Shape and scale of a gamma distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaParams {
    /// Shape `k`
    pub shape: f64,
    /// Scale `θ`
    pub scale: f64,
}

// =#========================================================================#=
// CHARACTER MODEL
// =#========================================================================#=
/// Parameters of the character evolution model.
///
/// # Example
/// ```
/// use phylogen::characters::CharacterModel;
/// use phylogen::generate_tree;
///
/// let mut tree = generate_tree(1.0, 0.5, Some(10), None, Some("chars".into()))?;
/// let model = CharacterModel::new(20, 5.0, 1.0).with_hgt(10.0, 1.0);
/// model.evolve(&mut tree, Some(&"chars".into()))?;
///
/// assert_eq!(tree.root().states().unwrap().len(), 20);
/// # Ok::<(), phylogen::GenerationError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterModel {
    num_characters: usize,
    mutation: GammaParams,
    decay: f64,
    hgt: Option<GammaParams>,
}

impl CharacterModel {
    /// Creates a model for `num_characters` characters with mutation gamma
    /// parameters `shape` (k) and `scale` (θ), no decay and no HGT.
    pub fn new(num_characters: usize, shape: f64, scale: f64) -> Self {
        CharacterModel {
            num_characters,
            mutation: GammaParams { shape, scale },
            decay: 1.0,
            hgt: None,
        }
    }

    /// Sets the decay base `e`: character `i` uses shape `k / e^i`,
    /// so with `e > 1` later characters change more often.
    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Enables horizontal gene transfer with the given gamma parameters.
    pub fn with_hgt(mut self, shape: f64, scale: f64) -> Self {
        self.hgt = Some(GammaParams { shape, scale });
        self
    }

    /// Enables horizontal gene transfer if both parameters are given.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidParameter`] if only one is given.
    pub fn with_optional_hgt(
        self,
        shape: Option<f64>,
        scale: Option<f64>,
    ) -> Result<Self, GenerationError> {
        match (shape, scale) {
            (Some(shape), Some(scale)) => Ok(self.with_hgt(shape, scale)),
            (None, None) => Ok(self),
            (Some(_), None) => Err(GenerationError::invalid(
                "th_hgt",
                "HGT requires both a shape and a scale",
            )),
            (None, Some(_)) => Err(GenerationError::invalid(
                "k_hgt",
                "HGT requires both a shape and a scale",
            )),
        }
    }

    /// Returns the number of characters.
    pub fn num_characters(&self) -> usize {
        self.num_characters
    }

    /// Returns the mutation gamma parameters.
    pub fn mutation(&self) -> GammaParams {
        self.mutation
    }

    /// Returns the HGT gamma parameters, if HGT is enabled.
    pub fn hgt(&self) -> Option<GammaParams> {
        self.hgt
    }

    /// Evolves characters over `tree`, reseeding from `seed` (or entropy).
    ///
    /// Overwrites any states already present.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidParameter`] for an invalid model;
    /// the tree is left untouched in that case.
    pub fn evolve<'t>(
        &self,
        tree: &'t mut Tree,
        seed: Option<&Seed>,
    ) -> Result<&'t mut Tree, GenerationError> {
        let mut rng = RngSession::new(seed);
        self.evolve_with(tree, &mut rng)
    }

    /// Evolves characters over `tree`, drawing from an existing session.
    pub fn evolve_with<'t>(
        &self,
        tree: &'t mut Tree,
        rng: &mut RngSession,
    ) -> Result<&'t mut Tree, GenerationError> {
        let mutation = self.per_character_gammas("k_mut", "th_mut", self.mutation)?;
        let hgt = self
            .hgt
            .map(|params| self.per_character_gammas("k_hgt", "th_hgt", params))
            .transpose()?;

        let metrics = tree.path_metrics();
        let order = chronological_order(tree, metrics.root_distances());

        let mut states: Vec<Vec<StateId>> = vec![Vec::new(); tree.num_vertices()];
        let mut next_state: StateId = self.num_characters;
        let mut mutations = 0usize;
        let mut transfers = 0usize;

        for (position, &index) in order.iter().enumerate() {
            let vertex = &tree[index];
            let Some(parent) = vertex.parent() else {
                states[index] = (0..self.num_characters).collect();
                continue;
            };

            let branch_length = vertex.branch_length();
            let mut current = states[parent].clone();

            for (state, gamma) in current.iter_mut().zip(&mutation) {
                if rng.sample(gamma) < branch_length {
                    *state = next_state;
                    next_state += 1;
                    mutations += 1;
                }
            }

            if let Some(hgt) = &hgt {
                let triggered: Vec<bool> = hgt.iter().map(|gamma| rng.sample(gamma) < branch_length).collect();

                let own_distance = metrics.root_distance(index);
                let pool: Vec<VertexIndex> = order[..position]
                    .iter()
                    .copied()
                    .filter(|&other| metrics.root_distance(other) < own_distance)
                    .collect();

                if !pool.is_empty() {
                    let distances: Vec<f64> = pool
                        .iter()
                        .map(|&donor| metrics.distance(tree, index, donor))
                        .collect();
                    let donors = draw_donors(&pool, &donor_weights(&distances), self.num_characters, rng);

                    for (character, (&hit, donor)) in triggered.iter().zip(donors).enumerate() {
                        if hit {
                            current[character] = states[donor][character];
                            transfers += 1;
                        }
                    }
                }
            }

            states[index] = current;
        }

        for (index, vertex_states) in states.into_iter().enumerate() {
            tree[index].set_states(vertex_states);
        }

        debug!(
            characters = self.num_characters,
            mutations, transfers, "Evolved characters"
        );
        Ok(tree)
    }

    /// Validates the model and builds one gamma distribution per character.
    fn per_character_gammas(
        &self,
        shape_name: &'static str,
        scale_name: &'static str,
        params: GammaParams,
    ) -> Result<Vec<Gamma<f64>>, GenerationError> {
        if self.num_characters == 0 {
            return Err(GenerationError::invalid("num_chars", "must be at least 1"));
        }
        ensure_positive("e_mut", self.decay)?;
        ensure_positive(shape_name, params.shape)?;
        ensure_positive(scale_name, params.scale)?;

        (0..self.num_characters)
            .map(|i| {
                let shape = params.shape / self.decay.powi(i as i32);
                ensure_positive(shape_name, shape)?;
                Gamma::new(shape, params.scale)
                    .map_err(|err| GenerationError::invalid(shape_name, err.to_string()))
            })
            .collect()
    }
}

/// Returns all vertex indices sorted by root distance, then leaf name, then pre-order rank.
///
/// Internal vertices sort as unnamed, so a parent always precedes its
/// children, even across zero-length branches.
fn chronological_order(tree: &Tree, root_distances: &[f64]) -> Vec<VertexIndex> {
    let leaf_name = |index: VertexIndex| {
        let vertex = &tree[index];
        if vertex.is_leaf() { vertex.name().unwrap_or("") } else { "" }
    };

    let mut order: Vec<VertexIndex> = tree.pre_order_iter().map(|v| v.index()).collect();
    // Stable sort keeps pre-order rank as last tie breaker
    order.sort_by(|&a, &b| {
        root_distances[a]
            .total_cmp(&root_distances[b])
            .then_with(|| leaf_name(a).cmp(leaf_name(b)))
    });
    order
}

/// Turns donor distances into weights favouring close donors:
/// `(min + max) - d`, so the closest donor gets the largest weight.
fn donor_weights(distances: &[f64]) -> Vec<f64> {
    let min = distances.iter().copied().fold(f64::INFINITY, f64::min);
    let max = distances.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    distances.iter().map(|d| (min + max) - d).collect()
}

/// Draws `count` donors (with replacement) from `pool` according to `weights`.
///
/// Falls back to a uniform choice if the weights do not form a valid
/// distribution, e.g. if they are all zero.
fn draw_donors(
    pool: &[VertexIndex],
    weights: &[f64],
    count: usize,
    rng: &mut RngSession,
) -> Vec<VertexIndex> {
    match WeightedIndex::new(weights) {
        Ok(distribution) => (0..count).map(|_| pool[rng.sample(&distribution)]).collect(),
        Err(_) => (0..count).map(|_| *rng.choose(pool)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_donor_weights_favour_close_donors() {
        assert_eq!(donor_weights(&[1.0, 2.0, 3.0]), vec![3.0, 2.0, 1.0]);
        assert_eq!(donor_weights(&[2.5]), vec![2.5]);
    }

    #[test]
    fn test_draw_donors_uniform_fallback() {
        let mut rng = RngSession::seeded(&Seed::from("donors"));
        let pool = [4, 7];
        let donors = draw_donors(&pool, &[0.0, 0.0], 50, &mut rng);
        assert_eq!(donors.len(), 50);
        assert!(donors.iter().all(|d| pool.contains(d)));
    }

    #[test]
    fn test_draw_donors_respects_zero_weight() {
        let mut rng = RngSession::seeded(&Seed::from("donors"));
        let donors = draw_donors(&[1, 2, 3], &[0.0, 1.0, 0.0], 20, &mut rng);
        assert!(donors.iter().all(|&d| d == 2));
    }

    #[test]
    fn test_chronological_order_parents_first() {
        let mut tree = Tree::new();
        let root = tree.root_index();
        let inner = tree.add_named_child(root, "Z", 0.0);
        let late = tree.add_named_child(inner, "B", 0.0);
        let early = tree.add_named_child(inner, "A", 0.0);
        let order = chronological_order(&tree, &tree.root_distances());
        assert_eq!(order, vec![root, inner, early, late]);
    }

    #[test]
    fn test_chronological_order_by_distance() {
        let mut tree = Tree::new();
        let root = tree.root_index();
        let far = tree.add_named_child(root, "A", 2.0);
        let near = tree.add_named_child(root, "B", 1.0);
        let order = chronological_order(&tree, &tree.root_distances());
        assert_eq!(order, vec![root, near, far]);
    }
}
