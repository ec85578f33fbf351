//! Leaf naming for generated trees.
//!
//! Leaves are named in pre-order once the topology is final. Three policies
//! are available:
//!
//! | Policy | Example | Source |
//! |--------|---------|--------|
//! | [`LabelPolicy::Enumerated`] | `L01`, `L02`, … | 1-based index, zero-padded |
//! | [`LabelPolicy::Human`] | `Kobeli`, `Vusa` | [`random_labels`] |
//! | [`LabelPolicy::Biological`] | `Tapphis moccus` | [`random_species`] |

mod species;
mod textgen;

pub use species::random_species;
pub use textgen::random_labels;

use crate::error::GenerationError;
use crate::model::Tree;
use crate::rng::RngSession;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// How leaves of a generated tree are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPolicy {
    /// `L` followed by the 1-based leaf position, zero-padded to a common width
    Enumerated,
    /// Random pronounceable names
    Human,
    /// Random binomial species names
    Biological,
}

impl LabelPolicy {
    /// Parses a policy name, mapping `none` to `Ok(None)`.
    ///
    /// # Example
    /// ```
    /// use phylogen::labels::LabelPolicy;
    ///
    /// assert_eq!(LabelPolicy::parse_optional("bio").unwrap(), Some(LabelPolicy::Biological));
    /// assert_eq!(LabelPolicy::parse_optional("none").unwrap(), None);
    /// assert!(LabelPolicy::parse_optional("XXX").is_err());
    /// ```
    pub fn parse_optional(name: &str) -> Result<Option<LabelPolicy>, GenerationError> {
        if name.eq_ignore_ascii_case("none") {
            Ok(None)
        } else {
            name.parse().map(Some)
        }
    }
}

impl FromStr for LabelPolicy {
    type Err = GenerationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "enum" | "enumerated" => Ok(LabelPolicy::Enumerated),
            "human" => Ok(LabelPolicy::Human),
            "bio" | "biological" => Ok(LabelPolicy::Biological),
            _ => Err(GenerationError::UnknownLabelPolicy(name.to_string())),
        }
    }
}

impl fmt::Display for LabelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelPolicy::Enumerated => write!(f, "enum"),
            LabelPolicy::Human => write!(f, "human"),
            LabelPolicy::Biological => write!(f, "bio"),
        }
    }
}

/// Names all leaves of `tree` (in pre-order) according to `policy`.
///
/// Enumerated names draw no random numbers. Biological names are
/// deduplicated and sorted before assignment; a shortfall caused by
/// duplicates is filled with enumerated names.
pub fn label_leaves(tree: &mut Tree, policy: LabelPolicy, rng: &mut RngSession) {
    let leaves = tree.leaves();
    let names = match policy {
        LabelPolicy::Enumerated => enumerated_labels(leaves.len()),
        LabelPolicy::Human => random_labels(leaves.len(), rng),
        LabelPolicy::Biological => {
            let unique: BTreeSet<String> = random_species(leaves.len(), rng).into_iter().collect();
            let shortfall = leaves.len() - unique.len();
            unique
                .into_iter()
                .chain(enumerated_labels(shortfall))
                .collect()
        }
    };

    for (leaf, name) in leaves.into_iter().zip(names) {
        tree[leaf].set_name(name);
    }
}

/// Returns `L1`..`Ln`, zero-padded to the number of digits of `count`.
///
/// # Example
/// ```
/// use phylogen::labels::enumerated_labels;
///
/// let labels = enumerated_labels(12);
/// assert_eq!(labels.first().unwrap(), "L01");
/// assert_eq!(labels.last().unwrap(), "L12");
/// ```
pub fn enumerated_labels(count: usize) -> Vec<String> {
    let width = count.to_string().len();
    (1..=count).map(|i| format!("L{i:0width$}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerated_width() {
        assert_eq!(enumerated_labels(9).last().unwrap(), "L9");
        assert_eq!(enumerated_labels(10).first().unwrap(), "L01");
        assert_eq!(enumerated_labels(100)[4], "L005");
        assert!(enumerated_labels(0).is_empty());
    }

    #[test]
    fn test_policy_names() {
        assert_eq!("enum".parse::<LabelPolicy>().unwrap(), LabelPolicy::Enumerated);
        assert_eq!("HUMAN".parse::<LabelPolicy>().unwrap(), LabelPolicy::Human);
        assert!(matches!(
            "XXX".parse::<LabelPolicy>(),
            Err(GenerationError::UnknownLabelPolicy(name)) if name == "XXX"
        ));
    }
}
