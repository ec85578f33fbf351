//! CSV wordlist output of leaf character states.
//!
//! One row per leaf and character, with `feature_<i>` as feature id and the
//! state id as value:
//!
//! ```text
//! Language_ID,Feature_ID,Value
//! A,feature_0,0
//! B,feature_0,3
//! A,feature_1,1
//! ```
//!
//! Rows are sorted by feature id, then leaf name, both compared as strings
//! (so `feature_10` sorts before `feature_2`).

use crate::model::Tree;
use crate::newick::taxon_order;

/// CSV header line
const HEADER: &str = "Language_ID,Feature_ID,Value";

/// Returns the wordlist of `tree` as CSV text, ending with a newline.
///
/// Leaves without character states contribute no rows; unnamed leaves are
/// identified by their 1-based position among the sorted taxa.
///
/// # Example
/// ```
/// use phylogen::model::Tree;
/// use phylogen::wordlist::to_wordlist;
///
/// let mut tree = Tree::new();
/// let root = tree.root_index();
/// let a = tree.add_named_child(root, "A", 1.0);
/// let b = tree.add_named_child(root, "B", 1.0);
/// tree[a].set_states(vec![0, 1]);
/// tree[b].set_states(vec![2, 1]);
///
/// assert_eq!(
///     to_wordlist(&tree),
///     "Language_ID,Feature_ID,Value\n\
///      A,feature_0,0\nB,feature_0,2\nA,feature_1,1\nB,feature_1,1\n"
/// );
/// ```
pub fn to_wordlist(tree: &Tree) -> String {
    let mut rows: Vec<(String, String, usize)> = Vec::new();
    for (key, leaf) in taxon_order(tree).into_iter().enumerate() {
        let vertex = &tree[leaf];
        let Some(states) = vertex.states() else {
            continue;
        };
        let name = match vertex.name() {
            Some(name) => name.to_string(),
            None => (key + 1).to_string(),
        };
        for (character, &state) in states.iter().enumerate() {
            rows.push((format!("feature_{character}"), name.clone(), state));
        }
    }
    rows.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));

    let mut csv = String::with_capacity(HEADER.len() + 1 + rows.len() * 24);
    csv.push_str(HEADER);
    csv.push('\n');
    for (feature, name, state) in rows {
        csv.push_str(&format!("{name},{feature},{state}\n"));
    }
    csv
}
