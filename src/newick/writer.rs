//! Newick format writing for [`Tree`].

use crate::model::{Tree, VertexIndex};
use crate::newick::utils::escape_label;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Extra buffer in Newick string length/capacity estimate
const BUFFER_CHARS: usize = 10;

/// Style for serializing a tree to Newick format,
/// controlling how leaf labels are represented in the output string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewickStyle {
    /// Use the (escaped) leaf names; unnamed leaves stay empty
    Label,
    /// Use 1-based keys (1, 2, 3, ...) as in NEXUS TRANSLATE commands,
    /// numbering leaves in the order of [`taxon_order`]
    OneIndexed,
}

/// Returns the leaves of `tree` sorted by name, ties broken by pre-order.
///
/// This is the order of taxa in NEXUS output, and the numbering used by
/// [`NewickStyle::OneIndexed`].
pub fn taxon_order(tree: &Tree) -> Vec<VertexIndex> {
    let mut leaves = tree.leaves();
    leaves.sort_by(|&a, &b| tree[a].name().unwrap_or("").cmp(tree[b].name().unwrap_or("")));
    leaves
}

/// Writes the given trees to a file in Newick format, one tree per line.
///
/// # Arguments
/// * `path` - The file to create (or truncate)
/// * `trees` - Trees to write
/// * `sorted` - Whether to write the canonically [sorted](to_sorted_newick) form
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_newick_file<P: AsRef<Path>>(path: P, trees: &[Tree], sorted: bool) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for tree in trees {
        let newick = to_newick_with(tree, NewickStyle::Label, sorted);
        writer.write_all(newick.as_bytes())?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

/// Returns the Newick representation of this tree with closing semicolon.
///
/// Children appear in order of creation. The root has no branch length;
/// branch lengths use the shortest representation that round-trips.
///
/// # Example
/// ```
/// use phylogen::model::Tree;
/// use phylogen::newick::to_newick;
///
/// let mut tree = Tree::new();
/// let root = tree.root_index();
/// let inner = tree.add_child(root);
/// tree[inner].set_branch_length(0.5);
/// tree.add_named_child(inner, "Little Spotted Kiwi", 1.0);
/// tree.add_named_child(inner, "Great Spotted Kiwi", 1.0);
/// tree.add_named_child(root, "Okarito Brown Kiwi", 1.5);
///
/// assert_eq!(
///     to_newick(&tree),
///     "((Little_Spotted_Kiwi:1,Great_Spotted_Kiwi:1):0.5,Okarito_Brown_Kiwi:1.5);"
/// );
/// ```
pub fn to_newick(tree: &Tree) -> String {
    to_newick_with(tree, NewickStyle::Label, false)
}

/// Returns a canonical Newick representation of this tree.
///
/// Children are ordered by the number of leaves in their subtree, ties
/// broken by the smallest leaf label in the subtree, so trees that differ
/// only in child order produce the same string.
///
/// # Example
/// ```
/// use phylogen::model::Tree;
/// use phylogen::newick::to_sorted_newick;
///
/// let mut tree = Tree::new();
/// let root = tree.root_index();
/// let inner = tree.add_child(root);
/// tree.add_named_child(inner, "C", 1.0);
/// tree.add_named_child(inner, "B", 1.0);
/// tree.add_named_child(root, "A", 1.0);
///
/// assert_eq!(to_sorted_newick(&tree), "(A:1,(B:1,C:1):0);");
/// ```
pub fn to_sorted_newick(tree: &Tree) -> String {
    to_newick_with(tree, NewickStyle::Label, true)
}

/// Returns the Newick representation of a tree in the given style,
/// optionally with canonically sorted children.
pub fn to_newick_with(tree: &Tree, style: NewickStyle, sorted: bool) -> String {
    let labels = leaf_labels(tree, style);
    let order = if sorted {
        sorted_children(tree, &labels)
    } else {
        tree.vertices().iter().map(|v| v.children().to_vec()).collect()
    };

    let mut newick = String::with_capacity(estimate_newick_len(tree, &labels));
    build_newick(tree, &mut newick, tree.root_index(), &labels, &order);
    newick.push(';');

    newick
}

/// Recursive helper for building the Newick string.
fn build_newick(
    tree: &Tree,
    newick: &mut String,
    index: VertexIndex,
    labels: &[Cow<'_, str>],
    order: &[Vec<VertexIndex>],
) {
    let vertex = &tree[index];

    if vertex.is_internal() {
        newick.push('(');
        for (i, &child) in order[index].iter().enumerate() {
            if i > 0 {
                newick.push(',');
            }
            build_newick(tree, newick, child, labels, order);
        }
        newick.push(')');
    }
    newick.push_str(&labels[index]);

    if !vertex.is_root() {
        newick.push(':');
        newick.push_str(&vertex.branch_length().to_string());
    }
}

/// Returns the label written for each vertex, indexed by [VertexIndex].
fn leaf_labels(tree: &Tree, style: NewickStyle) -> Vec<Cow<'_, str>> {
    match style {
        NewickStyle::Label => tree
            .vertices()
            .iter()
            .map(|v| v.name().map(escape_label).unwrap_or(Cow::Borrowed("")))
            .collect(),
        NewickStyle::OneIndexed => {
            let mut labels = vec![Cow::Borrowed(""); tree.num_vertices()];
            for (key, leaf) in taxon_order(tree).into_iter().enumerate() {
                labels[leaf] = Cow::Owned((key + 1).to_string());
            }
            labels
        }
    }
}

/// Orders the children of every vertex by (leaf count, smallest leaf label).
fn sorted_children(tree: &Tree, labels: &[Cow<'_, str>]) -> Vec<Vec<VertexIndex>> {
    let n = tree.num_vertices();
    let mut sizes = vec![0usize; n];
    let mut smallest: Vec<&str> = vec![""; n];
    let mut order: Vec<Vec<VertexIndex>> = vec![Vec::new(); n];

    for vertex in tree.post_order_iter() {
        let index = vertex.index();
        if vertex.is_leaf() {
            sizes[index] = 1;
            smallest[index] = labels[index].as_ref();
            continue;
        }

        let mut children = vertex.children().to_vec();
        children.sort_by(|&a, &b| sizes[a].cmp(&sizes[b]).then_with(|| smallest[a].cmp(smallest[b])));
        sizes[index] = children.iter().map(|&c| sizes[c]).sum();
        smallest[index] = children.iter().map(|&c| smallest[c]).min().unwrap_or("");
        order[index] = children;
    }

    order
}

/// Estimates the length of a Newick string for a given tree.
///
/// Used to pre-allocate string capacity.
fn estimate_newick_len(tree: &Tree, labels: &[Cow<'_, str>]) -> usize {
    // Each internal vertex: "(" + ")" plus one "," per extra child
    const INTERNAL_VERTEX_CHARS: usize = 3;
    // Branch lengths: ~20 chars each (e.g., ":0.009529961339106089")
    const BRANCH_LENGTH_CHARS: usize = 20;

    let structure_capacity = tree.num_internal() * INTERNAL_VERTEX_CHARS;
    let label_capacity: usize = labels.iter().map(|l| l.len()).sum();
    let branch_capacity = tree.num_vertices().saturating_sub(1) * BRANCH_LENGTH_CHARS;

    structure_capacity + label_capacity + branch_capacity + BUFFER_CHARS
}
