//! Provides the tree representation used by the simulators.
//!
//! Core data structures:
//! * [`Tree`] - Main tree structure using the arena pattern
//! * [VertexIndex] as type used to index vertices in tree
//! * [`PathMetrics`] - Root distances and depths, computed once per operation
//!   and then queried for pairwise distances

use crate::model::vertex::Vertex;
use std::fmt::Write;

/// Float comparison tolerance
const EPSILON: f64 = 1e-7;

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted phylogenetic tree represented using the arena pattern on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex]. Aim is to avoid referencing troubles as well as to provide
/// efficient memory layout and cache locality for traversal operations.
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena.
/// - Index of root is maintained.
/// - Vertices may have any number of children (polytomies are allowed).
/// - Leaves are either extant or extinct.
/// - Deleting vertices ([`Tree::retain_leaves`]) rebuilds a compacted arena,
///   so indices are only stable between deletions.
///
/// # Construction
/// A tree starts as a single extant root; vertices are added with
/// [`Tree::add_child`]. Test validity with [`Tree::is_valid()`].
#[derive(Debug, Clone)]
pub struct Tree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: VertexIndex,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl Tree {
    /// Creates a new tree consisting of a single extant root with branch length 0.
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Creates a new single-root tree with room for `capacity` vertices.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut vertices = Vec::with_capacity(capacity.max(1));
        vertices.push(Vertex::new(0, None));
        Tree {
            vertices,
            root_index: 0,
        }
    }

    /// Adds a new extant child (branch length 0) to the given vertex,
    /// assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `parent` - Index of the vertex to attach the child to
    ///
    /// # Returns
    /// The index of the newly created vertex.
    ///
    /// # Panics
    /// Panics if `parent` is out of bounds or extinct.
    pub fn add_child(&mut self, parent: VertexIndex) -> VertexIndex {
        assert!(!self[parent].is_extinct(), "Extinct vertices cannot gain children");
        let index = self.vertices.len();
        self.vertices.push(Vertex::new(index, Some(parent)));
        self.vertices[parent].children.push(index);
        index
    }

    /// Adds a new child with the given branch length and name to the given vertex.
    ///
    /// Convenience for building trees by hand.
    pub fn add_named_child<S: Into<String>>(
        &mut self,
        parent: VertexIndex,
        name: S,
        branch_length: f64,
    ) -> VertexIndex {
        let index = self.add_child(parent);
        self[index].set_name(name);
        self[index].set_branch_length(branch_length);
        index
    }

    /// Returns a reference to the root vertex.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns a mutable reference to the root vertex.
    pub fn root_mut(&mut self) -> &mut Vertex {
        &mut self.vertices[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self[index]
    }

    /// Returns a mutable reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex_mut(&mut self, index: VertexIndex) -> &mut Vertex {
        &mut self.vertices[index]
    }

    /// Returns all vertices in arena order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the number of vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of leaves (extant and extinct) in this tree.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_leaf()).count()
    }

    /// Returns the number of extant leaves in this tree.
    pub fn num_extant_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_extant()).count()
    }

    /// Returns the number of internal vertices in this tree.
    pub fn num_internal(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_internal()).count()
    }

    /// Returns the indices of all leaves in pre-order.
    pub fn leaves(&self) -> Vec<VertexIndex> {
        self.pre_order_iter()
            .filter(|v| v.is_leaf())
            .map(|v| v.index())
            .collect()
    }

    /// Returns the indices of all extant leaves in pre-order.
    pub fn extant_leaves(&self) -> Vec<VertexIndex> {
        self.pre_order_iter()
            .filter(|v| v.is_extant())
            .map(|v| v.index())
            .collect()
    }

    /// Returns the distance of every vertex to the origin of the tree,
    /// indexed by [VertexIndex].
    ///
    /// The origin lies at the top of the root's own branch, so the root stem
    /// (the time before the first event, or a branch collapsed by
    /// [`Tree::retain_leaves`]) is counted. In a simulated tree the root
    /// distance of a vertex is thus the time at which its lineage ends.
    pub fn root_distances(&self) -> Vec<f64> {
        self.path_metrics().root_distances
    }

    /// Computes root distances and depths in one pass for repeated distance queries.
    pub fn path_metrics(&self) -> PathMetrics {
        let mut root_distances = vec![0.0; self.num_vertices()];
        let mut depths = vec![0; self.num_vertices()];
        for vertex in self.pre_order_iter() {
            let index = vertex.index();
            match vertex.parent() {
                Some(parent) => {
                    root_distances[index] = root_distances[parent] + vertex.branch_length();
                    depths[index] = depths[parent] + 1;
                }
                None => root_distances[index] = vertex.branch_length(),
            }
        }
        PathMetrics {
            root_distances,
            depths,
        }
    }

    /// Returns the phylogenetic distance between two vertices,
    /// i.e. the length of the path through their most recent common ancestor.
    ///
    /// For many queries on the same tree use [`Tree::path_metrics`] instead.
    pub fn distance(&self, a: VertexIndex, b: VertexIndex) -> f64 {
        self.path_metrics().distance(self, a, b)
    }

    /// Returns the height of this tree, that is, the largest root distance of a leaf.
    pub fn height(&self) -> f64 {
        self.root_distances().into_iter().fold(0.0, f64::max)
    }

    /// Checks if the tree is ultrametric (all leaves equidistant from root).
    ///
    /// # Returns
    /// `true` if all leaves are at the same distance from the root
    /// (within floating point tolerance), `false` otherwise.
    pub fn is_ultrametric(&self) -> bool {
        let distances = self.root_distances();
        let mut leaf_distances = self
            .vertices
            .iter()
            .filter(|v| v.is_leaf())
            .map(|v| distances[v.index()]);

        let Some(first) = leaf_distances.next() else {
            return true;
        };
        leaf_distances.all(|d| (d - first).abs() <= EPSILON)
    }

    /// Returns the sum of all branch lengths in the tree, excluding a root stem.
    pub fn total_branch_length(&self) -> f64 {
        self.vertices
            .iter()
            .filter(|v| !v.is_root())
            .map(|v| v.branch_length())
            .sum::<f64>()
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is valid and the root has no parent
    /// - All vertex indices match their position in the arena
    /// - All child indices are valid and point back to correct parent
    /// - All non-root vertices have a valid parent that lists them as child
    /// - All vertices are reachable from the root
    /// - Extinct vertices are leaves
    /// - Branch lengths are finite and non-negative
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        let n = self.vertices.len();

        // Check root index is within bounds and root has no parent
        if self.root_index >= n || self.vertices[self.root_index].parent().is_some() {
            return false;
        }

        for (index, vertex) in self.vertices.iter().enumerate() {
            // Check vertex index matches its arena position
            if vertex.index() != index {
                return false;
            }

            if !vertex.branch_length().is_finite() || vertex.branch_length() < 0.0 {
                return false;
            }

            if vertex.is_extinct() && !vertex.is_leaf() {
                return false;
            }

            // Check children point back to this vertex as parent
            for &child in vertex.children() {
                if child >= n || self.vertices[child].parent() != Some(index) {
                    return false;
                }
            }

            // Check parent includes this vertex in its children
            match vertex.parent() {
                None if index != self.root_index => return false,
                None => {}
                Some(parent) => {
                    if parent >= n || !self.vertices[parent].children().contains(&index) {
                        return false;
                    }
                }
            }
        }

        // Every vertex reachable exactly once
        self.pre_order_iter().take(n + 1).count() == n
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<VertexIndex> for Tree {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<VertexIndex> for Tree {
    fn index_mut(&mut self, index: VertexIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// ============================================================================
// Restriction (pub)
// ============================================================================
impl Tree {
    /// Restricts this tree to the leaves for which `keep` returns `true`.
    ///
    /// The result is the induced subtree: subtrees without kept leaves are
    /// removed, and vertices left with a single child are collapsed into that
    /// child, summing branch lengths. If the root is left with a single
    /// child, that child becomes the new root and carries the collapsed stem
    /// as its branch length, so root-to-leaf distances are preserved.
    /// If no leaf is kept, the tree collapses to a bare root.
    ///
    /// The arena is rebuilt in pre-order, so all indices change.
    ///
    /// # Arguments
    /// * `keep` - Predicate evaluated once per leaf, in post-order
    ///
    /// # Returns
    /// The number of removed leaves.
    pub fn retain_leaves<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Vertex) -> bool,
    {
        let mut has_kept = vec![false; self.num_vertices()];
        let mut removed = 0;

        for vertex in self.post_order_iter() {
            let index = vertex.index();
            has_kept[index] = if vertex.is_leaf() {
                let kept = keep(vertex);
                if !kept {
                    removed += 1;
                }
                kept
            } else {
                vertex.children().iter().any(|&child| has_kept[child])
            };
        }

        if removed == 0 {
            return 0;
        }

        let mut restricted = Tree::with_capacity(self.num_vertices());
        if has_kept[self.root_index] {
            self.copy_induced(&has_kept, self.root_index, None, 0.0, &mut restricted);
        }
        *self = restricted;

        removed
    }

    /// Recursive helper copying the subtree induced by kept leaves into `out`.
    fn copy_induced(
        &self,
        has_kept: &[bool],
        index: VertexIndex,
        new_parent: Option<VertexIndex>,
        carried_length: f64,
        out: &mut Tree,
    ) {
        let vertex = &self[index];
        let length = carried_length + vertex.branch_length();
        let kept_children: Vec<VertexIndex> = vertex
            .children()
            .iter()
            .copied()
            .filter(|&child| has_kept[child])
            .collect();

        // Unary vertex: collapse into its only remaining child
        if kept_children.len() == 1 {
            self.copy_induced(has_kept, kept_children[0], new_parent, length, out);
            return;
        }

        let new_index = match new_parent {
            None => out.root_index,
            Some(parent) => out.add_child(parent),
        };
        out[new_index].copy_payload_from(vertex);
        out[new_index].set_branch_length(length);

        for child in kept_children {
            self.copy_induced(has_kept, child, Some(new_index), 0.0, out);
        }
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
impl Tree {
    /// Renders a visual representation of the tree.
    ///
    /// # Example Output
    /// ```text
    /// Tree with 3 leaves (5 vertices total):
    /// Root: vertex 0
    ///   [0] Internal (branch: 0.000)
    ///     ├─ [1] Internal (branch: 0.300)
    ///     │   ├─ [2] Leaf "A" (branch: 0.100)
    ///     │   └─ [3] Leaf "B" (branch: 0.200) †
    ///     └─ [4] Leaf "C" (branch: 0.400)
    /// ```
    pub fn to_ascii(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Tree with {} leaves ({} vertices total):",
            self.num_leaves(),
            self.vertices.len()
        );
        let _ = writeln!(out, "Root: vertex {}", self.root_index);
        self.render_vertex(&mut out, self.root_index, "", true);
        out
    }

    /// Prints a visual representation of the tree to the console,
    /// see [`Tree::to_ascii`].
    pub fn print_tree(&self) {
        print!("{}", self.to_ascii());
    }

    /// Helper function to recursively render a vertex and its children.
    fn render_vertex(&self, out: &mut String, idx: VertexIndex, prefix: &str, is_last: bool) {
        let vertex = &self.vertices[idx];

        let connector = if prefix.is_empty() {
            "  "
        } else if is_last {
            "└─ "
        } else {
            "├─ "
        };
        let branch_str = format!("(branch: {:.3})", vertex.branch_length());

        if vertex.is_leaf() {
            let marker = if vertex.is_extinct() { " †" } else { "" };
            let _ = writeln!(
                out,
                "{}{}[{}] Leaf \"{}\" {}{}",
                prefix,
                connector,
                idx,
                vertex.name().unwrap_or("?"),
                branch_str,
                marker
            );
            return;
        }

        let _ = writeln!(out, "{}{}[{}] Internal {}", prefix, connector, idx, branch_str);

        let new_prefix = if prefix.is_empty() {
            "    ".to_string()
        } else {
            format!("{}{}   ", prefix, if is_last { " " } else { "│" })
        };

        let children = vertex.children();
        for (i, &child) in children.iter().enumerate() {
            self.render_vertex(out, child, &new_prefix, i + 1 == children.len());
        }
    }
}

// =$========================================================================$=
// PATH METRICS
// =$========================================================================$=
/// Root distances and depths of all vertices of one tree.
///
/// Computed once by [`Tree::path_metrics`]; only valid until the tree
/// is modified.
#[derive(Debug, Clone)]
pub struct PathMetrics {
    root_distances: Vec<f64>,
    depths: Vec<usize>,
}

impl PathMetrics {
    /// Returns the distance of the given vertex to the origin, see [`Tree::root_distances`].
    pub fn root_distance(&self, index: VertexIndex) -> f64 {
        self.root_distances[index]
    }

    /// Returns the root distances of all vertices, indexed by [VertexIndex].
    pub fn root_distances(&self) -> &[f64] {
        &self.root_distances
    }

    /// Returns the most recent common ancestor of two vertices.
    pub fn mrca(&self, tree: &Tree, a: VertexIndex, b: VertexIndex) -> VertexIndex {
        let (mut a, mut b) = (a, b);
        while self.depths[a] > self.depths[b] {
            a = tree[a].parent().unwrap_or(a);
        }
        while self.depths[b] > self.depths[a] {
            b = tree[b].parent().unwrap_or(b);
        }
        while a != b {
            match (tree[a].parent(), tree[b].parent()) {
                (Some(pa), Some(pb)) => {
                    a = pa;
                    b = pb;
                }
                _ => break,
            }
        }
        a
    }

    /// Returns the length of the path between two vertices.
    pub fn distance(&self, tree: &Tree, a: VertexIndex, b: VertexIndex) -> f64 {
        let ancestor = self.mrca(tree, a, b);
        self.root_distances[a] + self.root_distances[b] - 2.0 * self.root_distances[ancestor]
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl Tree {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Post-order traversal visits each vertex's children before visiting the vertex itself.
    /// This is useful for computing heights, aggregating data from leaves upward, etc.
    ///
    /// # Example
    /// ```
    /// use phylogen::model::Tree;
    ///
    /// let mut tree = Tree::new();
    /// let root = tree.root_index();
    /// tree.add_named_child(root, "A", 1.0);
    /// tree.add_named_child(root, "B", 1.0);
    ///
    /// let indices: Vec<_> = tree.post_order_iter().map(|v| v.index()).collect();
    /// assert_eq!(indices, vec![1, 2, 0]);
    /// ```
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Pre-order traversal visits each vertex before visiting its children,
    /// children in order of creation.
    ///
    /// # Example
    /// ```
    /// use phylogen::model::Tree;
    ///
    /// let mut tree = Tree::new();
    /// let root = tree.root_index();
    /// tree.add_named_child(root, "A", 1.0);
    /// tree.add_named_child(root, "B", 1.0);
    ///
    /// let indices: Vec<_> = tree.pre_order_iter().map(|v| v.index()).collect();
    /// assert_eq!(indices, vec![0, 1, 2]);
    /// ```
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited after all its descendants have been visited.
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        PostOrderIter {
            tree,
            stack: vec![(tree.root_index, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_leaf() {
                return Some(vertex);
            }

            self.stack.push((index, true));
            // Push children in reverse, so the first child is processed first
            for &child in vertex.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited before any of its descendants.
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        PreOrderIter {
            tree,
            stack: vec![tree.root_index],
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        self.stack.extend(vertex.children().iter().rev());

        Some(vertex)
    }
}
