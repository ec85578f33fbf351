//! Vertex module for simulated phylogenetic trees.

use crate::model::tree::VertexIndex;

/// Identifier of a character state; fresh ids are handed out by the
/// character evolver from a global counter.
pub type StateId = usize;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a simulated phylogenetic tree.
///
/// Unlike a parsed tree, a simulated tree grows vertex by vertex, so a vertex
/// starts out as an extant leaf and may later gain any number of children
/// (polytomies included) or go extinct.
///
/// # Invariants
/// - `index` is the position of this vertex in the tree arena
/// - `parent` is `None` exactly for the root
/// - `branch_length` is finite and non-negative (enforced)
/// - an extinct vertex is a leaf and never gains children
/// - `states`, once set, has the same length on every vertex of a tree
#[derive(PartialEq, Debug, Clone)]
pub struct Vertex {
    /// Index of this vertex in the tree arena
    pub(crate) index: VertexIndex,
    /// Index of the parent vertex, `None` for the root
    pub(crate) parent: Option<VertexIndex>,
    /// Indices of the child vertices, in order of creation
    pub(crate) children: Vec<VertexIndex>,
    /// Distance to parent vertex
    pub(crate) branch_length: f64,
    /// Whether the lineage ending in this vertex died out
    pub(crate) extinct: bool,
    /// Leaf name, assigned once the topology is final
    pub(crate) name: Option<String>,
    /// Character states, assigned by the character evolver
    pub(crate) states: Option<Vec<StateId>>,
}

impl Vertex {
    /// Creates a new extant vertex without children and with branch length 0.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `parent` - Index of the parent vertex, `None` for a root
    pub(crate) fn new(index: VertexIndex, parent: Option<VertexIndex>) -> Self {
        Vertex {
            index,
            parent,
            children: Vec::new(),
            branch_length: 0.0,
            extinct: false,
            name: None,
            states: None,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        self.index
    }

    /// Returns the index of the parent, or `None` if this is the root.
    pub fn parent(&self) -> Option<VertexIndex> {
        self.parent
    }

    /// Returns the indices of the children of this vertex.
    pub fn children(&self) -> &[VertexIndex] {
        &self.children
    }

    /// Returns the length of the branch leading to this vertex.
    pub fn branch_length(&self) -> f64 {
        self.branch_length
    }

    /// Sets the length of the branch leading to this vertex.
    ///
    /// # Panics
    /// Panics if `branch_length` is negative or not finite.
    pub fn set_branch_length(&mut self, branch_length: f64) {
        assert!(
            branch_length.is_finite() && branch_length >= 0.0,
            "Branch length must be finite and non-negative, got {branch_length}"
        );
        self.branch_length = branch_length;
    }

    /// Extends the branch leading to this vertex by `delta`.
    ///
    /// # Panics
    /// Panics if the resulting length is negative or not finite.
    pub fn extend_branch(&mut self, delta: f64) {
        self.set_branch_length(self.branch_length + delta);
    }

    /// Returns whether this vertex has gone extinct.
    pub fn is_extinct(&self) -> bool {
        self.extinct
    }

    /// Marks this vertex as extinct.
    ///
    /// # Panics
    /// Panics if the vertex has children; only leaves can die out.
    pub fn set_extinct(&mut self) {
        assert!(self.children.is_empty(), "Only leaves can go extinct");
        self.extinct = true;
    }

    /// Returns the name of this vertex, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets the name of this vertex.
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = Some(name.into());
    }

    /// Returns the character states of this vertex, if evolved.
    pub fn states(&self) -> Option<&[StateId]> {
        self.states.as_deref()
    }

    /// Sets the character states of this vertex.
    pub fn set_states(&mut self, states: Vec<StateId>) {
        self.states = Some(states);
    }

    /// Returns whether this vertex is the root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns whether this vertex is a leaf (has no children).
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns whether this vertex is internal (has children).
    pub fn is_internal(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns whether this vertex is an extant leaf, i.e. a leaf that did not die out.
    pub fn is_extant(&self) -> bool {
        self.is_leaf() && !self.extinct
    }

    /// Copies name, extinction and states from `other`, used when rebuilding an arena.
    pub(crate) fn copy_payload_from(&mut self, other: &Vertex) {
        self.extinct = other.extinct;
        self.name = other.name.clone();
        self.states = other.states.clone();
    }
}
