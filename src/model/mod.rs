//! Data model for simulated phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [Tree], which uses the arena pattern to store
//! [Vertex] nodes referenced by [VertexIndex]. A tree grows from a single
//! root; every vertex may have any number of children, and leaves are
//! either extant or extinct.
//!
//! Beyond topology and branch lengths, vertices carry an optional name
//! (assigned to leaves by [crate::labels]) and optional character states
//! (assigned by [crate::characters]).

pub mod tree;
pub mod vertex;

pub use tree::PathMetrics;
pub use tree::Tree;
pub use tree::VertexIndex;
pub use vertex::StateId;
pub use vertex::Vertex;
