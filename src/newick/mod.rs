//! Newick output for simulated trees.
//!
//! # Quick API
//! * [`to_newick`] - Newick string, children in order of creation
//! * [`to_sorted_newick`] - canonical Newick string, independent of child order
//! * [`write_newick_file`] - one tree per line
//!
//! # Format
//! The writer produces the following grammar:
//! * `tree ::= vertex ';'`
//! * `vertex ::= leaf | internal_vertex`
//! * `internal_vertex ::= '(' vertex (',' vertex)* ')' [label] [branch_length]`
//! * `leaf ::= label [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Every vertex except the root has a branch length. Labels with spaces are
//! written with underscores; labels with punctuation are single quoted
//! (see [`escape_label`]). Vertices may have more than two children.

mod utils;
pub mod writer;

pub use self::utils::escape_label;
pub use self::writer::{
    NewickStyle, taxon_order, to_newick, to_newick_with, to_sorted_newick, write_newick_file,
};
