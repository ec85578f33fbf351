//! NEXUS output for simulated trees and their characters.
//!
//! This module provides [NexusWriter], which writes a single tree as:
//! - a `DATA` block with a binary character matrix, one row per taxon
//! - a `TREES` block with a `TRANSLATE` command and the tree in Newick format
//!
//! # Character matrix
//! For every character, the states observed at the leaves are collected
//! and sorted. Each taxon then gets one `0`/`1` column per observed state,
//! `1` marking the state the taxon has. Taxa are sorted by name and names
//! are left aligned, spaces replaced by underscores.
//!
//! ```text
//! #NEXUS
//!
//! begin data;
//!   dimensions ntax=3 nchar=4;
//!   format datatype=standard missing=? gap=-;
//!   matrix
//! A    1010
//! B    1001
//! C    0110
//!   ;
//! end;
//! ```
//!
//! If the tree carries no character states, a warning comment is written
//! and the matrix has no columns.

mod defs;
pub mod writer;

pub use self::writer::{NexusWriter, to_nexus};
