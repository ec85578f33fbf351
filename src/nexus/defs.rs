//! NEXUS format constants.
//!
//! Byte string constants for writing character matrices and trees
//! in NEXUS format.

/// NEXUS file header "#NEXUS"
pub(crate) const NEXUS_HEADER: &[u8] = b"#NEXUS";

/// Comment emitted when the tree carries no character states
pub(crate) const MISSING_CHARS_WARNING: &[u8] = b"[WARNING: characters missing from tree]";

/// NEXUS block begin keyword "begin"
pub(crate) const BLOCK_BEGIN: &[u8] = b"begin";

/// NEXUS block end keyword "end;" (with semicolon)
pub(crate) const BLOCK_END: &[u8] = b"end;";

/// Indentation of commands within a block
pub(crate) const INDENT: &[u8] = b"  ";

// Data block keywords
/// DATA block identifier "data;" (with semicolon)
pub(crate) const DATA: &[u8] = b"data;";

/// DATA block dimensions keyword "dimensions"
pub(crate) const DIMENSIONS: &[u8] = b"dimensions";

/// Number of taxa parameter "ntax"
pub(crate) const NTAX: &[u8] = b"ntax";

/// Number of characters parameter "nchar"
pub(crate) const NCHAR: &[u8] = b"nchar";

/// Format command for binary standard data
pub(crate) const FORMAT_STANDARD: &[u8] = b"format datatype=standard missing=? gap=-;";

/// Matrix command "matrix"
pub(crate) const MATRIX: &[u8] = b"matrix";

/// Extra columns between the longest taxon name and the character states
pub(crate) const MATRIX_NAME_PADDING: usize = 3;

// Trees block keywords
/// TREES block identifier "trees;" (with semicolon)
pub(crate) const TREES: &[u8] = b"trees;";

/// TREES block translate command "translate"
pub(crate) const TRANSLATE: &[u8] = b"translate";

/// Individual tree declaration keyword "tree"
pub(crate) const TREE: &[u8] = b"tree";

/// Name given to the written tree
pub(crate) const TREE_NAME: &[u8] = b"sim";
