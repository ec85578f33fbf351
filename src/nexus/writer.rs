//! NEXUS format writer for a [`Tree`] with character states.

use crate::model::{StateId, Tree, VertexIndex};
use crate::newick::{NewickStyle, escape_label, taxon_order, to_newick_with};
use crate::nexus::defs::{
    BLOCK_BEGIN, BLOCK_END, DATA, DIMENSIONS, FORMAT_STANDARD, INDENT, MATRIX, MATRIX_NAME_PADDING,
    MISSING_CHARS_WARNING, NCHAR, NEXUS_HEADER, NTAX, TRANSLATE, TREE, TREE_NAME, TREES,
};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

// =#========================================================================#=
// NEXUS WRITER
// =#========================================================================#=
/// Writer for a simulated tree and its characters in NEXUS format.
///
/// # Format Structure
/// The writer produces output with the following structure:
/// - `#NEXUS` header (plus a warning comment if characters are missing)
/// - `DATA` block with dimensions and the binary character matrix
/// - `TREES` block with TRANSLATE command and the tree definition
///
/// # Example
/// ```no_run
/// use phylogen::nexus::NexusWriter;
///
/// let tree = phylogen::generate_tree(1.0, 0.5, Some(10), None, None)?;
/// let mut writer = NexusWriter::create("output.nex")?;
/// writer.write_nexus(&tree)?;
/// # Ok::<(), phylogen::GenerationError>(())
/// ```
pub struct NexusWriter<W: Write> {
    bw: BufWriter<W>,
}

/// Taxa of a tree in output order with their names and matrix rows.
struct Taxa {
    names: Vec<String>,
    rows: Option<Vec<String>>,
}

impl Taxa {
    fn collect(tree: &Tree) -> Self {
        let leaves = taxon_order(tree);
        let names = leaves
            .iter()
            .enumerate()
            .map(|(key, &leaf)| match tree[leaf].name() {
                Some(name) => name.to_string(),
                None => (key + 1).to_string(),
            })
            .collect();
        let rows = character_rows(tree, &leaves);
        Taxa { names, rows }
    }
}

// ============================================================================
// API (public)
// ============================================================================
impl NexusWriter<File> {
    /// Creates a NEXUS writer for a new file at `path`.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(NexusWriter::new(File::create(path)?))
    }
}

impl<W: Write> NexusWriter<W> {
    /// Creates a new NEXUS writer on top of the given sink.
    pub fn new(inner: W) -> Self {
        NexusWriter {
            bw: BufWriter::new(inner),
        }
    }

    /// Writes the complete NEXUS representation of `tree`.
    ///
    /// # Errors
    /// Returns an I/O error if writing fails
    pub fn write_nexus(&mut self, tree: &Tree) -> io::Result<()> {
        let taxa = Taxa::collect(tree);
        self.header(&taxa)?
            .data_block(&taxa)?
            .newline()?
            .trees_block(tree, &taxa)?;
        self.bw.flush()
    }

    /// Flushes and returns the underlying sink.
    pub fn into_inner(self) -> io::Result<W> {
        self.bw.into_inner().map_err(|err| err.into_error())
    }
}

/// Returns the NEXUS representation of `tree` as a string.
///
/// # Errors
/// Returns an I/O error if writing fails, which does not happen for in-memory output.
pub fn to_nexus(tree: &Tree) -> io::Result<String> {
    let mut writer = NexusWriter::new(Vec::new());
    writer.write_nexus(tree)?;
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ============================================================================
// Nexus Block & Command Writing (private)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Writes the NEXUS file header ("#NEXUS") and an empty line,
    /// plus the missing characters warning if needed.
    fn header(&mut self, taxa: &Taxa) -> io::Result<&mut Self> {
        self.write_all(NEXUS_HEADER)?.newline()?.newline()?;
        if taxa.rows.is_none() {
            self.write_all(MISSING_CHARS_WARNING)?.newline()?.newline()?;
        }
        Ok(self)
    }

    /// Writes the DATA block with dimensions, format and character matrix.
    fn data_block(&mut self, taxa: &Taxa) -> io::Result<&mut Self> {
        // "begin data;"
        self.write_all(BLOCK_BEGIN)?.space()?.write_all(DATA)?.newline()?;

        // "  dimensions ntax=n nchar=m;"
        let nchar = taxa
            .rows
            .as_ref()
            .and_then(|rows| rows.first())
            .map_or(0, |row| row.len());
        self.write_all(INDENT)?
            .write_all(DIMENSIONS)?
            .space()?
            .write_all(NTAX)?
            .equals()?
            .write_all(taxa.names.len().to_string().as_bytes())?
            .space()?
            .write_all(NCHAR)?
            .equals()?
            .write_all(nchar.to_string().as_bytes())?
            .semicolon_ln()?;

        // "  format datatype=standard missing=? gap=-;"
        self.write_all(INDENT)?.write_all(FORMAT_STANDARD)?.newline()?;

        // "  matrix" + one aligned row per taxon
        self.write_all(INDENT)?.write_all(MATRIX)?.newline()?;
        let width = taxa.names.iter().map(|name| name.chars().count()).max().unwrap_or(0)
            + MATRIX_NAME_PADDING;
        for (i, name) in taxa.names.iter().enumerate() {
            let row = taxa.rows.as_ref().map_or("", |rows| rows[i].as_str());
            let line = format!("{:<width$} {}", name.replace(' ', "_"), row);
            self.write_all(line.as_bytes())?.newline()?;
        }
        self.write_all(INDENT)?.semicolon_ln()?;

        // "end;"
        self.write_all(BLOCK_END)?.newline()?;

        Ok(self)
    }

    /// Writes the TREES block with TRANSLATE command and the tree.
    fn trees_block(&mut self, tree: &Tree, taxa: &Taxa) -> io::Result<&mut Self> {
        // "begin trees;"
        self.write_all(BLOCK_BEGIN)?.space()?.write_all(TREES)?.newline()?;

        // "  translate" + "    <key> <label>," lines
        self.write_all(INDENT)?.write_all(TRANSLATE)?.newline()?;
        let num_taxa = taxa.names.len();
        for (i, name) in taxa.names.iter().enumerate() {
            self.write_all(INDENT)?
                .write_all(INDENT)?
                .write_all((i + 1).to_string().as_bytes())?
                .space()?
                .write_all(escape_label(name).as_bytes())?;

            // No comma after last pair
            if i + 1 < num_taxa {
                self.comma()?;
            }
            self.newline()?;
        }
        self.write_all(INDENT)?.semicolon_ln()?;

        // "  tree sim = <Newick>;"
        let newick = to_newick_with(tree, NewickStyle::OneIndexed, false);
        self.write_all(INDENT)?
            .write_all(TREE)?
            .space()?
            .write_all(TREE_NAME)?
            .space()?
            .equals()?
            .space()?
            .write_all(newick.as_bytes())?
            .newline()?;

        // "end;"
        self.write_all(BLOCK_END)?.newline()?;

        Ok(self)
    }
}

/// Builds the binary presence strings of all `leaves`, or `None` if some
/// leaf carries no character states.
fn character_rows(tree: &Tree, leaves: &[VertexIndex]) -> Option<Vec<String>> {
    let states: Vec<&[StateId]> = leaves
        .iter()
        .map(|&leaf| tree[leaf].states())
        .collect::<Option<_>>()?;
    let num_chars = states.iter().map(|s| s.len()).min().unwrap_or(0);

    // Sorted states observed per character
    let observed: Vec<Vec<StateId>> = (0..num_chars)
        .map(|c| {
            let set: BTreeSet<StateId> = states.iter().map(|s| s[c]).collect();
            set.into_iter().collect()
        })
        .collect();

    let rows = states
        .iter()
        .map(|taxon_states| {
            observed
                .iter()
                .enumerate()
                .flat_map(|(c, observed_states)| {
                    observed_states
                        .iter()
                        .map(move |&state| if taxon_states[c] == state { '1' } else { '0' })
                })
                .collect()
        })
        .collect();

    Some(rows)
}

// ============================================================================
// Little Helpers (private)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Appends a byte slice to the [BufWriter], returning itself for chaining.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<&mut Self> {
        self.bw.write_all(buf)?;
        Ok(self)
    }

    /// Appends a space character (' '), returning itself for chaining.
    fn space(&mut self) -> io::Result<&mut Self> {
        self.write_all(b" ")
    }

    /// Appends a newline character ('\n'), returning itself for chaining.
    fn newline(&mut self) -> io::Result<&mut Self> {
        self.write_all(b"\n")
    }

    /// Appends a semicolon followed by a newline (';\n'), returning itself for chaining.
    fn semicolon_ln(&mut self) -> io::Result<&mut Self> {
        self.write_all(b";\n")
    }

    /// Appends a comma (','), returning itself for chaining.
    fn comma(&mut self) -> io::Result<&mut Self> {
        self.write_all(b",")
    }

    /// Appends an equals sign ('='), returning itself for chaining.
    fn equals(&mut self) -> io::Result<&mut Self> {
        self.write_all(b"=")
    }
}
