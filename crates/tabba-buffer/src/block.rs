//! Block parsing and joining.
//!
//! ## Learning: Lifetimes
//!
//! `Block<'a>` holds `&'a str` slices into the content it was parsed
//! from. The `'a` ties every block to that content: the compiler will not
//! let a block outlive (or observe a mutation of) its source text, and
//! parsing never copies a line.

use std::fmt;

/// Canonical separator between blocks: exactly one blank line.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// A maximal run of consecutive non-blank lines.
///
/// One block is one row of tab across all strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    lines: Vec<&'a str>,
}

impl<'a> Block<'a> {
    /// Returns the lines of this block, without line terminators.
    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    /// Number of lines in the block.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Blocks produced by [`blocks`] are never empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Whitespace for block splitting. Unicode whitespace plus U+FEFF, so a
/// byte order mark pasted at the start of content is trimmed too.
fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// A line is blank when it holds nothing but whitespace.
fn is_blank(line: &str) -> bool {
    line.chars().all(is_space)
}

/// Splits content into blocks.
///
/// Leading and trailing whitespace (including a byte order mark) of the
/// whole content is ignored, and
/// any run of one or more blank lines (including lines of spaces or tabs)
/// counts as a single separator. Horizontal whitespace that belongs to a
/// non-blank line is kept.
///
/// Empty or whitespace-only content has no blocks.
pub fn blocks(content: &str) -> Vec<Block<'_>> {
    let mut result = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.trim_matches(is_space).split('\n') {
        if is_blank(line) {
            if !current.is_empty() {
                result.push(Block {
                    lines: std::mem::take(&mut current),
                });
            }
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        result.push(Block { lines: current });
    }

    result
}

/// Counts blocks without keeping them.
pub fn block_count(content: &str) -> usize {
    blocks(content).len()
}

/// Joins blocks with the canonical separator.
pub fn join_blocks(blocks: &[Block<'_>]) -> String {
    blocks
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}
