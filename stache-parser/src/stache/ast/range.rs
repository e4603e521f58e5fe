//! Position tracking for template source
//!
//! This module defines the 1-based [`SourcePosition`] reported on tokens and diagnostics,
//! and the [`LineIndex`] used to turn byte offsets into positions.
//!
//! ## Key Design
//!
//! - **One scan**: the newline table is built once per template, in ascending order
//! - **Binary search**: `locate` is O(log n) in the number of lines
//! - **Unicode-aware columns**: columns count characters, not bytes, so a tag after a
//!   multi-byte character still reports the column a human would count
//! - **Human numbering**: both line and column start at 1

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// A line:column position in template source, both 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Sorted table of newline offsets for one template
#[derive(Debug, Clone)]
pub struct LineIndex<'src> {
    source: &'src str,
    /// Byte offsets of every `\n`, ascending
    newlines: Vec<usize>,
}

impl<'src> LineIndex<'src> {
    /// Scan `source` once and record where its newlines are
    pub fn build(source: &'src str) -> Self {
        let newlines = source
            .bytes()
            .enumerate()
            .filter(|(_, byte)| *byte == b'\n')
            .map(|(offset, _)| offset)
            .collect();

        Self { source, newlines }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Convert a byte offset into a 1-based line/column position
    ///
    /// Offsets before the first newline are on line 1; offsets past the last newline are
    /// on the last line. A newline character itself belongs to the line it terminates.
    pub fn locate(&self, offset: usize) -> SourcePosition {
        let offset = offset.min(self.source.len());
        let line = self.line_of(offset);
        let line_start = self.line_start(line);

        let column = self
            .source
            .get(line_start..offset)
            .map(|text| text.chars().count())
            .unwrap_or(offset - line_start);

        SourcePosition::new(line + 1, column + 1)
    }

    /// Byte range of the line containing `offset`, without its newline
    pub fn line_bounds(&self, offset: usize) -> Range<usize> {
        let offset = offset.min(self.source.len());
        let line = self.line_of(offset);
        let end = self
            .newlines
            .get(line)
            .copied()
            .unwrap_or(self.source.len());
        self.line_start(line)..end
    }

    /// Number of lines in the template (an empty template has one)
    pub fn line_count(&self) -> usize {
        self.newlines.len() + 1
    }

    /// Zero-based line index for an offset
    fn line_of(&self, offset: usize) -> usize {
        match self.newlines.binary_search(&offset) {
            Ok(line) | Err(line) => line,
        }
    }

    fn line_start(&self, line: usize) -> usize {
        if line == 0 {
            0
        } else {
            self.newlines[line - 1] + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_display() {
        assert_eq!(SourcePosition::new(3, 7).to_string(), "3:7");
    }

    #[test]
    fn test_locate_single_line() {
        let index = LineIndex::build("Hello {{name}}!");
        assert_eq!(index.locate(0), SourcePosition::new(1, 1));
        assert_eq!(index.locate(6), SourcePosition::new(1, 7));
        assert_eq!(index.line_count(), 1);
    }

    #[test]
    fn test_locate_multiple_lines() {
        let source = "first\nsecond\nthird";
        let index = LineIndex::build(source);

        assert_eq!(index.locate(4), SourcePosition::new(1, 5));
        // The newline belongs to the line it ends
        assert_eq!(index.locate(5), SourcePosition::new(1, 6));
        assert_eq!(index.locate(6), SourcePosition::new(2, 1));
        assert_eq!(index.locate(13), SourcePosition::new(3, 1));
        assert_eq!(index.locate(17), SourcePosition::new(3, 5));
    }

    #[test]
    fn test_locate_past_end_is_clamped() {
        let index = LineIndex::build("ab\ncd");
        assert_eq!(index.locate(100), SourcePosition::new(2, 3));
    }

    #[test]
    fn test_locate_counts_characters() {
        let source = "héllo {{x}}";
        let index = LineIndex::build(source);
        let offset = source.find("{{").unwrap();
        assert_eq!(index.locate(offset), SourcePosition::new(1, 7));
    }

    #[test]
    fn test_line_bounds() {
        let source = "one\ntwo\nthree";
        let index = LineIndex::build(source);
        assert_eq!(&source[index.line_bounds(5)], "two");
        assert_eq!(&source[index.line_bounds(0)], "one");
        assert_eq!(&source[index.line_bounds(12)], "three");
    }
}
