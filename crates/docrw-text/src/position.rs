//! Byte-offset <-> (line, column) mapping.
//!
//! Mirrors `core-text::Position`, but 1-based throughout (matching go/token's
//! `Position` convention, which `spec.md` §3 inherits) rather than 0-based.
//! A `LineIndex` is built once per parse and must be rebuilt after any byte
//! mutation -- it has no way to detect staleness itself, by design: callers
//! (the splicer, the line editor) are the ones that know when a reparse
//! happened.

use unicode_width::UnicodeWidthChar;

/// 1-based (line, column) position, plus the byte offset it was derived
/// from. Column is a *rune* column (spec.md §3/§4.B talk about rune counts,
/// not UTF-8 byte counts), counting each Unicode scalar value as one column
/// regardless of display width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// Maps byte offsets in a source file to 1-based (line, column) pairs.
///
/// Built from the raw bytes; invalidated by any splice. There is no
/// incremental update here on purpose -- §3's invariant is that *every*
/// byte mutation requires a reparse, and reparse rebuilds the index too.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the first byte of each line (0-based vec, 1-based
    /// lines: `line_starts[0]` is the start of line 1).
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(bytes: &[u8]) -> Self {
        let mut line_starts = vec![0usize];
        for (i, &b) in bytes.iter().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: bytes.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset of the first byte of `line` (1-based). Returns the
    /// file length for a one-past-the-end line (an empty trailing line).
    pub fn line_start(&self, line: usize) -> usize {
        if line == 0 {
            return 0;
        }
        self.line_starts
            .get(line - 1)
            .copied()
            .unwrap_or(self.len)
    }

    /// Byte offset one past the last byte of `line`, excluding its
    /// trailing newline.
    pub fn line_end(&self, line: usize) -> usize {
        let next_start = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.len);
        if next_start > self.line_start(line) && next_start <= self.len {
            // Strip the newline we stopped at, if there is one.
            let mut end = next_start;
            if end > self.line_start(line) {
                end -= 1;
            }
            end
        } else {
            next_start
        }
    }

    /// Convert a byte offset into a 1-based (line, column) position. The
    /// column counts Unicode scalar values, not bytes, per spec.md's rune
    /// convention.
    pub fn offset_to_position(&self, bytes: &[u8], offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        };
        let line_start = self.line_start(line);
        let column = std::str::from_utf8(&bytes[line_start..offset.min(bytes.len())])
            .map(|s| s.chars().count() + 1)
            .unwrap_or(1);
        Position::new(line, column, offset)
    }

    /// Byte offset of the start of the 1-based `line`.
    pub fn position_to_offset(&self, line: usize) -> usize {
        self.line_start(line)
    }
}

/// Printed column width of `s`, expanding tabs to `tab_width` spaces and
/// using display width (not rune count) for everything else -- used by the
/// EOL-vs-Doc Decider's `indentInSpaces` and the reflow soft-wrap packer.
pub fn display_width(s: &str, tab_width: usize) -> usize {
    let mut width = 0;
    for c in s.chars() {
        if c == '\t' {
            width += tab_width - (width % tab_width.max(1));
        } else {
            width += UnicodeWidthChar::width(c).unwrap_or(0);
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_starts_track_newlines() {
        let bytes = b"abc\ndef\nghi";
        let idx = LineIndex::new(bytes);
        assert_eq!(idx.line_count(), 3);
        assert_eq!(idx.line_start(1), 0);
        assert_eq!(idx.line_start(2), 4);
        assert_eq!(idx.line_start(3), 8);
    }

    #[test]
    fn offset_to_position_counts_runes_not_bytes() {
        let bytes = "a\u{00e9}b\ncd".as_bytes();
        let idx = LineIndex::new(bytes);
        // 'b' is the 3rd rune on line 1, even though 'é' is two bytes.
        let pos = idx.offset_to_position(bytes, 3);
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 3);
    }

    #[test]
    fn display_width_expands_tabs() {
        assert_eq!(display_width("\tx", 4), 5);
        assert_eq!(display_width("ab", 4), 2);
    }
}
