//! Byte-buffer, position-mapping, and splice primitives shared across the
//! documentation rewriting engine.
//!
//! This crate plays the role `core-text` plays for the editor this engine
//! was adapted from: it knows nothing about Go syntax or doc comments, only
//! about bytes, lines, columns, and the two ways those bytes may be
//! mutated.

mod position;
mod splice;

pub use position::{display_width, LineIndex, Position};
pub use splice::{delete_range, splice};

/// A declarative, line-addressed edit (spec.md §3 "Edit Op"). `line` is
/// always 1-based and refers to the *pre-edit* file -- the Block
/// Formatter emits these, the Line-Edit Applier consumes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    InsertBlankLineAbove(usize),
    RemoveBlankLine(usize),
    SetEOLComment(usize, String),
    RemoveEOLComment(usize),
}

impl EditOp {
    pub fn line(&self) -> usize {
        match self {
            EditOp::InsertBlankLineAbove(l)
            | EditOp::RemoveBlankLine(l)
            | EditOp::SetEOLComment(l, _)
            | EditOp::RemoveEOLComment(l) => *l,
        }
    }
}

/// The raw, owned bytes of one source file plus its derived line index.
/// Re-derived on every reparse; see `docrw_syntax::File` for the AST layer
/// built on top of this.
#[derive(Debug, Clone)]
pub struct SourceBuf {
    bytes: Vec<u8>,
    index: LineIndex,
}

impl SourceBuf {
    pub fn new(bytes: Vec<u8>) -> Self {
        let index = LineIndex::new(&bytes);
        Self { bytes, index }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn index(&self) -> &LineIndex {
        &self.index
    }

    pub fn position_of(&self, offset: usize) -> Position {
        self.index.offset_to_position(&self.bytes, offset)
    }

    /// Apply a splice and return a *new* `SourceBuf` with a freshly built
    /// index -- this is the only supported way to mutate: there is no
    /// `splice_in_place`, because an in-place mutation without a fresh
    /// index would violate the reparse invariant by construction.
    pub fn spliced(&self, text: &str, start: usize, end: usize) -> Self {
        Self::new(splice(&self.bytes, text, start, end))
    }

    pub fn deleted(&self, start: usize, end: usize, absorb_left_ws: bool) -> Self {
        Self::new(delete_range(&self.bytes, start, end, absorb_left_ws))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spliced_rebuilds_index() {
        let buf = SourceBuf::new(b"a\nb\n".to_vec());
        assert_eq!(buf.index().line_count(), 3);
        let buf2 = buf.spliced("x\ny\n", 2, 2);
        assert_eq!(buf2.bytes(), b"a\nx\ny\nb\n");
        assert_eq!(buf2.index().line_count(), 5);
    }
}
