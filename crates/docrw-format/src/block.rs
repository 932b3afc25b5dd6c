//! Block Formatter (spec.md §4.E): whitespace edits inside a composite
//! block (var/const block, struct/interface body) after splicing.

use docrw_text::EditOp;

/// One documentable member inside a composite block, in source order.
/// Floating comments are modeled as their own doc-bearing entity per
/// spec.md §4.E rule 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockEntity {
    /// First line of the entity -- the doc's line when `has_doc`,
    /// otherwise the same as `code_start_line`.
    pub start_line: usize,
    pub code_start_line: usize,
    pub end_line: usize,
    pub has_doc: bool,
}

/// Compute the ordered `EditOp`s needed to bring `entities` (already in
/// source order) into compliance with the spacing rules, given the lines
/// of the block's own opening and closing delimiter.
pub fn format_block(
    entities: &[BlockEntity],
    block_open_line: usize,
    block_close_line: usize,
) -> Vec<EditOp> {
    let mut ops = Vec::new();

    if let Some(first) = entities.first() {
        for line in (block_open_line + 1)..first.start_line {
            ops.push(EditOp::RemoveBlankLine(line));
        }
    }
    if let Some(last) = entities.last() {
        for line in (last.end_line + 1)..block_close_line {
            ops.push(EditOp::RemoveBlankLine(line));
        }
    }

    for pair in entities.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let gap_start = a.end_line + 1;
        let gap_len = b.start_line.saturating_sub(gap_start);
        let needs_blank = a.has_doc || b.has_doc;
        if needs_blank {
            if gap_len == 0 {
                ops.push(EditOp::InsertBlankLineAbove(b.start_line));
            } else if gap_len > 1 {
                for line in (gap_start + 1)..b.start_line {
                    ops.push(EditOp::RemoveBlankLine(line));
                }
            }
        } else {
            for line in gap_start..b.start_line {
                ops.push(EditOp::RemoveBlankLine(line));
            }
        }
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(start: usize, code_start: usize, end: usize, has_doc: bool) -> BlockEntity {
        BlockEntity {
            start_line: start,
            code_start_line: code_start,
            end_line: end,
            has_doc,
        }
    }

    #[test]
    fn strips_leading_and_trailing_blank_lines() {
        let entities = vec![entity(3, 3, 3, false)];
        let ops = format_block(&entities, 1, 5);
        assert_eq!(
            ops,
            vec![EditOp::RemoveBlankLine(2), EditOp::RemoveBlankLine(4)]
        );
    }

    #[test]
    fn no_blank_between_adjacent_undocumented_single_liners() {
        let entities = vec![entity(3, 3, 3, false), entity(5, 5, 5, false)];
        let ops = format_block(&entities, 2, 6);
        assert_eq!(ops, vec![EditOp::RemoveBlankLine(4)]);
    }

    #[test]
    fn inserts_blank_above_documented_member_when_missing() {
        let entities = vec![entity(3, 3, 3, false), entity(4, 5, 5, true)];
        let ops = format_block(&entities, 2, 6);
        assert_eq!(ops, vec![EditOp::InsertBlankLineAbove(4)]);
    }

    #[test]
    fn collapses_multiple_blanks_around_documented_member_to_one() {
        let entities = vec![entity(3, 3, 3, false), entity(6, 7, 7, true)];
        let ops = format_block(&entities, 2, 8);
        assert_eq!(ops, vec![EditOp::RemoveBlankLine(5)]);
    }
}
