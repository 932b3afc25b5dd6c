//! Byte splice primitives (spec.md §4.D.7).
//!
//! These are the only two ways the engine ever mutates a file's bytes.
//! Both operate on a plain `&[u8]` and return an owned `Vec<u8>`; neither
//! touches a position table, because every caller is required to reparse
//! (and rebuild a fresh `LineIndex`) before its next splice (spec.md §3,
//! invariant 1; §5, locking discipline).
//!
//! Out-of-range `start`/`end` panic rather than returning a `Result`: the
//! spec calls this out explicitly as "a deliberate invariant assertion"
//! (§4.D.7) -- a caller that got an offset wrong has a logic bug, not a
//! recoverable runtime condition.

/// Replace `bytes[start..end]` with `text`.
pub fn splice(bytes: &[u8], text: &str, start: usize, end: usize) -> Vec<u8> {
    assert!(start <= end, "splice: start {start} > end {end}");
    assert!(
        end <= bytes.len(),
        "splice: end {end} exceeds buffer length {}",
        bytes.len()
    );
    let mut out = Vec::with_capacity(bytes.len() - (end - start) + text.len());
    out.extend_from_slice(&bytes[..start]);
    out.extend_from_slice(text.as_bytes());
    out.extend_from_slice(&bytes[end..]);
    out
}

/// Delete `bytes[start..end]`. If `absorb_left_ws`, the deletion first
/// extends leftward over any run of spaces/tabs, then through *exactly
/// one* preceding newline -- so removing a leading doc comment also
/// removes the now-empty line it lived on, without eating a second blank
/// line above it.
pub fn delete_range(bytes: &[u8], start: usize, end: usize, absorb_left_ws: bool) -> Vec<u8> {
    assert!(start <= end, "delete_range: start {start} > end {end}");
    assert!(
        end <= bytes.len(),
        "delete_range: end {end} exceeds buffer length {}",
        bytes.len()
    );
    let mut real_start = start;
    if absorb_left_ws {
        while real_start > 0 && matches!(bytes[real_start - 1], b' ' | b'\t') {
            real_start -= 1;
        }
        if real_start > 0 && bytes[real_start - 1] == b'\n' {
            real_start -= 1;
        }
    }
    let mut out = Vec::with_capacity(bytes.len() - (end - real_start));
    out.extend_from_slice(&bytes[..real_start]);
    out.extend_from_slice(&bytes[end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splice_replaces_range() {
        let bytes = b"hello world";
        let out = splice(bytes, "there", 6, 11);
        assert_eq!(out, b"hello there");
    }

    #[test]
    fn delete_range_absorbs_one_leading_newline_and_indent() {
        let bytes = b"x\n    // doc\nvar Foo int\n";
        // Delete "// doc" (the comment group), absorbing the indent before
        // it and the single preceding newline.
        let start = bytes.iter().position(|&b| b == b'/').unwrap();
        let end = start + "// doc".len();
        let out = delete_range(bytes, start, end, true);
        assert_eq!(out, b"x\nvar Foo int\n");
    }

    #[test]
    fn delete_range_stops_after_one_newline() {
        let bytes = b"x\n\n    // doc\ny\n";
        let start = bytes.iter().position(|&b| b == b'/').unwrap();
        let end = start + "// doc".len();
        let out = delete_range(bytes, start, end, true);
        // Only the blank-indent line is removed; the earlier blank line
        // above it survives.
        assert_eq!(out, b"x\n\ny\n");
    }

    #[test]
    #[should_panic]
    fn splice_panics_on_out_of_range() {
        let bytes = b"short";
        splice(bytes, "x", 0, 100);
    }
}
