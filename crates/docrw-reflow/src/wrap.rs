//! Soft-wrap tokenizer and greedy line packer.

use pulldown_cmark::{Event, Options, Parser};
use unicode_width::UnicodeWidthStr;

/// Byte ranges of inline-code spans (paired backticks) in `text`, reusing
/// `pulldown-cmark`'s inline parser rather than hand-rolling backtick
/// matching. A stray, unpaired backtick produces no range and is left as
/// an ordinary character, matching the spec's "no region opened" rule.
fn inline_code_ranges(text: &str) -> Vec<std::ops::Range<usize>> {
    Parser::new_ext(text, Options::empty())
        .into_offset_iter()
        .filter_map(|(event, range)| matches!(event, Event::Code(_)).then_some(range))
        .collect()
}

/// Split `text` into whitespace-delimited atoms, except that any inline
/// code span (including its backticks and any internal whitespace) is
/// emitted as a single atom.
pub fn tokenize(text: &str) -> Vec<String> {
    let ranges = inline_code_ranges(text);
    let bytes = text.as_bytes();
    let mut atoms = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if let Some(r) = ranges.iter().find(|r| r.start == i) {
            atoms.push(text[r.clone()].to_string());
            i = r.end;
            continue;
        }
        let mut j = i;
        while j < bytes.len()
            && !bytes[j].is_ascii_whitespace()
            && !ranges.iter().any(|r| r.start == j)
        {
            j += 1;
        }
        atoms.push(text[i..j].to_string());
        i = j;
    }
    atoms
}

/// Greedily pack atoms into lines of at most `width` display columns,
/// allowing a single overshoot past `width` (never past 150%) whenever
/// the line so far is already at least 75% full.
pub fn pack(atoms: &[String], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut cur = String::new();
    for atom in atoms {
        if cur.is_empty() {
            cur = atom.clone();
            continue;
        }
        let candidate_width = UnicodeWidthStr::width(cur.as_str()) + 1 + UnicodeWidthStr::width(atom.as_str());
        if candidate_width > width {
            let cur_width = UnicodeWidthStr::width(cur.as_str());
            let overshoots_badly = (candidate_width as f64) > 1.5 * (width as f64);
            let line_mostly_full = (cur_width as f64) >= 0.75 * (width as f64);
            if line_mostly_full && overshoots_badly {
                lines.push(std::mem::take(&mut cur));
                cur = atom.clone();
                continue;
            }
        }
        cur.push(' ');
        cur.push_str(atom);
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_inline_code_whitespace_intact() {
        let atoms = tokenize("call `foo  bar` now");
        assert_eq!(atoms, vec!["call", "`foo  bar`", "now"]);
    }

    #[test]
    fn stray_backtick_is_literal() {
        let atoms = tokenize("it's a foo` bar");
        assert_eq!(atoms, vec!["it's", "a", "foo`", "bar"]);
    }

    #[test]
    fn breaks_when_line_is_full_and_next_token_overshoots_badly() {
        let atoms: Vec<String> = "one two three four"
            .split_whitespace()
            .map(String::from)
            .collect();
        let lines = pack(&atoms, 7);
        assert_eq!(lines, vec!["one two", "three four"]);
    }

    #[test]
    fn allows_single_overshoot_when_line_mostly_full() {
        let atoms: Vec<String> = vec!["aaaaaaaaa".into(), "bbbbb".into()];
        let lines = pack(&atoms, 10);
        assert_eq!(lines, vec!["aaaaaaaaa bbbbb"]);
    }
}
