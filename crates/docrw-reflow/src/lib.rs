//! Prose Reflow: wrap a doc-comment block to a target column, preserving
//! lists, code lines, inline code, and pragmas.

mod classify;
mod wrap;

pub use classify::{classify_and_group, Group};
pub use wrap::{pack, tokenize};

use docrw_syntax::Printer;

/// Width consumed by the bulleted/numbered-list markers and their aligned
/// continuation indent: `"//   - "` / `"//     "` are both 7 columns.
const LIST_MARKER_WIDTH: usize = 7;
/// Width consumed by `"// "` on an ordinary paragraph line.
const PARAGRAPH_MARKER_WIDTH: usize = 3;

/// Reflow one doc-comment block.
///
/// `indent_tabs` is the block's indentation depth in tabs; `tab_width` is
/// how many display columns one tab occupies; `width` is the target
/// total column budget (tabs included). Always newline-terminated, every
/// content line prefixed with `//`.
pub fn reflow_block(
    raw_block: &str,
    indent_tabs: usize,
    tab_width: usize,
    width: usize,
    printer: &dyn Printer,
) -> String {
    let prepassed = match printer.format_doc_block(raw_block) {
        Ok(text) => text,
        Err(_) => raw_block.to_string(),
    };
    let groups = classify_and_group(&prepassed);
    let indent = "\t".repeat(indent_tabs);
    let used_by_indent = indent_tabs * tab_width;
    let paragraph_width = width.saturating_sub(used_by_indent + PARAGRAPH_MARKER_WIDTH).max(1);
    let list_width = width.saturating_sub(used_by_indent + LIST_MARKER_WIDTH).max(1);

    let mut out = String::new();
    let mut groups_iter = groups.into_iter().peekable();
    while let Some(group) = groups_iter.next() {
        let followed_by_paragraph = matches!(groups_iter.peek(), Some(Group::Paragraph(_)));
        match group {
            Group::Blank => {
                out.push_str(&indent);
                out.push_str("//\n");
            }
            Group::Pragma(text) => {
                out.push_str(&indent);
                out.push_str(&text);
                out.push('\n');
            }
            Group::Code(lines) => {
                for line in lines {
                    out.push_str(&indent);
                    out.push_str("//\t");
                    out.push_str(&line);
                    out.push('\n');
                }
            }
            Group::Paragraph(lines) => {
                let joined = collapse_whitespace(&lines.join(" "));
                let atoms = tokenize(&joined);
                for wrapped in pack(&atoms, paragraph_width) {
                    out.push_str(&indent);
                    out.push_str("// ");
                    out.push_str(&wrapped);
                    out.push('\n');
                }
            }
            Group::Bulleted(items) => {
                for item in items {
                    let atoms = tokenize(&collapse_whitespace(&item));
                    let wrapped = pack(&atoms, list_width);
                    let mut lines = wrapped.into_iter();
                    if let Some(first) = lines.next() {
                        out.push_str(&indent);
                        out.push_str("//   - ");
                        out.push_str(&first);
                        out.push('\n');
                    }
                    for cont in lines {
                        out.push_str(&indent);
                        out.push_str("//     ");
                        out.push_str(&cont);
                        out.push('\n');
                    }
                }
                if followed_by_paragraph {
                    out.push_str(&indent);
                    out.push_str("//\n");
                }
            }
            Group::Numbered(items) => {
                for (n, item) in items.into_iter().enumerate() {
                    let atoms = tokenize(&collapse_whitespace(&item));
                    let wrapped = pack(&atoms, list_width);
                    let mut lines = wrapped.into_iter();
                    if let Some(first) = lines.next() {
                        out.push_str(&indent);
                        out.push_str(&format!("//  {}. ", n + 1));
                        out.push_str(&first);
                        out.push('\n');
                    }
                    for cont in lines {
                        out.push_str(&indent);
                        out.push_str("//     ");
                        out.push_str(&cont);
                        out.push('\n');
                    }
                }
                if followed_by_paragraph {
                    out.push_str(&indent);
                    out.push_str("//\n");
                }
            }
        }
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use docrw_syntax::PassthroughPrinter;

    #[test]
    fn wraps_paragraph_to_width() {
        let block = "// This function does something long enough to need wrapping across lines.\n";
        let out = reflow_block(block, 0, 4, 40, &PassthroughPrinter);
        for line in out.lines() {
            assert!(line.chars().count() <= 40, "line too long: {line:?}");
            assert!(line.starts_with("// "));
        }
    }

    #[test]
    fn normalizes_improper_numbered_list() {
        let block = "// Steps:\n// 1. First step\n// 2. Second step\n";
        let out = reflow_block(block, 0, 4, 40, &PassthroughPrinter);
        assert_eq!(out, "// Steps:\n//  1. First step\n//  2. Second step\n");
    }

    #[test]
    fn pragma_line_emitted_verbatim() {
        let block = "//go:generate stringer -type=Kind\n";
        let out = reflow_block(block, 0, 4, 40, &PassthroughPrinter);
        assert_eq!(out, "//go:generate stringer -type=Kind\n");
    }

    #[test]
    fn blank_line_normalized_to_bare_slashes() {
        let block = "// first\n//   \n// second\n";
        let out = reflow_block(block, 0, 4, 40, &PassthroughPrinter);
        assert!(out.contains("//\n"));
    }

    #[test]
    fn reflow_is_idempotent() {
        let block = "// Steps:\n// 1. First step that is reasonably long for wrapping\n// 2. Second step\n";
        let once = reflow_block(block, 0, 4, 40, &PassthroughPrinter);
        let twice = reflow_block(&once, 0, 4, 40, &PassthroughPrinter);
        assert_eq!(once, twice);
    }
}
