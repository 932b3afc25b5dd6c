//! Comment groups (spec.md §3: "an ordered non-empty list of single-line
//! comment tokens, or a single block comment token").

use docrw_classify::forces_doc;

/// The textual form a comment group takes in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentGroupKind {
    /// Consecutive `//` lines. Each entry is the full line text including
    /// the leading `//`, excluding the trailing newline.
    Line(Vec<String>),
    /// A single `/* ... */` token, stored verbatim (including delimiters).
    Block(String),
}

/// What a comment group is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// Immediately above the declaration/spec/field it documents.
    Leading,
    /// On the same source line as the code it documents.
    Trailing,
    /// Inside a composite block, attached to nothing (spec.md §4.E).
    Floating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub kind: CommentGroupKind,
    pub attachment: Attachment,
    /// Byte offset of the first byte of the group.
    pub start: usize,
    /// Byte offset one past the last byte of the group (not including a
    /// trailing newline).
    pub end: usize,
    pub start_line: usize,
    pub end_line: usize,
}

impl CommentGroup {
    /// True iff any line in this group is classifier-preserved (spec.md
    /// §4.A): never deleted, reflowed, or moved to EOL.
    pub fn forces_doc(&self) -> bool {
        match &self.kind {
            CommentGroupKind::Line(lines) => forces_doc(lines.iter().map(String::as_str)),
            CommentGroupKind::Block(_) => {
                // The classifier's directive/linter sets are defined in
                // terms of `//` lines; synthesize one per inner line of
                // the block so the same closed set applies uniformly.
                let synthetic: Vec<String> = self
                    .unwrapped_lines()
                    .iter()
                    .map(|l| format!("//{l}"))
                    .collect();
                forces_doc(synthetic.iter().map(String::as_str))
            }
        }
    }

    pub fn is_multiline(&self) -> bool {
        match &self.kind {
            CommentGroupKind::Line(lines) => lines.len() > 1,
            CommentGroupKind::Block(text) => text.contains('\n'),
        }
    }

    /// The group's text with comment markers stripped, one logical line
    /// per source line: `// foo` -> `foo`; a block comment is split on
    /// newlines and each interior line has its leading `*`/whitespace
    /// trimmed the way gofmt-style re-emission does.
    pub fn unwrapped_lines(&self) -> Vec<String> {
        match &self.kind {
            CommentGroupKind::Line(lines) => lines
                .iter()
                .map(|l| {
                    l.trim_start()
                        .strip_prefix("//")
                        .unwrap_or(l)
                        .trim_start_matches(' ')
                        .to_string()
                })
                .collect(),
            CommentGroupKind::Block(text) => {
                let inner = text
                    .trim()
                    .strip_prefix("/*")
                    .and_then(|s| s.strip_suffix("*/"))
                    .unwrap_or(text);
                inner
                    .lines()
                    .map(|l| {
                        l.trim()
                            .trim_start_matches('*')
                            .trim_start()
                            .to_string()
                    })
                    .collect()
            }
        }
    }

    /// Re-render as `//`-style lines at the given indent, per spec.md §6's
    /// contract that block comments introduced or touched by a splice are
    /// normalized to `//` lines unless already classifier-preserved.
    pub fn render_as_line_comments(&self, indent: &str) -> String {
        if let CommentGroupKind::Block(text) = &self.kind {
            if self.forces_doc() {
                // Preserved block comments are never renormalized.
                return format!("{indent}{text}\n");
            }
        }
        let mut out = String::new();
        for line in self.unwrapped_lines() {
            if line.is_empty() {
                out.push_str(indent);
                out.push_str("//\n");
            } else {
                out.push_str(indent);
                out.push_str("// ");
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(lines: &[&str]) -> CommentGroup {
        CommentGroup {
            kind: CommentGroupKind::Line(lines.iter().map(|s| s.to_string()).collect()),
            attachment: Attachment::Leading,
            start: 0,
            end: 0,
            start_line: 1,
            end_line: lines.len(),
        }
    }

    #[test]
    fn unwraps_slash_slash_lines() {
        let g = group(&["// Foo does a thing.", "// More detail."]);
        assert_eq!(
            g.unwrapped_lines(),
            vec!["Foo does a thing.".to_string(), "More detail.".to_string()]
        );
    }

    #[test]
    fn block_comment_normalizes_to_line_comments() {
        let g = CommentGroup {
            kind: CommentGroupKind::Block("/*\n Foo does a thing.\n*/".to_string()),
            attachment: Attachment::Leading,
            start: 0,
            end: 0,
            start_line: 1,
            end_line: 3,
        };
        let rendered = g.render_as_line_comments("");
        assert_eq!(rendered, "// Foo does a thing.\n");
    }

    #[test]
    fn preserved_block_comment_is_not_renormalized() {
        let g = CommentGroup {
            kind: CommentGroupKind::Block("/*go:generate mockgen*/".to_string()),
            attachment: Attachment::Leading,
            start: 0,
            end: 0,
            start_line: 1,
            end_line: 1,
        };
        assert!(g.forces_doc());
        assert_eq!(g.render_as_line_comments(""), "/*go:generate mockgen*/\n");
    }
}
