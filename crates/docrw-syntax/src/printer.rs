//! The "external pretty-printer" collaborator (spec.md §1's Non-goal a:
//! "an external pretty-printer is assumed").
//!
//! The splicer never regenerates a file from the AST; it only ever
//! performs targeted byte splices (`docrw_text::splice`/`delete_range`)
//! against the existing bytes. `Printer` is the final normalization pass
//! spec.md §4.F describes ("After all edits, the file is passed through
//! the external pretty-printer") and the formatter prepass spec.md §4.B
//! describes for a doc block in isolation. We ship one minimal, genuinely
//! "pretty-printer-shaped" implementation (whitespace/blank-line
//! normalization only); a real deployment is expected to plug in an actual
//! `gofmt`-equivalent here, the same way the teacher's renderer leans on
//! `tree-sitter-*` grammars rather than hand-rolled lexing for languages it
//! merely highlights.

/// Byte-level and doc-block-level formatting, supplied externally.
pub trait Printer: Send + Sync {
    /// Normalize a whole file's bytes. Errors are fatal (spec.md §7).
    fn format_source(&self, bytes: &[u8]) -> anyhow::Result<Vec<u8>>;

    /// Normalize an isolated doc-comment block (spec.md §4.B's formatter
    /// prepass). On error, callers must fall back to the unformatted
    /// input rather than propagating -- this is the one place spec.md
    /// explicitly downgrades a printer failure to a no-op.
    fn format_doc_block(&self, block: &str) -> anyhow::Result<String>;
}

/// Minimal default: collapses runs of 2+ blank lines to one, trims
/// trailing whitespace on each line, and ensures exactly one trailing
/// newline. Does not reindent, reflow, or otherwise reformat code --
/// that is squarely the excluded "full ... formatter" of Non-goal (a).
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughPrinter;

impl Printer for PassthroughPrinter {
    fn format_source(&self, bytes: &[u8]) -> anyhow::Result<Vec<u8>> {
        let text = std::str::from_utf8(bytes)?;
        let mut out = String::with_capacity(text.len());
        let mut blank_run = 0usize;
        for line in text.lines() {
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                blank_run += 1;
                if blank_run > 1 {
                    continue;
                }
            } else {
                blank_run = 0;
            }
            out.push_str(trimmed);
            out.push('\n');
        }
        while out.ends_with("\n\n") {
            out.pop();
        }
        if out.is_empty() {
            out.push('\n');
        }
        Ok(out.into_bytes())
    }

    fn format_doc_block(&self, block: &str) -> anyhow::Result<String> {
        Ok(block
            .lines()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
            + "\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_multiple_blank_lines() {
        let p = PassthroughPrinter;
        let input = b"a\n\n\n\nb\n";
        let out = p.format_source(input).unwrap();
        assert_eq!(out, b"a\n\nb\n");
    }

    #[test]
    fn trims_trailing_whitespace() {
        let p = PassthroughPrinter;
        let out = p.format_source(b"a   \nb\t\n").unwrap();
        assert_eq!(out, b"a\nb\n");
    }
}
