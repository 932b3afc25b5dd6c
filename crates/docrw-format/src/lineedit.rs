//! Line-Edit Applier (spec.md §4.F).

use docrw_syntax::{CommentGroup, Decl, File, InterfaceMember, Printer, TypeExpr};
use docrw_text::EditOp;

#[derive(Debug, thiserror::Error)]
pub enum LineEditError {
    #[error("duplicate edit at line {0}")]
    DuplicateLine(usize),
    #[error("RemoveBlankLine on non-blank line {0}")]
    RemoveBlankOnNonBlank(usize),
    #[error("malformed EOL comment at line {0}: {1:?}")]
    MalformedComment(usize, String),
    #[error("pretty-printer failed on edited source: {1}")]
    FormatFailure(String, #[source] anyhow::Error),
}

/// Apply `edits` to `file` in a single pass and return the reformatted
/// bytes. Edits are sorted by line first (stable, so same-line relative
/// order among distinct `EditOp` kinds is preserved, though duplicates at
/// the same line are rejected outright).
///
/// Known defect, preserved intentionally (spec.md §4.F, §9): an edit
/// whose line falls beyond the end of the file is silently ignored
/// rather than rejected.
pub fn apply_line_edits(
    file: &File,
    edits: &[EditOp],
    printer: &dyn Printer,
) -> Result<Vec<u8>, LineEditError> {
    let mut sorted: Vec<&EditOp> = edits.iter().collect();
    sorted.sort_by_key(|e| e.line());
    for pair in sorted.windows(2) {
        if pair[0].line() == pair[1].line() {
            return Err(LineEditError::DuplicateLine(pair[0].line()));
        }
    }

    let mut lines = split_lines(file.bytes());
    let eol_groups = collect_eol_groups(file);
    let original_len = lines.len();

    // Each `EditOp` stores its line number against the original,
    // unedited file, but edits are applied one after another into the
    // same `lines` Vec. Track how far the vector has drifted from those
    // original line numbers so later edits still land on the right row.
    let mut offset: isize = 0;
    for edit in sorted {
        let line = edit.line();
        if line == 0 || line > original_len {
            continue;
        }
        let idx = ((line as isize - 1) + offset) as usize;
        match edit {
            EditOp::InsertBlankLineAbove(_) => {
                lines.insert(idx, String::new());
                offset += 1;
            }
            EditOp::RemoveBlankLine(_) => {
                if !lines[idx].trim().is_empty() {
                    return Err(LineEditError::RemoveBlankOnNonBlank(line));
                }
                lines.remove(idx);
                offset -= 1;
            }
            EditOp::SetEOLComment(_, comment) => {
                if !comment.starts_with("//") || comment.contains('\n') {
                    return Err(LineEditError::MalformedComment(line, comment.clone()));
                }
                let trimmed = lines[idx].trim();
                if trimmed.is_empty() || trimmed.starts_with("//") {
                    lines[idx] = comment.clone();
                } else {
                    let code = code_portion(file, &eol_groups, line, &lines[idx]);
                    lines[idx] = format!("{code} {comment}");
                }
            }
            EditOp::RemoveEOLComment(_) => {
                let trimmed = lines[idx].trim();
                if trimmed.starts_with("//") {
                    lines.remove(idx);
                    offset -= 1;
                } else {
                    let code = code_portion(file, &eol_groups, line, &lines[idx]);
                    lines[idx] = code.to_string();
                }
            }
        }
    }

    let joined = lines.join("\n") + "\n";
    printer
        .format_source(joined.as_bytes())
        .map_err(|e| LineEditError::FormatFailure(joined, e))
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(bytes);
    text.lines().map(|l| l.to_string()).collect()
}

/// Locate the byte-position of a trailing EOL comment on `line`, derived
/// from the AST's comment groups rather than re-scanning the line for a
/// `//` token (which could false-positive inside a string literal).
fn code_portion<'a>(
    file: &File,
    eol_groups: &[&CommentGroup],
    line: usize,
    full_line: &'a str,
) -> &'a str {
    let Some(group) = eol_groups.iter().find(|g| g.start_line == line) else {
        return full_line.trim_end();
    };
    let position = file.buf.index().offset_to_position(file.bytes(), group.start);
    let byte_col = full_line
        .char_indices()
        .nth(position.column.saturating_sub(1))
        .map(|(b, _)| b)
        .unwrap_or(full_line.len());
    full_line[..byte_col.min(full_line.len())].trim_end()
}

fn collect_eol_groups(file: &File) -> Vec<&CommentGroup> {
    let mut out = Vec::new();
    for decl in &file.decls {
        match decl {
            Decl::Func(f) => {
                if let Some(g) = &f.eol {
                    out.push(g);
                }
            }
            Decl::Type(t) => {
                for spec in &t.specs {
                    if let Some(g) = &spec.eol {
                        out.push(g);
                    }
                    collect_type_eols(&spec.ty, &mut out);
                }
            }
            Decl::Value(v) => {
                for spec in &v.specs {
                    if let Some(g) = &spec.eol {
                        out.push(g);
                    }
                }
            }
        }
    }
    out
}

fn collect_type_eols<'a>(ty: &'a TypeExpr, out: &mut Vec<&'a CommentGroup>) {
    if let Some(fields) = docrw_syntax::struct_fields_of(ty) {
        for field in fields {
            if let Some(g) = &field.eol {
                out.push(g);
            }
            collect_type_eols(&field.ty, out);
        }
    }
    if let Some(members) = docrw_syntax::interface_members_of(ty) {
        for member in members {
            let eol = match member {
                InterfaceMember::Method { eol, .. } => eol,
                InterfaceMember::Embedded { eol, .. } => eol,
            };
            if let Some(g) = eol {
                out.push(g);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docrw_syntax::{PassthroughPrinter, SyntaxFrontend, TreeSitterGoFrontend};
    use std::path::Path;

    fn parse(src: &str) -> File {
        TreeSitterGoFrontend
            .parse_file(Path::new("f.go"), src.as_bytes())
            .unwrap()
    }

    #[test]
    fn set_eol_comment_on_blank_like_line_replaces_it() {
        let file = parse("package p\n\nvar Foo int\n");
        let edits = vec![EditOp::SetEOLComment(3, "// a comment".into())];
        let out = apply_line_edits(&file, &edits, &PassthroughPrinter).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("// a comment"));
    }

    #[test]
    fn remove_blank_on_non_blank_line_errors() {
        let file = parse("package p\n\nvar Foo int\n");
        let edits = vec![EditOp::RemoveBlankLine(3)];
        let err = apply_line_edits(&file, &edits, &PassthroughPrinter).unwrap_err();
        assert!(matches!(err, LineEditError::RemoveBlankOnNonBlank(3)));
    }

    #[test]
    fn duplicate_line_edits_rejected() {
        let file = parse("package p\n\nvar Foo int\n");
        let edits = vec![
            EditOp::RemoveEOLComment(3),
            EditOp::SetEOLComment(3, "// x".into()),
        ];
        let err = apply_line_edits(&file, &edits, &PassthroughPrinter).unwrap_err();
        assert!(matches!(err, LineEditError::DuplicateLine(3)));
    }

    #[test]
    fn edit_past_end_of_file_is_silently_ignored() {
        let file = parse("package p\n\nvar Foo int\n");
        let edits = vec![EditOp::SetEOLComment(999, "// unreachable".into())];
        let out = apply_line_edits(&file, &edits, &PassthroughPrinter).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("unreachable"));
    }

    #[test]
    fn later_edit_accounts_for_earlier_insert_shifting_lines() {
        let file = parse("package p\n\nvar A int\nvar B int\n");
        let edits = vec![
            EditOp::InsertBlankLineAbove(3),
            EditOp::SetEOLComment(4, "// b comment".into()),
        ];
        let out = apply_line_edits(&file, &edits, &PassthroughPrinter).unwrap();
        let text = String::from_utf8(out).unwrap();
        let line = text.lines().find(|l| l.contains("var B")).unwrap();
        assert!(line.contains("// b comment"), "got: {text:?}");
        assert!(!text.lines().any(|l| l.contains("var A") && l.contains("comment")));
    }

    #[test]
    fn malformed_comment_is_rejected() {
        let file = parse("package p\n\nvar Foo int\n");
        let edits = vec![EditOp::SetEOLComment(3, "not a comment".into())];
        let err = apply_line_edits(&file, &edits, &PassthroughPrinter).unwrap_err();
        assert!(matches!(err, LineEditError::MalformedComment(3, _)));
    }
}
