//! Remove Engine (spec.md §4.G): strip documentation for a set of
//! identifiers, or all of it, while classifier-preserved lines survive.

use docrw_syntax::{
    interface_members_of, struct_fields_of, Attachment, CommentGroup, CommentGroupKind, Decl,
    File, InterfaceMember, TypeExpr,
};

fn wants(identifiers: &[String], key: &str) -> bool {
    identifiers.is_empty() || identifiers.iter().any(|id| id == key)
}

fn collect_type_docs<'a>(ty: &'a TypeExpr, out: &mut Vec<&'a CommentGroup>) {
    if let Some(fields) = struct_fields_of(ty) {
        for f in fields {
            if let Some(d) = &f.doc {
                out.push(d);
            }
            if let Some(e) = &f.eol {
                out.push(e);
            }
            collect_type_docs(&f.ty, out);
        }
    }
    if let Some(members) = interface_members_of(ty) {
        for m in members {
            let (doc, eol) = match m {
                InterfaceMember::Method { doc, eol, .. } => (doc, eol),
                InterfaceMember::Embedded { doc, eol, .. } => (doc, eol),
            };
            if let Some(d) = doc {
                out.push(d);
            }
            if let Some(e) = eol {
                out.push(e);
            }
        }
    }
}

/// Gather every comment group that should be stripped for `identifiers`
/// (empty means "all documentation").
fn collect_removal_groups<'a>(file: &'a File, identifiers: &[String]) -> Vec<&'a CommentGroup> {
    let mut out = Vec::new();
    if wants(identifiers, "package") {
        if let Some(doc) = &file.package_doc {
            out.push(doc);
        }
    }
    for decl in &file.decls {
        match decl {
            Decl::Func(f) => {
                if wants(identifiers, &f.ident_key()) {
                    if let Some(d) = &f.doc {
                        out.push(d);
                    }
                    if let Some(e) = &f.eol {
                        out.push(e);
                    }
                }
            }
            Decl::Value(v) => {
                let single = v.specs.len() == 1;
                for spec in &v.specs {
                    let key = spec.ident_key();
                    if wants(identifiers, &key) {
                        if let Some(d) = &spec.doc {
                            out.push(d);
                        }
                        if let Some(e) = &spec.eol {
                            out.push(e);
                        }
                        if single {
                            if let Some(d) = &v.doc {
                                out.push(d);
                            }
                        }
                    }
                }
                if !single && identifiers.is_empty() {
                    if let Some(d) = &v.doc {
                        out.push(d);
                    }
                }
            }
            Decl::Type(t) => {
                let single = t.specs.len() == 1;
                for spec in &t.specs {
                    if wants(identifiers, &spec.name) {
                        if let Some(d) = &spec.doc {
                            out.push(d);
                        }
                        if let Some(e) = &spec.eol {
                            out.push(e);
                        }
                        collect_type_docs(&spec.ty, &mut out);
                        if single {
                            if let Some(d) = &t.doc {
                                out.push(d);
                            }
                        }
                    }
                }
                if !single && identifiers.is_empty() {
                    if let Some(d) = &t.doc {
                        out.push(d);
                    }
                }
            }
        }
    }
    out
}

fn line_indent(bytes: &[u8], start: usize) -> String {
    let line_start = bytes[..start]
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|p| p + 1)
        .unwrap_or(0);
    String::from_utf8_lossy(&bytes[line_start..start]).into_owned()
}

fn delete_leading_group(bytes: &[u8], group: &CommentGroup) -> Vec<u8> {
    let end = if bytes.get(group.end) == Some(&b'\n') { group.end + 1 } else { group.end };
    docrw_text::delete_range(bytes, group.start, end, true)
}

fn delete_trailing_group(bytes: &[u8], group: &CommentGroup) -> Vec<u8> {
    let mut start = group.start;
    while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
        start -= 1;
    }
    docrw_text::delete_range(bytes, start, group.end, false)
}

/// Strip `group` from `bytes`, honoring the Classifier: a preserved line
/// survives even when the rest of its group is removed.
fn remove_group(bytes: &[u8], group: &CommentGroup) -> Vec<u8> {
    match &group.kind {
        CommentGroupKind::Block(_) => {
            if group.forces_doc() {
                bytes.to_vec()
            } else {
                match group.attachment {
                    Attachment::Trailing => delete_trailing_group(bytes, group),
                    _ => delete_leading_group(bytes, group),
                }
            }
        }
        CommentGroupKind::Line(lines) => {
            let kept: Vec<&String> = lines
                .iter()
                .filter(|l| docrw_classify::is_preserved_line(l))
                .collect();
            if kept.len() == lines.len() {
                return bytes.to_vec();
            }
            if kept.is_empty() {
                return match group.attachment {
                    Attachment::Trailing => delete_trailing_group(bytes, group),
                    _ => delete_leading_group(bytes, group),
                };
            }
            // Partial: keep only the preserved lines, re-indented in place.
            let indent = line_indent(bytes, group.start);
            let text: String = kept.iter().map(|l| format!("{indent}{l}\n")).collect();
            let end = if bytes.get(group.end) == Some(&b'\n') { group.end + 1 } else { group.end };
            docrw_text::splice(bytes, &text, group.start, end)
        }
    }
}

/// Strip documentation for `identifiers` (empty = all) from one file's
/// bytes, returning the new bytes (unchanged if nothing matched).
pub fn remove_from_file(file: &File, identifiers: &[String]) -> Vec<u8> {
    let mut targets = collect_removal_groups(file, identifiers);
    targets.sort_by(|a, b| b.start.cmp(&a.start));
    let mut bytes = file.bytes().to_vec();
    for group in targets {
        bytes = remove_group(&bytes, group);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use docrw_syntax::{SyntaxFrontend, TreeSitterGoFrontend};
    use std::path::Path;

    fn parse(src: &str) -> File {
        TreeSitterGoFrontend
            .parse_file(Path::new("f.go"), src.as_bytes())
            .unwrap()
    }

    #[test]
    fn removes_func_doc() {
        let src = "package p\n\n// Foo does a thing.\nfunc Foo() {}\n";
        let file = parse(src);
        let out = remove_from_file(&file, &["Foo".to_string()]);
        assert_eq!(String::from_utf8(out).unwrap(), "package p\n\nfunc Foo() {}\n");
    }

    #[test]
    fn preserves_directive_while_removing_doc() {
        let src = "package p\n\n//go:generate stringer -type=Kind\n// Foo does a thing.\nfunc Foo() {}\n";
        let file = parse(src);
        let out = remove_from_file(&file, &["Foo".to_string()]);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("//go:generate stringer -type=Kind"));
        assert!(!text.contains("Foo does a thing"));
    }

    #[test]
    fn remove_all_strips_package_and_decl_docs() {
        let src = "// Package p does things.\npackage p\n\n// Foo does a thing.\nfunc Foo() {}\n";
        let file = parse(src);
        let out = remove_from_file(&file, &[]);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "package p\n\nfunc Foo() {}\n");
    }
}
