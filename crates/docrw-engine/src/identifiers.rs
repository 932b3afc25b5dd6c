//! Resolve an identifier key (spec.md §3) against a parsed file, and
//! enumerate every key a file carries -- the two things `reflow` and
//! `update` need beyond what `docrw-edit`'s matcher already does for a
//! single snippet.

use docrw_edit::{find_type_decl, find_type_spec, find_value_decl, find_value_spec, navigate, FieldOrMember};
use docrw_syntax::{CommentGroup, Decl, File, Span, TypeExpr, ValueTok};

/// What `resolve` found for a key: the doc/eol it currently carries (if
/// any) and enough context to re-render them in place.
pub struct Resolved<'a> {
    pub doc: Option<&'a CommentGroup>,
    pub eol: Option<&'a CommentGroup>,
    pub position: Span,
    pub is_interface_member: bool,
}

/// Find the declaration/spec/field owning `key` in `file`, regardless of
/// whether it currently carries any documentation. Returns `None` if no
/// such identifier exists in this file.
pub fn resolve<'a>(file: &'a File, key: &str) -> Option<Resolved<'a>> {
    if key == "package" {
        return file.package_doc.as_ref().map(|doc| Resolved {
            doc: Some(doc),
            eol: None,
            position: Span {
                start: doc.start,
                end: doc.end,
                start_line: doc.start_line,
                end_line: doc.end_line,
            },
            is_interface_member: false,
        });
    }

    for decl in &file.decls {
        if let Decl::Func(f) = decl {
            if f.ident_key() == key {
                return Some(Resolved {
                    doc: f.doc.as_ref(),
                    eol: f.eol.as_ref(),
                    position: f.position,
                    is_interface_member: false,
                });
            }
        }
    }

    if let Some(decl) = find_value_decl(file, key, ValueTok::Var).or_else(|| find_value_decl(file, key, ValueTok::Const)) {
        if let Some(spec) = find_value_spec(decl, key) {
            return Some(Resolved {
                doc: spec.doc.as_ref(),
                eol: spec.eol.as_ref(),
                position: spec.position,
                is_interface_member: false,
            });
        }
    }

    if let Some(decl) = find_type_decl(file, key) {
        if let Some(spec) = find_type_spec(decl, key) {
            return Some(Resolved {
                doc: spec.doc.as_ref(),
                eol: spec.eol.as_ref(),
                position: spec.position,
                is_interface_member: false,
            });
        }
    }

    let (type_name, rest) = key.split_once('.')?;
    let decl = find_type_decl(file, type_name)?;
    let spec = find_type_spec(decl, type_name)?;
    let path: Vec<String> = rest.split('.').map(str::to_string).collect();
    let found = navigate(&spec.ty, &path)?;
    let is_interface_member = matches!(&found, FieldOrMember::Method { .. } | FieldOrMember::Embedded { .. });
    Some(Resolved {
        doc: found.doc().as_ref(),
        eol: found.eol().as_ref(),
        position: found.position(),
        is_interface_member,
    })
}

/// True iff the file carries the generated-code marker (spec.md §4.A
/// rule 3) on its package doc or on a floating comment -- used to skip
/// generated files in `ReflowAllDocumentation` (spec.md §6, op 3) and
/// `ReflowDocumentationPaths`.
pub fn file_is_generated(file: &File) -> bool {
    let mut groups: Vec<&CommentGroup> = file.floating_comments.iter().collect();
    if let Some(doc) = &file.package_doc {
        groups.push(doc);
    }
    groups.iter().any(|g| match &g.kind {
        docrw_syntax::CommentGroupKind::Line(lines) => {
            lines.iter().any(|l| docrw_classify::is_generated_marker(l))
        }
        docrw_syntax::CommentGroupKind::Block(text) => {
            text.lines().any(docrw_classify::is_generated_marker)
        }
    })
}

/// Every identifier key a file declares (package sentinel excluded --
/// package docs are reflowed explicitly, not as part of "all
/// identifiers"), in declaration order.
pub fn all_keys_of_file(file: &File) -> Vec<String> {
    let mut out = Vec::new();
    for decl in &file.decls {
        match decl {
            Decl::Func(f) => out.push(f.ident_key()),
            Decl::Value(v) => {
                for s in &v.specs {
                    out.push(s.ident_key());
                }
            }
            Decl::Type(t) => {
                for s in &t.specs {
                    out.push(s.name.clone());
                    collect_type_keys(&s.name, &s.ty, &mut out);
                }
            }
        }
    }
    out
}

fn collect_type_keys(type_name: &str, ty: &TypeExpr, out: &mut Vec<String>) {
    if let Some(fields) = docrw_syntax::struct_fields_of(ty) {
        for f in fields {
            out.push(format!("{type_name}.{}", f.field_key()));
            collect_type_keys(type_name, &f.ty, out);
        }
    }
    if let Some(members) = docrw_syntax::interface_members_of(ty) {
        for m in members {
            out.push(format!("{type_name}.{}", m.key()));
        }
    }
}
