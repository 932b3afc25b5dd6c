//! Wires `docrw_format::decide` (EOL-vs-Doc Decider, spec.md §4.C) and
//! `docrw_format::block` (Block Formatter, spec.md §4.E) into the
//! engine's write path.
//!
//! Per spec.md §2's data flow, this runs after a splice/removal/reflow
//! has produced new bytes and been pretty-printed, and before those
//! bytes reach disk: the Decider first promotes/demotes sibling
//! specs/fields between leading-doc and trailing-EOL form by rewriting
//! bytes directly (there is no `EditOp` for "move a comment"), then the
//! Block Formatter computes the resulting blank-line edits and the
//! Line-Edit Applier applies them.

use std::path::Path;

use docrw_syntax::{
    interface_members_of, struct_fields_of, CommentGroup, Decl, File, InterfaceMember, Printer,
    SyntaxFrontend, TypeExpr, ValueDecl,
};
use docrw_text::{delete_range, splice, EditOp};

use crate::EngineError;

/// One documented sibling spec/field, reduced to what `decide` and the
/// promotion step both need.
struct Sibling<'a> {
    doc: Option<&'a CommentGroup>,
    eol: Option<&'a CommentGroup>,
    code_start: usize,
    code_end: usize,
    is_interface_member: bool,
}

enum Promotion {
    /// Move a leading doc onto the code's own line as a trailing EOL.
    ToEol {
        doc_start: usize,
        doc_end: usize,
        code_end: usize,
        text: String,
    },
    /// Move a trailing EOL onto its own leading-doc line above the code.
    ToDoc {
        eol_start: usize,
        eol_end: usize,
        line_start: usize,
        indent: String,
        text: String,
    },
}

fn line_start(bytes: &[u8], offset: usize) -> usize {
    bytes[..offset].iter().rposition(|&b| b == b'\n').map(|p| p + 1).unwrap_or(0)
}

fn line_indent(bytes: &[u8], offset: usize) -> String {
    let start = line_start(bytes, offset);
    String::from_utf8_lossy(&bytes[start..offset]).into_owned()
}

fn indent_columns(indent: &str, tab_width: usize) -> usize {
    indent.chars().map(|c| if c == '\t' { tab_width } else { 1 }).sum()
}

fn first_line(group: &CommentGroup) -> String {
    group.unwrapped_lines().into_iter().next().unwrap_or_default()
}

fn render_comment(text: &str) -> String {
    if text.is_empty() {
        "//".to_string()
    } else {
        format!("// {text}")
    }
}

fn entity_of(bytes: &[u8], s: &Sibling, tab_width: usize) -> docrw_format::Entity {
    let comment_text = s.doc.or(s.eol).map(first_line).unwrap_or_default();
    let multiline_comment = s.doc.is_some_and(CommentGroup::is_multiline) || s.eol.is_some_and(CommentGroup::is_multiline);
    let force_doc = s.doc.is_some_and(CommentGroup::forces_doc) || s.eol.is_some_and(CommentGroup::forces_doc);
    let code = String::from_utf8_lossy(&bytes[s.code_start..s.code_end]);
    let indent = indent_columns(&line_indent(bytes, s.code_start), tab_width);
    docrw_format::Entity {
        multiline_comment,
        multiline_code: code.contains('\n'),
        force_doc,
        min_code_length: code.trim_end().chars().count(),
        comment_length: comment_text.chars().count(),
        indent_in_spaces: indent,
        is_interface_member: s.is_interface_member,
    }
}

fn plan_promotions(bytes: &[u8], siblings: &[Sibling], decided: &[bool]) -> Vec<Promotion> {
    let mut out = Vec::new();
    for (s, &want_eol) in siblings.iter().zip(decided) {
        match (s.doc, s.eol, want_eol) {
            (Some(doc), None, true) => out.push(Promotion::ToEol {
                doc_start: doc.start,
                doc_end: doc.end,
                code_end: s.code_end,
                text: render_comment(&first_line(doc)),
            }),
            (None, Some(eol), false) => {
                let start = line_start(bytes, s.code_start);
                out.push(Promotion::ToDoc {
                    eol_start: eol.start,
                    eol_end: eol.end,
                    line_start: start,
                    indent: line_indent(bytes, s.code_start),
                    text: render_comment(&first_line(eol)),
                });
            }
            _ => {}
        }
    }
    out
}

fn promotion_min_offset(p: &Promotion) -> usize {
    match p {
        Promotion::ToEol { doc_start, .. } => *doc_start,
        Promotion::ToDoc { line_start, .. } => *line_start,
    }
}

/// Apply every promotion to `bytes`, right-to-left, so each promotion's
/// stored offsets (taken from the pre-promotion parse) stay valid for
/// the ones still to come.
fn apply_promotions(bytes: &[u8], mut promotions: Vec<Promotion>) -> Vec<u8> {
    promotions.sort_by_key(promotion_min_offset);
    let mut out = bytes.to_vec();
    for p in promotions.into_iter().rev() {
        out = match p {
            Promotion::ToEol { doc_start, doc_end, code_end, text } => {
                let with_eol = splice(&out, &format!(" {text}"), code_end, code_end);
                let end = if with_eol.get(doc_end) == Some(&b'\n') { doc_end + 1 } else { doc_end };
                delete_range(&with_eol, doc_start, end, true)
            }
            Promotion::ToDoc { eol_start, eol_end, line_start, indent, text } => {
                let mut trim_start = eol_start;
                while trim_start > 0 && matches!(out[trim_start - 1], b' ' | b'\t') {
                    trim_start -= 1;
                }
                let without_eol = delete_range(&out, trim_start, eol_end, false);
                splice(&without_eol, &format!("{indent}{text}\n"), line_start, line_start)
            }
        };
    }
    out
}

fn push_group_promotions(out: &mut Vec<Promotion>, bytes: &[u8], siblings: &[Sibling], tab_width: usize, max_width: usize) {
    if siblings.is_empty() {
        return;
    }
    let entities: Vec<docrw_format::Entity> = siblings.iter().map(|s| entity_of(bytes, s, tab_width)).collect();
    let decided = docrw_format::decide(&entities, max_width);
    out.extend(plan_promotions(bytes, siblings, &decided));
}

fn value_siblings(v: &ValueDecl) -> Vec<Sibling<'_>> {
    v.specs
        .iter()
        .filter(|s| s.doc.is_some() || s.eol.is_some())
        .map(|s| Sibling {
            doc: s.doc.as_ref(),
            eol: s.eol.as_ref(),
            code_start: s.position.start,
            code_end: s.position.end,
            is_interface_member: false,
        })
        .collect()
}

fn collect_type_promotions(out: &mut Vec<Promotion>, bytes: &[u8], ty: &TypeExpr, tab_width: usize, max_width: usize) {
    if let Some(fields) = struct_fields_of(ty) {
        let siblings: Vec<Sibling> = fields
            .iter()
            .filter(|f| f.doc.is_some() || f.eol.is_some())
            .map(|f| Sibling {
                doc: f.doc.as_ref(),
                eol: f.eol.as_ref(),
                code_start: f.position.start,
                code_end: f.position.end,
                is_interface_member: false,
            })
            .collect();
        push_group_promotions(out, bytes, &siblings, tab_width, max_width);
        for f in fields {
            collect_type_promotions(out, bytes, &f.ty, tab_width, max_width);
        }
    }
    // Interface members are never promoted: `decide` treats
    // `is_interface_member` entities as permanently ineligible, so
    // there is nothing for this pass to collect for them.
}

fn collect_promotions(file: &File, tab_width: usize, max_width: usize) -> Vec<Promotion> {
    let mut out = Vec::new();
    for decl in &file.decls {
        match decl {
            Decl::Value(v) => push_group_promotions(&mut out, file.bytes(), &value_siblings(v), tab_width, max_width),
            Decl::Type(t) => {
                for spec in &t.specs {
                    collect_type_promotions(&mut out, file.bytes(), &spec.ty, tab_width, max_width);
                }
            }
            Decl::Func(_) => {}
        }
    }
    out
}

fn interface_member_position(m: &InterfaceMember) -> (usize, usize, bool) {
    match m {
        InterfaceMember::Method { doc, position, .. } => (position.start_line, position.end_line, doc.is_some()),
        InterfaceMember::Embedded { doc, position, .. } => (position.start_line, position.end_line, doc.is_some()),
    }
}

fn block_entity(doc: Option<&CommentGroup>, code_start_line: usize, end_line: usize) -> docrw_format::BlockEntity {
    docrw_format::BlockEntity {
        start_line: doc.map(|d| d.start_line).unwrap_or(code_start_line),
        code_start_line,
        end_line,
        has_doc: doc.is_some(),
    }
}

fn collect_block_edits(file: &File, edits: &mut Vec<EditOp>) {
    for decl in &file.decls {
        match decl {
            Decl::Value(v) => {
                let entities: Vec<_> = v
                    .specs
                    .iter()
                    .map(|s| block_entity(s.doc.as_ref(), s.position.start_line, s.position.end_line))
                    .collect();
                edits.extend(docrw_format::format_block(
                    &entities,
                    v.position.start_line,
                    v.position.end_line,
                ));
            }
            Decl::Type(t) => {
                let entities: Vec<_> = t
                    .specs
                    .iter()
                    .map(|s| block_entity(s.doc.as_ref(), s.position.start_line, s.position.end_line))
                    .collect();
                edits.extend(docrw_format::format_block(&entities, t.position.start_line, t.position.end_line));
                for spec in &t.specs {
                    collect_type_block_edits(&spec.ty, spec.position.start_line, spec.position.end_line, edits);
                }
            }
            Decl::Func(_) => {}
        }
    }
}

fn collect_type_block_edits(ty: &TypeExpr, open_line: usize, close_line: usize, edits: &mut Vec<EditOp>) {
    if let Some(fields) = struct_fields_of(ty) {
        let entities: Vec<_> = fields
            .iter()
            .map(|f| block_entity(f.doc.as_ref(), f.position.start_line, f.position.end_line))
            .collect();
        edits.extend(docrw_format::format_block(&entities, open_line, close_line));
        for f in fields {
            collect_type_block_edits(&f.ty, f.position.start_line, f.position.end_line, edits);
        }
    }
    if let Some(members) = interface_members_of(ty) {
        let entities: Vec<_> = members
            .iter()
            .map(|m| {
                let (start_line, end_line, has_doc) = interface_member_position(m);
                docrw_format::BlockEntity {
                    start_line,
                    code_start_line: start_line,
                    end_line,
                    has_doc,
                }
            })
            .collect();
        edits.extend(docrw_format::format_block(&entities, open_line, close_line));
    }
}

/// Promote/demote documented siblings between leading-doc and
/// trailing-EOL form (spec.md §4.C), then normalize blank lines around
/// every composite block's members (spec.md §4.E), and return the
/// resulting bytes. A no-op on a file that already complies.
pub fn normalize_blocks(
    bytes: &[u8],
    path: &Path,
    frontend: &dyn SyntaxFrontend,
    printer: &dyn Printer,
    tab_width: usize,
    max_width: usize,
) -> Result<Vec<u8>, EngineError> {
    let parsed = frontend.parse_file(path, bytes).map_err(EngineError::Parse)?;
    let promotions = collect_promotions(&parsed, tab_width, max_width);
    let promoted = if promotions.is_empty() {
        bytes.to_vec()
    } else {
        apply_promotions(bytes, promotions)
    };
    let formatted = printer.format_source(&promoted).map_err(EngineError::Parse)?;

    let reparsed = frontend.parse_file(path, &formatted).map_err(EngineError::Parse)?;
    let mut edits = Vec::new();
    collect_block_edits(&reparsed, &mut edits);
    if edits.is_empty() {
        return Ok(formatted);
    }
    Ok(docrw_format::apply_line_edits(&reparsed, &edits, printer)?)
}
