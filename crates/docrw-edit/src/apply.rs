//! The one-comment-per-iteration apply state machine (spec.md §4.D.3-4).

use std::path::Path;

use docrw_syntax::{
    types_same_shape, CommentGroup, CommentGroupKind, Decl, File, SyntaxFrontend, TypeExpr,
    ValueTok,
};

use crate::error::{EditFatalError, SnippetError};
use crate::matcher::{find_func, find_type_decl, find_type_spec, find_value_decl, find_value_spec, navigate};
use crate::snippet::{Snippet, SnippetKind};

pub enum ApplyError {
    Fatal(EditFatalError),
    Snippet(SnippetError),
}

pub struct ApplyOutcome {
    pub bytes: Vec<u8>,
    pub changed: bool,
    pub partially_rejected: bool,
}

enum Rendered {
    Doc(String),
    Eol(String),
}

/// Where, in the *source* file, a pending comment ultimately belongs.
enum Locator {
    Func { key: String },
    ValueSpec { tok: ValueTok, decl_key: String, spec_key: String },
    ValueDecl { tok: ValueTok, decl_key: String },
    TypeSpec { decl_name: String, spec_name: String },
    TypeDecl { decl_name: String },
    Field { type_name: String, path: Vec<String> },
}

struct PendingItem {
    locator: Locator,
    rendered: Rendered,
}

fn render_doc(group: &CommentGroup) -> String {
    group.render_as_line_comments("")
}

fn render_eol(group: &CommentGroup) -> String {
    match &group.kind {
        CommentGroupKind::Line(lines) => lines.join(" "),
        CommentGroupKind::Block(text) => text.replace('\n', " "),
    }
}

fn collect_field_items(ty: &TypeExpr, prefix: &[String], out: &mut Vec<PendingItem>, type_name: &str) {
    if let Some(fields) = docrw_syntax::struct_fields_of(ty) {
        for field in fields.iter().rev() {
            let mut path = prefix.to_vec();
            path.push(field.field_key());
            if let Some(doc) = &field.doc {
                out.push(PendingItem {
                    locator: Locator::Field { type_name: type_name.to_string(), path: path.clone() },
                    rendered: Rendered::Doc(render_doc(doc)),
                });
            } else if let Some(eol) = &field.eol {
                out.push(PendingItem {
                    locator: Locator::Field { type_name: type_name.to_string(), path: path.clone() },
                    rendered: Rendered::Eol(render_eol(eol)),
                });
            }
            collect_field_items(&field.ty, &path, out, type_name);
        }
    }
    if let Some(members) = docrw_syntax::interface_members_of(ty) {
        for member in members.iter().rev() {
            let mut path = prefix.to_vec();
            path.push(member.key());
            let (doc, eol) = match member {
                docrw_syntax::InterfaceMember::Method { doc, eol, .. } => (doc, eol),
                docrw_syntax::InterfaceMember::Embedded { doc, eol, .. } => (doc, eol),
            };
            if let Some(doc) = doc {
                out.push(PendingItem {
                    locator: Locator::Field { type_name: type_name.to_string(), path: path.clone() },
                    rendered: Rendered::Doc(render_doc(doc)),
                });
            } else if let Some(eol) = eol {
                out.push(PendingItem {
                    locator: Locator::Field { type_name: type_name.to_string(), path: path.clone() },
                    rendered: Rendered::Eol(render_eol(eol)),
                });
            }
        }
    }
}

/// Build the ordered queue of pending edits and validate, against
/// `initial_file`, that every identifier the snippet references exists.
/// Validation happens entirely before any byte is touched so a snippet
/// error never leaves a partial edit behind (spec.md §7).
fn build_queue(snippet: &Snippet, initial_file: &File) -> Result<Vec<PendingItem>, SnippetError> {
    let raw = &snippet.raw;
    let mut queue = Vec::new();
    match snippet.kind {
        SnippetKind::PackageDoc => unreachable!("package doc handled by apply_package_doc"),
        SnippetKind::Func => {
            let Decl::Func(f) = snippet.ast.decls.first().expect("classified as Func") else {
                unreachable!()
            };
            let key = f.ident_key();
            let source = find_func(initial_file, &key)
                .ok_or_else(|| SnippetError::new(raw, format!("function {key:?} not found in target")))?;
            if let Some(doc) = &f.doc {
                queue.push(PendingItem {
                    locator: Locator::Func { key },
                    rendered: Rendered::Doc(render_doc(doc)),
                });
            } else if let Some(eol) = &f.eol {
                if source.has_body {
                    return Err(SnippetError::new(
                        raw,
                        "function already has a body; an EOL-only snippet can only promote to a doc comment on a bodyless function",
                    ));
                }
                queue.push(PendingItem {
                    locator: Locator::Func { key },
                    rendered: Rendered::Doc(format!("{}\n", render_eol(eol))),
                });
            }
        }
        SnippetKind::Var | SnippetKind::Const => {
            let tok = if matches!(snippet.kind, SnippetKind::Var) {
                ValueTok::Var
            } else {
                ValueTok::Const
            };
            for decl in &snippet.ast.decls {
                let Decl::Value(v) = decl else { continue };
                if v.tok != tok {
                    continue;
                }
                let any_key = v.specs.first().map(|s| s.ident_key()).unwrap_or_default();
                let source_decl = find_value_decl(initial_file, &any_key, tok).ok_or_else(|| {
                    SnippetError::new(raw, format!("identifier {any_key:?} not found in target"))
                })?;
                if source_decl.tok != tok {
                    return Err(SnippetError::new(raw, "var/const mismatch between snippet and source"));
                }
                for spec in v.specs.iter() {
                    if find_value_spec(source_decl, &spec.ident_key()).is_none() {
                        return Err(SnippetError::new(
                            raw,
                            format!("identifier {:?} not found in target", spec.ident_key()),
                        ));
                    }
                }
                if v.is_block && !source_decl.is_block {
                    return Err(SnippetError::new(raw, "snippet is a block but source declaration is not"));
                }
                if !v.is_block && source_decl.is_block {
                    // source block, snippet non-block: apply to the matching spec only.
                    let spec = &v.specs[0];
                    if let Some(doc) = &spec.doc {
                        queue.push(PendingItem {
                            locator: Locator::ValueSpec { tok, decl_key: any_key.clone(), spec_key: spec.ident_key() },
                            rendered: Rendered::Doc(render_doc(doc)),
                        });
                    } else if let Some(eol) = &spec.eol {
                        queue.push(PendingItem {
                            locator: Locator::ValueSpec { tok, decl_key: any_key.clone(), spec_key: spec.ident_key() },
                            rendered: Rendered::Eol(render_eol(eol)),
                        });
                    }
                    continue;
                }
                if v.is_block {
                    for spec in v.specs.iter().rev() {
                        if let Some(doc) = &spec.doc {
                            queue.push(PendingItem {
                                locator: Locator::ValueSpec { tok, decl_key: any_key.clone(), spec_key: spec.ident_key() },
                                rendered: Rendered::Doc(render_doc(doc)),
                            });
                        } else if let Some(eol) = &spec.eol {
                            queue.push(PendingItem {
                                locator: Locator::ValueSpec { tok, decl_key: any_key.clone(), spec_key: spec.ident_key() },
                                rendered: Rendered::Eol(render_eol(eol)),
                            });
                        }
                    }
                    if let Some(doc) = &v.doc {
                        queue.push(PendingItem {
                            locator: Locator::ValueDecl { tok, decl_key: any_key.clone() },
                            rendered: Rendered::Doc(render_doc(doc)),
                        });
                    }
                } else {
                    // non-block, non-block: decl-level doc or spec EOL.
                    let spec = &v.specs[0];
                    if let Some(doc) = &v.doc {
                        queue.push(PendingItem {
                            locator: Locator::ValueDecl { tok, decl_key: any_key.clone() },
                            rendered: Rendered::Doc(render_doc(doc)),
                        });
                    } else if let Some(eol) = &spec.eol {
                        queue.push(PendingItem {
                            locator: Locator::ValueSpec { tok, decl_key: any_key.clone(), spec_key: spec.ident_key() },
                            rendered: Rendered::Eol(render_eol(eol)),
                        });
                    }
                }
            }
        }
        SnippetKind::Type => {
            for decl in &snippet.ast.decls {
                let Decl::Type(t) = decl else { continue };
                let any_name = t.specs.first().map(|s| s.name.clone()).unwrap_or_default();
                let source_decl = find_type_decl(initial_file, &any_name).ok_or_else(|| {
                    SnippetError::new(raw, format!("type {any_name:?} not found in target"))
                })?;
                for spec in &t.specs {
                    let source_spec = find_type_spec(source_decl, &spec.name).ok_or_else(|| {
                        SnippetError::new(raw, format!("type {:?} not found in target", spec.name))
                    })?;
                    if !types_same_shape(&source_spec.ty, &spec.ty) {
                        return Err(SnippetError::new(raw, "Source type does not match type in snippet."));
                    }
                    if let Some(doc) = &spec.doc {
                        queue.push(PendingItem {
                            locator: Locator::TypeSpec { decl_name: any_name.clone(), spec_name: spec.name.clone() },
                            rendered: Rendered::Doc(render_doc(doc)),
                        });
                    } else if let Some(eol) = &spec.eol {
                        queue.push(PendingItem {
                            locator: Locator::TypeSpec { decl_name: any_name.clone(), spec_name: spec.name.clone() },
                            rendered: Rendered::Eol(render_eol(eol)),
                        });
                    }
                    collect_field_items(&spec.ty, &[], &mut queue, &spec.name);
                }
                if t.is_block {
                    if let Some(doc) = &t.doc {
                        queue.push(PendingItem {
                            locator: Locator::TypeDecl { decl_name: any_name.clone() },
                            rendered: Rendered::Doc(render_doc(doc)),
                        });
                    }
                } else if let Some(doc) = &t.doc {
                    queue.push(PendingItem {
                        locator: Locator::TypeDecl { decl_name: any_name.clone() },
                        rendered: Rendered::Doc(render_doc(doc)),
                    });
                }
            }
        }
    }
    Ok(queue)
}

fn trim_trailing_ws(bytes: &[u8], mut start: usize) -> usize {
    while start > 0 && (bytes[start - 1] == b' ' || bytes[start - 1] == b'\t') {
        start -= 1;
    }
    start
}

fn set_leading_doc(
    bytes: &[u8],
    target_start: usize,
    existing_doc: &Option<CommentGroup>,
    existing_eol: &Option<CommentGroup>,
    rendered_doc: &str,
) -> Vec<u8> {
    let mut cur = bytes.to_vec();
    if let Some(eol) = existing_eol {
        let start = trim_trailing_ws(&cur, eol.start);
        cur = docrw_text::delete_range(&cur, start, eol.end, false);
    }
    match existing_doc {
        Some(doc) => {
            let end = if cur.get(doc.end) == Some(&b'\n') { doc.end + 1 } else { doc.end };
            docrw_text::splice(&cur, rendered_doc, doc.start, end)
        }
        None => docrw_text::splice(&cur, rendered_doc, target_start, target_start),
    }
}

fn set_trailing_eol(
    bytes: &[u8],
    code_end: usize,
    existing_eol: &Option<CommentGroup>,
    existing_doc: &Option<CommentGroup>,
    rendered_eol: &str,
) -> Vec<u8> {
    let mut cur = match existing_eol {
        Some(eol) => {
            let start = trim_trailing_ws(bytes, eol.start);
            docrw_text::splice(bytes, &format!(" {rendered_eol}"), start, eol.end)
        }
        None => docrw_text::splice(bytes, &format!(" {rendered_eol}"), code_end, code_end),
    };
    if let Some(doc) = existing_doc {
        let end = if bytes.get(doc.end) == Some(&b'\n') { doc.end + 1 } else { doc.end };
        cur = docrw_text::delete_range(&cur, doc.start, end, true);
    }
    cur
}

fn locate_and_apply(
    file: &File,
    item: &PendingItem,
    reject_updates: bool,
) -> Result<(Vec<u8>, bool, bool), SnippetError> {
    let (position, existing_doc, existing_eol) = match &item.locator {
        Locator::Func { key } => {
            let f = find_func(file, key).ok_or_else(|| SnippetError::new("", format!("function {key:?} vanished from target")))?;
            (f.position, f.doc.clone(), f.eol.clone())
        }
        Locator::ValueSpec { tok, decl_key, spec_key } => {
            let decl = find_value_decl(file, decl_key, *tok)
                .ok_or_else(|| SnippetError::new("", format!("identifier {decl_key:?} vanished from target")))?;
            let spec = find_value_spec(decl, spec_key)
                .ok_or_else(|| SnippetError::new("", format!("identifier {spec_key:?} vanished from target")))?;
            (spec.position, spec.doc.clone(), spec.eol.clone())
        }
        Locator::ValueDecl { tok, decl_key } => {
            let decl = find_value_decl(file, decl_key, *tok)
                .ok_or_else(|| SnippetError::new("", format!("identifier {decl_key:?} vanished from target")))?;
            (decl.position, decl.doc.clone(), None)
        }
        Locator::TypeSpec { decl_name, spec_name } => {
            let decl = find_type_decl(file, decl_name)
                .ok_or_else(|| SnippetError::new("", format!("type {decl_name:?} vanished from target")))?;
            let spec = find_type_spec(decl, spec_name)
                .ok_or_else(|| SnippetError::new("", format!("type {spec_name:?} vanished from target")))?;
            (spec.position, spec.doc.clone(), spec.eol.clone())
        }
        Locator::TypeDecl { decl_name } => {
            let decl = find_type_decl(file, decl_name)
                .ok_or_else(|| SnippetError::new("", format!("type {decl_name:?} vanished from target")))?;
            (decl.position, decl.doc.clone(), None)
        }
        Locator::Field { type_name, path } => {
            let decl = find_type_decl(file, type_name)
                .ok_or_else(|| SnippetError::new("", format!("type {type_name:?} vanished from target")))?;
            let spec = find_type_spec(decl, type_name)
                .ok_or_else(|| SnippetError::new("", format!("type {type_name:?} vanished from target")))?;
            let member = navigate(&spec.ty, path)
                .ok_or_else(|| SnippetError::new("", format!("field path {path:?} vanished from target")))?;
            (member.position(), member.doc().clone(), member.eol().clone())
        }
    };

    let has_existing = existing_doc.is_some() || existing_eol.is_some();
    if reject_updates && has_existing {
        return Ok((file.bytes().to_vec(), false, true));
    }
    let new_bytes = match &item.rendered {
        Rendered::Doc(text) => set_leading_doc(file.bytes(), position.start, &existing_doc, &existing_eol, text),
        Rendered::Eol(text) => set_trailing_eol(file.bytes(), position.end, &existing_eol, &existing_doc, text),
    };
    Ok((new_bytes, true, false))
}

/// Drive spec.md §4.D.3's apply loop for one non-package-doc snippet
/// against one file's current bytes.
pub fn apply_snippet(
    initial_bytes: &[u8],
    path: &Path,
    snippet: &Snippet,
    frontend: &dyn SyntaxFrontend,
    reject_updates: bool,
) -> Result<ApplyOutcome, ApplyError> {
    let initial_file = frontend
        .parse_file(path, initial_bytes)
        .map_err(|e| ApplyError::Fatal(EditFatalError::Reparse(e)))?;
    let queue = build_queue(snippet, &initial_file).map_err(ApplyError::Snippet)?;

    let mut state = initial_bytes.to_vec();
    let mut applied = 0usize;
    let mut partially_rejected = false;
    for item in &queue {
        // Reparse before every splice: offsets are never carried across a
        // byte mutation (spec.md §3, invariant 1).
        let file = frontend
            .parse_file(path, &state)
            .map_err(|e| ApplyError::Fatal(EditFatalError::Reparse(e)))?;
        let (new_bytes, made_change, rejected) =
            locate_and_apply(&file, item, reject_updates).map_err(ApplyError::Snippet)?;
        if rejected {
            partially_rejected = true;
            continue;
        }
        if made_change {
            state = new_bytes;
            applied += 1;
        }
    }

    if applied == 0 && !partially_rejected {
        return Err(ApplyError::Snippet(SnippetError::new(&snippet.raw, "No comments to apply.")));
    }
    Ok(ApplyOutcome {
        bytes: state,
        changed: applied > 0,
        partially_rejected,
    })
}

/// spec.md §4.D.4 Package doc: `target_bytes` is the already-selected
/// file's current bytes (a new file's starting content is just
/// `package <name>\n`); the snippet's own doc group is spliced in
/// immediately before the `package` keyword, replacing any previous
/// leading comment group.
pub fn apply_package_doc(
    target_bytes: &[u8],
    path: &Path,
    snippet: &Snippet,
    frontend: &dyn SyntaxFrontend,
    reject_updates: bool,
) -> Result<ApplyOutcome, ApplyError> {
    let doc = snippet
        .ast
        .package_doc
        .as_ref()
        .ok_or_else(|| ApplyError::Snippet(SnippetError::new(&snippet.raw, "No comments to apply.")))?;
    let rendered = render_doc(doc);

    let file = frontend
        .parse_file(path, target_bytes)
        .map_err(|e| ApplyError::Fatal(EditFatalError::Reparse(e)))?;
    let existing = file.package_doc.clone();
    if reject_updates && existing.is_some() {
        return Ok(ApplyOutcome {
            bytes: target_bytes.to_vec(),
            changed: false,
            partially_rejected: true,
        });
    }
    let package_kw_start = find_package_keyword_offset(file.bytes());
    let new_bytes = set_leading_doc(file.bytes(), package_kw_start, &existing, &None, &rendered);
    Ok(ApplyOutcome {
        bytes: new_bytes,
        changed: true,
        partially_rejected: false,
    })
}

fn find_package_keyword_offset(bytes: &[u8]) -> usize {
    let text = String::from_utf8_lossy(bytes);
    let mut offset = 0usize;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with("package ") || trimmed.trim_end() == "package" {
            return offset + (line.len() - trimmed.len());
        }
        offset += line.len();
    }
    0
}
