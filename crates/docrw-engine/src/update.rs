//! `UpdateDocumentation` (spec.md §6 op 1): apply a batch of raw snippets
//! to a package on disk, one splice state machine per targeted file,
//! with partial success accounted for per spec.md §7/§8 property 5.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use docrw_edit::{apply_package_doc, apply_snippet, parse_snippet, select_package_doc_target, ApplyError, PackageDocTarget, Snippet, SnippetError, SnippetKind};
use docrw_syntax::{Decl, File, PassthroughPrinter, Printer, SyntaxFrontend, TypeExpr};

use crate::blockfmt::normalize_blocks;
use crate::identifiers::resolve;
use crate::reflow::reflow_documentation;
use crate::{io, EngineError, Options};

/// Result of `update_documentation`: which files actually changed on
/// disk and the per-snippet errors collected along the way. `changed`
/// being non-empty and `snippet_errors` being non-empty are independent
/// -- other snippets keep processing after one fails (spec.md §7).
pub struct UpdateOutcome {
    pub changed_files: Vec<PathBuf>,
    pub snippet_errors: Vec<SnippetError>,
}

/// The identifier keys a snippet references at the top level, used both
/// to pick the target file and (when `Options::reflow` is set) to scope
/// the post-apply reflow pass.
fn snippet_target_keys(snippet: &Snippet) -> Vec<String> {
    let mut out = Vec::new();
    for decl in &snippet.ast.decls {
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
        }
    }
    if let Some(members) = docrw_syntax::interface_members_of(ty) {
        for m in members {
            out.push(format!("{type_name}.{}", m.key()));
        }
    }
}

/// Files of `pkg_files` whose current AST already owns at least one of
/// `keys` -- the snippet's candidate target(s).
fn candidate_paths(pkg_files: &[File], keys: &[String]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for file in pkg_files {
        if keys.iter().any(|k| resolve(file, k).is_some()) {
            out.push(file.path.clone());
        }
    }
    out
}

pub fn update_documentation(
    dir: &Path,
    frontend: &dyn SyntaxFrontend,
    raw_snippets: &[String],
    options: &Options,
) -> Result<UpdateOutcome, EngineError> {
    let printer = PassthroughPrinter;
    let pkg = io::load_package(dir, frontend)?;
    let mut states: HashMap<PathBuf, Vec<u8>> = pkg
        .files
        .iter()
        .map(|f| (f.path.clone(), f.bytes().to_vec()))
        .collect();
    let mut touched: Vec<PathBuf> = Vec::new();
    let mut snippet_errors = Vec::new();
    let mut reflow_keys: Vec<String> = Vec::new();

    'snippets: for raw in raw_snippets {
        let snippet = match parse_snippet(raw, frontend, &pkg.name) {
            Ok(s) => s,
            Err(e) => {
                snippet_errors.push(e);
                continue;
            }
        };

        if snippet.kind == SnippetKind::PackageDoc {
            let file_refs: Vec<&File> = pkg.files.iter().collect();
            let target = select_package_doc_target(&file_refs, &pkg.name, &pkg.dir);
            let (path, seed) = match target {
                PackageDocTarget::Existing(path) => {
                    let bytes = states
                        .get(&path)
                        .cloned()
                        .unwrap_or_else(|| pkg.file(&path).map(|f| f.bytes().to_vec()).unwrap_or_default());
                    (path, bytes)
                }
                PackageDocTarget::New(path) => (path, format!("package {}\n", pkg.name).into_bytes()),
            };
            match apply_package_doc(&seed, &path, &snippet, frontend, options.reject_updates) {
                Ok(outcome) => {
                    if outcome.partially_rejected {
                        snippet_errors.push(SnippetError::partially_rejected(&snippet.raw));
                    }
                    if outcome.changed {
                        states.insert(path.clone(), outcome.bytes);
                        if !touched.contains(&path) {
                            touched.push(path);
                        }
                    }
                }
                Err(ApplyError::Fatal(e)) => return Err(EngineError::Edit(e)),
                Err(ApplyError::Snippet(e)) => snippet_errors.push(e),
            }
            continue 'snippets;
        }

        let keys = snippet_target_keys(&snippet);
        let candidates = candidate_paths(&pkg.files, &keys);
        let path = match candidates.as_slice() {
            [] => {
                snippet_errors.push(SnippetError::new(
                    &snippet.raw,
                    "no file in the target package contains a declaration matching this snippet",
                ));
                continue 'snippets;
            }
            [one] => one.clone(),
            many => {
                snippet_errors.push(SnippetError::new(
                    &snippet.raw,
                    format!(
                        "Identifiers spanned multiple files: {}",
                        many.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
                    ),
                ));
                continue 'snippets;
            }
        };

        let state = states.get(&path).cloned().unwrap_or_default();
        match apply_snippet(&state, &path, &snippet, frontend, options.reject_updates) {
            Ok(outcome) => {
                if outcome.partially_rejected {
                    snippet_errors.push(SnippetError::partially_rejected(&snippet.raw));
                }
                if outcome.changed {
                    states.insert(path.clone(), outcome.bytes);
                    if !touched.contains(&path) {
                        touched.push(path.clone());
                    }
                    if options.reflow {
                        reflow_keys.extend(keys.iter().cloned());
                    }
                }
            }
            Err(ApplyError::Fatal(e)) => return Err(EngineError::Edit(e)),
            Err(ApplyError::Snippet(e)) => snippet_errors.push(e),
        }
    }

    let mut changed_files = Vec::new();
    for path in &touched {
        let state = &states[path];
        let on_disk = pkg.file(path).map(|f| f.bytes().to_vec());
        let formatted = normalize_blocks(
            state,
            path,
            frontend,
            &printer,
            options.reflow_tab_width as usize,
            options.reflow_max_width as usize,
        )?;
        if on_disk.as_deref() != Some(formatted.as_slice()) {
            io::write_file(path, &formatted)?;
            changed_files.push(path.clone());
        }
    }

    if options.reflow && !reflow_keys.is_empty() {
        // Reflow runs once, after every splice has been written, against
        // the keys touched by this call's snippets -- not per-snippet,
        // since reflowing the same identifier twice is a no-op anyway
        // (spec.md §8 property 2) and batching avoids re-parsing the
        // whole package once per snippet.
        let (reflowed_paths, _failed) = reflow_documentation(dir, frontend, &reflow_keys, options)?;
        for path in reflowed_paths {
            if !changed_files.contains(&path) {
                changed_files.push(path);
            }
        }
    }

    tracing::info!(
        files = changed_files.len(),
        errors = snippet_errors.len(),
        "update_documentation complete"
    );
    Ok(UpdateOutcome {
        changed_files,
        snippet_errors,
    })
}
