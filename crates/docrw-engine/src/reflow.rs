//! `ReflowDocumentation` / `ReflowAllDocumentation` / `ReflowDocumentationPaths`
//! (spec.md §6, ops 2-4), driving `docrw-reflow` over each identifier's
//! existing leading doc.
//!
//! Reflow only ever touches a comment that is already a leading doc --
//! spec.md's own scenarios (S3, S4) reflow an existing block, never
//! convert an EOL comment into one. An identifier whose current form is
//! EOL-only, or carries no comment at all, is simply left alone; only an
//! identifier key that resolves in *no* file of the package is reported
//! back via `failed_identifiers`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use docrw_syntax::{File, PassthroughPrinter, Printer, SyntaxFrontend};

use crate::blockfmt::normalize_blocks;
use crate::identifiers::{all_keys_of_file, file_is_generated, resolve};
use crate::{io, EngineError, Options};

fn indent_tabs_of(bytes: &[u8], offset: usize) -> usize {
    let line_start = bytes[..offset]
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|p| p + 1)
        .unwrap_or(0);
    bytes[line_start..offset.min(bytes.len())]
        .iter()
        .take_while(|&&b| b == b'\t')
        .count()
}

/// Reflow one identifier's current leading doc in `bytes`. Returns the
/// new bytes if the reflowed text differs from what's already there,
/// `None` if the identifier has no leading doc or nothing changed.
fn reflow_one(
    bytes: &[u8],
    frontend: &dyn SyntaxFrontend,
    path: &Path,
    key: &str,
    tab_width: usize,
    max_width: usize,
    printer: &dyn Printer,
) -> anyhow::Result<Option<Vec<u8>>> {
    let file = frontend.parse_file(path, bytes)?;
    let Some(resolved) = resolve(&file, key) else {
        return Ok(None);
    };
    let Some(doc) = resolved.doc else {
        return Ok(None);
    };
    let indent = indent_tabs_of(bytes, doc.start);
    let current = doc.render_as_line_comments(&"\t".repeat(indent));
    let reflowed = docrw_reflow::reflow_block(&current, indent, tab_width, max_width, printer);
    if reflowed == current {
        return Ok(None);
    }
    let end = if bytes.get(doc.end) == Some(&b'\n') { doc.end + 1 } else { doc.end };
    Ok(Some(docrw_text::splice(bytes, &reflowed, doc.start, end)))
}

/// Reflow `identifiers` across every file of the package rooted at `dir`.
/// Returns the paths whose bytes-on-disk actually changed and the subset
/// of `identifiers` that could not be found in any file.
pub fn reflow_documentation(
    dir: &Path,
    frontend: &dyn SyntaxFrontend,
    identifiers: &[String],
    options: &Options,
) -> Result<(Vec<PathBuf>, Vec<String>), EngineError> {
    let printer = PassthroughPrinter;
    let pkg = io::load_package(dir, frontend)?;
    let mut states: HashMap<PathBuf, Vec<u8>> = pkg
        .all_files()
        .into_iter()
        .map(|f| (f.path.clone(), f.bytes().to_vec()))
        .collect();
    let mut failed = Vec::new();

    for key in identifiers {
        let mut found_anywhere = false;
        let paths: Vec<PathBuf> = states.keys().cloned().collect();
        for path in paths {
            let current = states.get(&path).expect("path came from states.keys()").clone();
            let Ok(file) = frontend.parse_file(&path, &current) else {
                continue;
            };
            if resolve(&file, key).is_none() {
                continue;
            }
            found_anywhere = true;
            match reflow_one(
                &current,
                frontend,
                &path,
                key,
                options.reflow_tab_width as usize,
                options.reflow_max_width as usize,
                &printer,
            ) {
                Ok(Some(new_bytes)) => {
                    states.insert(path, new_bytes);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(%key, error = %e, "reflow failed for identifier");
                }
            }
        }
        if !found_anywhere {
            failed.push(key.clone());
        }
    }

    let mut changed = Vec::new();
    for file in pkg.all_files() {
        let state = &states[&file.path];
        if state.as_slice() == file.bytes() {
            continue;
        }
        let formatted = normalize_blocks(
            state,
            &file.path,
            frontend,
            &printer,
            options.reflow_tab_width as usize,
            options.reflow_max_width as usize,
        )?;
        if formatted != file.bytes() {
            io::write_file(&file.path, &formatted)?;
            changed.push(file.path.clone());
        }
    }
    tracing::info!(files = changed.len(), failed = failed.len(), "reflow_documentation complete");
    Ok((changed, failed))
}

/// spec.md §6 op 3: every non-generated identifier in the main package
/// and its external test package.
pub fn reflow_all_documentation(
    dir: &Path,
    frontend: &dyn SyntaxFrontend,
    options: &Options,
) -> Result<(Vec<PathBuf>, Vec<String>), EngineError> {
    let pkg = io::load_package(dir, frontend)?;
    let mut keys = Vec::new();
    for file in pkg.all_files() {
        if file_is_generated(file) {
            continue;
        }
        keys.extend(all_keys_of_file(file));
    }
    reflow_documentation(dir, frontend, &keys, options)
}

/// Result of `reflow_documentation_paths`: modified paths, identifiers
/// that failed to reflow, and (dry-run only) a unified diff per modified
/// path -- the supplemental `--check` feature reuses this.
pub struct ReflowPathsOutcome {
    pub modified_paths: Vec<PathBuf>,
    pub failed_identifiers: Vec<String>,
    pub diffs: Vec<(PathBuf, String)>,
}

/// spec.md §6 op 4. `paths` are files or directories (non-recursive). In
/// dry-run mode the engine writes, diffs, and restores, so diffing
/// reuses the exact same write path as a live run.
pub fn reflow_documentation_paths(
    paths: &[PathBuf],
    frontend: &dyn SyntaxFrontend,
    dry_run: bool,
    options: &Options,
) -> Result<ReflowPathsOutcome, EngineError> {
    let printer = PassthroughPrinter;
    let mut go_files = Vec::new();
    for p in paths {
        if p.is_dir() {
            go_files.extend(io::list_go_files(p)?);
        } else {
            go_files.push(p.clone());
        }
    }

    let mut modified = Vec::new();
    let mut failed = Vec::new();
    let mut diffs = Vec::new();

    for path in go_files {
        let original = std::fs::read(&path)?;
        let file: File = match frontend.parse_file(&path, &original) {
            Ok(f) => f,
            Err(_) => continue,
        };
        if file_is_generated(&file) {
            continue;
        }
        let keys = all_keys_of_file(&file);
        let mut state = original.clone();
        for key in &keys {
            match reflow_one(
                &state,
                frontend,
                &path,
                key,
                options.reflow_tab_width as usize,
                options.reflow_max_width as usize,
                &printer,
            ) {
                Ok(Some(new_bytes)) => state = new_bytes,
                Ok(None) => {}
                Err(_) => failed.push(key.clone()),
            }
        }
        if state == original {
            continue;
        }
        let formatted = normalize_blocks(
            &state,
            &path,
            frontend,
            &printer,
            options.reflow_tab_width as usize,
            options.reflow_max_width as usize,
        )?;
        if formatted == original {
            continue;
        }
        io::write_file(&path, &formatted)?;
        modified.push(path.clone());
        if dry_run {
            let before = String::from_utf8_lossy(&original).into_owned();
            let after = String::from_utf8_lossy(&formatted).into_owned();
            diffs.push((path.clone(), diffy::create_patch(&before, &after).to_string()));
            io::write_file(&path, &original)?;
        }
    }

    Ok(ReflowPathsOutcome {
        modified_paths: modified,
        failed_identifiers: failed,
        diffs,
    })
}
