//! `RemoveDocumentation` / `RemoveDocumentationInFile` (spec.md §6 op 5),
//! wiring `docrw-edit`'s Remove Engine to disk: "only files that actually
//! changed are written" (spec.md §4.G).

use std::path::{Path, PathBuf};

use docrw_syntax::{PassthroughPrinter, SyntaxFrontend};

use crate::blockfmt::normalize_blocks;
use crate::{io, EngineError, Options};

pub fn remove_documentation_in_file(
    path: &Path,
    frontend: &dyn SyntaxFrontend,
    identifiers: &[String],
) -> Result<bool, EngineError> {
    let printer = PassthroughPrinter;
    let options = Options::default();
    let bytes = std::fs::read(path)?;
    let file = frontend.parse_file(path, &bytes).map_err(EngineError::Parse)?;
    let new_bytes = docrw_edit::remove_from_file(&file, identifiers);
    if new_bytes == bytes {
        return Ok(false);
    }
    let normalized = normalize_blocks(
        &new_bytes,
        path,
        frontend,
        &printer,
        options.reflow_tab_width as usize,
        options.reflow_max_width as usize,
    )?;
    if normalized == bytes {
        return Ok(false);
    }
    io::write_file(path, &normalized)?;
    Ok(true)
}

pub fn remove_documentation(
    dir: &Path,
    frontend: &dyn SyntaxFrontend,
    identifiers: &[String],
) -> Result<Vec<PathBuf>, EngineError> {
    let printer = PassthroughPrinter;
    let options = Options::default();
    let pkg = io::load_package(dir, frontend)?;
    let mut changed = Vec::new();
    for file in pkg.all_files() {
        let new_bytes = docrw_edit::remove_from_file(file, identifiers);
        if new_bytes == file.bytes() {
            continue;
        }
        let normalized = normalize_blocks(
            &new_bytes,
            &file.path,
            frontend,
            &printer,
            options.reflow_tab_width as usize,
            options.reflow_max_width as usize,
        )?;
        if normalized != file.bytes() {
            io::write_file(&file.path, &normalized)?;
            changed.push(file.path.clone());
        }
    }
    tracing::info!(files = changed.len(), "remove_documentation complete");
    Ok(changed)
}
