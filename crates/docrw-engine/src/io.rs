//! Package/file disk I/O (spec.md §5: "the on-disk file set is the only
//! shared resource"; §3's Package/File lifecycle).

use std::fs;
use std::path::{Path, PathBuf};

use docrw_syntax::{File as SynFile, Package, SyntaxFrontend};

use crate::EngineError;

/// Every `.go` file directly inside `dir`, sorted, non-recursive (spec.md
/// §6 op 4: "Paths are files or directories (non-recursive)").
pub fn list_go_files(dir: &Path) -> Result<Vec<PathBuf>, EngineError> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "go") {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Load every `.go` file directly inside `dir` into a `Package`, splitting
/// files whose package name carries the `_test` suffix into the sibling
/// external test package (spec.md §3).
pub fn load_package(dir: &Path, frontend: &dyn SyntaxFrontend) -> Result<Package, EngineError> {
    let paths = list_go_files(dir)?;
    let mut main_files: Vec<SynFile> = Vec::new();
    let mut test_files: Vec<SynFile> = Vec::new();
    let mut main_name: Option<String> = None;
    let mut test_name: Option<String> = None;

    for path in paths {
        let bytes = fs::read(&path)?;
        let file = frontend
            .parse_file(&path, &bytes)
            .map_err(EngineError::Parse)?;
        if file.package_name.ends_with("_test") {
            test_name.get_or_insert_with(|| file.package_name.clone());
            test_files.push(file);
        } else {
            main_name.get_or_insert_with(|| file.package_name.clone());
            main_files.push(file);
        }
    }

    let name = main_name
        .clone()
        .unwrap_or_else(|| test_name.clone().unwrap_or_default());
    let external_test = if test_files.is_empty() {
        None
    } else {
        Some(Box::new(Package {
            name: test_name.unwrap_or_default(),
            dir: dir.to_path_buf(),
            files: test_files,
            external_test: None,
        }))
    };

    Ok(Package {
        name,
        dir: dir.to_path_buf(),
        files: main_files,
        external_test,
    })
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), EngineError> {
    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote file");
    fs::write(path, bytes)?;
    Ok(())
}
