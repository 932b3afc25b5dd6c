//! End-to-end `update_documentation` over real files on disk.

use std::fs;

use docrw_engine::{update_documentation, Options, TreeSitterGoFrontend};

fn write(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn inserts_a_doc_comment_and_writes_only_the_changed_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.go", "package mypkg\n\nvar Foo int\n");
    write(dir.path(), "b.go", "package mypkg\n\nvar Bar int\n");

    let frontend = TreeSitterGoFrontend;
    let snippets = vec!["// Foo is a thing.\nvar Foo int\n".to_string()];
    let outcome = update_documentation(dir.path(), &frontend, &snippets, &Options::default()).unwrap();

    assert!(outcome.snippet_errors.is_empty());
    assert_eq!(outcome.changed_files, vec![dir.path().join("a.go")]);
    let a = fs::read_to_string(dir.path().join("a.go")).unwrap();
    assert!(a.contains("// Foo is a thing.\nvar Foo int"));
    let b = fs::read_to_string(dir.path().join("b.go")).unwrap();
    assert_eq!(b, "package mypkg\n\nvar Bar int\n");
}

#[test]
fn unknown_identifier_is_a_snippet_error_and_no_file_changes() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.go", "package mypkg\n\nvar Foo int\n");

    let frontend = TreeSitterGoFrontend;
    let snippets = vec!["// Bar is a thing.\nvar Bar int\n".to_string()];
    let outcome = update_documentation(dir.path(), &frontend, &snippets, &Options::default()).unwrap();

    assert!(outcome.changed_files.is_empty());
    assert_eq!(outcome.snippet_errors.len(), 1);
}

#[test]
fn package_doc_snippet_creates_a_new_doc_file_on_an_empty_package() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "existing.go", "package mypkg\n");

    let frontend = TreeSitterGoFrontend;
    let snippets = vec!["// Package mypkg does things.\npackage mypkg\n".to_string()];
    let outcome = update_documentation(dir.path(), &frontend, &snippets, &Options::default()).unwrap();

    assert!(outcome.snippet_errors.is_empty());
    let doc_path = dir.path().join("doc.go");
    assert!(outcome.changed_files.contains(&doc_path));
    let doc = fs::read_to_string(&doc_path).unwrap();
    assert!(doc.contains("// Package mypkg does things."));
    let existing = fs::read_to_string(dir.path().join("existing.go")).unwrap();
    assert_eq!(existing, "package mypkg\n");
}

#[test]
fn partial_rejection_with_reject_updates_reports_an_error_and_leaves_bytes_alone() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.go", "package mypkg\n\nvar Foo int // existing\n");

    let frontend = TreeSitterGoFrontend;
    let snippets = vec!["// Foo is a thing.\nvar Foo int\n".to_string()];
    let options = Options {
        reject_updates: true,
        ..Options::default()
    };
    let outcome = update_documentation(dir.path(), &frontend, &snippets, &options).unwrap();

    assert!(outcome.changed_files.is_empty());
    assert_eq!(outcome.snippet_errors.len(), 1);
    assert!(outcome.snippet_errors[0].partially_rejected);
    let a = fs::read_to_string(dir.path().join("a.go")).unwrap();
    assert_eq!(a, "package mypkg\n\nvar Foo int // existing\n");
}
