//! End-to-end `remove_documentation`/`remove_documentation_in_file`.

use std::fs;

use docrw_engine::{remove_documentation, remove_documentation_in_file, TreeSitterGoFrontend};

fn write(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn removes_doc_for_one_identifier_and_leaves_other_files_untouched() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.go", "package mypkg\n\n// Foo does a thing.\nfunc Foo() {}\n");
    write(dir.path(), "b.go", "package mypkg\n\n// Bar does a thing.\nfunc Bar() {}\n");

    let frontend = TreeSitterGoFrontend;
    let changed = remove_documentation(dir.path(), &frontend, &["Foo".to_string()]).unwrap();

    assert_eq!(changed, vec![dir.path().join("a.go")]);
    let a = fs::read_to_string(dir.path().join("a.go")).unwrap();
    assert_eq!(a, "package mypkg\n\nfunc Foo() {}\n");
    let b = fs::read_to_string(dir.path().join("b.go")).unwrap();
    assert_eq!(b, "package mypkg\n\n// Bar does a thing.\nfunc Bar() {}\n");
}

#[test]
fn remove_in_file_reports_whether_anything_changed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "a.go", "package mypkg\n\nfunc Foo() {}\n");

    let frontend = TreeSitterGoFrontend;
    let changed = remove_documentation_in_file(&path, &frontend, &["Foo".to_string()]).unwrap();
    assert!(!changed);
}

#[test]
fn remove_all_strips_package_and_decl_docs() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "a.go",
        "// Package mypkg does things.\npackage mypkg\n\n// Foo does a thing.\nfunc Foo() {}\n",
    );

    let frontend = TreeSitterGoFrontend;
    let changed = remove_documentation(dir.path(), &frontend, &[]).unwrap();

    assert_eq!(changed, vec![dir.path().join("a.go")]);
    let a = fs::read_to_string(dir.path().join("a.go")).unwrap();
    assert_eq!(a, "package mypkg\n\nfunc Foo() {}\n");
}
