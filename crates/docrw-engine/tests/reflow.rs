//! End-to-end `reflow_documentation`/`reflow_all_documentation` over real
//! files on disk (spec.md §8 scenarios S3/S4).

use std::fs;

use docrw_engine::{reflow_all_documentation, reflow_documentation, Options, TreeSitterGoFrontend};

fn write(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn wraps_a_long_doc_comment_to_the_target_width() {
    let dir = tempfile::tempdir().unwrap();
    let long = "// MyFunction does a great many things across a great many lines of code and this single comment line runs well past eighty columns on its own.\nfunc MyFunction() {}\n";
    write(dir.path(), "a.go", &format!("package mypkg\n\n{long}"));

    let frontend = TreeSitterGoFrontend;
    let options = Options {
        reflow_max_width: 80,
        ..Options::default()
    };
    let (changed, failed) =
        reflow_documentation(dir.path(), &frontend, &["MyFunction".to_string()], &options).unwrap();

    assert!(failed.is_empty());
    assert_eq!(changed, vec![dir.path().join("a.go")]);
    let out = fs::read_to_string(dir.path().join("a.go")).unwrap();
    let doc_lines: Vec<&str> = out.lines().filter(|l| l.trim_start().starts_with("//")).collect();
    assert!(doc_lines.len() > 1, "expected the comment to wrap onto multiple lines");
    for line in &doc_lines {
        assert!(line.chars().count() <= 80, "line exceeded width: {line:?}");
    }
    assert!(out.contains("MyFunction does a great many things"));
}

#[test]
fn unknown_identifier_is_reported_as_failed() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.go", "package mypkg\n\nfunc Foo() {}\n");

    let frontend = TreeSitterGoFrontend;
    let (changed, failed) =
        reflow_documentation(dir.path(), &frontend, &["Bar".to_string()], &Options::default()).unwrap();

    assert!(changed.is_empty());
    assert_eq!(failed, vec!["Bar".to_string()]);
}

#[test]
fn reflow_all_skips_generated_files() {
    let dir = tempfile::tempdir().unwrap();
    let long_doc = "// This generated accessor has a description that is much too long to fit on one eighty column line of source code.";
    write(
        dir.path(),
        "gen.go",
        &format!("// Code generated by protoc-gen-go. DO NOT EDIT.\npackage mypkg\n\n{long_doc}\nfunc GenFunc() {{}}\n"),
    );

    let frontend = TreeSitterGoFrontend;
    let (changed, _failed) = reflow_all_documentation(dir.path(), &frontend, &Options::default()).unwrap();
    assert!(changed.is_empty());
    let out = fs::read_to_string(dir.path().join("gen.go")).unwrap();
    assert!(out.contains(long_doc));
}
