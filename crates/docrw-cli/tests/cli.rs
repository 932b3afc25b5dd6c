//! End-to-end smoke tests against the built `docrw` binary.

use std::fs;
use std::process::Command;

fn write(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn docrw() -> Command {
    Command::new(env!("CARGO_BIN_EXE_docrw"))
}

#[test]
fn reflow_all_reports_nothing_to_do_on_a_package_with_no_long_comments() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.go", "package mypkg\n\n// Foo does a thing.\nfunc Foo() {}\n");

    let output = docrw()
        .args(["reflow-all", dir.path().to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn reflow_paths_check_mode_leaves_the_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let long = "// MyFunction does a great many things across a great many lines of code and this single comment line runs well past eighty columns on its own.\nfunc MyFunction() {}\n";
    let path = write(dir.path(), "a.go", &format!("package mypkg\n\n{long}"));
    let before = fs::read_to_string(&path).unwrap();

    let output = docrw()
        .args(["reflow-paths", "--check", path.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let after = fs::read_to_string(&path).unwrap();
    assert_eq!(before, after, "check mode must not modify files on disk");
    assert!(!output.stdout.is_empty(), "expected a diff on stdout");
}

#[test]
fn remove_file_reports_success_even_when_nothing_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "a.go", "package mypkg\n\nfunc Foo() {}\n");

    let output = docrw().args(["remove-file", path.to_str().unwrap()]).output().unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn unknown_identifier_reflow_exits_nonzero_and_reports_json() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.go", "package mypkg\n\nfunc Foo() {}\n");

    let output = docrw()
        .args(["--json", "reflow", dir.path().to_str().unwrap(), "Bar"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Bar"));
}
