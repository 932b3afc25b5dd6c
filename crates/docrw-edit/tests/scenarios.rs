//! Literal end-to-end scenarios (spec.md §8) exercised at the splice
//! layer: one file in, one file out, no disk I/O.

use docrw_edit::{apply_package_doc, apply_snippet, parse_snippet, ApplyError};
use docrw_syntax::{SyntaxFrontend, TreeSitterGoFrontend};
use std::path::Path;

const FRONTEND: TreeSitterGoFrontend = TreeSitterGoFrontend;

fn bytes_after(source: &str, snippet_raw: &str, reject_updates: bool) -> Result<String, ApplyError> {
    let snippet = parse_snippet(snippet_raw, &FRONTEND, "mypkg").map_err(ApplyError::Snippet)?;
    let outcome = apply_snippet(source.as_bytes(), Path::new("f.go"), &snippet, &FRONTEND, reject_updates)?;
    Ok(String::from_utf8(outcome.bytes).unwrap())
}

#[test]
fn s1_doc_comment_insertion() {
    let source = "package mypkg\n\nvar Foo int\n";
    let out = bytes_after(source, "// Foo is ...\nvar Foo int\n", false).unwrap();
    assert_eq!(out, "package mypkg\n\n// Foo is ...\nvar Foo int\n");
}

#[test]
fn s2_eol_doc_toggle() {
    let source = "package mypkg\n\n// old comment\nvar Foo int\n";
    let out = bytes_after(source, "var Foo int // Foo is ...\n", false).unwrap();
    assert_eq!(out, "package mypkg\n\nvar Foo int // Foo is ...\n");
}

#[test]
fn s5_partial_rejection_with_reject_updates() {
    // `docrw_edit::apply_snippet` itself only reports whether anything was
    // rejected; turning that into a user-facing `SnippetError` is the
    // engine layer's job (it owns the "No comments to apply." vs.
    // "Part or all of snippet was not applied..." message split).
    let source = "package mypkg\n\nvar Foo int // existing\n";
    let snippet = parse_snippet("// Foo is ...\nvar Foo int\n", &FRONTEND, "mypkg").unwrap();
    let outcome = apply_snippet(source.as_bytes(), Path::new("f.go"), &snippet, &FRONTEND, true).unwrap();
    assert!(!outcome.changed);
    assert!(outcome.partially_rejected);
    assert_eq!(String::from_utf8(outcome.bytes).unwrap(), source);
}

#[test]
fn s6_package_doc_on_new_file() {
    let snippet = parse_snippet("// Package-level comment\npackage mypkg\n", &FRONTEND, "mypkg").unwrap();
    let new_file_seed = b"package mypkg\n".to_vec();
    let outcome = apply_package_doc(&new_file_seed, Path::new("doc.go"), &snippet, &FRONTEND, false).unwrap();
    let text = String::from_utf8(outcome.bytes).unwrap();
    assert_eq!(text, "// Package-level comment\npackage mypkg\n");
}

#[test]
fn s7_shape_mismatch_rejects() {
    let source = "package mypkg\n\ntype Foo struct {\n\tBar int\n}\n";
    let snippet_raw = "type Foo struct {\n\tBar string\n}\n";
    let snippet = parse_snippet(snippet_raw, &FRONTEND, "mypkg").unwrap();
    let err = apply_snippet(source.as_bytes(), Path::new("f.go"), &snippet, &FRONTEND, false)
        .expect_err("shape mismatch must reject");
    match err {
        ApplyError::Snippet(e) => {
            assert!(e.user_error_message.contains("Source type does not match type in snippet."));
        }
        ApplyError::Fatal(_) => panic!("expected a snippet error"),
    }
}

#[test]
fn func_body_present_eol_only_snippet_is_rejected() {
    let source = "package mypkg\n\nfunc Foo() {\n\treturn\n}\n";
    let snippet = parse_snippet("func Foo() {} // does a thing\n", &FRONTEND, "mypkg");
    // The snippet parses fine (a bodyless func with an EOL comment); it is
    // the *apply* step that must refuse to promote against a func whose
    // source already has a body.
    let snippet = snippet.unwrap();
    let err = apply_snippet(source.as_bytes(), Path::new("f.go"), &snippet, &FRONTEND, false)
        .expect_err("body present must reject the eol-only snippet");
    assert!(matches!(err, ApplyError::Snippet(_)));
}

#[test]
fn missing_identifier_is_a_snippet_error_with_no_partial_change() {
    let source = "package mypkg\n\nvar Foo int\n";
    let snippet = parse_snippet("// Bar is ...\nvar Bar int\n", &FRONTEND, "mypkg").unwrap();
    let err = apply_snippet(source.as_bytes(), Path::new("f.go"), &snippet, &FRONTEND, false)
        .expect_err("unknown identifier must error");
    assert!(matches!(err, ApplyError::Snippet(_)));
}
