//! Comment Classifier (spec.md §4.A).
//!
//! A single source of truth for "is this comment line one the engine must
//! never touch": directives, linter pragmas, and generated-code markers.
//! `docrw-edit`, `docrw-reflow`, `docrw-format`, and the Remove Engine all
//! call into this crate rather than re-deriving the rule set, per spec.md
//! §9's "Directive detection is a closed set and must remain a single
//! source of truth".

use std::sync::LazyLock;

use regex::Regex;

/// Compiler/toolchain directives: must appear immediately after `//`, with
/// no space, to be recognized by `go build`/`cgo`/etc, so we match without
/// trimming a space here.
const DIRECTIVE_PREFIXES: &[&str] = &["go:", "+build", "#cgo", "line ", "line\t"];

/// Linter/static-analysis pragmas. Conventionally written with a space
/// after `//` (`// nolint:unused`), so callers get one optional leading
/// space stripped before this set is checked.
const LINTER_PREFIXES: &[&str] = &["nolint", "lint:", "#nosec", "revive:"];

static GENERATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^//\s*Code generated .* DO NOT EDIT\.?\s*$").expect("static regex is valid")
});

/// True iff `line` (one physical line of a `//`-comment, including its
/// `//` prefix) must survive every engine operation byte-for-byte: never
/// deleted, never reflowed, never moved from leading to trailing position.
pub fn is_preserved_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    let Some(rest) = trimmed.strip_prefix("//") else {
        return false;
    };
    if DIRECTIVE_PREFIXES.iter().any(|p| rest.starts_with(p)) {
        return true;
    }
    let rest_no_space = rest.strip_prefix(' ').unwrap_or(rest);
    if LINTER_PREFIXES
        .iter()
        .any(|p| prefix_matches_as_word(rest_no_space, p))
    {
        return true;
    }
    GENERATED_RE.is_match(trimmed)
}

/// True iff `text` starts with `prefix` and `prefix` ends there as a whole
/// word. Prefixes that already embed their own separator (`lint:`,
/// `revive:`) are a plain `starts_with` -- the colon is itself the
/// boundary. Bare prefixes (`nolint`, `#nosec`) additionally require the
/// next character to be `:`, whitespace, or end-of-string, so `nolint`
/// doesn't match inside an ordinary word like `nolinting`.
fn prefix_matches_as_word(text: &str, prefix: &str) -> bool {
    let Some(rest) = text.strip_prefix(prefix) else {
        return false;
    };
    if prefix.ends_with(':') {
        return true;
    }
    match rest.chars().next() {
        None => true,
        Some(c) => c == ':' || c.is_whitespace(),
    }
}

/// True iff any line in `group` is preserved, per spec.md §4.A: "A group
/// that forces doc is never converted to EOL."
pub fn forces_doc<'a, I>(group: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    group.into_iter().any(is_preserved_line)
}

/// True iff `line` is specifically the "generated code" marker (spec.md
/// §4.A rule 3), as distinct from a directive or linter pragma. Used by
/// `docrw-engine` to decide whether a whole file is generated (spec.md
/// §6, op 3: "all non-generated identifiers").
pub fn is_generated_marker(line: &str) -> bool {
    GENERATED_RE.is_match(line.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_compiler_directives() {
        assert!(is_preserved_line("//go:generate stringer -type=Kind"));
        assert!(is_preserved_line("// +build linux"));
        assert!(is_preserved_line("//+build linux"));
        assert!(is_preserved_line("// #cgo CFLAGS: -Wall"));
        assert!(is_preserved_line("//line foo.go:10"));
    }

    #[test]
    fn recognizes_linter_pragmas() {
        assert!(is_preserved_line("// nolint:unused"));
        assert!(is_preserved_line("//nolint:unused"));
        assert!(is_preserved_line("// lint:file-ignore"));
        assert!(is_preserved_line("// #nosec G401"));
        assert!(is_preserved_line("// revive:disable"));
    }

    #[test]
    fn recognizes_generated_marker() {
        assert!(is_preserved_line(
            "// Code generated by protoc-gen-go. DO NOT EDIT."
        ));
        assert!(is_preserved_line(
            "// Code generated by mockery v2.1.0. DO NOT EDIT"
        ));
    }

    #[test]
    fn ordinary_doc_comment_is_not_preserved() {
        assert!(!is_preserved_line("// Foo does the thing."));
        assert!(!is_preserved_line("// nolinting is not the same word"));
    }

    #[test]
    fn forces_doc_true_if_any_line_preserved() {
        let group = ["// Foo does the thing.", "//go:noinline"];
        assert!(forces_doc(group));
        let group2 = ["// Foo does the thing.", "// and more."];
        assert!(!forces_doc(group2));
    }
}
