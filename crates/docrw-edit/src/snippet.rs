//! Unwrap, parse, and classify a raw snippet (spec.md §4.D.1-2).

use std::path::Path;

use docrw_syntax::{Decl, File, SyntaxFrontend, ValueTok};

use crate::error::SnippetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetKind {
    PackageDoc,
    Func,
    Type,
    Var,
    Const,
}

pub struct Snippet {
    pub raw: String,
    pub unwrapped: String,
    pub ast: File,
    pub kind: SnippetKind,
}

/// Strip an optional triple-backtick fence. Only an empty language tag or
/// one that looks like the target language's own identifier is accepted.
fn unwrap_fence(raw: &str) -> Result<String, String> {
    let trimmed = raw;
    if !trimmed.trim_start().starts_with("```") {
        return Ok(trimmed.to_string());
    }
    let start = trimmed.find("```").unwrap();
    let after_open = &trimmed[start + 3..];
    let newline = after_open
        .find('\n')
        .ok_or_else(|| "snippet fence is missing a newline after the opener".to_string())?;
    let lang_tag = after_open[..newline].trim();
    if !(lang_tag.is_empty() || lang_tag.eq_ignore_ascii_case("go")) {
        return Err(format!("snippet fence uses unsupported language {lang_tag:?}"));
    }
    let body_and_rest = &after_open[newline + 1..];
    let mut offset = 0usize;
    let mut closer_start = None;
    for line in body_and_rest.split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);
        if content.trim() == "```" {
            closer_start = Some(offset);
            break;
        }
        offset += line.len();
    }
    let close = closer_start.ok_or_else(|| "snippet fence has no matching three-backtick closer".to_string())?;
    Ok(body_and_rest[..close].to_string())
}

/// Unwrap, parse (with two auto-recovery heuristics), and classify a raw
/// snippet against the target package's name.
pub fn parse_snippet(
    raw: &str,
    frontend: &dyn SyntaxFrontend,
    target_package_name: &str,
) -> Result<Snippet, SnippetError> {
    let unwrapped = unwrap_fence(raw).map_err(|msg| SnippetError::new(raw, msg))?;

    let mut attempt = unwrapped.clone();
    let mut ast = match frontend.parse_file(Path::new("snippet.go"), attempt.as_bytes()) {
        Ok(f) => f,
        Err(e) => {
            if looks_like_missing_package(&e) {
                attempt = format!("package {target_package_name}\n{attempt}");
                match frontend.parse_file(Path::new("snippet.go"), attempt.as_bytes()) {
                    Ok(f) => f,
                    Err(e2) if looks_like_unclosed_brace(&e2) => {
                        attempt.push('}');
                        frontend
                            .parse_file(Path::new("snippet.go"), attempt.as_bytes())
                            .map_err(|e3| SnippetError::new(raw, format!("snippet does not parse: {e3}")))?
                    }
                    Err(e2) => return Err(SnippetError::new(raw, format!("snippet does not parse: {e2}"))),
                }
            } else if looks_like_unclosed_brace(&e) {
                attempt.push('}');
                frontend
                    .parse_file(Path::new("snippet.go"), attempt.as_bytes())
                    .map_err(|e2| SnippetError::new(raw, format!("snippet does not parse: {e2}")))?
            } else {
                return Err(SnippetError::new(raw, format!("snippet does not parse: {e}")));
            }
        }
    };

    if ast.package_name != target_package_name {
        return Err(SnippetError::new(
            raw,
            format!(
                "snippet package {:?} does not match target package {:?}",
                ast.package_name, target_package_name
            ),
        ));
    }
    ast.path = Path::new("snippet.go").to_path_buf();

    let kind = classify(raw, &ast)?;
    validate_comment_placement(raw, &ast)?;
    Ok(Snippet {
        raw: raw.to_string(),
        unwrapped: attempt,
        ast,
        kind,
    })
}

/// spec.md §4.D.2: no declaration/spec/field may carry both a leading doc
/// group and a trailing EOL comment, recursively inside struct/interface
/// types.
fn validate_comment_placement(raw: &str, ast: &File) -> Result<(), SnippetError> {
    use docrw_syntax::{interface_members_of, struct_fields_of, InterfaceMember, TypeExpr};

    fn dual(doc: &Option<docrw_syntax::CommentGroup>, eol: &Option<docrw_syntax::CommentGroup>) -> bool {
        doc.is_some() && eol.is_some()
    }

    fn check_type(ty: &TypeExpr) -> bool {
        if let Some(fields) = struct_fields_of(ty) {
            for f in fields {
                if dual(&f.doc, &f.eol) || check_type(&f.ty) {
                    return true;
                }
            }
        }
        if let Some(members) = interface_members_of(ty) {
            for m in members {
                let bad = match m {
                    InterfaceMember::Method { doc, eol, .. } => dual(doc, eol),
                    InterfaceMember::Embedded { doc, eol, .. } => dual(doc, eol),
                };
                if bad {
                    return true;
                }
            }
        }
        false
    }

    for decl in &ast.decls {
        let bad = match decl {
            Decl::Func(f) => dual(&f.doc, &f.eol),
            Decl::Type(t) => t
                .specs
                .iter()
                .any(|s| dual(&s.doc, &s.eol) || check_type(&s.ty)),
            Decl::Value(v) => v.specs.iter().any(|s| dual(&s.doc, &s.eol)),
        };
        if bad {
            return Err(SnippetError::new(
                raw,
                "snippet declaration may not carry both a leading doc comment and a trailing EOL comment",
            ));
        }
    }
    Ok(())
}

fn looks_like_missing_package(e: &anyhow::Error) -> bool {
    let msg = e.to_string().to_lowercase();
    msg.contains("package")
}

fn looks_like_unclosed_brace(e: &anyhow::Error) -> bool {
    let msg = e.to_string().to_lowercase();
    msg.contains("brace") || msg.contains("unexpected eof") || msg.contains("unclosed")
}

fn classify(raw: &str, ast: &File) -> Result<SnippetKind, SnippetError> {
    if ast.decls.is_empty() {
        if ast.package_doc.is_some() {
            return Ok(SnippetKind::PackageDoc);
        }
        return Err(SnippetError::new(raw, "snippet contains no declarations"));
    }
    if ast.package_doc.is_some() {
        return Err(SnippetError::new(
            raw,
            "Package doc comment snippet may not contain other declarations.",
        ));
    }

    let mut funcs = 0;
    let mut types = 0;
    let mut vars = 0;
    let mut consts = 0;
    for decl in &ast.decls {
        match decl {
            Decl::Func(_) => funcs += 1,
            Decl::Type(t) => {
                if t.specs.is_empty() {
                    return Err(SnippetError::new(raw, "snippet type block is empty"));
                }
                types += 1;
            }
            Decl::Value(v) => {
                if v.specs.is_empty() {
                    return Err(SnippetError::new(raw, "snippet value block is empty"));
                }
                match v.tok {
                    ValueTok::Var => vars += 1,
                    ValueTok::Const => consts += 1,
                }
            }
        }
    }
    let kinds_present = [funcs > 0, types > 0, vars > 0, consts > 0]
        .iter()
        .filter(|p| **p)
        .count();
    if kinds_present > 1 || ast.decls.len() > 1 && funcs > 0 {
        return Err(SnippetError::new(
            raw,
            "snippet contains mixed declaration kinds; allowed forms are: a single function, a single type (or type block), a set of vars, or a set of consts",
        ));
    }
    if funcs == 1 && ast.decls.len() == 1 {
        return Ok(SnippetKind::Func);
    }
    if types > 0 {
        return Ok(SnippetKind::Type);
    }
    if vars > 0 {
        return Ok(SnippetKind::Var);
    }
    if consts > 0 {
        return Ok(SnippetKind::Const);
    }
    Err(SnippetError::new(raw, "unrecognized snippet shape"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_plain_fence() {
        let out = unwrap_fence("```\nvar Foo int\n```").unwrap();
        assert_eq!(out, "var Foo int\n");
    }

    #[test]
    fn strips_go_tagged_fence() {
        let out = unwrap_fence("```go\nvar Foo int\n```").unwrap();
        assert_eq!(out, "var Foo int\n");
    }

    #[test]
    fn rejects_unsupported_language_tag() {
        assert!(unwrap_fence("```python\nx = 1\n```").is_err());
    }

    #[test]
    fn passthrough_when_not_fenced() {
        let out = unwrap_fence("var Foo int\n").unwrap();
        assert_eq!(out, "var Foo int\n");
    }

    #[test]
    fn rejects_closer_with_wrong_backtick_count() {
        assert!(unwrap_fence("```\nvar Foo int\n````").is_err());
    }
}
