//! Declarations, specs, and fields -- the documentable entities spec.md §3
//! defines identifier keys for.

use std::path::PathBuf;

use docrw_text::SourceBuf;

use crate::comment::CommentGroup;
use crate::expr::TypeExpr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub start_line: usize,
    pub end_line: usize,
}

/// A struct field or an interface's embedded/ordinary member. Shared
/// between `TypeExpr::Struct` and recursive field-key lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Empty for an embedded field.
    pub names: Vec<String>,
    pub ty: TypeExpr,
    pub tag: Option<String>,
    pub doc: Option<CommentGroup>,
    pub eol: Option<CommentGroup>,
    pub position: Span,
}

impl Field {
    /// spec.md §3: `<type-name>.<fieldKey>`'s `fieldKey` component. Named
    /// fields join their names with `&` (mirroring multi-name value
    /// specs); an embedded field uses the referenced type's printed form.
    pub fn field_key(&self) -> String {
        if self.names.is_empty() {
            self.ty.printed()
        } else {
            self.names.join("&")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceMember {
    Method {
        name: String,
        params: Vec<TypeExpr>,
        results: Vec<TypeExpr>,
        doc: Option<CommentGroup>,
        eol: Option<CommentGroup>,
        position: Span,
    },
    Embedded {
        ty: TypeExpr,
        doc: Option<CommentGroup>,
        eol: Option<CommentGroup>,
        position: Span,
    },
}

impl InterfaceMember {
    pub fn key(&self) -> String {
        match self {
            InterfaceMember::Method { name, .. } => name.clone(),
            InterfaceMember::Embedded { ty, .. } => ty.printed(),
        }
    }

    pub fn signature_matches(&self, other: &InterfaceMember) -> bool {
        match (self, other) {
            (
                InterfaceMember::Method {
                    params: pa,
                    results: ra,
                    ..
                },
                InterfaceMember::Method {
                    params: pb,
                    results: rb,
                    ..
                },
            ) => {
                pa.len() == pb.len()
                    && ra.len() == rb.len()
                    && pa
                        .iter()
                        .zip(pb)
                        .all(|(x, y)| crate::expr::types_same_shape(x, y))
                    && ra
                        .iter()
                        .zip(rb)
                        .all(|(x, y)| crate::expr::types_same_shape(x, y))
            }
            (InterfaceMember::Embedded { ty: a, .. }, InterfaceMember::Embedded { ty: b, .. }) => {
                crate::expr::types_same_shape(a, b)
            }
            _ => false,
        }
    }

    pub fn doc(&self) -> &Option<CommentGroup> {
        match self {
            InterfaceMember::Method { doc, .. } => doc,
            InterfaceMember::Embedded { doc, .. } => doc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub name: String,
    /// Printed receiver type, with any generic type parameters stripped,
    /// per spec.md §3 ("method: `<receiver-type>.<name>` (generic
    /// type-parameters stripped)").
    pub receiver: Option<String>,
    pub doc: Option<CommentGroup>,
    pub eol: Option<CommentGroup>,
    pub has_body: bool,
    pub position: Span,
}

impl FuncDecl {
    pub fn ident_key(&self) -> String {
        match &self.receiver {
            Some(recv) => format!("{recv}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: String,
    pub ty: TypeExpr,
    pub doc: Option<CommentGroup>,
    pub eol: Option<CommentGroup>,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub is_block: bool,
    pub specs: Vec<TypeSpec>,
    /// Only meaningful (and only ever populated) when `!is_block`: the
    /// decl-level doc of a single, non-parenthesized type declaration.
    pub doc: Option<CommentGroup>,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpec {
    pub names: Vec<String>,
    pub doc: Option<CommentGroup>,
    pub eol: Option<CommentGroup>,
    pub position: Span,
}

impl ValueSpec {
    pub fn ident_key(&self) -> String {
        self.names.join("&")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTok {
    Var,
    Const,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDecl {
    pub tok: ValueTok,
    pub is_block: bool,
    pub specs: Vec<ValueSpec>,
    pub doc: Option<CommentGroup>,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Func(FuncDecl),
    Type(TypeDecl),
    Value(ValueDecl),
}

impl Decl {
    pub fn position(&self) -> Span {
        match self {
            Decl::Func(f) => f.position,
            Decl::Type(t) => t.position,
            Decl::Value(v) => v.position,
        }
    }
}

/// One parsed source file: bytes, position table, and the declarations the
/// front end recognized. The "position table" of spec.md §3 is
/// `SourceBuf`'s `LineIndex`; `File` is the AST layer on top of it.
#[derive(Debug, Clone)]
pub struct File {
    pub path: PathBuf,
    pub package_name: String,
    pub buf: SourceBuf,
    pub package_doc: Option<CommentGroup>,
    pub decls: Vec<Decl>,
    /// Comment groups not attached to any declaration/spec/field
    /// (spec.md glossary: "Floating comment").
    pub floating_comments: Vec<CommentGroup>,
}

impl File {
    pub fn bytes(&self) -> &[u8] {
        self.buf.bytes()
    }
}

/// A named bundle of files sharing a namespace, plus an optional external
/// test package (spec.md §3).
#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub dir: PathBuf,
    pub files: Vec<File>,
    pub external_test: Option<Box<Package>>,
}

impl Package {
    pub fn file_mut(&mut self, path: &std::path::Path) -> Option<&mut File> {
        self.files.iter_mut().find(|f| f.path == path)
    }

    pub fn file(&self, path: &std::path::Path) -> Option<&File> {
        self.files.iter().find(|f| f.path == path)
    }

    /// All files across the main package and its external test package,
    /// used by `ReflowAllDocumentation` (spec.md §6, op 3).
    pub fn all_files(&self) -> Vec<&File> {
        let mut out: Vec<&File> = self.files.iter().collect();
        if let Some(test_pkg) = &self.external_test {
            out.extend(test_pkg.files.iter());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_ident_key_strips_receiver_generics() {
        let f = FuncDecl {
            name: "Push".into(),
            receiver: Some("Stack".into()),
            doc: None,
            eol: None,
            has_body: true,
            position: Span {
                start: 0,
                end: 0,
                start_line: 1,
                end_line: 1,
            },
        };
        assert_eq!(f.ident_key(), "Stack.Push");
    }

    #[test]
    fn multi_name_value_spec_key_is_joined() {
        let spec = ValueSpec {
            names: vec!["a".into(), "b".into()],
            doc: None,
            eol: None,
            position: Span {
                start: 0,
                end: 0,
                start_line: 1,
                end_line: 1,
            },
        };
        assert_eq!(spec.ident_key(), "a&b");
    }
}
