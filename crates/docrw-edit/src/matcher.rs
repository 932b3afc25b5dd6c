//! Locating a snippet's counterpart inside the source file (spec.md
//! §4.D.4): by identifier key for funcs/value specs/type specs, and by
//! recursive field-key path for struct fields and interface members.

use std::path::{Path, PathBuf};

use docrw_syntax::{
    interface_members_of, struct_fields_of, CommentGroup, Decl, Field, File, FuncDecl,
    InterfaceMember, Span, TypeDecl, TypeExpr, TypeSpec, ValueDecl, ValueSpec, ValueTok,
};

pub fn find_func<'a>(file: &'a File, key: &str) -> Option<&'a FuncDecl> {
    file.decls.iter().find_map(|d| match d {
        Decl::Func(f) if f.ident_key() == key => Some(f),
        _ => None,
    })
}

pub fn find_value_decl<'a>(file: &'a File, any_spec_key: &str, tok: ValueTok) -> Option<&'a ValueDecl> {
    file.decls.iter().find_map(|d| match d {
        Decl::Value(v) if v.tok == tok && v.specs.iter().any(|s| s.ident_key() == any_spec_key) => {
            Some(v)
        }
        _ => None,
    })
}

pub fn find_value_spec<'a>(decl: &'a ValueDecl, key: &str) -> Option<&'a ValueSpec> {
    decl.specs.iter().find(|s| s.ident_key() == key)
}

pub fn find_type_decl<'a>(file: &'a File, any_spec_name: &str) -> Option<&'a TypeDecl> {
    file.decls.iter().find_map(|d| match d {
        Decl::Type(t) if t.specs.iter().any(|s| s.name == any_spec_name) => Some(t),
        _ => None,
    })
}

pub fn find_type_spec<'a>(decl: &'a TypeDecl, name: &str) -> Option<&'a TypeSpec> {
    decl.specs.iter().find(|s| s.name == name)
}

/// A struct field, interface method, or embedded interface element found
/// by navigating a field-key path -- the recursive half of spec.md §3's
/// `<type-name>.<fieldKey>` identifier keys.
pub enum FieldOrMember<'a> {
    Field(&'a Field),
    Method {
        doc: &'a Option<CommentGroup>,
        eol: &'a Option<CommentGroup>,
        position: Span,
    },
    Embedded {
        doc: &'a Option<CommentGroup>,
        eol: &'a Option<CommentGroup>,
        position: Span,
    },
}

impl<'a> FieldOrMember<'a> {
    pub fn doc(&self) -> &'a Option<CommentGroup> {
        match self {
            FieldOrMember::Field(f) => &f.doc,
            FieldOrMember::Method { doc, .. } => doc,
            FieldOrMember::Embedded { doc, .. } => doc,
        }
    }

    pub fn eol(&self) -> &'a Option<CommentGroup> {
        match self {
            FieldOrMember::Field(f) => &f.eol,
            FieldOrMember::Method { eol, .. } => eol,
            FieldOrMember::Embedded { eol, .. } => eol,
        }
    }

    pub fn position(&self) -> Span {
        match self {
            FieldOrMember::Field(f) => f.position,
            FieldOrMember::Method { position, .. } => *position,
            FieldOrMember::Embedded { position, .. } => *position,
        }
    }
}

/// Walk `path` (a sequence of field/member keys) starting from `ty`.
pub fn navigate<'a>(ty: &'a TypeExpr, path: &[String]) -> Option<FieldOrMember<'a>> {
    let (head, rest) = path.split_first()?;
    if let Some(fields) = struct_fields_of(ty) {
        if let Some(f) = fields.iter().find(|f| &f.field_key() == head) {
            return if rest.is_empty() {
                Some(FieldOrMember::Field(f))
            } else {
                navigate(&f.ty, rest)
            };
        }
    }
    if let Some(members) = interface_members_of(ty) {
        if let Some(m) = members.iter().find(|m| &m.key() == head) {
            if !rest.is_empty() {
                return None;
            }
            return Some(match m {
                InterfaceMember::Method { doc, eol, position, .. } => FieldOrMember::Method {
                    doc,
                    eol,
                    position: *position,
                },
                InterfaceMember::Embedded { doc, eol, position, .. } => FieldOrMember::Embedded {
                    doc,
                    eol,
                    position: *position,
                },
            });
        }
    }
    None
}

pub enum PackageDocTarget {
    Existing(PathBuf),
    New(PathBuf),
}

/// spec.md §4.D.4 Package doc file-selection rule.
pub fn select_package_doc_target(files: &[&File], package_name: &str, dir: &Path) -> PackageDocTarget {
    let candidates: Vec<&&File> = files.iter().filter(|f| f.package_doc.is_some()).collect();
    if candidates.is_empty() {
        return PackageDocTarget::New(dir.join("doc.go"));
    }
    if let Some(f) = candidates
        .iter()
        .find(|f| f.path.file_name().is_some_and(|n| n == "doc.go"))
    {
        return PackageDocTarget::Existing(f.path.clone());
    }
    if let Some(f) = candidates.iter().find(|f| {
        f.path
            .file_stem()
            .is_some_and(|s| s.to_string_lossy() == package_name)
    }) {
        return PackageDocTarget::Existing(f.path.clone());
    }
    let mut sorted: Vec<&&File> = candidates;
    sorted.sort_by_key(|f| f.path.clone());
    PackageDocTarget::Existing(sorted[0].path.clone())
}
