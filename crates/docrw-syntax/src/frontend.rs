//! The "language front end" collaborator (spec.md §1: "lexer, parser ...
//! are external collaborators exposed through the contracts in §6").
//!
//! `SyntaxFrontend` is the seam: the rest of this crate (and every crate
//! built on top of it) only ever talks to a `File`/`Decl`/`TypeExpr`
//! tree, never to a concrete parser. The shipped implementation
//! (`TreeSitterGoFrontend`, in `ts_frontend`) adapts `tree-sitter-go`'s
//! concrete syntax tree into that model rather than hand-writing a Go
//! parser, which is squarely the thing spec.md's Non-goal (a) excludes.

use std::path::Path;

use crate::ast::File;

pub trait SyntaxFrontend: Send + Sync {
    /// Parse one file's bytes into our AST model. Snippets missing a
    /// `package` clause are recovered before reaching this trait -- the
    /// unwrapper in `docrw-edit` prepends `package <name>` using the
    /// target file's already-known package name, so `parse_file` itself
    /// never needs a hint.
    fn parse_file(&self, path: &Path, bytes: &[u8]) -> anyhow::Result<File>;
}
