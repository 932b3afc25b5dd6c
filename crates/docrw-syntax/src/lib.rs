//! AST model and front-end adapter shared by every crate that needs to
//! read or match Go declarations.

mod ast;
mod comment;
mod expr;
mod frontend;
mod ident;
mod printer;
mod ts_frontend;

pub use ast::{
    Decl, Field, File, FuncDecl, InterfaceMember, Package, Span, TypeDecl, TypeSpec, ValueDecl,
    ValueSpec, ValueTok,
};
pub use comment::{Attachment, CommentGroup, CommentGroupKind};
pub use expr::{exprs_equal, types_same_shape, ChanDir, Expr, TypeExpr};
pub use frontend::SyntaxFrontend;
pub use ident::{field_ident_key, PACKAGE_IDENT};
pub use printer::{PassthroughPrinter, Printer};
pub use ts_frontend::{interface_members_of, struct_fields_of, TreeSitterGoFrontend};
