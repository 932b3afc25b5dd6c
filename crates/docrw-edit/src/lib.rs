//! Snippet Matcher & Splicer and Remove Engine (spec.md §4.D, §4.G).
//!
//! This crate never touches prose reflow or whitespace normalization --
//! that's `docrw-reflow`/`docrw-format`. It owns exactly the part of the
//! pipeline that turns a raw snippet plus a parsed file into new bytes for
//! that one file.

mod apply;
mod error;
mod matcher;
mod remove;
mod snippet;

pub use apply::{apply_package_doc, apply_snippet, ApplyError, ApplyOutcome};
pub use error::{EditFatalError, SnippetError};
pub use matcher::{
    find_func, find_type_decl, find_type_spec, find_value_decl, find_value_spec, navigate,
    select_package_doc_target, FieldOrMember, PackageDocTarget,
};
pub use remove::remove_from_file;
pub use snippet::{parse_snippet, Snippet, SnippetKind};
