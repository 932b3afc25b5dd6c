//! Public operations (spec.md §6): the engine owns package/file disk I/O,
//! partial-success accounting, and sequencing the lower crates
//! (`docrw-edit`'s splicer/remove engine, `docrw-reflow`, `docrw-format`'s
//! Decider/Block Formatter/Line-Edit Applier) into the six operations a
//! caller sees.
//!
//! Scheduling is single-threaded and synchronous (spec.md §5): each
//! public function here completes before returning, and a fatal error
//! stops the call immediately while files already written stay on disk
//! -- the caller learns which ones from the returned path list.

mod blockfmt;
mod error;
mod identifiers;
mod io;
mod lineedit;
mod options;
mod reflow;
mod remove;
mod update;

pub use docrw_edit::SnippetError;
pub use docrw_format::LineEditError;
pub use docrw_syntax::{Package, SyntaxFrontend, TreeSitterGoFrontend};

pub use error::EngineError;
pub use io::{list_go_files, load_package};
pub use lineedit::apply_line_edits;
pub use options::Options;
pub use reflow::{reflow_all_documentation, reflow_documentation, reflow_documentation_paths, ReflowPathsOutcome};
pub use remove::{remove_documentation, remove_documentation_in_file};
pub use update::{update_documentation, UpdateOutcome};
