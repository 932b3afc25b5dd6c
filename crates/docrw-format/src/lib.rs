//! EOL-vs-Doc Decider, Block Formatter, and Line-Edit Applier (spec.md
//! §4.C, §4.E, §4.F) -- the whitespace/placement layer that runs after
//! the Snippet Matcher & Splicer has made its byte edits.

mod block;
mod decide;
mod lineedit;

pub use block::{format_block, BlockEntity};
pub use decide::{decide, Entity};
pub use lineedit::{apply_line_edits, LineEditError};
