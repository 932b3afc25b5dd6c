//! `ApplyLineEdits` (spec.md §6 op 6): the exported contract between the
//! engine and the Block Formatter (spec.md §4.F).

use std::path::Path;

use docrw_syntax::{Printer, SyntaxFrontend};
use docrw_text::EditOp;

use crate::EngineError;

pub fn apply_line_edits(
    path: &Path,
    frontend: &dyn SyntaxFrontend,
    edits: &[EditOp],
    printer: &dyn Printer,
) -> Result<Vec<u8>, EngineError> {
    let bytes = std::fs::read(path)?;
    let file = frontend.parse_file(path, &bytes).map_err(EngineError::Parse)?;
    Ok(docrw_format::apply_line_edits(&file, edits, printer)?)
}
