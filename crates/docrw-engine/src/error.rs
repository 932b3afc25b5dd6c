//! Top-level error taxonomy (spec.md §7). Snippet-scoped and line-edit
//! scoped failures keep their own typed shape (`SnippetError`,
//! `LineEditError`) and are collected by the caller rather than
//! propagated; only the *fatal* category funnels through `EngineError`.

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to parse source: {0}")]
    Parse(anyhow::Error),
    #[error(transparent)]
    Edit(#[from] docrw_edit::EditFatalError),
    #[error(transparent)]
    LineEdit(#[from] docrw_format::LineEditError),
}
