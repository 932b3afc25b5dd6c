//! Error taxonomy for the splicer (spec.md §7).

/// A snippet-scoped failure: the snippet could not be unwrapped, parsed,
/// classified, or matched against the source, or a policy caused part of
/// it to be skipped. Other snippets in the same call are unaffected.
#[derive(Debug, Clone)]
pub struct SnippetError {
    /// The original raw snippet text, used by callers as a correlation key.
    pub snippet: String,
    pub user_error_message: String,
    pub partially_rejected: bool,
}

impl SnippetError {
    pub fn new(snippet: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            snippet: snippet.into(),
            user_error_message: message.into(),
            partially_rejected: false,
        }
    }

    pub fn partially_rejected(snippet: impl Into<String>) -> Self {
        Self {
            snippet: snippet.into(),
            user_error_message:
                "Part or all of snippet was not applied due to options restrictions.".to_string(),
            partially_rejected: true,
        }
    }
}

impl std::fmt::Display for SnippetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_error_message)
    }
}

impl std::error::Error for SnippetError {}

/// A fatal failure: I/O, reparse-after-splice, or final pretty-print
/// failure. Stops processing for the whole call.
#[derive(Debug, thiserror::Error)]
pub enum EditFatalError {
    #[error("failed to reparse after splice: {0}")]
    Reparse(#[source] anyhow::Error),
    #[error("pretty-printer failed: {0}")]
    Printer(#[source] anyhow::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
