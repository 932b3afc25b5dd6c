//! Public options (spec.md §6 "Options (enumerated)").

/// Knobs shared by every mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Run a reflow pass over touched documentation during `UpdateDocumentation`.
    pub reflow: bool,
    pub reflow_tab_width: u32,
    pub reflow_max_width: u32,
    /// Never replace existing documentation -- insertion only.
    pub reject_updates: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            reflow: false,
            reflow_tab_width: 4,
            reflow_max_width: 80,
            reject_updates: false,
        }
    }
}
