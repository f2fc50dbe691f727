//! Layout-decision annotations written onto the tree.
//!
//! The export/embossing stage downstream reads these; layout itself also
//! reads them back when deleting a stale layout before re-formatting.

/// Which strategy a table was ultimately rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Simple,
    Listed,
    Linear,
    Stairstep,
    Facing,
}

/// Position of a fragment within a line that crossed a page boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    First,
    Middle,
    Last,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutMarks {
    pub table_format: Option<TableFormat>,
    pub continuation: Option<Continuation>,
    /// Rendered line-number label, once its width is final.
    pub line_label: Option<String>,
    /// Overrides the style's `lines_after` for this node only.
    pub lines_after_override: Option<u16>,
    /// Content injected by layout (dividers, guide dots, separators).
    /// Deleted wholesale when a stale layout is cleared.
    pub synthetic: bool,
}

impl LayoutMarks {
    pub fn clear(&mut self) {
        *self = LayoutMarks::default();
    }
}
