use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct FormatConfig {
    /// Whether braille page numbering continues across a volume end.
    /// When false, the page after a volume end restarts at 1.
    pub continue_pages: bool,
    /// Reserve the top row of every page for a running head.
    pub running_head: bool,
    /// Track guide-word elements per page for dictionary-style headers.
    pub guide_words: bool,
    /// Fill the gap between a table cell's text and the next column with
    /// guide dots.
    pub guide_dots: bool,
    /// Blank cells between table columns.
    pub cell_gap: u16,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            continue_pages: true,
            running_head: false,
            guide_words: false,
            guide_dots: false,
            cell_gap: 2,
        }
    }
}
