use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[derive(Default)]
pub enum Align {
    #[default]
    Left,
    Centered,
    Right,
}

/// Which page-number rows a block refuses to share a line with.
///
/// Print page indicators occupy the top row and braille page numbers the
/// bottom row; some styles demand their content stay clear of one or both.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[derive(Default)]
pub enum NumberLineSkip {
    #[default]
    None,
    Top,
    Bottom,
    Both,
}

/// A fully resolved style for one node.
///
/// Resolution itself (the declarative rule engine matching nodes to style
/// definitions) happens upstream; the layout core only ever sees this
/// flattened form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Style {
    pub align: Align,
    pub left_indent: u16,
    pub right_indent: u16,
    /// Indent of the first line only. `None` means "same as `left_indent`".
    pub first_line_indent: Option<u16>,
    pub lines_before: u16,
    pub lines_after: u16,
    pub pages_before: u16,
    pub pages_after: u16,
    /// Rows advanced per written line; 1 is single spacing.
    pub line_spacing: u16,
    /// Glyph for a separator line inserted before the content.
    pub start_separator: Option<char>,
    pub end_separator: Option<char>,
    pub skip_number_lines: NumberLineSkip,
    pub keep_with_next: bool,
    pub dont_split: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            align: Align::Left,
            left_indent: 0,
            right_indent: 0,
            first_line_indent: None,
            lines_before: 0,
            lines_after: 0,
            pages_before: 0,
            pages_after: 0,
            line_spacing: 1,
            start_separator: None,
            end_separator: None,
            skip_number_lines: NumberLineSkip::None,
            keep_with_next: false,
            dont_split: false,
        }
    }
}

impl Style {
    pub fn first_indent(&self) -> u16 {
        self.first_line_indent.unwrap_or(self.left_indent)
    }
}
