//! Defines primitives for the fixed cell grid of an embossed page.
use serde::{Deserialize, Serialize};

/// Physical dimensions of one page, in braille cells.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageGeometry {
    pub cells_per_line: u16,
    pub lines_per_page: u16,
}

impl PageGeometry {
    pub fn new(cells_per_line: u16, lines_per_page: u16) -> Self {
        Self {
            cells_per_line,
            lines_per_page,
        }
    }

    /// Width available to content. Embosser margins are expressed through
    /// indents, so the full line is drawable.
    pub fn drawable_width(&self) -> u16 {
        self.cells_per_line
    }

    pub fn last_row(&self) -> u16 {
        self.lines_per_page.saturating_sub(1)
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        // Standard US interpoint embosser sheet.
        Self {
            cells_per_line: 40,
            lines_per_page: 25,
        }
    }
}

/// A cursor position on the cell grid. `x` is the cell column, `y` the row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: u16,
    pub y: u16,
}

impl Pos {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}
