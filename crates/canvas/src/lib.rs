//! The braille page canvas: a mutable cursor/grid per physical page, plus
//! the ordered page sequence the layout algorithms drive.
//!
//! The canvas records everything it places as spans, so a formatter whose
//! strategy fails can remove exactly what it wrote and fall back.

use emboss_types::PageGeometry;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("write of {len} cells at row {row}, cell {x} falls outside the page grid")]
    OutOfBounds {
        row: u16,
        x: u16,
        len: u16,
        geometry: PageGeometry,
    },
    #[error("{len} cells at row {row}, cell {x} already hold content")]
    Occupied { row: u16, x: u16, len: u16 },
}

pub mod page;
pub mod set;
pub mod wrap;

pub use page::{PageCanvas, PendingSpacing, Span};
pub use set::{PageMark, PageSet, Placement};
pub use wrap::{line_count, wrap, WrappedLine};

#[cfg(test)]
mod canvas_test;
