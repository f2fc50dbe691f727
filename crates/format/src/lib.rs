//! The pagination core: formatters that drive a page canvas over a styled
//! document tree.
//!
//! The literary formatter is the general recursive driver; tables,
//! numbered-line groups and title pages delegate to specialized formatters
//! that either fit their content or report [`FitResult::DoesNotFit`], in
//! which case the caller rolls back every partial placement and falls back
//! down a fixed strategy chain ending in plain literary rendering.

use emboss_canvas::CanvasError;
use emboss_types::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("canvas error: {0}")]
    Canvas(#[from] CanvasError),
    #[error("node {0} is not a {1}")]
    UnexpectedNode(NodeId, &'static str),
}

/// Whether a layout strategy managed to place its content.
///
/// This is a result, not an error: `DoesNotFit` is caught by the immediate
/// caller, which rolls back and tries the next strategy in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum FitResult {
    Fits,
    DoesNotFit,
}

impl FitResult {
    pub fn fits(self) -> bool {
        matches!(self, FitResult::Fits)
    }
}

pub mod base;
pub mod config;
pub mod context;
pub mod leaf;
pub mod literary;
pub mod numbered;
pub mod table;
pub mod tpage;

pub use config::FormatConfig;
pub use context::FormatContext;
pub use literary::LiteraryFormatter;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod numbered_test;
#[cfg(test)]
mod tpage_test;
