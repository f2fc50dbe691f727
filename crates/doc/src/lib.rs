//! In-memory document tree handed to the pagination core.
//!
//! Content nodes already carry finalized embossable text (translation and
//! contraction happen upstream); layout annotates the tree with its
//! decisions and injects synthetic divider/guide-dot content, but never
//! rewrites the braille itself.

pub mod marks;
pub mod node;
pub mod tree;

pub use marks::{Continuation, LayoutMarks, TableFormat};
pub use node::{BrailleSegment, ElementKind, NodeAttrs, NodeKind};
pub use tree::Document;

#[cfg(test)]
mod tree_test;
