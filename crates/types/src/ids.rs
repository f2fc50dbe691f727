//! Newtype wrapper for document node identifiers.
//!
//! Formatters, canvases and style resolvers all refer to nodes by id, so
//! the index type lives here rather than in the document crate.

use std::fmt;

/// Arena index of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
