//! Carets: (node, offset) positions, one type per coordinate space.
//!
//! A caret is meaningful only within the space it was produced in;
//! crossing spaces requires explicit translation. Offset is a character
//! index for text nodes and a child index for elements.

use serde::Serialize;
use vellum_dom::NodeId;

/// A position in the data tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct DataCaret {
    pub node: NodeId,
    pub offset: usize,
}

impl DataCaret {
    pub fn new(node: NodeId, offset: usize) -> Self {
        DataCaret { node, offset }
    }
}

impl From<(NodeId, usize)> for DataCaret {
    fn from((node, offset): (NodeId, usize)) -> Self {
        DataCaret { node, offset }
    }
}

/// A position in the view tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct ViewCaret {
    pub node: NodeId,
    pub offset: usize,
}

impl ViewCaret {
    pub fn new(node: NodeId, offset: usize) -> Self {
        ViewCaret { node, offset }
    }
}

impl From<(NodeId, usize)> for ViewCaret {
    fn from((node, offset): (NodeId, usize)) -> Self {
        ViewCaret { node, offset }
    }
}
