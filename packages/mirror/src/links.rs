//! The mirror-link registry.
//!
//! Links are kept in an associative two-map lookup rather than embedded
//! pointers, so unlinking clears both directions atomically and no
//! dangling association can survive node destruction.

use std::collections::HashMap;
use vellum_dom::NodeId;

/// Bidirectional data-node ↔ view-node association. Every data node
/// currently in the tree has exactly one linked real view node and vice
/// versa; decorations have none.
#[derive(Debug, Default)]
pub struct MirrorLinks {
    to_view: HashMap<NodeId, NodeId>,
    to_data: HashMap<NodeId, NodeId>,
}

impl MirrorLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link(&mut self, data: NodeId, view: NodeId) {
        self.to_view.insert(data, view);
        self.to_data.insert(view, data);
    }

    /// Remove the pair keyed by `data`, clearing both directions.
    pub fn unlink_data(&mut self, data: NodeId) -> Option<NodeId> {
        let view = self.to_view.remove(&data)?;
        self.to_data.remove(&view);
        Some(view)
    }

    pub fn view_of(&self, data: NodeId) -> Option<NodeId> {
        self.to_view.get(&data).copied()
    }

    pub fn data_of(&self, view: NodeId) -> Option<NodeId> {
        self.to_data.get(&view).copied()
    }

    /// Number of linked pairs.
    pub fn len(&self) -> usize {
        self.to_view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_view.is_empty()
    }
}
