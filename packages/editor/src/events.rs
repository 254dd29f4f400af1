//! Mutation events, one per structural operation.

use serde::Serialize;
use vellum_dom::NodeId;

/// Emitted by [`crate::TreeUpdater`] after each operation, in exact issue
/// order. Consumers observing the tree while handling an event always see
/// post-mutation state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TreeEvent {
    InsertNodeAt {
        parent: NodeId,
        /// Root of the materialized subtree.
        node: NodeId,
        index: usize,
    },

    /// The node is detached but still readable in the arena when this
    /// event is dispatched; sibling context is captured before detachment
    /// because it cannot be re-derived afterwards.
    DeleteNode {
        node: NodeId,
        parent: NodeId,
        index: usize,
        prev: Option<NodeId>,
        next: Option<NodeId>,
    },

    SetTextNodeValue {
        node: NodeId,
        value: String,
        /// Prior content, retained for consumers implementing undo.
        old_value: String,
    },
}
