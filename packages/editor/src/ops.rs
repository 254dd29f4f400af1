//! Serializable operation descriptions.

use serde::{Deserialize, Serialize};
use vellum_dom::{NodeId, NodeTemplate};

/// A structural operation on the data tree. Ops are plain data so that
/// dispatcher handlers can enqueue follow-up work and op scripts can be
/// read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeOp {
    InsertNodeAt {
        parent: NodeId,
        index: usize,
        node: NodeTemplate,
    },

    DeleteNode { node: NodeId },

    SetTextNodeValue { node: NodeId, value: String },
}
