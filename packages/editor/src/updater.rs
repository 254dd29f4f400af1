//! The Tree Mutator: exclusive owner of the canonical data tree.

use crate::errors::MutateError;
use crate::events::TreeEvent;
use crate::ops::TreeOp;
use crate::sink::MutationSink;
use std::collections::VecDeque;
use vellum_dom::{NodeData, NodeId, NodeTemplate, Tree};

/// Owns the data tree and exposes the three structural operations. Each is
/// synchronous and atomic: the tree is fully mutated, then exactly one
/// event is pushed to the outbox, before control returns.
#[derive(Debug)]
pub struct TreeUpdater {
    tree: Tree,
    outbox: VecDeque<TreeEvent>,
}

impl TreeUpdater {
    pub fn new(root: NodeData) -> Self {
        TreeUpdater {
            tree: Tree::with_root(root),
            outbox: VecDeque::new(),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Materialize `template` and insert it as the `index`-th child of
    /// `parent`. Returns the new subtree's root id.
    pub fn insert_node_at(
        &mut self,
        parent: NodeId,
        index: usize,
        template: &NodeTemplate,
    ) -> Result<NodeId, MutateError> {
        // Validate before materializing so a rejected op allocates nothing.
        if !self.tree.is_attached(parent) {
            return Err(MutateError::InvalidTarget(format!(
                "insert parent {parent} is not part of the tree"
            )));
        }
        match self.tree.data(parent) {
            Some(data) if data.is_element() => {}
            _ => {
                return Err(MutateError::InvalidTarget(format!(
                    "insert parent {parent} is not an element"
                )))
            }
        }
        let len = self.tree.child_count(parent);
        if index > len {
            return Err(MutateError::InvalidTarget(format!(
                "insert index {index} out of range 0..={len} under {parent}"
            )));
        }

        let node = self.tree.build(template);
        self.apply_insert(parent, index, node)?;
        tracing::debug!("inserted {} at {}[{}]", node, parent, index);

        self.outbox.push_back(TreeEvent::InsertNodeAt {
            parent,
            node,
            index,
        });
        Ok(node)
    }

    /// Detach `node` from its parent. The subtree stays readable in the
    /// arena so event consumers can inspect it; the session reclaims it
    /// with [`TreeUpdater::reclaim_detached`] once dispatch is done.
    pub fn delete_node(&mut self, node: NodeId) -> Result<(), MutateError> {
        if !self.tree.contains(node) {
            return Err(MutateError::InvalidTarget(format!(
                "delete target {node} is not part of the tree"
            )));
        }
        let parent = self.tree.parent(node).ok_or_else(|| {
            MutateError::InvalidTarget(format!("delete target {node} is already detached"))
        })?;

        // Sibling context, captured before detachment.
        let prev = self.tree.prev_sibling(node);
        let next = self.tree.next_sibling(node);

        let index = self.apply_delete(node)?;
        tracing::debug!("deleted {} from {}[{}]", node, parent, index);

        self.outbox.push_back(TreeEvent::DeleteNode {
            node,
            parent,
            index,
            prev,
            next,
        });
        Ok(())
    }

    /// Replace a text node's content.
    pub fn set_text_node_value(&mut self, node: NodeId, value: &str) -> Result<(), MutateError> {
        if !self.tree.is_attached(node) {
            return Err(MutateError::InvalidTarget(format!(
                "text target {node} is not part of the tree"
            )));
        }
        match self.tree.data(node) {
            Some(data) if data.is_text() => {}
            _ => {
                return Err(MutateError::InvalidTarget(format!(
                    "text target {node} is not a text node"
                )))
            }
        }

        let old_value = self.apply_set_text(node, value)?;
        tracing::debug!("set text of {} ({} chars)", node, value.len());

        self.outbox.push_back(TreeEvent::SetTextNodeValue {
            node,
            value: value.to_string(),
            old_value,
        });
        Ok(())
    }

    /// Apply an operation description.
    pub fn apply(&mut self, op: &TreeOp) -> Result<(), MutateError> {
        match op {
            TreeOp::InsertNodeAt {
                parent,
                index,
                node,
            } => self.insert_node_at(*parent, *index, node).map(|_| ()),
            TreeOp::DeleteNode { node } => self.delete_node(*node),
            TreeOp::SetTextNodeValue { node, value } => self.set_text_node_value(*node, value),
        }
    }

    /// Next pending event, in issue order.
    pub fn pop_event(&mut self) -> Option<TreeEvent> {
        self.outbox.pop_front()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.outbox.is_empty()
    }

    /// Free a subtree that `delete_node` left detached. Called after all
    /// consumers of the delete event have run.
    pub fn reclaim_detached(&mut self, node: NodeId) -> Result<(), MutateError> {
        self.tree.free_subtree(node)?;
        Ok(())
    }
}

impl MutationSink for TreeUpdater {
    fn tree(&self) -> &Tree {
        &self.tree
    }

    fn apply_insert(
        &mut self,
        parent: NodeId,
        index: usize,
        node: NodeId,
    ) -> Result<(), MutateError> {
        self.tree.attach(parent, index, node).map_err(Into::into)
    }

    fn apply_delete(&mut self, node: NodeId) -> Result<usize, MutateError> {
        self.tree.detach(node).map_err(Into::into)
    }

    fn apply_set_text(&mut self, node: NodeId, value: &str) -> Result<String, MutateError> {
        self.tree.set_text(node, value).map_err(Into::into)
    }
}
