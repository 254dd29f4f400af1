//! Arena tree storage with generational node handles.
//!
//! Nodes live in slots addressed by index; each slot carries a generation
//! counter that is bumped when the slot is freed, so a [`NodeId`] held
//! across a deletion simply stops resolving instead of aliasing whatever
//! node reuses the slot.

use crate::node::{NodeData, NodeTemplate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generational handle to a node in one [`Tree`].
///
/// Ids are only meaningful against the tree that issued them; the data tree
/// and the view tree are separate arenas with separate id spaces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("stale node id {0}")]
    Stale(NodeId),

    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("node {0} is not a text node")]
    NotText(NodeId),

    #[error("index {index} out of range 0..={len} under {parent}")]
    OutOfRange {
        parent: NodeId,
        index: usize,
        len: usize,
    },

    #[error("node {0} is already attached to a parent")]
    AlreadyAttached(NodeId),

    #[error("node {0} is not attached to a parent")]
    Detached(NodeId),

    #[error("attaching {0} here would create a cycle")]
    WouldCycle(NodeId),

    #[error("the root node cannot be detached or freed")]
    RootForbidden,
}

#[derive(Debug)]
struct Entry {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    decoration: bool,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// An ordered tree of nodes in arena storage.
#[derive(Debug)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
}

impl Tree {
    /// Create a tree whose root is a fresh node holding `data`.
    pub fn with_root(data: NodeData) -> Self {
        let mut tree = Tree {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        };
        tree.root = tree.alloc(data);
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocate a detached node.
    pub fn alloc(&mut self, data: NodeData) -> NodeId {
        self.alloc_inner(data, false)
    }

    /// Allocate a detached decoration node (view-only, no data counterpart).
    pub fn alloc_decoration(&mut self, data: NodeData) -> NodeId {
        self.alloc_inner(data, true)
    }

    fn alloc_inner(&mut self, data: NodeData, decoration: bool) -> NodeId {
        let entry = Entry {
            data,
            parent: None,
            children: Vec::new(),
            decoration,
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                entry: Some(entry),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    fn entry(&self, id: NodeId) -> Option<&Entry> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut Entry> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.entry(id).is_some()
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.entry(id).map(|e| &e.data)
    }

    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.entry_mut(id).map(|e| &mut e.data)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.entry(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    pub fn is_decoration(&self, id: NodeId) -> bool {
        self.entry(id).map(|e| e.decoration).unwrap_or(false)
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        if index == 0 {
            None
        } else {
            self.child_at(parent, index - 1)
        }
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.child_at(parent, index + 1)
    }

    /// Whether `id` is currently part of the tree rooted at [`Tree::root`].
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        if !self.contains(current) {
            return false;
        }
        loop {
            if current == self.root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Splice a detached node in as the `index`-th child of `parent`.
    pub fn attach(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<(), TreeError> {
        let child_entry = self.entry(child).ok_or(TreeError::Stale(child))?;
        if child_entry.parent.is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }

        let parent_entry = self.entry(parent).ok_or(TreeError::Stale(parent))?;
        if !parent_entry.data.is_element() {
            return Err(TreeError::NotAnElement(parent));
        }
        let len = parent_entry.children.len();
        if index > len {
            return Err(TreeError::OutOfRange { parent, index, len });
        }

        // The parent must not live inside the subtree being attached.
        let mut current = parent;
        loop {
            if current == child {
                return Err(TreeError::WouldCycle(child));
            }
            match self.parent(current) {
                Some(up) => current = up,
                None => break,
            }
        }

        if let Some(entry) = self.entry_mut(parent) {
            entry.children.insert(index, child);
        }
        if let Some(entry) = self.entry_mut(child) {
            entry.parent = Some(parent);
        }
        Ok(())
    }

    /// Detach a node from its parent, returning its former child index.
    /// The subtree stays alive in the arena until freed.
    pub fn detach(&mut self, node: NodeId) -> Result<usize, TreeError> {
        if node == self.root {
            return Err(TreeError::RootForbidden);
        }
        if !self.contains(node) {
            return Err(TreeError::Stale(node));
        }
        let parent = self.parent(node).ok_or(TreeError::Detached(node))?;
        let index = self
            .index_in_parent(node)
            .ok_or(TreeError::Detached(node))?;

        if let Some(entry) = self.entry_mut(parent) {
            entry.children.remove(index);
        }
        if let Some(entry) = self.entry_mut(node) {
            entry.parent = None;
        }
        Ok(index)
    }

    /// Replace a text node's content, returning the prior value.
    pub fn set_text(&mut self, node: NodeId, value: &str) -> Result<String, TreeError> {
        let entry = self.entry_mut(node).ok_or(TreeError::Stale(node))?;
        match &mut entry.data {
            NodeData::Text { value: current } => Ok(std::mem::replace(current, value.to_string())),
            NodeData::Element { .. } => Err(TreeError::NotText(node)),
        }
    }

    /// Materialize a template into a detached subtree, returning its root.
    pub fn build(&mut self, template: &NodeTemplate) -> NodeId {
        self.build_inner(template, false)
    }

    /// Materialize a template into a detached subtree of decoration nodes.
    pub fn build_decoration(&mut self, template: &NodeTemplate) -> NodeId {
        self.build_inner(template, true)
    }

    fn build_inner(&mut self, template: &NodeTemplate, decoration: bool) -> NodeId {
        let node = self.alloc_inner(template.data(), decoration);
        for (i, child_tpl) in template.children().iter().enumerate() {
            let child = self.build_inner(child_tpl, decoration);
            // Assembling fresh nodes under a fresh element cannot fail.
            let _ = self.attach(node, i, child);
        }
        node
    }

    /// Depth-first preorder listing of `node` and all its descendants.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            out.push(current);
            for child in self.children(current).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Free a detached subtree, invalidating every id inside it.
    /// Returns the freed ids in preorder.
    pub fn free_subtree(&mut self, node: NodeId) -> Result<Vec<NodeId>, TreeError> {
        if node == self.root {
            return Err(TreeError::RootForbidden);
        }
        if !self.contains(node) {
            return Err(TreeError::Stale(node));
        }
        if self.parent(node).is_some() {
            return Err(TreeError::AlreadyAttached(node));
        }

        let freed = self.descendants(node);
        for id in &freed {
            let slot = &mut self.slots[id.index as usize];
            slot.entry = None;
            slot.generation += 1;
            self.free.push(id.index);
        }
        Ok(freed)
    }
}
