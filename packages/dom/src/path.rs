//! Path codec: positions as root-to-node sequences of sibling indices.
//!
//! Paths are computed over one tree at a time and survive serialization,
//! which makes them the stable way to name a node across process
//! boundaries (op scripts, test fixtures) where arena ids are meaningless.

use crate::arena::{NodeId, Tree};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordered sibling-index sequence addressing a node from a subtree root.
/// The empty path addresses the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn new(indices: Vec<usize>) -> Self {
        NodePath(indices)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        NodePath(indices)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("node {node} is not a descendant of {root}")]
    NotADescendant { root: NodeId, node: NodeId },

    #[error("path index {index} out of range at depth {depth} ({len} children)")]
    OutOfRange {
        depth: usize,
        index: usize,
        len: usize,
    },
}

/// Compute the path from `root` to `node`.
pub fn node_path(tree: &Tree, root: NodeId, node: NodeId) -> Result<NodePath, PathError> {
    let mut indices = Vec::new();
    let mut current = node;

    if !tree.contains(node) || !tree.contains(root) {
        return Err(PathError::NotADescendant { root, node });
    }

    while current != root {
        let index = tree
            .index_in_parent(current)
            .ok_or(PathError::NotADescendant { root, node })?;
        indices.push(index);
        match tree.parent(current) {
            Some(parent) => current = parent,
            None => return Err(PathError::NotADescendant { root, node }),
        }
    }

    indices.reverse();
    Ok(NodePath(indices))
}

/// Resolve a path against `root`'s descendants.
pub fn node_at(tree: &Tree, root: NodeId, path: &NodePath) -> Result<NodeId, PathError> {
    let mut current = root;
    for (depth, &index) in path.as_slice().iter().enumerate() {
        let children = tree.children(current);
        current = *children.get(index).ok_or(PathError::OutOfRange {
            depth,
            index,
            len: children.len(),
        })?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeData, NodeTemplate};

    fn sample() -> (Tree, NodeId, NodeId) {
        let mut tree = Tree::with_root(NodeData::element("body"));
        let root = tree.root();
        let tpl = NodeTemplate::element("div")
            .with_child(NodeTemplate::element("p"))
            .with_child(NodeTemplate::element("p").with_child(NodeTemplate::text("x")));
        let div = tree.build(&tpl);
        tree.attach(root, 0, div).unwrap();
        let p1 = tree.child_at(div, 1).unwrap();
        let text = tree.child_at(p1, 0).unwrap();
        (tree, root, text)
    }

    #[test]
    fn test_path_round_trip() {
        let (tree, root, text) = sample();
        let path = node_path(&tree, root, text).unwrap();
        assert_eq!(path.as_slice(), &[0, 1, 0]);
        assert_eq!(node_at(&tree, root, &path).unwrap(), text);
    }

    #[test]
    fn test_root_path_is_empty() {
        let (tree, root, _) = sample();
        let path = node_path(&tree, root, root).unwrap();
        assert!(path.is_root());
        assert_eq!(node_at(&tree, root, &path).unwrap(), root);
    }

    #[test]
    fn test_not_a_descendant() {
        let (mut tree, root, _) = sample();
        let orphan = tree.alloc(NodeData::element("aside"));
        assert_eq!(
            node_path(&tree, root, orphan),
            Err(PathError::NotADescendant { root, node: orphan })
        );
    }

    #[test]
    fn test_path_out_of_range() {
        let (tree, root, _) = sample();
        let err = node_at(&tree, root, &NodePath::new(vec![0, 7])).unwrap_err();
        assert_eq!(
            err,
            PathError::OutOfRange {
                depth: 1,
                index: 7,
                len: 2
            }
        );
    }

    #[test]
    fn test_path_through_text_is_out_of_range() {
        let (tree, root, _) = sample();
        // Descending into a text node: zero children at that level.
        let err = node_at(&tree, root, &NodePath::new(vec![0, 1, 0, 0])).unwrap_err();
        assert!(matches!(err, PathError::OutOfRange { depth: 3, .. }));
    }

    #[test]
    fn test_subtree_rooted_paths() {
        let (tree, root, text) = sample();
        let div = tree.child_at(root, 0).unwrap();
        let path = node_path(&tree, div, text).unwrap();
        assert_eq!(path.as_slice(), &[1, 0]);
        // The outer root is not a descendant of the inner one.
        assert!(node_path(&tree, div, root).is_err());
    }
}
