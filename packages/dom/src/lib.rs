//! # Vellum DOM
//!
//! Tree storage shared by both coordinate spaces of the editor core.
//!
//! Both the canonical data tree and the decorated view tree are instances
//! of the same [`Tree`] type: an arena of nodes addressed by generational
//! [`NodeId`] handles, with parent/children links forming an ordered tree.
//! Stale handles (nodes that have been freed) never resolve, so holding an
//! id across a deletion is safe at the API level.
//!
//! On top of the storage this crate provides:
//!
//! - [`NodeTemplate`]: an owned, serializable description of a subtree,
//!   materialized into arena nodes on insertion
//! - the path codec ([`node_path`] / [`node_at`]): root-to-node sibling
//!   index sequences
//! - [`Selector`]: structural predicates evaluated against a node,
//!   replacing any host-document query engine

mod arena;
mod node;
mod path;
mod selector;
mod serializer;

pub use arena::{NodeId, Tree, TreeError};
pub use node::{NodeData, NodeTemplate};
pub use path::{node_at, node_path, NodePath, PathError};
pub use selector::Selector;
pub use serializer::serialize_subtree;
