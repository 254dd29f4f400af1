//! Error types for view mirroring

use thiserror::Error;
use vellum_dom::{NodeId, TreeError};
use vellum_editor::MutateError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MirrorError {
    /// The caret node itself has no mirror link. Distinct from the
    /// transient successor-link mismatch, which is clamped, not raised.
    #[error("no mirror link for data node {0}")]
    Unlinked(NodeId),

    #[error("node {0} is not a decoration")]
    NotADecoration(NodeId),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error(transparent)]
    Mutate(#[from] MutateError),

    #[error(transparent)]
    Tree(#[from] TreeError),
}
