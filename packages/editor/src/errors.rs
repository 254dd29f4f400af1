//! Error types for tree mutation

use thiserror::Error;
use vellum_dom::TreeError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutateError {
    /// The operation names a node or parent not currently part of the
    /// tree, or an out-of-range index. The tree is left unchanged.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error(transparent)]
    Tree(#[from] TreeError),
}
