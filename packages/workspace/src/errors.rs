//! Error type aggregating the session's collaborators.

use thiserror::Error;
use vellum_dom::PathError;
use vellum_editor::MutateError;
use vellum_mirror::MirrorError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("mutation error: {0}")]
    Mutate(#[from] MutateError),

    #[error("mirror error: {0}")]
    Mirror(#[from] MirrorError),

    #[error("path error: {0}")]
    Path(#[from] PathError),
}
