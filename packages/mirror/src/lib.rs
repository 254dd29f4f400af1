//! # Vellum Mirror
//!
//! Keeps a decorated view tree isomorphic to the canonical data tree.
//!
//! [`MirrorUpdater`] owns the view tree and the bidirectional node links,
//! replays every data-tree event as an equivalent view mutation, and
//! provides the data→view caret translation primitive
//! ([`MirrorUpdater::from_data_caret`]).
//!
//! The view tree's *mirrored* region has exactly one mutating authority:
//! this crate. Decoration nodes (view-only, no data counterpart) are the
//! exception: an external decorator creates and removes them through
//! [`MirrorUpdater::insert_decoration`] / [`MirrorUpdater::remove_decoration`],
//! and they are always nested inside a mirrored element, never interleaved
//! among its mirrored children.

mod caret;
mod errors;
mod links;
mod mirror;

pub use caret::{DataCaret, ViewCaret};
pub use errors::MirrorError;
pub use links::MirrorLinks;
pub use mirror::MirrorUpdater;
