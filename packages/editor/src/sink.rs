//! The shared structural-mutation interface.

use crate::errors::MutateError;
use vellum_dom::{NodeId, Tree};

/// One generic "apply a structural mutation" interface over a tree
/// instance.
///
/// The data-tree updater and the view mirror are both sinks over their own
/// trees (composition, not subclassing), so the view tree's own changes
/// flow through the same primitive the data tree's do. A sink never
/// accepts events intended for the other tree; ids are only meaningful
/// against the tree that issued them.
pub trait MutationSink {
    fn tree(&self) -> &Tree;

    /// Splice an already-materialized detached node in as the `index`-th
    /// child of `parent`.
    fn apply_insert(&mut self, parent: NodeId, index: usize, node: NodeId)
        -> Result<(), MutateError>;

    /// Detach `node` from its parent, returning its former index. The
    /// subtree stays alive until explicitly freed.
    fn apply_delete(&mut self, node: NodeId) -> Result<usize, MutateError>;

    /// Replace a text node's content, returning the prior value.
    fn apply_set_text(&mut self, node: NodeId, value: &str) -> Result<String, MutateError>;
}
