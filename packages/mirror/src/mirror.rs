//! The View Mirror: replays data-tree events on the view tree.

use crate::caret::{DataCaret, ViewCaret};
use crate::errors::MirrorError;
use crate::links::MirrorLinks;
use vellum_dom::{NodeId, NodeTemplate, Tree};
use vellum_editor::{MutateError, MutationSink, TreeEvent};

/// Owns the view tree and the mirror links. Subscribes (via
/// [`MirrorUpdater::handle_event`]) to the data tree's mutation events and
/// replays each as an equivalent mutation on the view tree, keeping the
/// view's real substructure isomorphic to the data tree at all times.
///
/// Mirrors are created and destroyed only here, in direct response to the
/// corresponding event, never independently.
#[derive(Debug)]
pub struct MirrorUpdater {
    view: Tree,
    links: MirrorLinks,
}

impl MirrorUpdater {
    /// Build a view tree mirroring the current state of `data`, linking
    /// every node pair.
    pub fn new(data: &Tree) -> Self {
        let data_root = data.root();
        let root_payload = match data.data(data_root) {
            Some(payload) => payload.clone(),
            // An arena root always resolves; guard for completeness.
            None => vellum_dom::NodeData::element("root"),
        };
        let view = Tree::with_root(root_payload);
        let mut mirror = MirrorUpdater {
            view,
            links: MirrorLinks::new(),
        };
        mirror.links.link(data_root, mirror.view.root());
        for (i, child) in data.children(data_root).iter().enumerate() {
            let clone = mirror.clone_linked(data, *child);
            // Fresh clones under the fresh view root cannot fail to attach.
            let _ = mirror.view.attach(mirror.view.root(), i, clone);
        }
        mirror
    }

    pub fn view(&self) -> &Tree {
        &self.view
    }

    pub fn links(&self) -> &MirrorLinks {
        &self.links
    }

    pub fn view_of(&self, data_node: NodeId) -> Option<NodeId> {
        self.links.view_of(data_node)
    }

    pub fn data_of(&self, view_node: NodeId) -> Option<NodeId> {
        self.links.data_of(view_node)
    }

    /// Replay one data-tree event on the view tree.
    pub fn handle_event(&mut self, data: &Tree, event: &TreeEvent) -> Result<(), MirrorError> {
        match event {
            TreeEvent::InsertNodeAt {
                parent,
                node,
                index,
            } => {
                let caret = self.from_data_caret(data, (*parent, *index))?;
                let clone = self.clone_linked(data, *node);
                self.apply_insert(caret.node, caret.offset, clone)?;
                tracing::debug!("mirrored insert of {} as {}", node, clone);
            }

            TreeEvent::SetTextNodeValue { node, value, .. } => {
                let caret = self.from_data_caret(data, (*node, 0))?;
                self.apply_set_text(caret.node, value)?;
            }

            TreeEvent::DeleteNode { node, .. } => {
                // The data subtree is detached but still readable here.
                let view_node = match data.data(*node) {
                    Some(payload) if payload.is_text() => {
                        self.from_data_caret(data, (*node, 0))?.node
                    }
                    _ => self
                        .links
                        .view_of(*node)
                        .ok_or(MirrorError::Unlinked(*node))?,
                };
                self.apply_delete(view_node)?;
                for d in data.descendants(*node) {
                    self.links.unlink_data(d);
                }
                self.view.free_subtree(view_node)?;
                tracing::debug!("mirrored delete of {} ({})", node, view_node);
            }
        }
        Ok(())
    }

    /// Translate a data caret to a view caret.
    ///
    /// For an element caret at child index `k`, the result is "immediately
    /// before the view mirror of data child `k`", computed from the
    /// successor, not as "after child k−1", because decorations may follow
    /// child k−1 in view space. When the child at `k` has no established
    /// link yet (a transient state during multi-node mutation replay) the
    /// scan moves right to the first linked sibling, and clamps to
    /// end-of-children when none is linked.
    pub fn from_data_caret(
        &self,
        data: &Tree,
        caret: impl Into<DataCaret>,
    ) -> Result<ViewCaret, MirrorError> {
        let DataCaret { node, offset } = caret.into();
        let payload = data.data(node).ok_or(MirrorError::Unlinked(node))?;
        let view_node = self.links.view_of(node).ok_or(MirrorError::Unlinked(node))?;

        // Text is never split or merged differently between the trees.
        if payload.is_text() {
            return Ok(ViewCaret::new(view_node, offset));
        }

        if offset == 0 {
            return Ok(ViewCaret::new(view_node, 0));
        }

        let children = data.children(node);
        if offset >= children.len() {
            // The view node may have more children than the data node
            // (trailing decorations).
            return Ok(ViewCaret::new(view_node, self.view.child_count(view_node)));
        }

        for child in &children[offset..] {
            let Some(view_child) = self.links.view_of(*child) else {
                continue;
            };
            if let (Some(view_parent), Some(view_index)) = (
                self.view.parent(view_child),
                self.view.index_in_parent(view_child),
            ) {
                return Ok(ViewCaret::new(view_parent, view_index));
            }
        }

        Ok(ViewCaret::new(view_node, self.view.child_count(view_node)))
    }

    /// Deep-clone a data subtree into the view arena, linking the clone
    /// and every cloned descendant with their data originals. Returns the
    /// detached clone root.
    fn clone_linked(&mut self, data: &Tree, data_node: NodeId) -> NodeId {
        let payload = match data.data(data_node) {
            Some(payload) => payload.clone(),
            None => vellum_dom::NodeData::text(""),
        };
        let clone = self.view.alloc(payload);
        self.links.link(data_node, clone);
        for (i, child) in data.children(data_node).iter().enumerate() {
            let child_clone = self.clone_linked(data, *child);
            let _ = self.view.attach(clone, i, child_clone);
        }
        clone
    }

    /// Attach a decoration subtree inside a view element. Decorator entry
    /// point; decorations carry no mirror link.
    pub fn insert_decoration(
        &mut self,
        view_parent: NodeId,
        index: usize,
        template: &NodeTemplate,
    ) -> Result<NodeId, MirrorError> {
        if !self.view.contains(view_parent) {
            return Err(MirrorError::InvalidTarget(format!(
                "decoration parent {view_parent} is not part of the view tree"
            )));
        }
        let deco = self.view.build_decoration(template);
        self.view.attach(view_parent, index, deco)?;
        Ok(deco)
    }

    /// Detach and free a decoration subtree. Refuses real (linked) nodes:
    /// those are mirrored exclusively from data-tree events.
    pub fn remove_decoration(&mut self, view_node: NodeId) -> Result<(), MirrorError> {
        if !self.view.is_decoration(view_node) {
            return Err(MirrorError::NotADecoration(view_node));
        }
        self.view.detach(view_node)?;
        self.view.free_subtree(view_node)?;
        Ok(())
    }

    /// Number of mirrored (non-decoration) children of a view element.
    pub fn mirrored_child_count(&self, view_node: NodeId) -> usize {
        self.view
            .children(view_node)
            .iter()
            .filter(|c| !self.view.is_decoration(**c))
            .count()
    }
}

impl MutationSink for MirrorUpdater {
    fn tree(&self) -> &Tree {
        &self.view
    }

    fn apply_insert(
        &mut self,
        parent: NodeId,
        index: usize,
        node: NodeId,
    ) -> Result<(), MutateError> {
        self.view.attach(parent, index, node).map_err(Into::into)
    }

    fn apply_delete(&mut self, node: NodeId) -> Result<usize, MutateError> {
        self.view.detach(node).map_err(Into::into)
    }

    fn apply_set_text(&mut self, node: NodeId, value: &str) -> Result<String, MutateError> {
        self.view.set_text(node, value).map_err(Into::into)
    }
}
