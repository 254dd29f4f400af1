//! The editing session: one data tree, one view mirror, one dispatcher.

use crate::errors::SessionError;
use std::collections::VecDeque;
use vellum_dom::{node_at, node_path, NodeData, NodeId, NodePath, NodeTemplate, Tree};
use vellum_editor::{TreeEvent, TreeOp, TreeUpdater};
use vellum_listener::{EventContext, Listener};
use vellum_mirror::{DataCaret, MirrorUpdater, ViewCaret};

/// Owns the three core components and routes every mutation event to both
/// consumers, in exact issue order.
///
/// A *turn* is one externally-issued operation plus everything handlers
/// enqueue while it is dispatched. All synchronous work for an operation
/// completes before the next operation's events are dispatched; the
/// coalesced follow-up pass is never run inside a turn; the host drains
/// it with [`EditorSession::run_deferred`] on idle.
pub struct EditorSession {
    updater: TreeUpdater,
    mirror: MirrorUpdater,
    listener: Listener,
}

impl EditorSession {
    pub fn new(root: NodeData) -> Self {
        let updater = TreeUpdater::new(root);
        let mirror = MirrorUpdater::new(updater.tree());
        EditorSession {
            updater,
            mirror,
            listener: Listener::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.updater.root()
    }

    /// The canonical data tree.
    pub fn data(&self) -> &Tree {
        self.updater.tree()
    }

    /// The decorated view tree.
    pub fn view(&self) -> &Tree {
        self.mirror.view()
    }

    pub fn mirror(&self) -> &MirrorUpdater {
        &self.mirror
    }

    /// Mutable mirror access for the external decorator; decoration
    /// nodes are exempt from the mirrored-region exclusivity.
    pub fn mirror_mut(&mut self) -> &mut MirrorUpdater {
        &mut self.mirror
    }

    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut Listener {
        &mut self.listener
    }

    pub fn insert_node_at(
        &mut self,
        parent: NodeId,
        index: usize,
        template: &NodeTemplate,
    ) -> Result<NodeId, SessionError> {
        let node = self.updater.insert_node_at(parent, index, template)?;
        self.run_turn()?;
        Ok(node)
    }

    pub fn delete_node(&mut self, node: NodeId) -> Result<(), SessionError> {
        self.updater.delete_node(node)?;
        self.run_turn()
    }

    pub fn set_text_node_value(&mut self, node: NodeId, value: &str) -> Result<(), SessionError> {
        self.updater.set_text_node_value(node, value)?;
        self.run_turn()
    }

    pub fn apply(&mut self, op: &TreeOp) -> Result<(), SessionError> {
        self.updater.apply(op)?;
        self.run_turn()
    }

    /// Apply several operations as one batch: events are dispatched per
    /// operation, in order, and at most one coalesced pass is left
    /// pending for the whole batch.
    pub fn apply_batch(&mut self, ops: &[TreeOp]) -> Result<(), SessionError> {
        for op in ops {
            self.apply(op)?;
        }
        Ok(())
    }

    /// Idle hook: run the coalesced follow-up pass if one is pending.
    /// Returns whether a pass ran. Operations enqueued by trigger handlers
    /// form a new batch and may leave a new pass pending.
    pub fn run_deferred(&mut self) -> Result<bool, SessionError> {
        let mut ctx = EventContext::new();
        let ran = self.listener.run_pass(self.updater.tree(), &mut ctx);
        if ran {
            for op in ctx.take_ops() {
                self.updater.apply(&op)?;
                self.run_turn()?;
            }
        }
        Ok(ran)
    }

    /// Flush hook from the dispatcher interface: identical to
    /// [`EditorSession::run_deferred`] but discards the ran/not flag.
    pub fn process_immediately(&mut self) -> Result<(), SessionError> {
        self.run_deferred().map(|_| ())
    }

    /// Translate a data caret into view coordinates.
    pub fn from_data_caret(
        &self,
        caret: impl Into<DataCaret>,
    ) -> Result<ViewCaret, SessionError> {
        self.mirror
            .from_data_caret(self.updater.tree(), caret)
            .map_err(Into::into)
    }

    /// Path of a data node from the document root.
    pub fn data_path(&self, node: NodeId) -> Result<NodePath, SessionError> {
        node_path(self.updater.tree(), self.updater.root(), node).map_err(Into::into)
    }

    /// Resolve a root-relative path against the data tree.
    pub fn node_at_path(&self, path: &NodePath) -> Result<NodeId, SessionError> {
        node_at(self.updater.tree(), self.updater.root(), path).map_err(Into::into)
    }

    /// Drain the event outbox: mirror first, then dispatcher, then
    /// reclamation of deleted subtrees; handler-enqueued follow-up ops are
    /// applied in arrival order within the same turn.
    fn run_turn(&mut self) -> Result<(), SessionError> {
        let mut follow_ups: VecDeque<TreeOp> = VecDeque::new();
        loop {
            while let Some(event) = self.updater.pop_event() {
                self.mirror.handle_event(self.updater.tree(), &event)?;

                let mut ctx = EventContext::new();
                self.listener
                    .dispatch(self.updater.tree(), &mut ctx, &event);
                follow_ups.extend(ctx.take_ops());

                if let TreeEvent::DeleteNode { node, .. } = event {
                    self.updater.reclaim_detached(node)?;
                }
            }
            match follow_ups.pop_front() {
                Some(op) => self.updater.apply(&op)?,
                None => break,
            }
        }
        Ok(())
    }
}
