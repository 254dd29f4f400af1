//! Per-dispatch context handed to handlers.

use vellum_editor::TreeOp;

/// Collects the side effects a handler is allowed to request: follow-up
/// operations on the data tree and named triggers for the coalesced pass.
#[derive(Debug, Default)]
pub struct EventContext {
    ops: Vec<TreeOp>,
    triggers: Vec<String>,
}

impl EventContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a follow-up mutation. Applied by the session after the
    /// current event's handler snapshot has been fully delivered.
    pub fn enqueue(&mut self, op: TreeOp) {
        self.ops.push(op);
    }

    /// Fire a named trigger, to be drained by the next coalesced pass.
    pub fn trigger(&mut self, name: impl Into<String>) {
        self.triggers.push(name.into());
    }

    pub fn take_ops(&mut self) -> Vec<TreeOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn take_triggers(&mut self) -> Vec<String> {
        std::mem::take(&mut self.triggers)
    }
}
