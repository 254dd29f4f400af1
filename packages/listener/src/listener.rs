//! Handler registry and event dispatch.

use crate::context::EventContext;
use std::collections::HashMap;
use vellum_dom::{NodeId, Selector, Tree};
use vellum_editor::TreeEvent;

/// The six handler categories, dispatched in the order listed for each
/// structural event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// An element gained or lost direct children.
    ChildrenChanged,
    /// A text node's value changed (matched against the text's parent).
    TextChanged,
    /// An element was inserted (matched against the element itself).
    AddedElement,
    /// An element was removed (matched against the element itself).
    RemovedElement,
    /// An inserted subtree brought a matching element into the tree
    /// (matched against the subtree's descendants-and-self).
    IncludedElement,
    /// A removed subtree took a matching element out of the tree.
    ExcludedElement,
}

/// Arguments passed to a matched handler.
#[derive(Debug, Clone, PartialEq)]
pub enum EventArgs {
    ChildrenChanged {
        parent: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
        prev: Option<NodeId>,
        next: Option<NodeId>,
    },

    TextChanged {
        node: NodeId,
        old_value: String,
    },

    /// Added/removed element with its sibling context.
    Element {
        node: NodeId,
        parent: NodeId,
        prev: Option<NodeId>,
        next: Option<NodeId>,
    },

    /// Included/excluded element: `root` is the inserted or removed
    /// subtree, `matched` the node within it that satisfied the selector.
    SubtreeElement {
        root: NodeId,
        parent: NodeId,
        prev: Option<NodeId>,
        next: Option<NodeId>,
        matched: NodeId,
    },
}

/// Handle for deregistering a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type HandlerFn = Box<dyn FnMut(&Tree, &mut EventContext, &EventArgs) -> anyhow::Result<()>>;
type TriggerFn = Box<dyn FnMut(&Tree, &mut EventContext) -> anyhow::Result<()>>;

struct HandlerEntry {
    id: HandlerId,
    selector: Selector,
    callback: HandlerFn,
}

/// Selector-keyed mutation-event dispatcher.
///
/// Inactive (stopped) listeners perform zero work per event. Stopping does
/// not undo mutations already applied and missed events are not replayed
/// on restart; a consumer resuming must re-derive any state it needs.
pub struct Listener {
    handlers: HashMap<EventCategory, Vec<HandlerEntry>>,
    trigger_handlers: Vec<(String, TriggerFn)>,
    next_id: u64,
    stopped: bool,
    pass_pending: bool,
    fired: Vec<String>,
    passes_run: u64,
}

impl Default for Listener {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener {
    /// A new listener starts stopped, like its registry starts empty.
    pub fn new() -> Self {
        Listener {
            handlers: HashMap::new(),
            trigger_handlers: Vec::new(),
            next_id: 0,
            stopped: true,
            pass_pending: false,
            fired: Vec::new(),
            passes_run: 0,
        }
    }

    pub fn add_handler(
        &mut self,
        category: EventCategory,
        selector: Selector,
        callback: impl FnMut(&Tree, &mut EventContext, &EventArgs) -> anyhow::Result<()> + 'static,
    ) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.entry(category).or_default().push(HandlerEntry {
            id,
            selector,
            callback: Box::new(callback),
        });
        id
    }

    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        for entries in self.handlers.values_mut() {
            if let Some(pos) = entries.iter().position(|e| e.id == id) {
                entries.remove(pos);
                return true;
            }
        }
        false
    }

    /// Register a callback for a named trigger, run during the coalesced
    /// pass when some handler fired that name.
    pub fn add_trigger_handler(
        &mut self,
        name: impl Into<String>,
        callback: impl FnMut(&Tree, &mut EventContext) -> anyhow::Result<()> + 'static,
    ) {
        self.trigger_handlers.push((name.into(), Box::new(callback)));
    }

    pub fn start_listening(&mut self) {
        self.stopped = false;
    }

    pub fn stop_listening(&mut self) {
        self.stopped = true;
    }

    pub fn is_listening(&self) -> bool {
        !self.stopped
    }

    /// Fire a trigger from outside a handler.
    pub fn trigger(&mut self, name: impl Into<String>) {
        self.note_triggers(vec![name.into()]);
    }

    pub fn pass_pending(&self) -> bool {
        self.pass_pending
    }

    /// Number of coalesced passes run so far.
    pub fn passes_run(&self) -> u64 {
        self.passes_run
    }

    /// Dispatch one mutation event to the matching handlers.
    ///
    /// The matched list is snapshotted before invocation, so handlers that
    /// enqueue follow-up mutations cannot change which handlers see the
    /// current event. A failing handler is logged and never blocks
    /// delivery to the rest of the snapshot.
    pub fn dispatch(&mut self, tree: &Tree, ctx: &mut EventContext, event: &TreeEvent) {
        if self.stopped {
            return;
        }

        match event {
            TreeEvent::InsertNodeAt { parent, node, .. } => {
                let prev = tree.prev_sibling(*node);
                let next = tree.next_sibling(*node);
                let plan = self.structural_plan(
                    tree,
                    *parent,
                    *node,
                    prev,
                    next,
                    vec![*node],
                    Vec::new(),
                    EventCategory::AddedElement,
                    EventCategory::IncludedElement,
                );
                self.run_plan(tree, ctx, plan);
                self.schedule_pass();
            }

            TreeEvent::DeleteNode {
                node,
                parent,
                prev,
                next,
                ..
            } => {
                let plan = self.structural_plan(
                    tree,
                    *parent,
                    *node,
                    *prev,
                    *next,
                    Vec::new(),
                    vec![*node],
                    EventCategory::RemovedElement,
                    EventCategory::ExcludedElement,
                );
                self.run_plan(tree, ctx, plan);
                self.schedule_pass();
            }

            TreeEvent::SetTextNodeValue {
                node, old_value, ..
            } => {
                let mut plan = Vec::new();
                if let Some(parent) = tree.parent(*node) {
                    for entry in self.handlers.get(&EventCategory::TextChanged).into_iter().flatten() {
                        if entry.selector.matches(tree, parent) {
                            plan.push((
                                entry.id,
                                EventCategory::TextChanged,
                                EventArgs::TextChanged {
                                    node: *node,
                                    old_value: old_value.clone(),
                                },
                            ));
                        }
                    }
                }
                self.run_plan(tree, ctx, plan);
                self.schedule_pass();
            }
        }

        let fired = ctx.take_triggers();
        self.note_triggers(fired);
    }

    /// Flush hook: run the coalesced pass now if one is pending. Part of
    /// the interface contract even though all other dispatch is already
    /// synchronous.
    pub fn process_immediately(&mut self, tree: &Tree, ctx: &mut EventContext) {
        self.run_pass(tree, ctx);
    }

    /// Run the coalesced follow-up pass if pending. Returns whether it ran.
    ///
    /// Triggers fired during the pass itself belong to the next batch and
    /// leave a new pass pending rather than extending this one.
    pub fn run_pass(&mut self, tree: &Tree, ctx: &mut EventContext) -> bool {
        if !self.pass_pending {
            return false;
        }
        self.pass_pending = false;
        self.passes_run += 1;

        let fired = std::mem::take(&mut self.fired);
        tracing::debug!("coalesced pass {} ({} triggers)", self.passes_run, fired.len());
        for name in &fired {
            for (registered, callback) in &mut self.trigger_handlers {
                if registered == name {
                    if let Err(err) = callback(tree, ctx) {
                        tracing::error!("trigger handler for {name:?} failed: {err:#}");
                    }
                }
            }
        }

        let refired = ctx.take_triggers();
        self.note_triggers(refired);
        true
    }

    fn schedule_pass(&mut self) {
        // A second schedule request while one is pending is absorbed.
        self.pass_pending = true;
    }

    fn note_triggers(&mut self, names: Vec<String>) {
        for name in names {
            if !self.fired.contains(&name) {
                self.fired.push(name);
            }
        }
        if !self.fired.is_empty() {
            self.pass_pending = true;
        }
    }

    /// Matched-handler snapshot for an insert or delete, in the fixed
    /// order children-changed, added/removed-element, included/excluded-
    /// element.
    #[allow(clippy::too_many_arguments)]
    fn structural_plan(
        &self,
        tree: &Tree,
        parent: NodeId,
        node: NodeId,
        prev: Option<NodeId>,
        next: Option<NodeId>,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
        elem_category: EventCategory,
        subtree_category: EventCategory,
    ) -> Vec<(HandlerId, EventCategory, EventArgs)> {
        let mut plan = Vec::new();

        for entry in self.handlers.get(&EventCategory::ChildrenChanged).into_iter().flatten() {
            if entry.selector.matches(tree, parent) {
                plan.push((
                    entry.id,
                    EventCategory::ChildrenChanged,
                    EventArgs::ChildrenChanged {
                        parent,
                        added: added.clone(),
                        removed: removed.clone(),
                        prev,
                        next,
                    },
                ));
            }
        }

        let is_element = tree.data(node).map(|d| d.is_element()).unwrap_or(false);
        if is_element {
            for entry in self.handlers.get(&elem_category).into_iter().flatten() {
                if entry.selector.matches(tree, node) {
                    plan.push((
                        entry.id,
                        elem_category,
                        EventArgs::Element {
                            node,
                            parent,
                            prev,
                            next,
                        },
                    ));
                }
            }

            // One subtree insertion can satisfy many nested selectors.
            for entry in self.handlers.get(&subtree_category).into_iter().flatten() {
                for matched in entry.selector.find_and_self(tree, node) {
                    plan.push((
                        entry.id,
                        subtree_category,
                        EventArgs::SubtreeElement {
                            root: node,
                            parent,
                            prev,
                            next,
                            matched,
                        },
                    ));
                }
            }
        }

        plan
    }

    fn run_plan(
        &mut self,
        tree: &Tree,
        ctx: &mut EventContext,
        plan: Vec<(HandlerId, EventCategory, EventArgs)>,
    ) {
        for (id, category, args) in plan {
            let Some(entries) = self.handlers.get_mut(&category) else {
                continue;
            };
            let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
                continue;
            };
            if let Err(err) = (entry.callback)(tree, ctx, &args) {
                tracing::error!("{category:?} handler failed: {err:#}");
            }
        }
    }
}
