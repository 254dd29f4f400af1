//! # Vellum Listener
//!
//! The mutation dispatcher: lets independent consumers (a decorator, a
//! validator, navigation UI) react to structural changes without
//! re-scanning the whole document on every edit.
//!
//! Consumers register `(category, selector, callback)` handlers; each
//! mutation event is matched against the registry and the matched handlers
//! run synchronously, in a fixed category order. A single coalesced
//! follow-up pass per batch of mutations drains the triggers handlers
//! fired along the way.
//!
//! Handlers never mutate the tree directly. They enqueue follow-up
//! operations on the [`EventContext`], which the session applies after the
//! current event's handler snapshot finishes. This keeps event delivery in
//! strict issue order even when handlers react by editing.

mod context;
mod listener;

pub use context::EventContext;
pub use listener::{EventArgs, EventCategory, HandlerId, Listener};
