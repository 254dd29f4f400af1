//! # Vellum Workspace
//!
//! Wires the core together into an editing session:
//!
//! ```text
//! editing operations
//!         ↓
//! ┌───────────────────┐   events    ┌────────────────────┐
//! │ TreeUpdater       │ ──────────→ │ MirrorUpdater      │
//! │ (data tree)       │      │      │ (view tree, links) │
//! └───────────────────┘      │      └────────────────────┘
//!                            └────→ ┌────────────────────┐
//!                                   │ Listener           │
//!                                   │ (handler dispatch) │
//!                                   └────────────────────┘
//! ```
//!
//! [`EditorSession::apply`] runs an operation and drains its events to
//! both consumers in issue order; `run_deferred` is the host's idle hook
//! that drains the coalesced follow-up pass, once per batch.

mod errors;
mod session;

pub use errors::SessionError;
pub use session::EditorSession;
