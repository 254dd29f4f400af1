//! # Vellum Editor
//!
//! The canonical-tree mutation engine.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ editor: TreeUpdater owns the data tree      │
//! │  - insert_node_at / delete_node /           │
//! │    set_text_node_value, validated + atomic  │
//! │  - one TreeEvent per operation, issue order │
//! └─────────────────────────────────────────────┘
//!                     ↓ events
//! ┌──────────────────────┬──────────────────────┐
//! │ mirror: view replay  │ listener: dispatch   │
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! 1. **Atomic**: the tree is fully mutated, then the event is emitted,
//!    before control returns; no half-applied state is ever observable
//! 2. **Ordered**: events sit in a FIFO outbox in exact issue order
//! 3. **Single authority**: the data tree is mutated only through
//!    [`TreeUpdater`]; every structural change flows through the shared
//!    [`MutationSink`] interface

mod errors;
mod events;
mod ops;
mod sink;
mod updater;

pub use errors::MutateError;
pub use events::TreeEvent;
pub use ops::TreeOp;
pub use sink::MutationSink;
pub use updater::TreeUpdater;
