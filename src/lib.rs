//! # Statevault
//!
//! Durable state persistence for FSM-driven entities with optimistic
//! concurrency.
//!
//! Statevault records which state an entity occupies, advances it when a
//! transition fires, and guarantees that concurrent transition attempts on
//! the same entity never silently overwrite each other. Deciding *which*
//! transition fires is the caller's business; statevault's business is
//! applying the resulting state change durably and safely.
//!
//! ## Quick Start
//!
//! ```ignore
//! use statevault::prelude::*;
//! use std::sync::Arc;
//!
//! struct Order {
//!     state: RecordSlot,
//! }
//!
//! impl HasRecordSlot for Order {
//!     fn record_slot(&self) -> &RecordSlot {
//!         &self.state
//!     }
//! }
//!
//! let persister: Persister<Order> = PersisterBuilder::new()
//!     .states(["NEW", "PENDING", "ACTIVE", "CLOSED"])
//!     .start("NEW")
//!     .slot_accessor()
//!     .store(Arc::new(MemoryStore::new()))
//!     .build()?;
//!
//! let order = Order { state: RecordSlot::new() };
//!
//! // The FSM core decided NEW -> PENDING; commit it.
//! persister.set_current(&order, "NEW", "PENDING")?;
//!
//! // Before the entity's first external write, give it an identity.
//! persister.ensure_durable(&order)?;
//!
//! // Losing an optimistic race is expected, not exceptional.
//! match persister.set_current(&order, "PENDING", "ACTIVE") {
//!     Ok(()) => {}
//!     Err(e) if e.is_retryable() => { /* re-evaluate from refreshed state */ }
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), statevault::PersistError>(())
//! ```
//!
//! ## Concurrency model
//!
//! - **Durable entities** (the record has an identity): the store's
//!   conditional update is the only arbiter. Of two racing commits exactly
//!   one matches; the loser's in-memory record is refreshed from the
//!   authoritative row before [`PersistError::StaleState`] returns.
//! - **Non-durable entities** (never inserted): the record cell's write
//!   lock serializes the compare-and-set in process; the lock covers only
//!   that step and is released on every exit path.
//!
//! ## Collaborator seams
//!
//! - [`StateStore`]: any document or row store offering fetch-by-identity,
//!   single-record conditional update, and insert-with-identity.
//!   [`MemoryStore`] is the in-process implementation.
//! - [`StateAccessor`]: how the persister reaches the state record an
//!   entity owns. [`SlotAccessor`] works for entities embedding a
//!   [`RecordSlot`].

#![warn(missing_docs)]

mod builder;

pub mod prelude;

pub use builder::PersisterBuilder;

// Re-export the protocol engine and accessor capability
pub use statevault_persist::{HasRecordSlot, Persister, RecordSlot, SlotAccessor};

// Re-export the in-memory store
pub use statevault_store::MemoryStore;

// Re-export core types and contracts
pub use statevault_core::{
    next_timestamp, Document, PersistError, RecordCell, RecordId, RecordSchema, Result,
    StateAccessor, StateEffect, StatePredicate, StateRecord, StateSet, StateStore,
};
