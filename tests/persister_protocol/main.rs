//! Persister Protocol Test Suite
//!
//! Comprehensive tests for the state-persistence protocol.
//!
//! ## Modules
//!
//! - `transitions`: Committing transitions on both commit paths
//! - `staleness`: Lost preconditions, refresh semantics, retry contract
//! - `concurrency`: Multi-threaded races on durable and non-durable entities
//! - `durability`: Identity assignment via the pre-commit hook
//! - `edge_cases`: Vanished records, self-transitions, slot stability
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole protocol suite
//! cargo test --test persister_protocol
//!
//! # Run the concurrency tests only
//! cargo test --test persister_protocol concurrency::
//! ```

use statevault::prelude::*;
use std::sync::Arc;

pub mod edge_cases;
pub mod transitions;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// The state chain used throughout the suite.
pub const STATES: [&str; 4] = ["NEW", "PENDING", "ACTIVE", "CLOSED"];

/// A managed entity: one record slot plus domain payload.
pub struct Order {
    state: RecordSlot,
    #[allow(dead_code)]
    pub line_items: u32,
}

impl Order {
    pub fn new() -> Self {
        Self {
            state: RecordSlot::new(),
            line_items: 0,
        }
    }

    /// Snapshot of the attached record, if any.
    pub fn record(&self) -> Option<StateRecord> {
        self.state.get().map(|cell| cell.snapshot())
    }

    /// The attached cell, for identity and stability assertions.
    pub fn cell(&self) -> Option<RecordCell> {
        self.state.get()
    }
}

impl HasRecordSlot for Order {
    fn record_slot(&self) -> &RecordSlot {
        &self.state
    }
}

/// Create the shared in-memory store.
pub fn create_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// Create a persister over the given store.
pub fn create_persister(store: &Arc<MemoryStore>) -> Persister<Order> {
    PersisterBuilder::new()
        .states(STATES)
        .start("NEW")
        .slot_accessor()
        .store(Arc::clone(store))
        .build()
        .expect("Failed to build persister")
}

/// Attach a record carrying an existing identity to an entity, simulating a
/// second process loading the same durable entity.
pub fn attach_mirror(order: &Order, id: &RecordId, state: &str) {
    let mut mirror = StateRecord::new(state);
    mirror.id = Some(id.clone());
    order.record_slot().get_or_attach(mirror);
}

/// Opt-in log output while debugging a failing test.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = tracing_subscriber::fmt().try_init();
}
