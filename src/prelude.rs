//! Convenient imports for statevault.
//!
//! This module re-exports the most commonly used types so you can get
//! started with a single import:
//!
//! ```ignore
//! use statevault::prelude::*;
//!
//! let persister: Persister<Order> = PersisterBuilder::new()
//!     .states(["NEW", "PENDING"])
//!     .start("NEW")
//!     .slot_accessor()
//!     .store(Arc::new(MemoryStore::new()))
//!     .build()?;
//! ```

// Protocol engine
pub use crate::{Persister, PersisterBuilder};

// Error handling
pub use crate::{PersistError, Result};

// Record types
pub use crate::{RecordCell, RecordId, StateRecord};

// Field access
pub use crate::{HasRecordSlot, RecordSlot, SlotAccessor, StateAccessor};

// Store contract and in-memory implementation
pub use crate::{MemoryStore, RecordSchema, StateEffect, StatePredicate, StateStore};

// State declarations
pub use crate::StateSet;
