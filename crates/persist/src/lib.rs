//! Persistence engine for statevault
//!
//! This crate implements the state-persistence protocol:
//! - Persister: conditional-update commits for durable entities, locked
//!   in-memory commits for entities with no durable identity, and the
//!   ensure-durable pre-commit hook
//! - RecordSlot / SlotAccessor: the explicit field-access capability that
//!   replaces reflection

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accessor;
pub mod persister;

pub use accessor::{HasRecordSlot, RecordSlot, SlotAccessor};
pub use persister::Persister;
