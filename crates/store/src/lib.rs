//! Store layer for statevault
//!
//! This crate implements the store-adapter contract with an in-memory
//! document store:
//! - MemoryStore: DashMap-sharded documents, lock-free reads, per-shard
//!   conditional updates
//! - Schema-driven document mapping via `RecordSchema`
//!
//! Any external document or row store can replace it by implementing
//! `statevault_core::StateStore`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;

pub use memory::MemoryStore;
