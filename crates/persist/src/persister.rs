//! Persister protocol engine.
//!
//! The persister owns the decision of whether an entity is already durable,
//! builds the conditional update, interprets the store's answer, and falls
//! back to in-process serialization for entities with no durable identity.
//!
//! ## Commit paths
//!
//! ```text
//! set_current(entity, current, next)
//!   ├── durable record (has identity)
//!   │     conditional_update(id, state == current)
//!   │       ├── matched   → mirror effect into memory, Ok
//!   │       └── no match  → fetch(id)
//!   │             ├── Some → refresh memory, Err(StaleState)
//!   │             └── None → Err(RecordVanished)
//!   └── non-durable record
//!         cell write lock: compare state, apply or Err(StaleState)
//! ```
//!
//! Cross-process races are arbitrated entirely by the store's conditional
//! update; the cell lock arbitrates in-process races for entities the store
//! has never seen. The lock covers only the compare-and-set and is never
//! held across a store call on the transition path.

use statevault_core::{
    next_timestamp, PersistError, RecordCell, RecordId, Result, StateAccessor, StateEffect,
    StatePredicate, StateRecord, StateSet, StateStore,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Outcome of the locked in-memory compare-and-set.
enum InMemoryCommit {
    /// The transition was applied in place.
    Applied,
    /// The record acquired a durable identity between the probe and the
    /// lock; the decision must be retaken on the durable path.
    BecameDurable,
}

/// Protocol engine persisting state transitions for entities of type `T`.
///
/// Synchronous and thread-agnostic: it performs blocking store calls and
/// returns; there are no background tasks. One persister serves one entity
/// type; the accessor, the store, and the declared state set are supplied
/// once at construction.
pub struct Persister<T: ?Sized> {
    accessor: Arc<dyn StateAccessor<T>>,
    store: Arc<dyn StateStore>,
    states: StateSet,
}

impl<T: ?Sized> Persister<T> {
    /// Create a persister from its collaborators.
    pub fn new(
        accessor: Arc<dyn StateAccessor<T>>,
        store: Arc<dyn StateStore>,
        states: StateSet,
    ) -> Self {
        Self {
            accessor,
            store,
            states,
        }
    }

    /// The declared state set.
    pub fn states(&self) -> &StateSet {
        &self.states
    }

    /// The machine's start state.
    pub fn start_state(&self) -> &str {
        self.states.start()
    }

    /// Advance the entity from `current` to `next`, guaranteeing the
    /// precondition that `current` really is the entity's authoritative
    /// state at commit time.
    ///
    /// On a lost precondition the in-memory record is refreshed to the
    /// authoritative value before [`PersistError::StaleState`] returns, so
    /// a retried transition decision starts from correct data. No partial
    /// mutation is ever visible on failure.
    pub fn set_current(&self, entity: &T, current: &str, next: &str) -> Result<()> {
        let cell = self.record_cell(entity)?;
        loop {
            let id = cell.read().id.clone();
            match id {
                Some(id) => return self.commit_durable(&cell, &id, current, next),
                None => match self.commit_in_memory(&cell, current, next)? {
                    InMemoryCommit::Applied => return Ok(()),
                    InMemoryCommit::BecameDurable => continue,
                },
            }
        }
    }

    /// Make the entity durable if it is not already.
    ///
    /// The storage-write pipeline calls this synchronously before any
    /// external write of the entity: a start-state record is attached if
    /// the entity has none, and an identity is obtained from the store if
    /// the record has never been inserted. Idempotent.
    pub fn ensure_durable(&self, entity: &T) -> Result<()> {
        let cell = self.record_cell(entity)?;
        let mut record = cell.write();
        if record.id.is_some() {
            return Ok(());
        }
        // identity assignment must be single-shot, so the insert happens
        // under the cell lock
        let id = self.store.insert(&record)?;
        debug!(%id, state = %record.state, "entity became durable");
        record.id = Some(id);
        Ok(())
    }

    /// The entity's current state, or the declared start state when no
    /// record has been attached yet. Absence of a record is "not found",
    /// never an error.
    pub fn current_state(&self, entity: &T) -> String {
        match self.accessor.state_record(entity) {
            Some(cell) => cell.read().state.clone(),
            None => self.states.start().to_string(),
        }
    }

    fn record_cell(&self, entity: &T) -> Result<RecordCell> {
        self.accessor
            .get_or_attach(entity, StateRecord::new(self.states.start()))
    }

    fn commit_durable(
        &self,
        cell: &RecordCell,
        id: &RecordId,
        current: &str,
        next: &str,
    ) -> Result<()> {
        let updated = next_timestamp(cell.read().updated);
        let matched = self.store.conditional_update(
            StatePredicate {
                id,
                expected_state: current,
            },
            StateEffect {
                prev_state: current,
                next_state: next,
                updated,
            },
        )?;

        if matched {
            let mut record = cell.write();
            record.prev_state = current.to_string();
            record.state = next.to_string();
            record.updated = updated;
            debug!(%id, from = current, to = next, "transition committed");
            return Ok(());
        }

        // Precondition lost: another writer advanced the state first.
        // Refresh the in-memory record from the authoritative row, then
        // report the conflict so the caller can retry its decision.
        match self.store.fetch(id)? {
            Some(authoritative) => {
                let mut record = cell.write();
                let expected =
                    std::mem::replace(&mut record.state, authoritative.state.clone());
                record.prev_state = authoritative.prev_state.clone();
                record.updated = authoritative.updated;
                drop(record);
                warn!(
                    %id,
                    expected = %expected,
                    authoritative = %authoritative.state,
                    "stale state detected"
                );
                Err(PersistError::StaleState {
                    expected,
                    authoritative: authoritative.state,
                })
            }
            None => {
                error!(%id, "state record vanished after failed conditional update");
                Err(PersistError::RecordVanished { id: id.clone() })
            }
        }
    }

    fn commit_in_memory(
        &self,
        cell: &RecordCell,
        current: &str,
        next: &str,
    ) -> Result<InMemoryCommit> {
        let mut record = cell.write();
        if record.id.is_some() {
            // the entity became durable between the probe and the lock
            return Ok(InMemoryCommit::BecameDurable);
        }
        if record.state != current {
            let authoritative = record.state.clone();
            drop(record);
            warn!(
                expected = current,
                authoritative = %authoritative,
                "stale state detected in memory"
            );
            return Err(PersistError::StaleState {
                expected: current.to_string(),
                authoritative,
            });
        }
        record.prev_state = std::mem::replace(&mut record.state, next.to_string());
        record.updated = next_timestamp(record.updated);
        debug!(from = current, to = next, "transition committed in memory");
        Ok(InMemoryCommit::Applied)
    }
}
