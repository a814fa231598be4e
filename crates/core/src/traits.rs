//! Collaborator contracts: the store adapter and the field accessor.
//!
//! Both seams are external collaborator boundaries. Any document or row
//! store that can fetch by identity, apply a conditional single-record
//! update, and insert with identity assignment satisfies [`StateStore`];
//! any way of reaching the state record owned by an entity satisfies
//! [`StateAccessor`].

use crate::error::Result;
use crate::record::{RecordCell, RecordId, StateRecord};
use chrono::{DateTime, Utc};

/// Predicate of a conditional update: match the record by identity only if
/// it still carries the expected current state.
#[derive(Debug, Clone, Copy)]
pub struct StatePredicate<'a> {
    /// Identity of the record to update
    pub id: &'a RecordId,
    /// State the record must still be in for the update to apply
    pub expected_state: &'a str,
}

/// Effect of a conditional update, applied only when the predicate matches.
#[derive(Debug, Clone, Copy)]
pub struct StateEffect<'a> {
    /// New previous-state value (the state being left)
    pub prev_state: &'a str,
    /// New current-state value (the state being entered)
    pub next_state: &'a str,
    /// New last-update timestamp
    pub updated: DateTime<Utc>,
}

/// Gateway to the backing store.
///
/// Every operation is single-record; no transactions span entities. The
/// store linearizes conditional updates racing on one identity: exactly one
/// observes a match.
pub trait StateStore: Send + Sync {
    /// Fetch a record by identity. `Ok(None)` when no record has that
    /// identity.
    fn fetch(&self, id: &RecordId) -> Result<Option<StateRecord>>;

    /// Apply `effect` to the record matching `predicate`.
    ///
    /// Returns `Ok(true)` iff the predicate matched and the effect was
    /// applied. `Ok(false)` covers both a state mismatch and an unknown
    /// identity; the two are not distinguished here.
    fn conditional_update(
        &self,
        predicate: StatePredicate<'_>,
        effect: StateEffect<'_>,
    ) -> Result<bool>;

    /// Insert a record, assigning and returning a fresh durable identity.
    ///
    /// Any identity already present on `record` is ignored.
    fn insert(&self, record: &StateRecord) -> Result<RecordId>;
}

/// Access to the state record owned by a managed entity.
///
/// Stability contract: once a record is attached, the same entity instance
/// always yields the same underlying cell for the rest of its lifetime.
pub trait StateAccessor<T: ?Sized>: Send + Sync {
    /// The entity's record cell, or `None` if no record has been attached.
    ///
    /// Absence is not an error: an entity that has never transitioned and
    /// was never made durable legitimately has no record.
    fn state_record(&self, entity: &T) -> Option<RecordCell>;

    /// The entity's record cell, attaching `init` first if the entity has
    /// none. Attachment is set-once: under concurrent calls exactly one
    /// `init` wins and every caller gets the winning cell.
    fn get_or_attach(&self, entity: &T, init: StateRecord) -> Result<RecordCell>;
}
