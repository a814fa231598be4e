//! In-memory document store.
//!
//! `MemoryStore` keeps schema-mapped JSON documents in a sharded map.
//! Reads are lock-free; a conditional update compares and mutates the
//! document while holding its shard's write guard, so updates racing on one
//! identity are linearized by the map and exactly one observes a match.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rustc_hash::FxHasher;
use serde_json::Value;
use statevault_core::{
    Document, PersistError, RecordId, RecordSchema, Result, StateEffect, StatePredicate,
    StateRecord, StateStore,
};
use std::hash::BuildHasherDefault;
use tracing::{debug, trace};

type FxDashMap<K, V> = DashMap<K, V, BuildHasherDefault<FxHasher>>;

/// In-memory document store for one entity type's state records.
///
/// # Thread Safety
///
/// All operations are thread-safe:
/// - `fetch()`: lock-free read via the sharded map
/// - `conditional_update()`: locks only the target document's shard
/// - Different identities rarely contend, never logically conflict
pub struct MemoryStore {
    /// Document mapping (collection and field names)
    schema: RecordSchema,
    /// Stored documents keyed by identity
    docs: FxDashMap<RecordId, Document>,
}

impl MemoryStore {
    /// Create a store with the default record schema.
    pub fn new() -> Self {
        Self::with_schema(RecordSchema::default())
    }

    /// Create a store with an explicit record schema.
    pub fn with_schema(schema: RecordSchema) -> Self {
        Self {
            schema,
            docs: FxDashMap::default(),
        }
    }

    /// The schema this store persists records under.
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Whether a record with this identity exists.
    pub fn contains(&self, id: &RecordId) -> bool {
        self.docs.contains_key(id)
    }

    /// Remove a record by identity, as an external entity-lifecycle action.
    ///
    /// Returns `true` if the record existed. The persistence core itself
    /// never deletes records.
    pub fn remove(&self, id: &RecordId) -> bool {
        let removed = self.docs.remove(id).is_some();
        if removed {
            debug!(%id, collection = %self.schema.collection, "record removed");
        }
        removed
    }

    /// Drop every stored record.
    pub fn clear(&self) {
        self.docs.clear();
    }

    /// The raw stored document for an identity, as persisted.
    ///
    /// Intended for administration and tests; protocol code goes through
    /// [`StateStore::fetch`].
    pub fn document(&self, id: &RecordId) -> Option<Document> {
        self.docs.get(id).map(|doc| doc.value().clone())
    }

    fn timestamp_value(updated: &DateTime<Utc>) -> Value {
        Value::String(updated.to_rfc3339())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for MemoryStore {
    fn fetch(&self, id: &RecordId) -> Result<Option<StateRecord>> {
        match self.docs.get(id) {
            Some(doc) => {
                trace!(%id, "fetch hit");
                self.schema.from_document(doc.value()).map(Some)
            }
            None => {
                trace!(%id, "fetch miss");
                Ok(None)
            }
        }
    }

    fn conditional_update(
        &self,
        predicate: StatePredicate<'_>,
        effect: StateEffect<'_>,
    ) -> Result<bool> {
        // get_mut holds the shard write guard for the whole compare-and-set
        let Some(mut entry) = self.docs.get_mut(predicate.id) else {
            trace!(id = %predicate.id, "conditional update: identity not found");
            return Ok(false);
        };
        let doc = entry.value_mut();
        let current = doc.get(&self.schema.state_field).and_then(Value::as_str);
        if current != Some(predicate.expected_state) {
            trace!(
                id = %predicate.id,
                expected = predicate.expected_state,
                actual = current.unwrap_or(""),
                "conditional update: predicate lost"
            );
            return Ok(false);
        }
        doc.insert(
            self.schema.prev_state_field.clone(),
            Value::String(effect.prev_state.to_string()),
        );
        doc.insert(
            self.schema.state_field.clone(),
            Value::String(effect.next_state.to_string()),
        );
        doc.insert(
            self.schema.updated_field.clone(),
            Self::timestamp_value(&effect.updated),
        );
        trace!(
            id = %predicate.id,
            from = effect.prev_state,
            to = effect.next_state,
            "conditional update applied"
        );
        Ok(true)
    }

    fn insert(&self, record: &StateRecord) -> Result<RecordId> {
        let id = RecordId::generate();
        let mut stored = record.clone();
        stored.id = Some(id.clone());
        let doc = self.schema.to_document(&stored);
        if self.docs.insert(id.clone(), doc).is_some() {
            // v4 identities do not collide in practice
            return Err(PersistError::Storage(format!(
                "identity collision on insert: {id}"
            )));
        }
        debug!(%id, state = %record.state, collection = %self.schema.collection, "record inserted");
        Ok(id)
    }
}
