//! State record types
//!
//! These types define the persisted state history of a managed entity:
//! which state it occupies, which state it left, and when it last moved.

use chrono::{DateTime, Duration, Utc};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Opaque durable identity of a state record.
///
/// Assigned by the store on first insert. A record with no `RecordId` has
/// never been persisted and exists only in process memory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generate a fresh identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Persisted state history of one managed entity.
///
/// Each record has:
/// - An identity, present iff the record has been committed to the store
/// - The current state name
/// - The previous state name (empty until the first transition)
/// - A timestamp of the last update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    /// Durable identity, `None` until first inserted into the store
    pub id: Option<RecordId>,
    /// Current state name
    pub state: String,
    /// Previous state name (empty before the first transition)
    pub prev_state: String,
    /// Last update timestamp
    pub updated: DateTime<Utc>,
}

impl StateRecord {
    /// Create a new, not-yet-durable record in the given start state.
    pub fn new(start_state: impl Into<String>) -> Self {
        Self {
            id: None,
            state: start_state.into(),
            prev_state: String::new(),
            updated: Utc::now(),
        }
    }

    /// Whether the record has been assigned a durable identity.
    pub fn is_durable(&self) -> bool {
        self.id.is_some()
    }
}

/// Next update timestamp for a record last touched at `after`.
///
/// Update times must strictly increase per record even when the OS clock
/// does not advance between two transitions.
pub fn next_timestamp(after: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > after {
        now
    } else {
        after + Duration::nanoseconds(1)
    }
}

/// Shared handle to a [`StateRecord`].
///
/// The entity owns exactly one cell for its lifetime; every reader and
/// writer of the record goes through it. The cell's write lock doubles as
/// the per-entity exclusive lock for the in-memory commit path: it is held
/// only around the compare-and-set and released on every exit path by
/// guard drop.
#[derive(Debug, Clone)]
pub struct RecordCell(Arc<RwLock<StateRecord>>);

impl RecordCell {
    /// Wrap a record in a shared cell.
    pub fn new(record: StateRecord) -> Self {
        Self(Arc::new(RwLock::new(record)))
    }

    /// Acquire shared read access to the record.
    pub fn read(&self) -> RwLockReadGuard<'_, StateRecord> {
        self.0.read()
    }

    /// Acquire exclusive write access to the record.
    pub fn write(&self) -> RwLockWriteGuard<'_, StateRecord> {
        self.0.write()
    }

    /// Clone the record out of the cell.
    pub fn snapshot(&self) -> StateRecord {
        self.0.read().clone()
    }

    /// Whether two handles refer to the same underlying record.
    pub fn ptr_eq(&self, other: &RecordCell) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
