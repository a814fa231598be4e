//! Error types for statevault.
//!
//! The taxonomy has exactly one recoverable error: [`PersistError::StaleState`].
//! It is the expected outcome under contention, and callers retry the whole
//! transition decision against the refreshed state. Everything else signals a
//! programming, configuration, or data-integrity defect and is not retried.

use crate::record::RecordId;
use thiserror::Error;

/// All statevault errors.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The optimistic precondition failed: another writer already advanced
    /// (or reverted) the entity's state. Carries the caller's stale value and
    /// the authoritative current value so the caller can re-evaluate the
    /// transition from correct data.
    #[error("stale state: entity state {expected:?} does not match authoritative state {authoritative:?}")]
    StaleState {
        /// The state the caller believed was current
        expected: String,
        /// The authoritative current state
        authoritative: String,
    },

    /// A record that must exist does not: the conditional update failed and
    /// the follow-up fetch by identity found nothing. Data-integrity
    /// violation, not a concurrency race.
    #[error("state record vanished: id={id}")]
    RecordVanished {
        /// Identity of the missing record
        id: RecordId,
    },

    /// The entity's state record cannot be read or attached.
    #[error("accessor failure: {0}")]
    Accessor(String),

    /// The backing store failed (I/O, timeout, malformed document).
    #[error("storage failure: {0}")]
    Storage(String),

    /// Invalid construction (unknown start state, missing collaborator).
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for statevault operations.
pub type Result<T> = std::result::Result<T, PersistError>;

impl PersistError {
    /// Check if this error is retryable.
    ///
    /// Only stale-state failures may succeed on retry with fresh data.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PersistError::StaleState { .. })
    }

    /// Check if this is a stale-state failure.
    pub fn is_stale(&self) -> bool {
        matches!(self, PersistError::StaleState { .. })
    }

    /// Check if this error is fatal (propagated, never retried).
    pub fn is_fatal(&self) -> bool {
        !self.is_retryable()
    }
}
