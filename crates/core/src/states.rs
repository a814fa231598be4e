//! Declared state set for a managed entity type.
//!
//! The state set is supplied once at Persister construction and is used only
//! to initialize new state records to the machine's start state; the
//! transition-selection logic that decides which state comes next lives
//! outside this crate.

use crate::error::{PersistError, Result};

/// Declared state names and the start state of one entity type's machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSet {
    names: Vec<String>,
    start: String,
}

impl StateSet {
    /// Build a state set from the declared names and the start state.
    ///
    /// Fails when no states are declared or when the start state is not one
    /// of them.
    pub fn new<I, S>(names: I, start: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(PersistError::Config("no states declared".to_string()));
        }
        let start = start.into();
        if !names.iter().any(|n| *n == start) {
            return Err(PersistError::Config(format!(
                "start state {start:?} is not a declared state"
            )));
        }
        Ok(Self { names, start })
    }

    /// The machine's start state.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Whether `name` is a declared state.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// The declared state names, in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of declared states.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the set is empty (never true for a constructed set).
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
