//! Builder for [`Persister`] configuration.

use crate::{HasRecordSlot, Persister, SlotAccessor};
use statevault_core::{PersistError, Result, StateAccessor, StateSet, StateStore};
use std::sync::Arc;

/// Builder assembling a [`Persister`] from its collaborators.
///
/// # Example
///
/// ```ignore
/// let persister: Persister<Order> = PersisterBuilder::new()
///     .states(["NEW", "PENDING", "ACTIVE"])
///     .start("NEW")
///     .slot_accessor()
///     .store(Arc::new(MemoryStore::new()))
///     .build()?;
/// ```
pub struct PersisterBuilder<T: ?Sized> {
    accessor: Option<Arc<dyn StateAccessor<T>>>,
    store: Option<Arc<dyn StateStore>>,
    states: Vec<String>,
    start: Option<String>,
}

impl<T: ?Sized> PersisterBuilder<T> {
    /// Create a builder with nothing configured.
    pub fn new() -> Self {
        Self {
            accessor: None,
            store: None,
            states: Vec::new(),
            start: None,
        }
    }

    /// Declare the machine's states.
    pub fn states<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declare one additional state.
    pub fn state(mut self, name: impl Into<String>) -> Self {
        self.states.push(name.into());
        self
    }

    /// Declare the start state. Must be one of the declared states.
    pub fn start(mut self, name: impl Into<String>) -> Self {
        self.start = Some(name.into());
        self
    }

    /// Use a custom field accessor.
    pub fn accessor(mut self, accessor: impl StateAccessor<T> + 'static) -> Self {
        self.accessor = Some(Arc::new(accessor));
        self
    }

    /// Use the record-slot accessor for entities embedding a
    /// [`crate::RecordSlot`].
    pub fn slot_accessor(self) -> Self
    where
        T: HasRecordSlot,
    {
        self.accessor(SlotAccessor::new())
    }

    /// Use the given store adapter.
    pub fn store<S: StateStore + 'static>(mut self, store: Arc<S>) -> Self {
        self.store = Some(store as Arc<dyn StateStore>);
        self
    }

    /// Assemble the persister.
    ///
    /// Fails with [`PersistError::Config`] when a collaborator is missing,
    /// no states are declared, or the start state is unknown.
    pub fn build(self) -> Result<Persister<T>> {
        let accessor = self
            .accessor
            .ok_or_else(|| PersistError::Config("no accessor configured".to_string()))?;
        let store = self
            .store
            .ok_or_else(|| PersistError::Config("no store configured".to_string()))?;
        let start = self
            .start
            .ok_or_else(|| PersistError::Config("no start state declared".to_string()))?;
        let states = StateSet::new(self.states, start)?;
        Ok(Persister::new(accessor, store, states))
    }
}

impl<T: ?Sized> Default for PersisterBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
