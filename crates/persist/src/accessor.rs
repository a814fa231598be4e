//! Record-slot accessor.
//!
//! The provided implementation of the field-accessor seam: instead of
//! discovering a state field by reflection, a managed entity embeds a
//! [`RecordSlot`] and exposes it through [`HasRecordSlot`]. The slot is
//! set-once, which gives the accessor its stability guarantee for free:
//! the same entity instance always yields the same cell.

use once_cell::sync::OnceCell;
use statevault_core::{RecordCell, Result, StateAccessor, StateRecord};
use tracing::debug;

/// Set-once container for an entity's state record.
///
/// Embed one per managed entity:
///
/// ```ignore
/// struct Order {
///     state: RecordSlot,
///     // ... domain fields ...
/// }
///
/// impl HasRecordSlot for Order {
///     fn record_slot(&self) -> &RecordSlot {
///         &self.state
///     }
/// }
/// ```
#[derive(Debug, Default)]
pub struct RecordSlot {
    cell: OnceCell<RecordCell>,
}

impl RecordSlot {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// The attached cell, if any.
    pub fn get(&self) -> Option<RecordCell> {
        self.cell.get().cloned()
    }

    /// The attached cell, attaching `init` first if the slot is empty.
    ///
    /// Under concurrent calls exactly one record wins; every caller gets
    /// the winning cell.
    pub fn get_or_attach(&self, init: StateRecord) -> RecordCell {
        self.cell
            .get_or_init(|| {
                debug!(state = %init.state, "state record attached");
                RecordCell::new(init)
            })
            .clone()
    }

    /// Whether a record has been attached.
    pub fn is_attached(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Exposes the record slot a managed entity embeds.
pub trait HasRecordSlot {
    /// The entity's record slot.
    fn record_slot(&self) -> &RecordSlot;
}

/// Accessor for entities that embed a [`RecordSlot`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotAccessor;

impl SlotAccessor {
    /// Create the accessor.
    pub const fn new() -> Self {
        Self
    }
}

impl<T: HasRecordSlot + ?Sized> StateAccessor<T> for SlotAccessor {
    fn state_record(&self, entity: &T) -> Option<RecordCell> {
        entity.record_slot().get()
    }

    fn get_or_attach(&self, entity: &T, init: StateRecord) -> Result<RecordCell> {
        Ok(entity.record_slot().get_or_attach(init))
    }
}
