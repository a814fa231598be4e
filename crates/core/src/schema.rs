//! Document mapping for state records.
//!
//! [`RecordSchema`] names the collection and fields a store adapter uses to
//! persist a [`StateRecord`]. The mapping is explicit configuration resolved
//! once per entity type at setup time; nothing is discovered at runtime.

use crate::error::{PersistError, Result};
use crate::record::{RecordId, StateRecord};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// A record as stored: a flat JSON document keyed by schema field names.
pub type Document = serde_json::Map<String, Value>;

/// Field and collection names for one entity type's state records.
///
/// Defaults follow the canonical persisted shape:
/// `{ _id, state, prevState, updated }` in collection `managedState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    /// Collection (or table) holding the records
    pub collection: String,
    /// Field holding the durable identity
    pub id_field: String,
    /// Field holding the current state
    pub state_field: String,
    /// Field holding the previous state
    pub prev_state_field: String,
    /// Field holding the last-update timestamp
    pub updated_field: String,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self {
            collection: "managedState".to_string(),
            id_field: "_id".to_string(),
            state_field: "state".to_string(),
            prev_state_field: "prevState".to_string(),
            updated_field: "updated".to_string(),
        }
    }
}

impl RecordSchema {
    /// Default field names in a non-default collection.
    pub fn for_collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..Self::default()
        }
    }

    /// Override the identity field name.
    pub fn id_field(mut self, name: impl Into<String>) -> Self {
        self.id_field = name.into();
        self
    }

    /// Override the current-state field name.
    pub fn state_field(mut self, name: impl Into<String>) -> Self {
        self.state_field = name.into();
        self
    }

    /// Override the previous-state field name.
    pub fn prev_state_field(mut self, name: impl Into<String>) -> Self {
        self.prev_state_field = name.into();
        self
    }

    /// Override the timestamp field name.
    pub fn updated_field(mut self, name: impl Into<String>) -> Self {
        self.updated_field = name.into();
        self
    }

    /// Render a record as a stored document.
    ///
    /// The identity field is written only when the record has one.
    pub fn to_document(&self, record: &StateRecord) -> Document {
        let mut doc = Document::new();
        if let Some(id) = &record.id {
            doc.insert(self.id_field.clone(), Value::String(id.to_string()));
        }
        doc.insert(
            self.state_field.clone(),
            Value::String(record.state.clone()),
        );
        doc.insert(
            self.prev_state_field.clone(),
            Value::String(record.prev_state.clone()),
        );
        doc.insert(
            self.updated_field.clone(),
            Value::String(record.updated.to_rfc3339()),
        );
        doc
    }

    /// Reconstruct a record from a stored document.
    ///
    /// Stored documents always carry an identity and a state; a document
    /// missing either is a storage defect. The previous state is optional
    /// (records that have never transitioned have none).
    pub fn from_document(&self, doc: &Document) -> Result<StateRecord> {
        let id = self
            .required_str(doc, &self.id_field)?
            .parse::<RecordId>()
            .map_err(|e| {
                PersistError::Storage(format!(
                    "malformed document: bad {} value: {e}",
                    self.id_field
                ))
            })?;
        let state = self.required_str(doc, &self.state_field)?.to_string();
        let prev_state = doc
            .get(&self.prev_state_field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let updated = self.parse_updated(doc)?;
        Ok(StateRecord {
            id: Some(id),
            state,
            prev_state,
            updated,
        })
    }

    fn required_str<'d>(&self, doc: &'d Document, field: &str) -> Result<&'d str> {
        doc.get(field).and_then(Value::as_str).ok_or_else(|| {
            PersistError::Storage(format!("malformed document: missing {field}"))
        })
    }

    fn parse_updated(&self, doc: &Document) -> Result<DateTime<Utc>> {
        let raw = self.required_str(doc, &self.updated_field)?;
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| {
                PersistError::Storage(format!(
                    "malformed document: bad {} value: {e}",
                    self.updated_field
                ))
            })
    }
}
