//! The record type reconciled between replicas.

use crate::{ChangeTime, Handle, ObjectType};
use serde::{Deserialize, Serialize};

/// One genealogical entity as held by a replica.
///
/// The core treats `payload` as opaque: all type-specific fields live in it
/// as JSON and are compared by structural equality only. Two records are
/// "identical" for reconciliation purposes when every field of this struct
/// compares equal, `changed_at` included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Which tracked type this record belongs to.
    pub object_type: ObjectType,

    /// Stable identifier, shared across replicas.
    pub handle: Handle,

    /// Human-facing identifier (e.g. "I0042"). May legitimately differ
    /// between replicas and may be absent on merged records.
    pub display_id: Option<String>,

    /// Last-modified timestamp, stamped by the hosting application on every
    /// editing write. Reconciliation copies it verbatim.
    pub changed_at: ChangeTime,

    /// All remaining type-specific fields, compared structurally.
    pub payload: serde_json::Value,
}

impl Record {
    /// Creates a record with an empty payload.
    #[must_use]
    pub fn new(object_type: ObjectType, handle: Handle) -> Self {
        Self {
            object_type,
            handle,
            display_id: None,
            changed_at: ChangeTime::ZERO,
            payload: serde_json::Value::Null,
        }
    }

    /// Sets the display id.
    #[must_use]
    pub fn with_display_id(mut self, display_id: impl Into<String>) -> Self {
        self.display_id = Some(display_id.into());
        self
    }

    /// Sets the last-modified timestamp.
    #[must_use]
    pub fn with_changed_at(mut self, changed_at: impl Into<ChangeTime>) -> Self {
        self.changed_at = changed_at.into();
        self
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Extracts a string from `payload` using a JSON pointer (e.g. "/surname").
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.payload.pointer(pointer).and_then(|v| v.as_str())
    }

    /// Extracts a boolean from `payload` using a JSON pointer.
    pub fn get_bool(&self, pointer: &str) -> Option<bool> {
        self.payload.pointer(pointer).and_then(|v| v.as_bool())
    }

    /// Extracts a number from `payload` using a JSON pointer.
    pub fn get_number(&self, pointer: &str) -> Option<f64> {
        self.payload.pointer(pointer).and_then(|v| v.as_f64())
    }
}
