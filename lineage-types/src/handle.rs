//! Opaque record handles.
//!
//! Handles are string-backed because replica exports carry pre-existing
//! opaque identifiers; the only structure reconciliation relies on is
//! equality and a stable ordering.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier for one logical record, shared across replicas.
///
/// Within one store a handle identifies a record of exactly one type. A
/// handle present in both stores denotes the *same* logical entity; identity
/// is by handle, not by content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Wraps an existing handle string from a replica export.
    #[must_use]
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Generates a fresh handle for a newly created record.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Handle {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Handle {
    fn from(s: String) -> Self {
        Self(s)
    }
}
