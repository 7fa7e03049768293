//! The closed set of tracked genealogical record types.
//!
//! Reconciliation iterates this set exhaustively; there is no dynamic type
//! registration. Store accessors are selected by matching on the variant,
//! so an unsupported type is unrepresentable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the fixed genealogical record types tracked by reconciliation.
///
/// The variant order is the canonical iteration order used by the diff
/// engine and for deterministic action ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ObjectType {
    Family,
    Person,
    Citation,
    Event,
    Media,
    Note,
    Place,
    Repository,
    Source,
    Tag,
}

impl ObjectType {
    /// All tracked types, in canonical order.
    pub const ALL: [ObjectType; 10] = [
        ObjectType::Family,
        ObjectType::Person,
        ObjectType::Citation,
        ObjectType::Event,
        ObjectType::Media,
        ObjectType::Note,
        ObjectType::Place,
        ObjectType::Repository,
        ObjectType::Source,
        ObjectType::Tag,
    ];

    /// The type's canonical name as used in replica exports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Family => "Family",
            ObjectType::Person => "Person",
            ObjectType::Citation => "Citation",
            ObjectType::Event => "Event",
            ObjectType::Media => "Media",
            ObjectType::Note => "Note",
            ObjectType::Place => "Place",
            ObjectType::Repository => "Repository",
            ObjectType::Source => "Source",
            ObjectType::Tag => "Tag",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown object-type name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown object type: {0}")]
pub struct ParseObjectTypeError(pub String);

impl FromStr for ObjectType {
    type Err = ParseObjectTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseObjectTypeError(s.to_string()))
    }
}
