//! Error types for the store boundary.

use lineage_types::{Handle, ObjectType};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
///
/// The refusal variants (`Unauthorized`, `PermissionDenied`, `Rejected`,
/// `Malformed`) exist for remote-backed implementations whose transaction
/// commit round-trips through a server; an in-memory or embedded store never
/// produces them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this handle exists in the store.
    #[error("no {object_type} record with handle {handle}")]
    NotFound {
        object_type: ObjectType,
        handle: Handle,
    },

    /// A record with this handle already exists in the store.
    #[error("{object_type} record with handle {handle} already exists")]
    Duplicate {
        object_type: ObjectType,
        handle: Handle,
    },

    /// A write accessor was called outside an open transaction.
    #[error("no transaction is open")]
    NoTransaction,

    /// `begin` was called while a transaction was already open.
    #[error("a transaction is already open")]
    TransactionOpen,

    /// The backing service rejected the caller's credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The backing service refused the operation for this user.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The backing service refused the write, e.g. because its state moved
    /// on since the snapshot was taken.
    #[error("write rejected: {0}")]
    Rejected(String),

    /// The backing service returned data that could not be parsed.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}
