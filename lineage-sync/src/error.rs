//! Error types for the reconciliation engine.

use lineage_store::StoreError;
use std::fmt;
use thiserror::Error;

/// Result type for reconciliation operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Which replica an error occurred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replica {
    Local,
    Remote,
}

impl fmt::Display for Replica {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replica::Local => f.write_str("local"),
            Replica::Remote => f.write_str("remote"),
        }
    }
}

/// Errors that can occur during a reconciliation run.
///
/// A `StoreRead` aborts the run before anything is written. Every other
/// store-level failure surfaces after both transactions have been rolled
/// back, so "nothing was changed" holds whenever an error is returned —
/// with the single documented exception of a local commit failing after the
/// remote commit succeeded.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A store accessor failed while building a snapshot.
    #[error("failed to read the {replica} store: {source}")]
    StoreRead {
        replica: Replica,
        source: StoreError,
    },

    /// A write failed mid-batch; both transactions were rolled back.
    #[error("failed to write to the {replica} store, nothing was changed: {source}")]
    StoreWrite {
        replica: Replica,
        source: StoreError,
    },

    /// The remote side rejected the caller's credentials.
    #[error("server authorization error: {0}")]
    Authorization(String),

    /// The remote side refused the operation for this user.
    #[error("server authorization error: insufficient permissions: {0}")]
    Permission(String),

    /// The remote side refused the write because its objects have been
    /// modified since the snapshot was taken.
    #[error("unable to synchronize changes to server, objects have been modified: {0}")]
    ConflictRejected(String),

    /// The transport returned data that could not be parsed.
    #[error("error while parsing response from server: {0}")]
    MalformedResponse(String),

    /// Connection-level failure while fetching the remote snapshot.
    #[error("error connecting to server: {0}")]
    Transport(String),

    /// The baseline persistence collaborator failed.
    #[error("baseline store error: {0}")]
    BaselineStore(String),
}

impl SyncError {
    /// Wraps a snapshot-phase store failure.
    pub(crate) fn read(replica: Replica, source: StoreError) -> Self {
        SyncError::StoreRead { replica, source }
    }

    /// Wraps a commit-phase store failure, promoting remote refusals to
    /// their transport-level variants.
    pub(crate) fn write(replica: Replica, source: StoreError) -> Self {
        match source {
            StoreError::Unauthorized(msg) => SyncError::Authorization(msg),
            StoreError::PermissionDenied(msg) => SyncError::Permission(msg),
            StoreError::Rejected(msg) => SyncError::ConflictRejected(msg),
            StoreError::Malformed(msg) => SyncError::MalformedResponse(msg),
            source => SyncError::StoreWrite { replica, source },
        }
    }
}
