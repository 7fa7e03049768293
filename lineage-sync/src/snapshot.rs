//! The remote-snapshot acquisition boundary.
//!
//! Fetching the remote replica — download, decompress, parse — belongs to a
//! transport collaborator behind [`SnapshotSource`]. The engine only sees
//! the already-materialized store the source hands back.

use crate::error::SyncResult;
use async_trait::async_trait;
use lineage_store::RecordStore;

/// Produces a materialized snapshot of the remote replica.
///
/// Implementations own connection handling, authentication, and parsing,
/// and surface their failures as [`SyncError::Transport`],
/// [`SyncError::Authorization`] or [`SyncError::MalformedResponse`].
/// Retrying transient failures is the source's business; the engine never
/// retries.
///
/// [`SyncError::Transport`]: crate::SyncError::Transport
/// [`SyncError::Authorization`]: crate::SyncError::Authorization
/// [`SyncError::MalformedResponse`]: crate::SyncError::MalformedResponse
#[async_trait]
pub trait SnapshotSource {
    /// The store type the snapshot materializes into.
    type Store: RecordStore;

    /// Fetches and materializes the remote replica.
    async fn fetch(&mut self) -> SyncResult<Self::Store>;
}

/// Mock sources for testing the orchestration flow.
pub mod mock {
    use super::*;
    use crate::error::SyncError;
    use lineage_store::MemoryStore;

    /// A source that hands out clones of a fixed in-memory store.
    #[derive(Debug)]
    pub struct StaticSource {
        store: MemoryStore,
    }

    impl StaticSource {
        /// Creates a source serving the given store.
        #[must_use]
        pub fn new(store: MemoryStore) -> Self {
            Self { store }
        }
    }

    #[async_trait]
    impl SnapshotSource for StaticSource {
        type Store = MemoryStore;

        async fn fetch(&mut self) -> SyncResult<MemoryStore> {
            Ok(self.store.clone())
        }
    }

    /// A source that always fails with the configured error.
    #[derive(Debug)]
    pub struct FailingSource {
        error: fn() -> SyncError,
    }

    impl FailingSource {
        /// Creates a source failing with the given error constructor.
        #[must_use]
        pub fn new(error: fn() -> SyncError) -> Self {
            Self { error }
        }
    }

    #[async_trait]
    impl SnapshotSource for FailingSource {
        type Store = MemoryStore;

        async fn fetch(&mut self) -> SyncResult<MemoryStore> {
            Err((self.error)())
        }
    }
}
