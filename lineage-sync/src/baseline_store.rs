//! Persistent storage for the synchronization baseline.
//!
//! Uses a small standalone SQLite file so baseline data is isolated from
//! the replica databases. One row per remote URL: switching remotes starts
//! from a fresh (heuristic) baseline instead of inheriting a timestamp that
//! belongs to a different server.

use crate::error::SyncError;
use chrono::Utc;
use lineage_types::ChangeTime;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// Persistent store for per-remote sync baselines backed by SQLite.
pub struct BaselineStore {
    conn: Arc<Mutex<Connection>>,
}

impl BaselineStore {
    /// Opens (or creates) a baseline store at the given path.
    pub fn new(path: &str) -> Result<Self, SyncError> {
        let conn = Connection::open(path)
            .map_err(|e| SyncError::BaselineStore(format!("failed to open baseline store: {e}")))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Opens an in-memory baseline store (for testing).
    pub fn open_in_memory() -> Result<Self, SyncError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            SyncError::BaselineStore(format!("failed to open in-memory baseline store: {e}"))
        })?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), SyncError> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS baselines (
                remote_url TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                synced_at INTEGER NOT NULL,
                saved_at TEXT NOT NULL
            );
            ",
        )
        .map_err(|e| SyncError::BaselineStore(format!("failed to init baseline schema: {e}")))?;
        Ok(())
    }

    /// Loads the baseline recorded for a remote, or `None` if this remote
    /// has never completed a sync.
    pub fn load(&self, remote_url: &str) -> Result<Option<ChangeTime>, SyncError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT synced_at FROM baselines WHERE remote_url = ?1",
            params![remote_url],
            |row| row.get::<_, i64>(0),
        )
        .optional()
        .map(|opt| opt.map(ChangeTime::from_seconds))
        .map_err(|e| SyncError::BaselineStore(format!("failed to load baseline: {e}")))
    }

    /// Records the baseline for a remote after a successful run,
    /// overwriting any previous value.
    pub fn save(
        &self,
        remote_url: &str,
        username: &str,
        baseline: ChangeTime,
    ) -> Result<(), SyncError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO baselines (remote_url, username, synced_at, saved_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(remote_url) DO UPDATE SET
                 username = excluded.username,
                 synced_at = excluded.synced_at,
                 saved_at = excluded.saved_at",
            params![
                remote_url,
                username,
                baseline.seconds(),
                Utc::now().to_rfc3339()
            ],
        )
        .map_err(|e| SyncError::BaselineStore(format!("failed to save baseline: {e}")))?;
        Ok(())
    }

    /// Forgets the baseline for a remote.
    pub fn clear(&self, remote_url: &str) -> Result<(), SyncError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM baselines WHERE remote_url = ?1",
            params![remote_url],
        )
        .map_err(|e| SyncError::BaselineStore(format!("failed to clear baseline: {e}")))?;
        Ok(())
    }
}
