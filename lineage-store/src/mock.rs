//! Fault-injecting store wrapper for testing failure paths.

use crate::{MemoryStore, RecordStore, StoreError, StoreResult};
use lineage_types::{Handle, ObjectType, Record};

/// Wraps a [`MemoryStore`] and injects failures at configurable points.
///
/// Used to exercise the engine's rollback and error-mapping paths:
/// read failures during diffing, a write failure on the N-th action of a
/// batch, and a refused transaction commit (as a remote API would produce).
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_reads: bool,
    writes_before_failure: Option<usize>,
    commit_error: Option<fn() -> StoreError>,
    writes_seen: usize,
}

impl FlakyStore {
    /// Wraps an existing store.
    #[must_use]
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Makes every read accessor fail.
    #[must_use]
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Makes the (n+1)-th write accessor call fail; earlier writes succeed.
    #[must_use]
    pub fn failing_after_writes(mut self, n: usize) -> Self {
        self.writes_before_failure = Some(n);
        self
    }

    /// Makes `commit` fail with the given error constructor.
    #[must_use]
    pub fn refusing_commit(mut self, error: fn() -> StoreError) -> Self {
        self.commit_error = Some(error);
        self
    }

    /// The wrapped store, for post-failure inspection.
    #[must_use]
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check_read(&self) -> StoreResult<()> {
        if self.fail_reads {
            return Err(StoreError::Backend("injected read failure".into()));
        }
        Ok(())
    }

    fn check_write(&mut self) -> StoreResult<()> {
        if let Some(limit) = self.writes_before_failure {
            if self.writes_seen >= limit {
                return Err(StoreError::Backend("injected write failure".into()));
            }
            self.writes_seen += 1;
        }
        Ok(())
    }
}

impl RecordStore for FlakyStore {
    fn list_handles(&self, object_type: ObjectType) -> StoreResult<Vec<Handle>> {
        self.check_read()?;
        self.inner.list_handles(object_type)
    }

    fn get(&self, object_type: ObjectType, handle: &Handle) -> StoreResult<Record> {
        self.check_read()?;
        self.inner.get(object_type, handle)
    }

    fn begin(&mut self) -> StoreResult<()> {
        self.inner.begin()
    }

    fn add(&mut self, record: Record) -> StoreResult<()> {
        self.check_write()?;
        self.inner.add(record)
    }

    fn update(&mut self, record: Record) -> StoreResult<()> {
        self.check_write()?;
        self.inner.update(record)
    }

    fn remove(&mut self, object_type: ObjectType, handle: &Handle) -> StoreResult<()> {
        self.check_write()?;
        self.inner.remove(object_type, handle)
    }

    fn commit(&mut self) -> StoreResult<()> {
        if let Some(error) = self.commit_error {
            // Leave the transaction open; the engine decides whether to roll
            // back, mirroring a refused server-side commit.
            return Err(error());
        }
        self.inner.commit()
    }

    fn rollback(&mut self) -> StoreResult<()> {
        self.inner.rollback()
    }
}
