//! In-memory reference store.

use crate::{RecordStore, StoreError, StoreResult};
use lineage_types::{Handle, ObjectType, Record};
use std::collections::{BTreeMap, HashMap};

type Records = HashMap<ObjectType, BTreeMap<Handle, Record>>;

/// A keyed in-memory record store.
///
/// Used as the materialization target for downloaded replica exports and as
/// the test double for the local database. Transactions snapshot the whole
/// record map on `begin`; rollback restores the snapshot. That trades memory
/// for simplicity, which is the right trade for a store whose lifetime is a
/// single reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Records,
    snapshot: Option<Records>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given records.
    ///
    /// Panics on duplicate handles within a type — a replica export with
    /// duplicate handles is corrupt and must not reach reconciliation.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut store = Self::new();
        for record in records {
            let prev = store
                .records
                .entry(record.object_type)
                .or_default()
                .insert(record.handle.clone(), record);
            assert!(prev.is_none(), "duplicate handle in seed records");
        }
        store
    }

    /// Total number of records across all types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.values().map(BTreeMap::len).sum()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records, ordered by (type, handle). Handy for whole-store
    /// comparisons in tests and for export.
    #[must_use]
    pub fn all_records(&self) -> Vec<Record> {
        let mut out = Vec::with_capacity(self.len());
        for object_type in ObjectType::ALL {
            if let Some(by_handle) = self.records.get(&object_type) {
                out.extend(by_handle.values().cloned());
            }
        }
        out
    }

    fn of_type(&self, object_type: ObjectType) -> Option<&BTreeMap<Handle, Record>> {
        self.records.get(&object_type)
    }

    fn in_txn(&self) -> StoreResult<()> {
        if self.snapshot.is_none() {
            return Err(StoreError::NoTransaction);
        }
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn list_handles(&self, object_type: ObjectType) -> StoreResult<Vec<Handle>> {
        Ok(self
            .of_type(object_type)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn get(&self, object_type: ObjectType, handle: &Handle) -> StoreResult<Record> {
        self.of_type(object_type)
            .and_then(|m| m.get(handle))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                object_type,
                handle: handle.clone(),
            })
    }

    fn begin(&mut self) -> StoreResult<()> {
        if self.snapshot.is_some() {
            return Err(StoreError::TransactionOpen);
        }
        self.snapshot = Some(self.records.clone());
        Ok(())
    }

    fn add(&mut self, record: Record) -> StoreResult<()> {
        self.in_txn()?;
        let by_handle = self.records.entry(record.object_type).or_default();
        if by_handle.contains_key(&record.handle) {
            return Err(StoreError::Duplicate {
                object_type: record.object_type,
                handle: record.handle,
            });
        }
        by_handle.insert(record.handle.clone(), record);
        Ok(())
    }

    fn update(&mut self, record: Record) -> StoreResult<()> {
        self.in_txn()?;
        let slot = self
            .records
            .get_mut(&record.object_type)
            .and_then(|m| m.get_mut(&record.handle));
        match slot {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                object_type: record.object_type,
                handle: record.handle,
            }),
        }
    }

    fn remove(&mut self, object_type: ObjectType, handle: &Handle) -> StoreResult<()> {
        self.in_txn()?;
        let removed = self
            .records
            .get_mut(&object_type)
            .and_then(|m| m.remove(handle));
        match removed {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound {
                object_type,
                handle: handle.clone(),
            }),
        }
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.in_txn()?;
        self.snapshot = None;
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        let snapshot = self.snapshot.take().ok_or(StoreError::NoTransaction)?;
        self.records = snapshot;
        Ok(())
    }
}
