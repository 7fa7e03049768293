//! The store accessor trait.

use crate::StoreResult;
use lineage_types::{Handle, ObjectType, Record};

/// Accessor interface required of both replicas.
///
/// Read accessors (`list_handles`, `get`) are valid at any time. Write
/// accessors (`add`, `update`, `remove`) are only valid between [`begin`]
/// and [`commit`]/[`rollback`] and must fail with
/// [`StoreError::NoTransaction`](crate::StoreError::NoTransaction) otherwise;
/// a rolled-back transaction must leave the store exactly as it was at
/// `begin`.
///
/// Records are stored verbatim. In particular `changed_at` is persisted as
/// given — the reconciliation engine relies on replicas holding
/// byte-identical records after a sync.
///
/// [`begin`]: RecordStore::begin
/// [`commit`]: RecordStore::commit
/// [`rollback`]: RecordStore::rollback
pub trait RecordStore {
    /// Lists the handles of every record of the given type.
    fn list_handles(&self, object_type: ObjectType) -> StoreResult<Vec<Handle>>;

    /// Fetches the record with the given handle.
    ///
    /// Fails with `NotFound` if no such record exists.
    fn get(&self, object_type: ObjectType, handle: &Handle) -> StoreResult<Record>;

    /// Opens a transaction. At most one transaction is open at a time.
    fn begin(&mut self) -> StoreResult<()>;

    /// Inserts a new record. Fails with `Duplicate` if the handle is taken.
    fn add(&mut self, record: Record) -> StoreResult<()>;

    /// Overwrites the record with the same type and handle.
    ///
    /// Fails with `NotFound` if no such record exists.
    fn update(&mut self, record: Record) -> StoreResult<()>;

    /// Removes the record with the given handle.
    ///
    /// Fails with `NotFound` if no such record exists.
    fn remove(&mut self, object_type: ObjectType, handle: &Handle) -> StoreResult<()>;

    /// Commits the open transaction, making its writes durable.
    fn commit(&mut self) -> StoreResult<()>;

    /// Rolls the open transaction back, discarding its writes.
    fn rollback(&mut self) -> StoreResult<()>;
}
