//! Set-difference between the two replicas.
//!
//! The diff is an explicit keyed comparison: for every tracked type, the
//! handle sets of both stores are joined and each handle lands in exactly
//! one bucket — changed, missing from local, missing from remote, or
//! identical. Identical pairs are not carried in the diff but leave a trace:
//! the per-type maximum of their timestamps, which the baseline resolver
//! uses as witnesses.

use crate::error::{Replica, SyncError, SyncResult};
use lineage_store::{RecordStore, StoreResult};
use lineage_types::{ChangeTime, Handle, ObjectType, Record};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Key identifying one logical record across both replicas.
///
/// Ordered by (type, handle) so every iteration over the diff is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DiffKey {
    pub object_type: ObjectType,
    pub handle: Handle,
}

impl DiffKey {
    fn of(record: &Record) -> Self {
        Self {
            object_type: record.object_type,
            handle: record.handle.clone(),
        }
    }
}

/// A record present in both stores with diverged content.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangedPair {
    pub local: Record,
    pub remote: Record,
}

/// The full difference between the two replicas, computed fresh per run.
#[derive(Debug, Default)]
pub struct StoreDiff {
    changed: BTreeMap<DiffKey, ChangedPair>,
    missing_from_local: BTreeMap<DiffKey, Record>,
    missing_from_remote: BTreeMap<DiffKey, Record>,
    latest_identical: BTreeMap<ObjectType, ChangeTime>,
}

impl StoreDiff {
    /// Compares the two stores over every tracked type.
    ///
    /// Purely computational: no store is mutated and no I/O beyond the
    /// accessor reads occurs. Any accessor failure aborts with
    /// [`SyncError::StoreRead`] — reconciliation cannot proceed without two
    /// fully loaded stores.
    pub fn compute(local: &impl RecordStore, remote: &impl RecordStore) -> SyncResult<Self> {
        let mut diff = StoreDiff::default();

        for object_type in ObjectType::ALL {
            let local_handles = read(Replica::Local, local.list_handles(object_type))?;
            let local_handles: BTreeSet<Handle> = local_handles.into_iter().collect();
            let remote_handles = read(Replica::Remote, remote.list_handles(object_type))?;
            let remote_handles: BTreeSet<Handle> = remote_handles.into_iter().collect();

            for handle in local_handles.union(&remote_handles) {
                let on_local = local_handles.contains(handle);
                let on_remote = remote_handles.contains(handle);
                match (on_local, on_remote) {
                    (true, true) => {
                        let l = read(Replica::Local, local.get(object_type, handle))?;
                        let r = read(Replica::Remote, remote.get(object_type, handle))?;
                        if l == r {
                            diff.record_witness(object_type, l.changed_at);
                        } else {
                            diff.changed
                                .insert(DiffKey::of(&l), ChangedPair { local: l, remote: r });
                        }
                    }
                    (true, false) => {
                        let l = read(Replica::Local, local.get(object_type, handle))?;
                        diff.missing_from_remote.insert(DiffKey::of(&l), l);
                    }
                    (false, true) => {
                        let r = read(Replica::Remote, remote.get(object_type, handle))?;
                        diff.missing_from_local.insert(DiffKey::of(&r), r);
                    }
                    (false, false) => unreachable!("handle came from the union"),
                }
            }
        }

        debug!(
            changed = diff.changed.len(),
            missing_from_local = diff.missing_from_local.len(),
            missing_from_remote = diff.missing_from_remote.len(),
            "computed store diff"
        );
        Ok(diff)
    }

    fn record_witness(&mut self, object_type: ObjectType, changed_at: ChangeTime) {
        let entry = self
            .latest_identical
            .entry(object_type)
            .or_insert(changed_at);
        *entry = (*entry).max(changed_at);
    }

    /// Records present in both stores with differing content.
    pub fn changed(&self) -> impl Iterator<Item = (&DiffKey, &ChangedPair)> {
        self.changed.iter()
    }

    /// Records present only in the remote store.
    pub fn missing_from_local(&self) -> impl Iterator<Item = (&DiffKey, &Record)> {
        self.missing_from_local.iter()
    }

    /// Records present only in the local store.
    pub fn missing_from_remote(&self) -> impl Iterator<Item = (&DiffKey, &Record)> {
        self.missing_from_remote.iter()
    }

    /// Whether the two stores are identical.
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
            && self.missing_from_local.is_empty()
            && self.missing_from_remote.is_empty()
    }

    /// Total number of differing records.
    pub fn len(&self) -> usize {
        self.changed.len() + self.missing_from_local.len() + self.missing_from_remote.len()
    }

    /// The latest timestamp among identical pairs of the given type.
    pub fn latest_identical(&self, object_type: ObjectType) -> Option<ChangeTime> {
        self.latest_identical.get(&object_type).copied()
    }

    /// The heuristic-baseline candidate: the maximum witness timestamp
    /// across all types, or `None` when no identical pair survives.
    pub fn witness_baseline(&self) -> Option<ChangeTime> {
        self.latest_identical.values().max().copied()
    }
}

fn read<T>(replica: Replica, result: StoreResult<T>) -> SyncResult<T> {
    result.map_err(|source| SyncError::read(replica, source))
}
