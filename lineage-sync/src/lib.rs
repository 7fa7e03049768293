//! Two-replica reconciliation engine for Lineage.
//!
//! Reconciles a local and a remote replica of the same genealogical record
//! set after both have been edited offline.
//!
//! # Architecture
//!
//! The run is a pipeline of pure stages followed by a single writer:
//!
//! - **Diff** ([`StoreDiff`]): per-type keyed comparison of the two stores —
//!   changed pairs, one-sided records, and identical-pair witnesses
//! - **Baseline** ([`Baseline`]): the timestamp separating "modified since
//!   the replicas matched" from "existed at the last sync"; persisted value
//!   preferred, witness heuristic as fallback
//! - **Classify** ([`classify`]): every difference becomes exactly one
//!   [`Action`] — propagate, delete, or merge as a conflict
//! - **Commit** ([`SyncSession::commit`]): applies the whole action list
//!   inside a transaction pair; all-or-nothing, conflicts resolved by the
//!   deterministic remote-wins field merge
//!
//! Transport, serialization, and UI stay outside: the remote store arrives
//! already materialized (see [`SnapshotSource`]), action lists and
//! [`SyncSummary`] go out for confirmation, and the persisted baseline
//! lives with the caller (a [`BaselineStore`] collaborator is provided).
//!
//! # Example
//!
//! ```
//! use lineage_store::MemoryStore;
//! use lineage_sync::SyncSession;
//! use lineage_types::{Handle, ObjectType, Record};
//!
//! let mut local = MemoryStore::from_records([
//!     Record::new(ObjectType::Person, Handle::new("p1")).with_changed_at(100),
//! ]);
//! let mut remote = MemoryStore::new();
//!
//! let mut session = SyncSession::new(&mut local, &mut remote, None);
//! let plan = session.plan().unwrap();
//! assert_eq!(plan.actions.len(), 1);
//! session.commit(&plan.actions).unwrap();
//! ```

mod action;
mod baseline;
mod baseline_store;
mod diff;
mod error;
mod merge;
mod session;
pub mod snapshot;
mod summary;

pub use action::{classify, Action, ActionKind};
pub use baseline::{Baseline, BaselineOrigin};
pub use baseline_store::BaselineStore;
pub use diff::{ChangedPair, DiffKey, StoreDiff};
pub use error::{Replica, SyncError, SyncResult};
pub use merge::merge_records;
pub use session::{run, SyncOutcome, SyncPlan, SyncReport, SyncSession};
pub use snapshot::SnapshotSource;
pub use summary::SyncSummary;
