//! Store boundary for the Lineage reconciliation engine.
//!
//! Both replicas — the local database and the materialized remote snapshot —
//! are presented to the core through the [`RecordStore`] trait: per-type
//! handle listing and record fetch, plus transactional add/update/remove.
//!
//! [`MemoryStore`] is the reference implementation. It is the natural target
//! when materializing a downloaded replica export, and it backs every test
//! in the workspace. Real deployments put their own database adapter behind
//! the same trait.
//!
//! Reconciliation writes records verbatim, `changed_at` included: after a
//! successful sync both replicas must hold byte-identical records, so store
//! implementations must never re-stamp timestamps on the sync write path.

mod error;
mod memory;
pub mod mock;
mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use store::RecordStore;
