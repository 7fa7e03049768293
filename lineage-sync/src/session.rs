//! The reconciliation session: planning and the merge & commit engine.
//!
//! [`SyncSession`] holds exclusive borrows of both stores for the duration
//! of a run, so no concurrent writer can interleave with the snapshot read
//! or the commit batch. `plan` is pure; `commit` is the sole writer and
//! applies a whole action list inside one guarded transaction pair.

use crate::action::{classify, Action};
use crate::baseline::Baseline;
use crate::diff::StoreDiff;
use crate::error::{Replica, SyncError, SyncResult};
use crate::merge::merge_records;
use crate::snapshot::SnapshotSource;
use crate::summary::SyncSummary;
use lineage_store::RecordStore;
use lineage_types::ChangeTime;
use tracing::{debug, info, warn};

/// The classified outcome of comparing the two stores.
#[derive(Debug)]
pub struct SyncPlan {
    /// The baseline the classification used.
    pub baseline: Baseline,
    /// Actions in presentation order; apply with [`SyncSession::commit`].
    pub actions: Vec<Action>,
}

impl SyncPlan {
    /// Whether the stores are already identical.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// A read-only summary for display/confirmation.
    #[must_use]
    pub fn summary(&self) -> SyncSummary {
        SyncSummary::of(&self.actions)
    }
}

/// A single reconciliation run over a pair of stores.
pub struct SyncSession<'a, L: RecordStore, R: RecordStore> {
    local: &'a mut L,
    remote: &'a mut R,
    persisted_baseline: Option<ChangeTime>,
}

impl<'a, L: RecordStore, R: RecordStore> SyncSession<'a, L, R> {
    /// Creates a session over the two stores.
    ///
    /// `persisted_baseline` is the timestamp recorded after the previous
    /// successful run, if any; a zero value is treated as absent.
    pub fn new(
        local: &'a mut L,
        remote: &'a mut R,
        persisted_baseline: Option<ChangeTime>,
    ) -> Self {
        Self {
            local,
            remote,
            persisted_baseline,
        }
    }

    /// Diffs the stores, resolves the baseline, and classifies every
    /// difference. Pure: neither store is written.
    pub fn plan(&self) -> SyncResult<SyncPlan> {
        let diff = StoreDiff::compute(&*self.local, &*self.remote)?;
        let baseline = Baseline::resolve(self.persisted_baseline, &diff);
        info!(%baseline, differences = diff.len(), "classified store differences");
        let actions = classify(&diff, baseline);
        Ok(SyncPlan { baseline, actions })
    }

    /// Applies an action list to both stores as one atomic unit.
    ///
    /// All writes happen inside a transaction pair opened together. Any
    /// failure rolls both transactions back and surfaces as an error, so
    /// either every action is applied or neither store changed. The remote
    /// transaction commits first: a refusal from the remote side
    /// (authorization, permissions, stale state) rolls the local
    /// transaction back and the replicas stay symmetric.
    pub fn commit(&mut self, actions: &[Action]) -> SyncResult<()> {
        self.local
            .begin()
            .map_err(|e| SyncError::write(Replica::Local, e))?;
        if let Err(e) = self.remote.begin() {
            let _ = self.local.rollback();
            return Err(SyncError::write(Replica::Remote, e));
        }

        for action in actions {
            if let Err(err) = self.apply(action) {
                warn!(%err, "action failed, rolling back both stores");
                let _ = self.remote.rollback();
                let _ = self.local.rollback();
                return Err(err);
            }
        }

        if let Err(e) = self.remote.commit() {
            warn!("remote commit refused, rolling back both stores");
            let _ = self.remote.rollback();
            let _ = self.local.rollback();
            return Err(SyncError::write(Replica::Remote, e));
        }
        if let Err(e) = self.local.commit() {
            // The remote commit is already durable; keep the local store at
            // its pre-batch state so the next run re-reconciles.
            let _ = self.local.rollback();
            return Err(SyncError::write(Replica::Local, e));
        }
        info!(actions = actions.len(), "committed reconciliation batch");
        Ok(())
    }

    fn apply(&mut self, action: &Action) -> SyncResult<()> {
        debug!(kind = %action.kind(), object_type = %action.object_type(), handle = %action.handle(), "applying action");
        match action {
            Action::AddToLocal { record } => self
                .local
                .add(record.clone())
                .map_err(|e| SyncError::write(Replica::Local, e)),
            Action::AddToRemote { record } => self
                .remote
                .add(record.clone())
                .map_err(|e| SyncError::write(Replica::Remote, e)),
            Action::DeleteFromLocal { record } => self
                .local
                .remove(record.object_type, &record.handle)
                .map_err(|e| SyncError::write(Replica::Local, e)),
            Action::DeleteFromRemote { record } => self
                .remote
                .remove(record.object_type, &record.handle)
                .map_err(|e| SyncError::write(Replica::Remote, e)),
            Action::UpdateLocalFromRemote { remote, .. } => self
                .local
                .update(remote.clone())
                .map_err(|e| SyncError::write(Replica::Local, e)),
            Action::UpdateRemoteFromLocal { local, .. } => self
                .remote
                .update(local.clone())
                .map_err(|e| SyncError::write(Replica::Remote, e)),
            Action::Conflict { local, remote } => {
                // The only action that writes both stores: both replicas end
                // up with the identical merged record.
                let merged = merge_records(local, remote);
                self.local
                    .update(merged.clone())
                    .map_err(|e| SyncError::write(Replica::Local, e))?;
                self.remote
                    .update(merged)
                    .map_err(|e| SyncError::write(Replica::Remote, e))
            }
        }
    }
}

/// How a full reconciliation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The stores were already identical; no action was needed.
    UpToDate,
    /// The confirmation callback declined; nothing was written.
    Cancelled,
    /// The action batch was committed to both stores.
    Applied { actions: usize },
}

/// Result of a full reconciliation run.
#[derive(Debug)]
pub struct SyncReport {
    /// How the run ended.
    pub outcome: SyncOutcome,
    /// Summary of the planned actions (empty when up to date).
    pub summary: SyncSummary,
    /// The baseline the run classified against.
    pub baseline: Baseline,
    /// Baseline to persist for the next run; `None` when cancelled.
    pub new_baseline: Option<ChangeTime>,
}

/// Drives a complete reconciliation run.
///
/// The flow mirrors the interactive wizard: capture the pre-fetch
/// timestamp, materialize the remote snapshot, plan, hand the action list
/// and its summary to `confirm`, commit on approval, and report. The
/// pre-fetch timestamp — not the commit time — becomes the next persisted
/// baseline: it is the moment the two stores were known reconcilable,
/// however long applying the batch took. An empty plan still advances the
/// baseline, since identical stores are by definition reconciled.
///
/// Returns the report together with the remote store as mutated by the
/// commit. Persisting `new_baseline` is the caller's job (see
/// [`BaselineStore`](crate::BaselineStore)).
pub async fn run<L, S, F>(
    local: &mut L,
    source: &mut S,
    persisted_baseline: Option<ChangeTime>,
    confirm: F,
) -> SyncResult<(SyncReport, S::Store)>
where
    L: RecordStore,
    S: SnapshotSource,
    F: FnOnce(&[Action], &SyncSummary) -> bool,
{
    let fetch_time = ChangeTime::now();
    info!("fetching remote data");
    let mut remote = source.fetch().await?;

    info!("comparing local and remote data");
    let mut session = SyncSession::new(local, &mut remote, persisted_baseline);
    let plan = session.plan()?;
    let summary = plan.summary();

    if plan.is_empty() {
        info!("both trees are the same");
        let report = SyncReport {
            outcome: SyncOutcome::UpToDate,
            summary,
            baseline: plan.baseline,
            new_baseline: Some(fetch_time),
        };
        return Ok((report, remote));
    }

    if !confirm(&plan.actions, &summary) {
        warn!("synchronization cancelled before commit");
        let report = SyncReport {
            outcome: SyncOutcome::Cancelled,
            summary,
            baseline: plan.baseline,
            new_baseline: None,
        };
        return Ok((report, remote));
    }

    session.commit(&plan.actions)?;
    let report = SyncReport {
        outcome: SyncOutcome::Applied {
            actions: plan.actions.len(),
        },
        summary,
        baseline: plan.baseline,
        new_baseline: Some(fetch_time),
    };
    Ok((report, remote))
}
