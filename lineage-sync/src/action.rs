//! Typed reconciliation actions and their classification.

use crate::baseline::Baseline;
use crate::diff::StoreDiff;
use lineage_types::{ChangeTime, Handle, ObjectType, Record};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One reconciliation step, carrying the record snapshot(s) needed to apply
/// it and to display it.
///
/// `Update*` actions carry both sides so a UI can show what is being
/// overwritten; the engine only writes the source side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Insert the remote record into the local store.
    AddToLocal { record: Record },
    /// Insert the local record into the remote store.
    AddToRemote { record: Record },
    /// Remove the record from the local store (pre-image carried).
    DeleteFromLocal { record: Record },
    /// Remove the record from the remote store (pre-image carried).
    DeleteFromRemote { record: Record },
    /// Overwrite the local record with the remote one.
    UpdateLocalFromRemote { local: Record, remote: Record },
    /// Overwrite the remote record with the local one.
    UpdateRemoteFromLocal { local: Record, remote: Record },
    /// Changed on both sides; merge and write the result to both stores.
    Conflict { local: Record, remote: Record },
}

impl Action {
    /// The action's category.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::AddToLocal { .. } => ActionKind::AddToLocal,
            Action::AddToRemote { .. } => ActionKind::AddToRemote,
            Action::DeleteFromLocal { .. } => ActionKind::DeleteFromLocal,
            Action::DeleteFromRemote { .. } => ActionKind::DeleteFromRemote,
            Action::UpdateLocalFromRemote { .. } => ActionKind::UpdateLocalFromRemote,
            Action::UpdateRemoteFromLocal { .. } => ActionKind::UpdateRemoteFromLocal,
            Action::Conflict { .. } => ActionKind::Conflict,
        }
    }

    /// The type of the record this action touches.
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        self.primary_record().object_type
    }

    /// The handle of the record this action touches.
    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.primary_record().handle
    }

    fn primary_record(&self) -> &Record {
        match self {
            Action::AddToLocal { record }
            | Action::AddToRemote { record }
            | Action::DeleteFromLocal { record }
            | Action::DeleteFromRemote { record } => record,
            Action::UpdateLocalFromRemote { local, .. }
            | Action::UpdateRemoteFromLocal { local, .. }
            | Action::Conflict { local, .. } => local,
        }
    }
}

/// Action category, ordered the way action lists are presented:
/// conflicts, then additions, then deletions, then one-sided updates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Conflict,
    AddToRemote,
    AddToLocal,
    DeleteFromRemote,
    DeleteFromLocal,
    UpdateRemoteFromLocal,
    UpdateLocalFromRemote,
}

impl ActionKind {
    /// All kinds, in presentation order.
    pub const ALL: [ActionKind; 7] = [
        ActionKind::Conflict,
        ActionKind::AddToRemote,
        ActionKind::AddToLocal,
        ActionKind::DeleteFromRemote,
        ActionKind::DeleteFromLocal,
        ActionKind::UpdateRemoteFromLocal,
        ActionKind::UpdateLocalFromRemote,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            ActionKind::Conflict => "merge conflict",
            ActionKind::AddToRemote => "add to remote",
            ActionKind::AddToLocal => "add to local",
            ActionKind::DeleteFromRemote => "delete from remote",
            ActionKind::DeleteFromLocal => "delete from local",
            ActionKind::UpdateRemoteFromLocal => "update remote",
            ActionKind::UpdateLocalFromRemote => "update local",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies every diff entry into an action using the baseline.
///
/// A timestamp strictly greater than the baseline means "modified since the
/// replicas were last identical". A one-sided presence that is *not* newer
/// than the baseline existed at baseline time and is therefore a deletion on
/// the other side. A changed pair that is not newer on exactly one side
/// cannot be resolved one-sidedly and becomes a conflict.
///
/// The returned order — conflicts, additions, deletions, updates, each
/// sorted by (type, handle) — is for presentation; application is
/// order-independent.
#[must_use]
pub fn classify(diff: &StoreDiff, baseline: Baseline) -> Vec<Action> {
    let after = |t: ChangeTime| t > baseline.time();

    let mut conflicts = Vec::new();
    let mut update_remote = Vec::new();
    let mut update_local = Vec::new();
    for (_, pair) in diff.changed() {
        let local = pair.local.clone();
        let remote = pair.remote.clone();
        match (after(local.changed_at), after(remote.changed_at)) {
            (true, false) => update_remote.push(Action::UpdateRemoteFromLocal { local, remote }),
            (false, true) => update_local.push(Action::UpdateLocalFromRemote { local, remote }),
            _ => conflicts.push(Action::Conflict { local, remote }),
        }
    }

    let mut add_remote = Vec::new();
    let mut delete_local = Vec::new();
    for (_, record) in diff.missing_from_remote() {
        if after(record.changed_at) {
            add_remote.push(Action::AddToRemote {
                record: record.clone(),
            });
        } else {
            delete_local.push(Action::DeleteFromLocal {
                record: record.clone(),
            });
        }
    }

    let mut add_local = Vec::new();
    let mut delete_remote = Vec::new();
    for (_, record) in diff.missing_from_local() {
        if after(record.changed_at) {
            add_local.push(Action::AddToLocal {
                record: record.clone(),
            });
        } else {
            delete_remote.push(Action::DeleteFromRemote {
                record: record.clone(),
            });
        }
    }

    let mut actions = conflicts;
    actions.extend(add_remote);
    actions.extend(add_local);
    actions.extend(delete_remote);
    actions.extend(delete_local);
    actions.extend(update_remote);
    actions.extend(update_local);
    actions
}
