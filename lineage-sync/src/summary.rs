//! Read-only action-list summary for display and confirmation UIs.

use crate::action::{Action, ActionKind};
use lineage_types::ObjectType;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Counts of a run's actions, grouped by category and by object type.
///
/// Handed to confirmation UIs alongside the action list itself; it carries
/// no record data and offers no mutable access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    by_kind: BTreeMap<ActionKind, usize>,
    by_type: BTreeMap<ObjectType, usize>,
    total: usize,
}

impl SyncSummary {
    /// Summarizes an action list.
    #[must_use]
    pub fn of(actions: &[Action]) -> Self {
        let mut summary = Self::default();
        for action in actions {
            *summary.by_kind.entry(action.kind()).or_default() += 1;
            *summary.by_type.entry(action.object_type()).or_default() += 1;
            summary.total += 1;
        }
        summary
    }

    /// Total number of actions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether the run has nothing to do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of actions of the given kind.
    #[must_use]
    pub fn count(&self, kind: ActionKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Number of actions touching the given object type.
    #[must_use]
    pub fn count_for_type(&self, object_type: ObjectType) -> usize {
        self.by_type.get(&object_type).copied().unwrap_or(0)
    }

    /// Per-kind counts in presentation order, skipping empty kinds.
    pub fn kinds(&self) -> impl Iterator<Item = (ActionKind, usize)> + '_ {
        self.by_kind.iter().map(|(k, n)| (*k, *n))
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("both trees are the same");
        }
        let mut first = true;
        for (kind, count) in self.kinds() {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{count} × {kind}")?;
            first = false;
        }
        Ok(())
    }
}
