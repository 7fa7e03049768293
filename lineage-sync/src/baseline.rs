//! Baseline resolution.

use crate::diff::StoreDiff;
use lineage_types::ChangeTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the baseline value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaselineOrigin {
    /// Recorded after the previous successful synchronization.
    Persisted,
    /// Inferred from the latest record identical on both replicas.
    Witness,
    /// Neither available; everything classifies as an addition.
    FirstSync,
}

/// The timestamp below which a record's state is assumed common to both
/// replicas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baseline {
    time: ChangeTime,
    origin: BaselineOrigin,
}

impl Baseline {
    /// Resolves the baseline for a run.
    ///
    /// A persisted, non-zero baseline is authoritative and used verbatim —
    /// it reflects the real moment reconciliation last completed. Without
    /// one, the latest identical pair across both stores stands witness for
    /// "last known identical". This heuristic is best-effort: a record
    /// deleted on one side with no surviving same-type witness is
    /// indistinguishable from one that never existed, and will classify as
    /// an addition rather than a deletion. With neither source the baseline
    /// is zero and nothing classifies as deleted.
    #[must_use]
    pub fn resolve(persisted: Option<ChangeTime>, diff: &StoreDiff) -> Self {
        match persisted {
            Some(time) if !time.is_zero() => Self {
                time,
                origin: BaselineOrigin::Persisted,
            },
            _ => match diff.witness_baseline() {
                Some(time) => Self {
                    time,
                    origin: BaselineOrigin::Witness,
                },
                None => Self {
                    time: ChangeTime::ZERO,
                    origin: BaselineOrigin::FirstSync,
                },
            },
        }
    }

    /// The baseline timestamp.
    #[must_use]
    pub const fn time(&self) -> ChangeTime {
        self.time
    }

    /// How the baseline was obtained.
    #[must_use]
    pub const fn origin(&self) -> BaselineOrigin {
        self.origin
    }
}

impl fmt::Display for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = match self.origin {
            BaselineOrigin::Persisted => "persisted",
            BaselineOrigin::Witness => "witness",
            BaselineOrigin::FirstSync => "first sync",
        };
        write!(f, "{} ({origin})", self.time)
    }
}
