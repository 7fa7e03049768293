use lineage_store::mock::FlakyStore;
use lineage_store::{MemoryStore, RecordStore, StoreError};
use lineage_sync::snapshot::mock::{FailingSource, StaticSource};
use lineage_sync::{
    merge_records, run, Action, ActionKind, SyncError, SyncOutcome, SyncSession,
};
use lineage_types::{ChangeTime, Handle, ObjectType, Record};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Opt-in log output for debugging test failures (RUST_LOG=debug).
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn person(handle: &str, changed_at: i64, surname: &str) -> Record {
    Record::new(ObjectType::Person, Handle::new(handle))
        .with_changed_at(changed_at)
        .with_payload(json!({"surname": surname}))
}

fn baseline(seconds: i64) -> Option<ChangeTime> {
    Some(ChangeTime::from_seconds(seconds))
}

// ── Commit semantics per action kind ─────────────────────────────

#[test]
fn add_to_remote_copies_the_record_verbatim() {
    // Scenario: local has p1 (changed 100), remote lacks it, baseline 50.
    let mut local = MemoryStore::from_records([person("p1", 100, "Reed")]);
    let mut remote = MemoryStore::new();

    let mut session = SyncSession::new(&mut local, &mut remote, baseline(50));
    let plan = session.plan().unwrap();
    assert_eq!(plan.actions[0].kind(), ActionKind::AddToRemote);
    session.commit(&plan.actions).unwrap();

    let copied = remote.get(ObjectType::Person, &Handle::new("p1")).unwrap();
    assert_eq!(copied, person("p1", 100, "Reed"));
}

#[test]
fn update_remote_from_local_overwrites_remote() {
    // Scenario: p2 local changed 200 (X), remote changed 90 (Y), baseline 150.
    let mut local = MemoryStore::from_records([person("p2", 200, "X")]);
    let mut remote = MemoryStore::from_records([person("p2", 90, "Y")]);

    let mut session = SyncSession::new(&mut local, &mut remote, baseline(150));
    let plan = session.plan().unwrap();
    assert_eq!(plan.actions[0].kind(), ActionKind::UpdateRemoteFromLocal);
    session.commit(&plan.actions).unwrap();

    assert_eq!(
        remote.get(ObjectType::Person, &Handle::new("p2")).unwrap(),
        local.get(ObjectType::Person, &Handle::new("p2")).unwrap(),
    );
    assert_eq!(
        remote
            .get(ObjectType::Person, &Handle::new("p2"))
            .unwrap()
            .get_str("/surname"),
        Some("X")
    );
}

#[test]
fn deletions_apply_to_the_right_store() {
    // Local-only record older than baseline → deleted locally; remote-only
    // record older than baseline → deleted remotely.
    let mut local = MemoryStore::from_records([person("gone-remote", 50, "A")]);
    let mut remote = MemoryStore::from_records([person("gone-local", 60, "B")]);

    let mut session = SyncSession::new(&mut local, &mut remote, baseline(100));
    let plan = session.plan().unwrap();
    session.commit(&plan.actions).unwrap();

    assert!(local.is_empty());
    assert!(remote.is_empty());
}

#[test]
fn conflict_writes_the_same_merged_record_to_both_stores() {
    // Scenario: p3 changed on both sides after baseline with different
    // payloads.
    let local_rec = person("p3", 200, "Ours").with_display_id("I-LOCAL");
    let remote_rec = Record::new(ObjectType::Person, Handle::new("p3"))
        .with_changed_at(300)
        .with_payload(json!({"surname": "Theirs", "note": "kept"}));
    let expected = merge_records(&local_rec, &remote_rec);

    let mut local = MemoryStore::from_records([local_rec]);
    let mut remote = MemoryStore::from_records([remote_rec]);

    let mut session = SyncSession::new(&mut local, &mut remote, baseline(150));
    let plan = session.plan().unwrap();
    assert_eq!(plan.actions[0].kind(), ActionKind::Conflict);
    session.commit(&plan.actions).unwrap();

    let on_local = local.get(ObjectType::Person, &Handle::new("p3")).unwrap();
    let on_remote = remote.get(ObjectType::Person, &Handle::new("p3")).unwrap();
    assert_eq!(on_local, on_remote);
    assert_eq!(on_local, expected);
    // The base (remote) had no display id, so the local one fills in.
    assert_eq!(on_local.display_id.as_deref(), Some("I-LOCAL"));
    assert_eq!(on_local.get_str("/surname"), Some("Theirs"));
    assert_eq!(on_local.get_str("/note"), Some("kept"));
}

#[test]
fn committing_an_empty_plan_is_a_no_op() {
    let records = [person("a", 10, "Reed")];
    let mut local = MemoryStore::from_records(records.clone());
    let mut remote = MemoryStore::from_records(records);

    let mut session = SyncSession::new(&mut local, &mut remote, None);
    let plan = session.plan().unwrap();
    assert!(plan.is_empty());
    session.commit(&plan.actions).unwrap();
}

// ── Idempotence and no-op stability ──────────────────────────────

#[test]
fn replanning_after_a_commit_yields_no_actions() {
    let mut local = MemoryStore::from_records([
        person("added", 200, "New"),
        person("conflict", 220, "Ours"),
        person("stale", 40, "Old"),
    ]);
    let mut remote = MemoryStore::from_records([
        person("conflict", 230, "Theirs"),
        person("updated", 190, "Fresh"),
    ]);

    let mut session = SyncSession::new(&mut local, &mut remote, baseline(100));
    let plan = session.plan().unwrap();
    assert!(!plan.is_empty());
    session.commit(&plan.actions).unwrap();

    // Whatever baseline the next run uses, identical stores mean an empty
    // plan.
    for persisted in [None, baseline(1), baseline(100_000)] {
        let session = SyncSession::new(&mut local, &mut remote, persisted);
        assert!(session.plan().unwrap().is_empty());
    }
}

#[test]
fn identical_stores_plan_empty_for_any_baseline() {
    let records = [person("a", 10, "Reed"), person("b", 500, "Lane")];
    let mut local = MemoryStore::from_records(records.clone());
    let mut remote = MemoryStore::from_records(records);

    for persisted in [None, baseline(0), baseline(9), baseline(9_999)] {
        let session = SyncSession::new(&mut local, &mut remote, persisted);
        assert!(session.plan().unwrap().is_empty());
    }
}

// ── Atomicity ────────────────────────────────────────────────────

#[test]
fn a_failing_action_rolls_back_everything_on_both_stores() {
    let mut local = MemoryStore::from_records([person("to-update", 10, "Old")]);
    let mut remote = FlakyStore::new(MemoryStore::new()).failing_after_writes(1);
    let local_before = local.all_records();

    // Three actions: the first two writes succeed (one per store), the
    // second remote write fails.
    let actions = vec![
        Action::UpdateLocalFromRemote {
            local: person("to-update", 10, "Old"),
            remote: person("to-update", 90, "New"),
        },
        Action::AddToRemote {
            record: person("first", 100, "A"),
        },
        Action::AddToRemote {
            record: person("second", 100, "B"),
        },
    ];

    let mut session = SyncSession::new(&mut local, &mut remote, baseline(50));
    let err = session.commit(&actions).unwrap_err();
    assert!(matches!(err, SyncError::StoreWrite { .. }));

    // Zero applied actions observable, not N-1.
    assert_eq!(local.all_records(), local_before);
    assert!(remote.inner().is_empty());
}

#[test]
fn a_refused_remote_commit_rolls_back_the_local_transaction() {
    let mut local = MemoryStore::from_records([person("p1", 100, "Reed")]);
    let mut remote = FlakyStore::new(MemoryStore::new())
        .refusing_commit(|| StoreError::Rejected("objects have been modified".into()));
    let local_before = local.all_records();

    let actions = vec![
        Action::AddToRemote {
            record: person("p1", 100, "Reed"),
        },
        Action::AddToLocal {
            record: person("p2", 120, "Lane"),
        },
    ];

    let mut session = SyncSession::new(&mut local, &mut remote, baseline(50));
    let err = session.commit(&actions).unwrap_err();
    assert!(matches!(err, SyncError::ConflictRejected(_)));

    assert_eq!(local.all_records(), local_before);
    assert!(remote.inner().is_empty());
}

#[test]
fn remote_refusal_errors_map_to_their_transport_variants() {
    for (make, check) in [
        (
            (|| StoreError::Unauthorized("bad token".into())) as fn() -> StoreError,
            (|e: &SyncError| matches!(e, SyncError::Authorization(_))) as fn(&SyncError) -> bool,
        ),
        (
            || StoreError::PermissionDenied("read-only user".into()),
            |e: &SyncError| matches!(e, SyncError::Permission(_)),
        ),
        (
            || StoreError::Malformed("not json".into()),
            |e: &SyncError| matches!(e, SyncError::MalformedResponse(_)),
        ),
    ] {
        let mut local = MemoryStore::new();
        let mut remote = FlakyStore::new(MemoryStore::new()).refusing_commit(make);
        let actions = vec![Action::AddToLocal {
            record: person("p", 10, "R"),
        }];
        let mut session = SyncSession::new(&mut local, &mut remote, None);
        let err = session.commit(&actions).unwrap_err();
        assert!(check(&err), "unexpected error {err}");
        assert!(local.is_empty());
    }
}

// ── Full run orchestration ───────────────────────────────────────

#[tokio::test]
async fn run_applies_and_reports_when_confirmed() {
    init_tracing();
    let mut local = MemoryStore::from_records([person("p1", 100, "Reed")]);
    let mut source = StaticSource::new(MemoryStore::new());
    let started = ChangeTime::now();

    let (report, remote) = run(&mut local, &mut source, baseline(50), |actions, summary| {
        assert_eq!(actions.len(), 1);
        assert_eq!(summary.count(ActionKind::AddToRemote), 1);
        true
    })
    .await
    .unwrap();

    assert_eq!(report.outcome, SyncOutcome::Applied { actions: 1 });
    assert_eq!(report.summary.total(), 1);
    // The new baseline is the pre-fetch capture, not the commit time.
    let new_baseline = report.new_baseline.unwrap();
    assert!(new_baseline >= started);
    assert!(new_baseline <= ChangeTime::now());
    assert_eq!(
        remote.get(ObjectType::Person, &Handle::new("p1")).unwrap(),
        person("p1", 100, "Reed")
    );
}

#[tokio::test]
async fn run_short_circuits_when_stores_match_but_still_advances_baseline() {
    let records = [person("a", 10, "Reed")];
    let mut local = MemoryStore::from_records(records.clone());
    let mut source = StaticSource::new(MemoryStore::from_records(records));

    let (report, _remote) = run(&mut local, &mut source, None, |_, _| {
        panic!("confirmation must not run for an empty plan")
    })
    .await
    .unwrap();

    assert_eq!(report.outcome, SyncOutcome::UpToDate);
    assert!(report.summary.is_empty());
    assert!(report.new_baseline.is_some());
}

#[tokio::test]
async fn run_cancels_without_writing_when_confirmation_declines() {
    let mut local = MemoryStore::from_records([person("p1", 100, "Reed")]);
    let local_before = local.all_records();
    let mut source = StaticSource::new(MemoryStore::new());

    let (report, remote) = run(&mut local, &mut source, baseline(50), |_, _| false)
        .await
        .unwrap();

    assert_eq!(report.outcome, SyncOutcome::Cancelled);
    assert_eq!(report.new_baseline, None);
    assert_eq!(local.all_records(), local_before);
    assert!(remote.is_empty());
}

#[tokio::test]
async fn run_surfaces_transport_failures_before_touching_stores() {
    let mut local = MemoryStore::from_records([person("p1", 100, "Reed")]);
    let local_before = local.all_records();
    let mut source = FailingSource::new(|| SyncError::Transport("connection refused".into()));

    let err = run(&mut local, &mut source, None, |_, _| true)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Transport(_)));
    assert_eq!(local.all_records(), local_before);
}

#[tokio::test]
async fn run_summary_matches_the_plan() {
    let mut local = MemoryStore::from_records([
        person("conflict", 200, "Ours"),
        person("added", 190, "New"),
    ]);
    let mut source = StaticSource::new(MemoryStore::from_records([person(
        "conflict", 210, "Theirs",
    )]));

    let (report, _) = run(&mut local, &mut source, baseline(100), |_, _| true)
        .await
        .unwrap();

    assert_eq!(report.outcome, SyncOutcome::Applied { actions: 2 });
    assert_eq!(report.summary.count(ActionKind::Conflict), 1);
    assert_eq!(report.summary.count(ActionKind::AddToRemote), 1);
    assert_eq!(report.summary.count_for_type(ObjectType::Person), 2);
    assert_eq!(report.summary.to_string(), "1 × merge conflict\n1 × add to remote");
}
