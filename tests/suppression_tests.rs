//! Integration tests for the on-disk suppression store.

use project_pulse::alerts::suppression::SuppressionStore;
use std::fs;

#[test]
fn acknowledgments_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("suppressions.db");

    {
        let store = SuppressionStore::open(&path).unwrap();
        store.acknowledge("overdue_task_t1").unwrap();
    }

    let reopened = SuppressionStore::open(&path).unwrap();
    assert!(reopened.is_suppressed("overdue_task_t1", 0));
}

#[test]
fn snoozes_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("suppressions.db");

    {
        let store = SuppressionStore::open(&path).unwrap();
        store.snooze_until("duesoon_task_t1", 5_000).unwrap();
    }

    let reopened = SuppressionStore::open(&path).unwrap();
    assert!(reopened.is_suppressed("duesoon_task_t1", 4_999));
    assert!(!reopened.is_suppressed("duesoon_task_t1", 5_001));
}

#[test]
fn corrupt_store_degrades_to_no_suppressions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("suppressions.db");
    fs::write(&path, b"this is not a sqlite database, not even close").unwrap();

    let store = SuppressionStore::open_or_default(&path);
    assert!(!store.is_suppressed("overdue_task_t1", 0));

    // The degraded store still accepts writes for the rest of the session.
    store.acknowledge("overdue_task_t1").unwrap();
    assert!(store.is_suppressed("overdue_task_t1", 0));
}

#[test]
fn unopenable_path_degrades_to_no_suppressions() {
    let dir = tempfile::tempdir().unwrap();
    // A directory is not a database file.
    let store = SuppressionStore::open_or_default(dir.path());
    assert!(!store.is_suppressed("anything", 0));
}

#[test]
fn stores_are_isolated_per_path() {
    let dir = tempfile::tempdir().unwrap();
    let a = SuppressionStore::open(dir.path().join("a.db")).unwrap();
    let b = SuppressionStore::open(dir.path().join("b.db")).unwrap();

    a.acknowledge("k").unwrap();
    assert!(a.is_suppressed("k", 0));
    assert!(!b.is_suppressed("k", 0));
}
