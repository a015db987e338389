//! # Lock Tests

use super::*;
use std::fs;
use std::time::Duration;

const SHORT: Duration = Duration::from_millis(100);

#[test]
fn test_lock_acquire_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.lock");

    let lock = LedgerLock::acquire(&path, SHORT).expect("Should acquire lock");
    assert!(lock.path().exists());
    assert_eq!(lock.pid(), std::process::id());
}

#[test]
fn test_lock_contains_pid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.lock");

    let lock = LedgerLock::acquire(&path, SHORT).expect("Should acquire lock");
    let content = fs::read_to_string(lock.path()).unwrap();
    let stored_pid: u32 = content.trim().parse().unwrap();
    assert_eq!(stored_pid, std::process::id());
}

#[test]
fn test_double_lock_fails_with_holder_pid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.lock");

    let _first = LedgerLock::acquire(&path, SHORT).expect("First lock should succeed");
    let result = LedgerLock::acquire(&path, SHORT);

    match result {
        Err(LockError::AlreadyLocked { pid, .. }) => assert_eq!(pid, Some(std::process::id())),
        other => panic!("expected AlreadyLocked, got {other:?}"),
    }
}

#[test]
fn test_lock_released_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.lock");

    {
        let _lock = LedgerLock::acquire(&path, SHORT).expect("Should acquire");
    }
    assert!(!path.exists());

    let _again = LedgerLock::acquire(&path, SHORT).expect("Should acquire after release");
}
