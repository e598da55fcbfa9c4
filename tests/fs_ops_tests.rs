use std::fs;
use std::time::Duration;

use client_fs::{
    delete_file, delete_file_with, is_file, make_dirs, rename_with, touch, truncate, ErrorCategory,
    FsError, RetryPolicy,
};
use tempfile::tempdir;

fn fast() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(5))
}

#[test]
fn deleting_nonexistent_path_succeeds() {
    let td = tempdir().unwrap();
    delete_file(td.path().join("never-existed")).unwrap();
}

#[test]
fn touch_then_delete() {
    let td = tempdir().unwrap();
    let p = td.path().join("marker");
    touch(&p).unwrap();
    assert!(is_file(&p));
    delete_file_with(&p, &fast()).unwrap();
    assert!(!is_file(&p));
}

#[test]
fn failed_delete_names_the_path() {
    let td = tempdir().unwrap();
    let d = td.path().join("slot");
    fs::create_dir(&d).unwrap();
    fs::write(d.join("busy.dat"), b"x").unwrap();

    let err = delete_file_with(&d, &fast()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Delete);
    assert_eq!(err.path(), Some(d.as_path()));
    assert!(err.to_string().contains("slot"));
}

#[test]
fn rename_moves_and_replaces() {
    let td = tempdir().unwrap();
    let tmp = td.path().join("state.xml.tmp");
    let dst = td.path().join("state.xml");
    fs::write(&dst, b"<old/>").unwrap();
    fs::write(&tmp, b"<new/>").unwrap();
    rename_with(&tmp, &dst, &fast()).unwrap();
    assert_eq!(fs::read(&dst).unwrap(), b"<new/>");
    assert!(!tmp.exists());
}

#[test]
fn rename_missing_source_is_rename_error() {
    let td = tempdir().unwrap();
    let err = rename_with(td.path().join("a"), td.path().join("b"), &fast()).unwrap_err();
    assert!(matches!(err, FsError::Rename { .. }));
    assert_eq!(err.code(), "rename_failed");
}

#[test]
fn make_dirs_creates_parents_only() {
    let td = tempdir().unwrap();
    make_dirs(td.path(), "a/b/c.txt").unwrap();
    assert!(td.path().join("a").join("b").is_dir());
    assert!(!td.path().join("a").join("b").join("c.txt").exists());
    // Idempotent.
    make_dirs(td.path(), "a/b/c.txt").unwrap();
}

#[test]
fn truncate_missing_file_is_error() {
    let td = tempdir().unwrap();
    let err = truncate(td.path().join("nope"), 0).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Truncate);
}
