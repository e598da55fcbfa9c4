use assert_fs::prelude::*;
use assert_fs::TempDir;

use client_fs::{clean_out_dir, is_dir, is_dir_empty};

#[test]
fn removes_contents_keeps_directory() {
    let slot = TempDir::new().unwrap();
    slot.child("input.dat").write_str("payload").unwrap();
    slot.child(".checkpoint").write_str("7").unwrap();
    slot.child("out/deep/result.txt").write_str("42").unwrap();

    let report = clean_out_dir(slot.path());
    assert!(report.is_clean(), "skipped: {:?}", report.skipped);
    assert_eq!(report.removed, 3);
    assert!(is_dir(slot.path()));
    assert!(is_dir_empty(slot.path()));
}

#[cfg(unix)]
#[test]
fn symlinked_dir_is_unlinked_not_followed() {
    let slot = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    outside.child("keep.txt").write_str("keep").unwrap();
    std::os::unix::fs::symlink(outside.path(), slot.child("link").path()).unwrap();

    let report = clean_out_dir(slot.path());
    assert!(report.is_clean());
    assert!(outside.child("keep.txt").path().exists());
    assert!(is_dir_empty(slot.path()));
}

#[cfg(unix)]
#[test]
fn unremovable_entries_are_reported() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    // Root ignores directory permissions.
    if unsafe { libc::geteuid() } == 0 {
        return;
    }
    let slot = TempDir::new().unwrap();
    slot.child("locked/inner.txt").write_str("x").unwrap();
    slot.child("free.txt").write_str("y").unwrap();
    let locked = slot.child("locked");
    fs::set_permissions(locked.path(), fs::Permissions::from_mode(0o555)).unwrap();

    let report = clean_out_dir(slot.path());
    fs::set_permissions(locked.path(), fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(report.removed, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, locked.path());
    assert!(!report.is_clean());
}
