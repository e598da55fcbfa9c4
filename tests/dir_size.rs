use assert_fs::prelude::*;
use assert_fs::TempDir;

use client_fs::{dir_size, dir_size_alloc, file_size, ErrorCategory};

fn sample_tree() -> TempDir {
    let d = TempDir::new().unwrap();
    d.child("a").write_binary(&[1u8; 10]).unwrap();
    d.child("b").write_binary(&[2u8; 20]).unwrap();
    d.child("sub/c").write_binary(&[3u8; 5]).unwrap();
    d
}

#[test]
fn flat_and_recursive_sums() {
    let d = sample_tree();
    assert_eq!(dir_size(d.path(), false).unwrap(), 30);
    assert_eq!(dir_size(d.path(), true).unwrap(), 35);
    assert_eq!(file_size(d.child("sub/c").path()).unwrap(), 5);
}

#[test]
fn recursive_never_smaller() {
    let d = sample_tree();
    d.child("empty_sub").create_dir_all().unwrap();
    let flat = dir_size(d.path(), false).unwrap();
    let deep = dir_size(d.path(), true).unwrap();
    assert!(deep >= flat);

    let only_files = TempDir::new().unwrap();
    only_files.child("x").write_str("12345").unwrap();
    only_files.child("empty").create_dir_all().unwrap();
    assert_eq!(
        dir_size(only_files.path(), false).unwrap(),
        dir_size(only_files.path(), true).unwrap()
    );
}

#[test]
fn allocated_recursive_never_smaller() {
    let d = sample_tree();
    let flat = dir_size_alloc(d.path(), false).unwrap();
    let deep = dir_size_alloc(d.path(), true).unwrap();
    assert!(deep >= flat);
}

#[test]
fn missing_dir_is_open_dir_error() {
    let d = TempDir::new().unwrap();
    let err = dir_size(d.child("gone").path(), false).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::OpenDir);
}
