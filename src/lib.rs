//! Core library for `client_fs`.
//!
//! A small filesystem layer for long-running background clients that share
//! their data directory with scanners, indexers and other instances of
//! themselves: deletes and renames that ride out transient contention, a
//! lazy directory cursor, bounded head/tail reads, an advisory lock file and
//! directory size accounting.
//!
//! Everything is synchronous, spawns no threads and keeps no global state.
//! Fallible operations return [`FsError`]; branch on [`FsError::category`].

pub mod config;
pub mod dir_scan;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod paths;
pub mod platform;
pub mod predicates;
pub mod shutdown;

pub use config::{default_config_path, default_log_path, path_has_symlink_ancestor, Config, LogLevel};
pub use dir_scan::{dir_close, dir_open, dir_scan, read_dir_names, DirScanner, EntryFilter};
pub use errors::{ErrorCategory, FsError, LockFailure};
pub use fs_ops::{
    allocate_file, clean_out_dir, copy, delete_file, delete_file_with, dir_size, dir_size_alloc,
    file_size, file_size_alloc, make_dir, make_dirs, open_file, open_file_with, read_bounded,
    read_bounded_string, read_bounded_with, remove_dir, rename, rename_with, touch, truncate,
    CleanReport, FileLock, OpenMode, RetryPolicy, SkippedEntry,
};
pub use paths::{current_dir, path_to_dir, relative_to_absolute};
pub use predicates::{
    file_exists, file_or_symlink_exists, is_dir, is_dir_empty, is_file, is_path_absolute,
    is_symlink,
};
