//! Filesystem operations: modularized.

mod copy;
mod create;
mod helpers;
mod lock;
mod open;
mod read;
mod remove;
mod rename;
mod retry;
mod size;

pub use copy::copy;
pub use create::{allocate_file, make_dir, make_dirs, touch, truncate};
pub use helpers::{hint_for, hint_for_fs_error, io_error_with_help, io_error_with_help_io};
pub use lock::FileLock;
pub use open::{open_file, open_file_with, OpenMode};
pub use read::{read_bounded, read_bounded_string, read_bounded_with};
pub use remove::{clean_out_dir, delete_file, delete_file_with, remove_dir, CleanReport, SkippedEntry};
pub use rename::{rename, rename_with};
pub use retry::{
    RetryPolicy, DEFAULT_OPEN_RETRY_ATTEMPTS, DEFAULT_OPEN_RETRY_DELAY, DEFAULT_RETRY_ATTEMPTS,
    DEFAULT_RETRY_DELAY,
};
pub use size::{dir_size, dir_size_alloc, file_size, file_size_alloc, format_bytes};
