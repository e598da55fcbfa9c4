//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic.
//!
//! Primitives:
//! - `open_exclusive` / `close_exclusive`: take and drop a non-blocking
//!   exclusive lock bound to a lock file.
//! - `is_permanent_error`: classify an io::Error as not worth retrying.
//! - `same_file`: do two paths name one file (symlink aliases included).
//! - log/config file helpers used by the binary.

use std::fs::File;
use std::io;

#[cfg(unix)]
mod common_unix;
mod temp;
#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{
    close_exclusive, is_permanent_error, open_exclusive, open_log_file_secure_append,
    same_file, write_config_secure_new_0600,
};

#[cfg(not(unix))]
pub use windows::{
    close_exclusive, is_permanent_error, open_exclusive, open_log_file_secure_append,
    same_file, write_config_secure_new_0600,
};

/// Outcome of a non-blocking exclusive open.
#[derive(Debug)]
pub enum LockAttempt {
    /// The lock is ours for as long as the file stays open.
    Acquired(File),
    /// Another owner holds it.
    Held,
}

/// Which step of `open_exclusive` failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStage {
    Open,
    Lock,
}

#[derive(Debug)]
pub struct LockError {
    pub stage: LockStage,
    pub source: io::Error,
}
