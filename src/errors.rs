//! Typed error definitions for client_fs.
//! Every fallible operation returns one of these; callers branch on `category()`.

use std::collections::TryReserveError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Closed set of failure categories exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Open,
    Read,
    OpenDir,
    Delete,
    Rename,
    Truncate,
    MakeDir,
    RemoveDir,
    Alloc,
    NotFound,
    ReadDir,
    Stat,
    Lock,
    InvalidMode,
}

impl ErrorCategory {
    /// Stable snake_case name used in structured logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::Open => "open_failed",
            ErrorCategory::Read => "read_failed",
            ErrorCategory::OpenDir => "open_dir_failed",
            ErrorCategory::Delete => "delete_failed",
            ErrorCategory::Rename => "rename_failed",
            ErrorCategory::Truncate => "truncate_failed",
            ErrorCategory::MakeDir => "make_dir_failed",
            ErrorCategory::RemoveDir => "remove_dir_failed",
            ErrorCategory::Alloc => "alloc_failed",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::ReadDir => "read_dir_failed",
            ErrorCategory::Stat => "stat_failed",
            ErrorCategory::Lock => "lock_failed",
            ErrorCategory::InvalidMode => "invalid_mode",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum FsError {
    #[error("cannot open '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot open directory '{path}': {source}")]
    OpenDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `path` is the file that resisted deletion after every retry.
    #[error("failed to delete '{path}' after {attempts} attempt(s): {source}")]
    Delete {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: io::Error,
    },

    #[error("failed to rename '{from}' -> '{to}' after {attempts} attempt(s): {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        attempts: u32,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy '{from}' -> '{to}': {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to truncate '{path}' to {size} bytes: {source}")]
    Truncate {
        path: PathBuf,
        size: u64,
        #[source]
        source: io::Error,
    },

    #[error("failed to create directory '{path}': {source}")]
    MakeDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove directory '{path}': {source}")]
    RemoveDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot allocate {requested} bytes for '{path}': {source}")]
    Alloc {
        path: PathBuf,
        requested: u64,
        #[source]
        source: TryReserveError,
    },

    #[error("not found: {0}")]
    NotFound(PathBuf),

    #[error("cannot read directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot stat '{path}': {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot lock '{path}': {reason}")]
    Lock {
        path: PathBuf,
        #[source]
        reason: LockFailure,
    },

    #[error("invalid open mode '{0}'")]
    InvalidMode(String),
}

/// Why a lock attempt failed.
#[derive(Debug, Error)]
pub enum LockFailure {
    /// Another owner (this process or another) holds the lock.
    #[error("held by another owner")]
    Held,
    /// This handle already holds a lock.
    #[error("handle is already locked")]
    AlreadyLocked,
    #[error("{0}")]
    Os(#[source] io::Error),
}

impl FsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FsError::Open { .. } | FsError::Copy { .. } => ErrorCategory::Open,
            FsError::Read { .. } => ErrorCategory::Read,
            FsError::OpenDir { .. } => ErrorCategory::OpenDir,
            FsError::Delete { .. } => ErrorCategory::Delete,
            FsError::Rename { .. } => ErrorCategory::Rename,
            FsError::Truncate { .. } => ErrorCategory::Truncate,
            FsError::MakeDir { .. } => ErrorCategory::MakeDir,
            FsError::RemoveDir { .. } => ErrorCategory::RemoveDir,
            FsError::Alloc { .. } => ErrorCategory::Alloc,
            FsError::NotFound(_) => ErrorCategory::NotFound,
            FsError::ReadDir { .. } => ErrorCategory::ReadDir,
            FsError::Stat { .. } => ErrorCategory::Stat,
            FsError::Lock { .. } => ErrorCategory::Lock,
            FsError::InvalidMode(_) => ErrorCategory::InvalidMode,
        }
    }

    /// Stable short code for logs (same as `category().as_str()`).
    pub fn code(&self) -> &'static str {
        self.category().as_str()
    }

    /// Path the failure is about (source path for two-path operations).
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            FsError::Open { path, .. }
            | FsError::Read { path, .. }
            | FsError::OpenDir { path, .. }
            | FsError::Delete { path, .. }
            | FsError::Truncate { path, .. }
            | FsError::MakeDir { path, .. }
            | FsError::RemoveDir { path, .. }
            | FsError::Alloc { path, .. }
            | FsError::ReadDir { path, .. }
            | FsError::Stat { path, .. }
            | FsError::Lock { path, .. } => Some(path),
            FsError::Rename { from, .. } | FsError::Copy { from, .. } => Some(from),
            FsError::NotFound(path) => Some(path),
            FsError::InvalidMode(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_error_carries_failing_path() {
        let err = FsError::Delete {
            path: PathBuf::from("/tmp/busy.dat"),
            attempts: 5,
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.category(), ErrorCategory::Delete);
        assert_eq!(err.code(), "delete_failed");
        assert_eq!(err.path(), Some(std::path::Path::new("/tmp/busy.dat")));
        assert!(err.to_string().contains("5 attempt(s)"));
    }

    #[test]
    fn copy_reports_open_category() {
        let err = FsError::Copy {
            from: PathBuf::from("a"),
            to: PathBuf::from("b"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.category(), ErrorCategory::Open);
    }

    #[test]
    fn lock_held_message() {
        let err = FsError::Lock { path: PathBuf::from("x.lock"), reason: LockFailure::Held };
        assert_eq!(err.to_string(), "cannot lock 'x.lock': held by another owner");
    }

    #[test]
    fn lock_os_failure_chains_to_io_error() {
        use std::error::Error as _;
        let err = FsError::Lock {
            path: PathBuf::from("x.lock"),
            reason: LockFailure::Os(io::Error::from(io::ErrorKind::PermissionDenied)),
        };
        let io = err
            .source()
            .and_then(|reason| reason.source())
            .and_then(|e| e.downcast_ref::<io::Error>())
            .expect("io error at the end of the chain");
        assert_eq!(io.kind(), io::ErrorKind::PermissionDenied);
    }
}
