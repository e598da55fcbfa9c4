//! Advisory exclusive lock bound to a lock file.
//!
//! Design:
//! - `lock` opens (creating if needed) the lock file and takes a non-blocking
//!   exclusive lock on it. It never waits: contention is reported as
//!   `LockFailure::Held`.
//! - Unix: flock(LOCK_EX | LOCK_NB). Windows: an open with no sharing.
//! - `unlock` releases the lock and removes the lock file.
//! - Dropping a locked handle releases the lock but leaves the file on disk.
//!
//! Callers typically hold one `FileLock` on a well-known path for the life of
//! the process to keep a second instance from running in the same directory.

use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::{FsError, LockFailure};
use crate::platform::{close_exclusive, open_exclusive, LockAttempt, LockStage};

use super::remove::delete_file;

#[derive(Debug)]
struct Held {
    file: File,
    path: PathBuf,
}

/// A handle that is either unlocked or holds exactly one OS lock.
#[derive(Debug, Default)]
pub struct FileLock {
    held: Option<Held>,
}

impl FileLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle and lock `path` in one step.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self, FsError> {
        let mut lock = Self::new();
        lock.lock(path)?;
        Ok(lock)
    }

    pub fn is_locked(&self) -> bool {
        self.held.is_some()
    }

    /// Backing file of the held lock, if any.
    pub fn path(&self) -> Option<&Path> {
        self.held.as_ref().map(|h| h.path.as_path())
    }

    /// Take the lock on `path` without blocking. On failure the handle stays
    /// unlocked; locking an already locked handle is refused and the existing
    /// lock is left alone.
    pub fn lock(&mut self, path: impl AsRef<Path>) -> Result<(), FsError> {
        let path = path.as_ref();
        if self.held.is_some() {
            return Err(FsError::Lock {
                path: path.to_path_buf(),
                reason: LockFailure::AlreadyLocked,
            });
        }
        match open_exclusive(path) {
            Ok(LockAttempt::Acquired(file)) => {
                debug!(path = %path.display(), "lock acquired");
                self.held = Some(Held {
                    file,
                    path: path.to_path_buf(),
                });
                Ok(())
            }
            Ok(LockAttempt::Held) => Err(FsError::Lock {
                path: path.to_path_buf(),
                reason: LockFailure::Held,
            }),
            Err(e) => Err(match e.stage {
                LockStage::Open => FsError::Open {
                    path: path.to_path_buf(),
                    source: e.source,
                },
                LockStage::Lock => FsError::Lock {
                    path: path.to_path_buf(),
                    reason: LockFailure::Os(e.source),
                },
            }),
        }
    }

    /// Release the lock and delete the lock file. Deletion failures are
    /// logged and otherwise ignored. No-op when unlocked.
    pub fn unlock(&mut self) {
        let Some(Held { file, path }) = self.held.take() else {
            return;
        };
        close_exclusive(file);
        if let Err(e) = delete_file(&path) {
            debug!(path = %path.display(), error = %e, "lock file left behind");
        }
        debug!(path = %path.display(), "lock released");
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Some(Held { file, path }) = self.held.take() {
            close_exclusive(file);
            trace!(path = %path.display(), "lock dropped");
        }
    }
}
