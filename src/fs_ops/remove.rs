//! Removal: retrying delete, single-directory removal, best-effort clean-out.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::FsError;

use super::retry::{retry_io, RetryPolicy};

/// Delete the file (or empty directory, or symlink) at `path` with the
/// default retry policy.
pub fn delete_file(path: impl AsRef<Path>) -> Result<(), FsError> {
    delete_file_with(path, &RetryPolicy::default())
}

/// Delete with an explicit retry policy.
///
/// - Nothing at `path` (symlinks not followed) => Ok without touching anything.
/// - Vanishing between attempts counts as success.
/// - On exhaustion the returned `FsError::Delete` names the path.
pub fn delete_file_with(path: impl AsRef<Path>, policy: &RetryPolicy) -> Result<(), FsError> {
    let path = path.as_ref();
    if let Err(e) = fs::symlink_metadata(path)
        && e.kind() == io::ErrorKind::NotFound
    {
        return Ok(());
    }

    match retry_io(policy, "delete", path, || remove_entry(path)) {
        Ok(()) => Ok(()),
        Err((e, _)) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err((source, attempts)) => {
            warn!(path = %path.display(), attempts, error = %source, "delete failed");
            Err(FsError::Delete {
                path: path.to_path_buf(),
                attempts,
                source,
            })
        }
    }
}

/// Remove one non-directory entry, or one empty directory.
fn remove_entry(path: &Path) -> io::Result<()> {
    let ft = fs::symlink_metadata(path)?.file_type();
    if ft.is_dir() {
        return fs::remove_dir(path);
    }
    match fs::remove_file(path) {
        // Directory symlinks/junctions on Windows need RemoveDirectory.
        Err(e) if cfg!(windows) && ft.is_symlink() => fs::remove_dir(path).map_err(|_| e),
        r => r,
    }
}

/// Remove a single empty directory.
pub fn remove_dir(path: impl AsRef<Path>) -> Result<(), FsError> {
    let path = path.as_ref();
    fs::remove_dir(path).map_err(|source| FsError::RemoveDir {
        path: path.to_path_buf(),
        source,
    })
}

/// An entry `clean_out_dir` could not remove.
#[derive(Debug)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub error: io::Error,
}

/// Result of a best-effort clean-out.
#[derive(Debug, Default)]
pub struct CleanReport {
    /// Top-level entries removed (a removed directory counts once).
    pub removed: usize,
    pub skipped: Vec<SkippedEntry>,
}

impl CleanReport {
    /// True when nothing resisted removal.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Remove everything inside `dir` (but not `dir` itself), continuing past
/// failures. Never fails: an unreadable directory gives an empty report, and
/// entries that resist removal are listed in `skipped`.
pub fn clean_out_dir(dir: impl AsRef<Path>) -> CleanReport {
    let dir = dir.as_ref();
    let mut report = CleanReport::default();

    let entries = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            debug!(path = %dir.display(), error = %e, "clean-out: directory not readable; nothing done");
            return report;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(en) => en,
            Err(e) => {
                debug!(path = %dir.display(), error = %e, "clean-out: listing cut short");
                break;
            }
        };
        let path = entry.path();
        let res = match entry.file_type() {
            Ok(ft) if ft.is_dir() => fs::remove_dir_all(&path),
            _ => remove_entry(&path),
        };
        match res {
            Ok(()) => report.removed += 1,
            Err(error) => {
                warn!(path = %path.display(), error = %error, "clean-out: entry left in place");
                report.skipped.push(SkippedEntry { path, error });
            }
        }
    }

    debug!(path = %dir.display(), removed = report.removed, skipped = report.skipped.len(), "clean-out done");
    report
}
