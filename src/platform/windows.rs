//! Windows implementations of platform helpers.
//!
//! Notes:
//! - The exclusive lock is the open itself: share mode 0 makes every other
//!   open fail with ERROR_SHARING_VIOLATION until the handle is closed.
//! - Windows lacks POSIX mode semantics; we do not attempt ACL management here.

use super::temp::tmp_sibling_name;
use super::{LockAttempt, LockError, LockStage};
use anyhow::{bail, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::os::windows::fs::OpenOptionsExt;
use std::path::Path;
use tracing::trace;
use windows_sys::Win32::Storage::FileSystem::{
    SetFileAttributesW, FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_NORMAL,
};

const ERROR_FILE_NOT_FOUND: i32 = 2;
const ERROR_PATH_NOT_FOUND: i32 = 3;
const ERROR_NOT_SAME_DEVICE: i32 = 17;
const ERROR_WRITE_PROTECT: i32 = 19;
const ERROR_SHARING_VIOLATION: i32 = 32;
const ERROR_LOCK_VIOLATION: i32 = 33;
const ERROR_FILE_EXISTS: i32 = 80;
const ERROR_INVALID_NAME: i32 = 123;
const ERROR_DIR_NOT_EMPTY: i32 = 145;
const ERROR_ALREADY_EXISTS: i32 = 183;
const ERROR_FILENAME_EXCED_RANGE: i32 = 206;

/// Open (creating if needed) `path` with no sharing. The lock lives as long
/// as the returned handle.
pub fn open_exclusive(path: &Path) -> Result<LockAttempt, LockError> {
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .share_mode(0)
        .open(path)
    {
        Ok(f) => {
            mark_hidden(path);
            trace!(path = %path.display(), "exclusive handle acquired");
            Ok(LockAttempt::Acquired(f))
        }
        Err(e) => match e.raw_os_error() {
            Some(ERROR_SHARING_VIOLATION) | Some(ERROR_LOCK_VIOLATION) => {
                trace!(path = %path.display(), "exclusive open would block");
                Ok(LockAttempt::Held)
            }
            _ => Err(LockError { stage: LockStage::Open, source: e }),
        },
    }
}

/// Closing the handle releases the lock.
pub fn close_exclusive(file: File) {
    drop(file);
}

/// Errors where another attempt cannot change the outcome. Sharing and lock
/// violations, and access-denied from pending deletes, are retried.
pub fn is_permanent_error(e: &io::Error) -> bool {
    if e.kind() == io::ErrorKind::NotFound || e.kind() == io::ErrorKind::InvalidInput {
        return true;
    }
    matches!(
        e.raw_os_error(),
        Some(
            ERROR_FILE_NOT_FOUND
                | ERROR_PATH_NOT_FOUND
                | ERROR_NOT_SAME_DEVICE
                | ERROR_WRITE_PROTECT
                | ERROR_FILE_EXISTS
                | ERROR_INVALID_NAME
                | ERROR_DIR_NOT_EMPTY
                | ERROR_ALREADY_EXISTS
                | ERROR_FILENAME_EXCED_RANGE
        )
    )
}

/// Ensure the on-disk lock file is hidden so casual dir listings don't show it.
fn mark_hidden(path: &Path) {
    use std::iter::once;
    use std::os::windows::ffi::OsStrExt;
    let wide: Vec<u16> = path.as_os_str().encode_wide().chain(once(0)).collect();
    let _ = unsafe { SetFileAttributesW(wide.as_ptr(), FILE_ATTRIBUTE_NORMAL | FILE_ATTRIBUTE_HIDDEN) };
}

/// True when both paths canonicalize to the same location. Missing paths are
/// never the same. Hardlinks under different names are not detected.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}

/// Open log file for appending (best-effort; no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Write a new config file atomically (create_new) using a temp file + rename.
/// Fails if the target already exists. Best-effort security (no ACL changes).
pub fn write_config_secure_new_0600(path: &Path, contents: &[u8]) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "config path has no parent"))?;
    fs::create_dir_all(parent)?;

    let tmp = tmp_sibling_name(path);
    let mut f = OpenOptions::new().write(true).create_new(true).open(&tmp)?;
    f.write_all(contents)?;
    f.sync_all()?;
    drop(f);
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
