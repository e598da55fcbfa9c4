//! Unix implementations of platform helpers (Linux, macOS, BSDs).

use super::common_unix::atomic_write_0600;
use super::{LockAttempt, LockError, LockStage};
use anyhow::Result;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::fd::AsRawFd;
use std::os::unix::fs::{MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::Path;
use tracing::trace;

/// Open (creating if needed) `path` and take `flock(LOCK_EX | LOCK_NB)` on it.
/// The lock lives as long as the returned file descriptor.
pub fn open_exclusive(path: &Path) -> Result<LockAttempt, LockError> {
    let f = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .custom_flags(libc::O_CLOEXEC)
        .mode(0o600)
        .open(path)
        .map_err(|source| LockError { stage: LockStage::Open, source })?;

    let rc = unsafe { libc::flock(f.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        trace!(path = %path.display(), "flock acquired");
        return Ok(LockAttempt::Acquired(f));
    }
    let err = io::Error::last_os_error();
    if let Some(code) = err.raw_os_error()
        && code == libc::EWOULDBLOCK
    {
        trace!(path = %path.display(), "flock would block");
        return Ok(LockAttempt::Held);
    }
    Err(LockError { stage: LockStage::Lock, source: err })
}

/// Release the flock and close the descriptor. Best-effort: errors are ignored
/// since closing the descriptor drops the lock anyway.
pub fn close_exclusive(file: File) {
    let _ = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_UN) };
    drop(file);
}

/// Errors where another attempt cannot change the outcome.
pub fn is_permanent_error(e: &io::Error) -> bool {
    if e.kind() == io::ErrorKind::NotFound || e.kind() == io::ErrorKind::InvalidInput {
        return true;
    }
    matches!(
        e.raw_os_error(),
        Some(
            libc::ENOENT
                | libc::ENOTDIR
                | libc::EISDIR
                | libc::ENOTEMPTY
                | libc::EEXIST
                | libc::EXDEV
                | libc::EROFS
                | libc::EINVAL
                | libc::ELOOP
                | libc::ENAMETOOLONG
        )
    )
}

/// True when both paths resolve to the same inode. Missing paths are never the same.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(x), Ok(y)) => x.dev() == y.dev() && x.ino() == y.ino(),
        _ => false,
    }
}

/// Open log file for appending; set 0600 only when creating a new file.
/// If the file already exists, we preserve its existing permissions to avoid
/// clobbering administrator adjustments (e.g. group-readable for log shipping).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600) // applies on create
        .open(path)?;
    if !existed {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(f)
}

/// Write config atomically: temp file (0600) + fsync + rename + fsync dir.
pub fn write_config_secure_new_0600(path: &Path, contents: &[u8]) -> Result<()> {
    atomic_write_0600(path, contents)
}
