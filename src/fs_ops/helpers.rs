//! I/O helper utilities.
//!
//! Small adapters that enrich io::Error with actionable hints, usable with
//! map_err in both io::Result and anyhow::Result code paths.
//!
//! Usage:
//!   // in functions returning anyhow::Result<_>
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create dir", dir))?;
//!
//!   // in functions returning io::Result<_>
//!   File::open(p).map_err(io_error_with_help_io("open file", p))?;

use anyhow::anyhow;
use std::error::Error as _;
use std::io;
use std::path::Path;

use crate::errors::FsError;

/// Platform-aware hint for an I/O error, if we have one.
pub fn hint_for(e: &io::Error) -> Option<&'static str> {
    if let Some(code) = e.raw_os_error()
        && let Some(h) = os_hint(code)
    {
        return Some(h);
    }
    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and permissions"),
        io::ErrorKind::NotFound => Some("path not found; verify it exists"),
        io::ErrorKind::AlreadyExists => Some("already exists; remove it or choose another name"),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
            Some("busy; retry once the other user lets go")
        }
        _ => None,
    }
}

/// Hint for the I/O error underneath an `FsError`.
pub fn hint_for_fs_error(e: &FsError) -> Option<&'static str> {
    match e {
        FsError::Lock { reason: crate::errors::LockFailure::Held, .. } => {
            Some("another instance holds this lock")
        }
        FsError::InvalidMode(_) => Some("valid modes look like r, w+, ab or wx"),
        _ => std::iter::successors(e.source(), |&s: &&(dyn std::error::Error + 'static)| s.source())
            .find_map(|s| s.downcast_ref::<io::Error>())
            .and_then(hint_for),
    }
}

#[cfg(unix)]
fn os_hint(code: i32) -> Option<&'static str> {
    Some(match code {
        libc::EACCES | libc::EPERM => "permission denied; check ownership and permissions",
        libc::EXDEV => "cross-filesystem; rename cannot move between devices",
        libc::EBUSY => "resource busy; another process is using it",
        libc::ENOENT => "path not found; verify it exists",
        libc::EEXIST => "already exists; remove it or choose another name",
        libc::ENOTEMPTY => "directory not empty",
        libc::ENOSPC => "insufficient space on device",
        libc::EROFS => "read-only filesystem",
        libc::ELOOP => "too many levels of symbolic links",
        libc::ENAMETOOLONG => "file name or path too long",
        libc::EMFILE => "process file descriptor limit reached",
        libc::ENFILE => "system-wide file table full",
        _ => return None,
    })
}

#[cfg(windows)]
fn os_hint(code: i32) -> Option<&'static str> {
    Some(match code {
        5 => "access denied; check permissions or a pending delete",
        17 => "not same device; rename cannot move between volumes",
        32 => "sharing violation; the file is in use",
        33 => "lock violation; part of the file is locked",
        2 | 3 => "path not found; verify it exists",
        80 | 183 => "already exists; remove it or choose another name",
        112 => "insufficient disk space",
        19 => "write-protected media",
        145 => "directory not empty",
        206 => "file name or path too long",
        4 => "too many open files",
        _ => return None,
    })
}

#[cfg(not(any(unix, windows)))]
fn os_hint(_code: i32) -> Option<&'static str> {
    None
}

/// Format "op 'path': error (hint) [os code: N]".
fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    if let Some(h) = hint_for(e) {
        msg.push_str(&format!(" ({h})"));
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {}]", code));
    }
    msg
}

/// Adapter for anyhow::Result code.
/// Returns a closure suitable for `.map_err(...)` that converts io::Error -> anyhow::Error.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

/// Adapter for io::Result code. Keeps the original ErrorKind.
pub fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}
