//! Path helpers: working directory, absolutisation and directory part.

use std::env;
use std::path::{Path, PathBuf};

/// The process working directory, or `None` if it cannot be determined
/// (e.g. it was removed underneath us).
pub fn current_dir() -> Option<PathBuf> {
    env::current_dir().ok()
}

/// Make `path` absolute against the working directory without touching the
/// filesystem beyond reading the cwd. Symlinks are not resolved.
/// Falls back to `path` unchanged if the cwd is unavailable.
pub fn relative_to_absolute(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    match std::path::absolute(path) {
        Ok(abs) => dunce::simplified(&abs).to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}

/// Directory part of `path`: everything before the last component.
/// A bare file name yields an empty path.
pub fn path_to_dir(path: impl AsRef<Path>) -> PathBuf {
    path.as_ref()
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}
