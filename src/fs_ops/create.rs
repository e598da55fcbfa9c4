//! Creation and resizing: touch, make_dir, make_dirs, truncate, allocate_file.

use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use tracing::{debug, info, trace};

use crate::errors::FsError;

/// Create an empty file at `path` unless something (of any type) is already there.
pub fn touch(path: impl AsRef<Path>) -> Result<(), FsError> {
    let path = path.as_ref();
    if fs::symlink_metadata(path).is_ok() {
        return Ok(());
    }
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(()),
        // Someone else created it between the check and the open.
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(FsError::Open {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Create one directory. An existing directory is success; anything else in
/// the way is an error.
pub fn make_dir(path: impl AsRef<Path>) -> Result<(), FsError> {
    let path = path.as_ref();
    match fs::create_dir(path) {
        Ok(()) => {
            debug!(path = %path.display(), "created directory");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(source) => Err(FsError::MakeDir {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Create every missing directory leading up to `base_dir/relative_file_path`.
/// The file itself is not created. Idempotent.
pub fn make_dirs(
    base_dir: impl AsRef<Path>,
    relative_file_path: impl AsRef<Path>,
) -> Result<(), FsError> {
    let full = base_dir.as_ref().join(relative_file_path);
    let Some(dir) = full.parent() else {
        return Ok(());
    };
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| FsError::MakeDir {
        path: dir.to_path_buf(),
        source,
    })?;
    info!(path = %dir.display(), "created directory tree");
    Ok(())
}

/// Resize an existing file to exactly `size` bytes, zero-filling when growing.
pub fn truncate(path: impl AsRef<Path>, size: u64) -> Result<(), FsError> {
    let path = path.as_ref();
    let to_err = |source| FsError::Truncate {
        path: path.to_path_buf(),
        size,
        source,
    };
    let f = OpenOptions::new().write(true).open(path).map_err(to_err)?;
    f.set_len(size).map_err(to_err)
}

/// Create (or replace) `path` as a file of exactly `size` bytes with its
/// blocks reserved up front, so later writes cannot run out of space.
/// Any previous content is discarded.
pub fn allocate_file(path: impl AsRef<Path>, size: u64) -> Result<(), FsError> {
    let path = path.as_ref();
    let f = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|source| FsError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let to_err = |source| FsError::Truncate {
        path: path.to_path_buf(),
        size,
        source,
    };
    // Zero-length reservations are rejected by posix_fallocate.
    if size > 0 {
        f.allocate(size).map_err(to_err)?;
    }
    f.set_len(size).map_err(to_err)?;
    trace!(path = %path.display(), size, "allocated file");
    Ok(())
}
