//! Bounded head/tail reads.

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::trace;

use super::open::{open_file_with, OpenMode};
use super::retry::RetryPolicy;
use crate::errors::FsError;

/// Read up to `max_len` bytes of `path` (`0` = whole file).
///
/// With `tail` set and a file longer than `max_len`, the last `max_len`
/// bytes are returned instead of the first. A file that shrinks under us
/// yields whatever was actually there. The open is retried with
/// [`RetryPolicy::open_default`].
pub fn read_bounded(path: impl AsRef<Path>, max_len: u64, tail: bool) -> Result<Vec<u8>, FsError> {
    read_bounded_with(path, max_len, tail, &RetryPolicy::open_default())
}

/// [`read_bounded`] with an explicit policy for the open.
pub fn read_bounded_with(
    path: impl AsRef<Path>,
    max_len: u64,
    tail: bool,
    policy: &RetryPolicy,
) -> Result<Vec<u8>, FsError> {
    let path = path.as_ref();
    let read_err = |source| FsError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut f = open_file_with(path, OpenMode::READ, policy)?;
    let size = f
        .metadata()
        .map_err(|source| FsError::Open {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    let (offset, want) = if max_len == 0 || size <= max_len {
        (0, size)
    } else if tail {
        (size - max_len, max_len)
    } else {
        (0, max_len)
    };

    let mut buf = Vec::new();
    let reserve = usize::try_from(want).unwrap_or(usize::MAX);
    buf.try_reserve_exact(reserve).map_err(|source| FsError::Alloc {
        path: path.to_path_buf(),
        requested: want,
        source,
    })?;

    if offset > 0 {
        f.seek(SeekFrom::Start(offset)).map_err(read_err)?;
    }
    f.take(want).read_to_end(&mut buf).map_err(read_err)?;

    trace!(path = %path.display(), size, offset, read = buf.len(), "bounded read");
    Ok(buf)
}

/// Like [`read_bounded`], decoding lossily as UTF-8.
pub fn read_bounded_string(
    path: impl AsRef<Path>,
    max_len: u64,
    tail: bool,
) -> Result<String, FsError> {
    let bytes = read_bounded(path, max_len, tail)?;
    Ok(match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
