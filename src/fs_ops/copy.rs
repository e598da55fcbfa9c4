//! Single-attempt copy with overwrite semantics.

use std::fs;
use std::io;
use std::path::Path;
use tracing::trace;

use crate::errors::FsError;
use crate::platform::same_file;

/// Copy `src` to `dst`, replacing `dst` if it exists. Returns bytes copied.
/// No retry: a failure is reported as-is. Copying a file onto itself (same
/// path, symlink alias or hardlink) is refused and leaves it untouched.
pub fn copy(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<u64, FsError> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    let to_err = |source| FsError::Copy {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source,
    };
    if same_file(src, dst) {
        return Err(to_err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "source and destination are the same file",
        )));
    }
    let bytes = fs::copy(src, dst).map_err(to_err)?;
    trace!(from = %src.display(), to = %dst.display(), bytes, "copied");
    Ok(bytes)
}
