//! Size accounting: logical and allocated sizes of files and directory trees.
//! Symlinks are never followed and entries that fail to stat are skipped.

use fs2::FileExt;
use std::fs::{self, File, Metadata};
use std::io;
use std::path::Path;
use tracing::trace;
use walkdir::WalkDir;

use crate::errors::FsError;

/// Logical size of the file at `path` (symlinks followed).
pub fn file_size(path: impl AsRef<Path>) -> Result<u64, FsError> {
    let path = path.as_ref();
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|source| stat_error(path, source))
}

/// Bytes the filesystem has allocated for `path`. Sparse files report less
/// than their logical size; small files usually report a whole block.
pub fn file_size_alloc(path: impl AsRef<Path>) -> Result<u64, FsError> {
    let path = path.as_ref();
    File::open(path)
        .and_then(|f| f.allocated_size())
        .map_err(|source| stat_error(path, source))
}

fn stat_error(path: &Path, source: io::Error) -> FsError {
    if source.kind() == io::ErrorKind::NotFound {
        FsError::NotFound(path.to_path_buf())
    } else {
        FsError::Stat {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Sum of logical sizes of the regular files in `path` (direct children
/// only unless `recurse`).
pub fn dir_size(path: impl AsRef<Path>, recurse: bool) -> Result<u64, FsError> {
    sum_files(path.as_ref(), recurse, |_, md| Some(md.len()))
}

/// Like [`dir_size`] but sums allocated sizes.
pub fn dir_size_alloc(path: impl AsRef<Path>, recurse: bool) -> Result<u64, FsError> {
    sum_files(path.as_ref(), recurse, |p, _| {
        File::open(p).and_then(|f| f.allocated_size()).ok()
    })
}

fn sum_files(
    dir: &Path,
    recurse: bool,
    size_of: impl Fn(&Path, &Metadata) -> Option<u64>,
) -> Result<u64, FsError> {
    let open_dir_err = |source| FsError::OpenDir {
        path: dir.to_path_buf(),
        source,
    };
    let md = fs::metadata(dir).map_err(open_dir_err)?;
    if !md.is_dir() {
        return Err(open_dir_err(io::Error::from(io::ErrorKind::NotADirectory)));
    }

    let max_depth = if recurse { usize::MAX } else { 1 };
    let mut total: u64 = 0;
    let mut files: u64 = 0;
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(md) = entry.metadata() else { continue };
        if let Some(n) = size_of(entry.path(), &md) {
            total = total.saturating_add(n);
            files += 1;
        }
    }
    trace!(path = %dir.display(), recurse, files, total, "summed directory");
    Ok(total)
}

/// Human-readable binary size ("1.5 MiB").
pub fn format_bytes(n: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let f = n as f64;
    if f >= GB {
        format!("{:.1} GiB", f / GB)
    } else if f >= MB {
        format!("{:.1} MiB", f / MB)
    } else if f >= KB {
        format!("{:.1} KiB", f / KB)
    } else {
        format!("{} B", n)
    }
}
