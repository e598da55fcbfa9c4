//! Lazy directory-entry enumeration.
//!
//! One cursor type, `DirScanner`, with an explicit hidden-entry policy:
//! - `EntryFilter::SkipDotPrefixed`: skip every name starting with `.`
//! - `EntryFilter::SkipDotAndDotDot`: skip exactly `.` and `..`
//!
//! Two call shapes share it: the iterator (`DirScanner::open` + `scan`/`next`)
//! and the legacy handle functions `dir_open`/`dir_scan`/`dir_close`.
//!
//! Invariants:
//! - Opening never raises; an unopenable directory is an exhausted cursor
//!   (`dir_open` reports it as `None`).
//! - Once exhausted, closed, or cut short by an OS error mid-listing, every
//!   further advance yields `None`.
//! - Entry order is whatever the OS returns.

use std::fs::{self, ReadDir};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::FsError;

/// Which entry names a scanner hides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryFilter {
    /// Hide every dot-prefixed name (hidden files included).
    #[default]
    SkipDotPrefixed,
    /// Hide only `.` and `..`.
    SkipDotAndDotDot,
}

impl EntryFilter {
    pub fn accepts(self, name: &str) -> bool {
        match self {
            EntryFilter::SkipDotPrefixed => !name.is_empty() && !name.starts_with('.'),
            EntryFilter::SkipDotAndDotDot => !name.is_empty() && name != "." && name != "..",
        }
    }
}

/// Owned cursor over one directory listing. Not reentrant: advancing needs
/// `&mut self`.
#[derive(Debug)]
pub struct DirScanner {
    path: PathBuf,
    inner: Option<ReadDir>,
    filter: EntryFilter,
}

impl DirScanner {
    /// Open with the default `SkipDotPrefixed` policy.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::with_filter(path, EntryFilter::SkipDotPrefixed)
    }

    pub fn with_filter(path: impl AsRef<Path>, filter: EntryFilter) -> Self {
        let path = path.as_ref().to_path_buf();
        let inner = match fs::read_dir(&path) {
            Ok(rd) => Some(rd),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "directory not opened; scanner is empty");
                None
            }
        };
        Self { path, inner, filter }
    }

    /// Next accepted entry name, or `None` when the listing is over.
    pub fn scan(&mut self) -> Option<String> {
        loop {
            let rd = self.inner.as_mut()?;
            match rd.next() {
                None => {
                    self.inner = None;
                    return None;
                }
                Some(Err(e)) => {
                    debug!(path = %self.path.display(), error = %e, "directory listing cut short");
                    self.inner = None;
                    return None;
                }
                Some(Ok(entry)) => {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    if self.filter.accepts(&name) {
                        return Some(name);
                    }
                }
            }
        }
    }

    /// Release the OS handle now. Further scans yield `None`.
    pub fn close(&mut self) {
        self.inner = None;
    }

    /// False once the cursor is exhausted, failed or closed.
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filter(&self) -> EntryFilter {
        self.filter
    }
}

impl Iterator for DirScanner {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.scan()
    }
}

impl FusedIterator for DirScanner {}

/// Legacy: open a handle that hides only `.` and `..`.
/// Returns `None` if the directory cannot be opened.
pub fn dir_open(path: impl AsRef<Path>) -> Option<DirScanner> {
    let scanner = DirScanner::with_filter(path, EntryFilter::SkipDotAndDotDot);
    scanner.is_open().then_some(scanner)
}

/// Legacy: next entry name from a handle.
pub fn dir_scan(handle: &mut DirScanner) -> Option<String> {
    handle.scan()
}

/// Legacy: release a handle.
pub fn dir_close(handle: DirScanner) {
    drop(handle);
}

/// Collect every accepted entry name of `path`.
/// Unlike the scanner, fails with `ReadDir` when the directory cannot be opened.
pub fn read_dir_names(path: impl AsRef<Path>, filter: EntryFilter) -> Result<Vec<String>, FsError> {
    let path = path.as_ref();
    let rd = fs::read_dir(path).map_err(|source| FsError::ReadDir {
        path: path.to_path_buf(),
        source,
    })?;
    let scanner = DirScanner { path: path.to_path_buf(), inner: Some(rd), filter };
    Ok(scanner.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[test]
    fn filter_policies() {
        assert!(!EntryFilter::SkipDotPrefixed.accepts(".hidden"));
        assert!(!EntryFilter::SkipDotPrefixed.accepts("."));
        assert!(EntryFilter::SkipDotPrefixed.accepts("a.txt"));
        assert!(EntryFilter::SkipDotAndDotDot.accepts(".hidden"));
        assert!(!EntryFilter::SkipDotAndDotDot.accepts(".."));
        assert!(!EntryFilter::SkipDotAndDotDot.accepts(""));
    }

    #[test]
    fn missing_dir_yields_nothing() {
        let td = tempdir().unwrap();
        let mut s = DirScanner::open(td.path().join("absent"));
        assert!(!s.is_open());
        assert_eq!(DirScanner::scan(&mut s), None);
        assert!(dir_open(td.path().join("absent")).is_none());
    }

    #[test]
    fn exhausted_stays_exhausted() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("one"), b"1").unwrap();
        let mut s = DirScanner::open(td.path());
        assert_eq!(DirScanner::scan(&mut s).as_deref(), Some("one"));
        assert_eq!(DirScanner::scan(&mut s), None);
        assert!(!s.is_open());
        // Files created after exhaustion are never reported.
        fs::write(td.path().join("two"), b"2").unwrap();
        assert_eq!(DirScanner::scan(&mut s), None);
        assert_eq!(s.next(), None);
    }

    #[test]
    fn close_ends_listing() {
        let td = tempdir().unwrap();
        for n in ["a", "b", "c"] {
            fs::write(td.path().join(n), n).unwrap();
        }
        let mut s = DirScanner::open(td.path());
        assert!(DirScanner::scan(&mut s).is_some());
        s.close();
        assert_eq!(DirScanner::scan(&mut s), None);
    }

    #[test]
    fn read_dir_names_errors_on_missing() {
        let td = tempdir().unwrap();
        let err = read_dir_names(td.path().join("nope"), EntryFilter::default()).unwrap_err();
        assert_eq!(err.category(), crate::errors::ErrorCategory::ReadDir);
    }

    #[test]
    fn read_dir_names_applies_filter() {
        let td = tempdir().unwrap();
        fs::write(td.path().join(".dot"), b"").unwrap();
        fs::create_dir(td.path().join("sub")).unwrap();
        let names = read_dir_names(td.path(), EntryFilter::SkipDotAndDotDot).unwrap();
        assert_eq!(sorted(names), vec![".dot".to_string(), "sub".to_string()]);
        let names = read_dir_names(td.path(), EntryFilter::SkipDotPrefixed).unwrap();
        assert_eq!(names, vec!["sub".to_string()]);
    }
}
