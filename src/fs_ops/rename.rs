//! Retrying rename.
//! - Replaces an existing destination file wherever the OS allows it
//!   (POSIX rename; MoveFileEx with REPLACE_EXISTING on Windows via std).
//! - A missing source is permanent and fails on the first attempt.
//! - On failure both names are left as they were.

use std::fs;
use std::path::Path;
use tracing::{trace, warn};

use crate::errors::FsError;

use super::retry::{retry_io, RetryPolicy};

pub fn rename(old: impl AsRef<Path>, new: impl AsRef<Path>) -> Result<(), FsError> {
    rename_with(old, new, &RetryPolicy::default())
}

pub fn rename_with(
    old: impl AsRef<Path>,
    new: impl AsRef<Path>,
    policy: &RetryPolicy,
) -> Result<(), FsError> {
    let (old, new) = (old.as_ref(), new.as_ref());
    match retry_io(policy, "rename", old, || fs::rename(old, new)) {
        Ok(()) => {
            trace!(from = %old.display(), to = %new.display(), "renamed");
            Ok(())
        }
        Err((source, attempts)) => {
            warn!(from = %old.display(), to = %new.display(), attempts, error = %source, "rename failed");
            Err(FsError::Rename {
                from: old.to_path_buf(),
                to: new.to_path_buf(),
                attempts,
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    fn fast() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1))
    }

    #[test]
    fn rename_overwrites_destination() {
        let td = tempdir().unwrap();
        let a = td.path().join("a");
        let b = td.path().join("b");
        fs::write(&a, b"new").unwrap();
        fs::write(&b, b"old").unwrap();
        rename_with(&a, &b, &fast()).unwrap();
        assert!(!a.exists());
        assert_eq!(fs::read(&b).unwrap(), b"new");
    }

    #[test]
    fn missing_source_fails_fast_and_leaves_destination() {
        let td = tempdir().unwrap();
        let b = td.path().join("b");
        fs::write(&b, b"keep").unwrap();
        let err = rename_with(td.path().join("absent"), &b, &fast()).unwrap_err();
        match err {
            FsError::Rename { attempts, .. } => assert_eq!(attempts, 1),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read(&b).unwrap(), b"keep");
    }
}
