//! Retrying open with C-style mode strings.
//!
//! Accepted modes: `r`, `w`, `a`, each optionally followed by `+`, plus any of
//! `b`/`t` (ignored; all I/O is binary) and `x` (exclusive create, `w` only).
//!
//! Handles are close-on-exec on Unix and opened with read/write/delete
//! sharing on Windows (std defaults), so other processes are not locked out.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::str::FromStr;

use crate::errors::FsError;

use super::retry::{retry_io, RetryPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Write,
    Append,
}

/// Parsed form of an fopen-style mode string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenMode {
    access: Access,
    update: bool,
    exclusive: bool,
}

impl OpenMode {
    pub const READ: OpenMode = OpenMode { access: Access::Read, update: false, exclusive: false };
    pub const WRITE: OpenMode = OpenMode { access: Access::Write, update: false, exclusive: false };
    pub const APPEND: OpenMode = OpenMode { access: Access::Append, update: false, exclusive: false };

    /// True for `r`/`r+`, which never create the file.
    pub fn is_read(&self) -> bool {
        self.access == Access::Read
    }

    pub fn options(&self) -> OpenOptions {
        let mut o = OpenOptions::new();
        match self.access {
            Access::Read => {
                o.read(true).write(self.update);
            }
            Access::Write => {
                o.write(true).read(self.update);
                if self.exclusive {
                    o.create_new(true);
                } else {
                    o.create(true).truncate(true);
                }
            }
            Access::Append => {
                o.append(true).create(true).read(self.update);
            }
        }
        o
    }
}

impl FromStr for OpenMode {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FsError::InvalidMode(s.to_string());
        let mut chars = s.chars();
        let access = match chars.next() {
            Some('r') => Access::Read,
            Some('w') => Access::Write,
            Some('a') => Access::Append,
            _ => return Err(invalid()),
        };
        let mut mode = OpenMode { access, update: false, exclusive: false };
        for c in chars {
            match c {
                '+' if !mode.update => mode.update = true,
                'b' | 't' => {}
                'x' if access == Access::Write && !mode.exclusive => mode.exclusive = true,
                _ => return Err(invalid()),
            }
        }
        Ok(mode)
    }
}

/// Open `path` with an fopen-style `mode`, retrying transient failures with
/// the default open policy.
pub fn open_file(path: impl AsRef<Path>, mode: &str) -> Result<File, FsError> {
    open_file_with(path, mode.parse()?, &RetryPolicy::open_default())
}

/// Open with a parsed mode and explicit policy. A missing file (or missing
/// parent directory) is never retried.
pub fn open_file_with(
    path: impl AsRef<Path>,
    mode: OpenMode,
    policy: &RetryPolicy,
) -> Result<File, FsError> {
    let path = path.as_ref();
    let opts = mode.options();
    retry_io(policy, "open", path, || opts.open(path)).map_err(|(source, _)| FsError::Open {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;
    use std::io::{Read, Write};
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    #[test]
    fn parses_modes() {
        assert_eq!("r".parse::<OpenMode>().unwrap(), OpenMode::READ);
        assert_eq!("rb".parse::<OpenMode>().unwrap(), OpenMode::READ);
        assert_eq!("w".parse::<OpenMode>().unwrap(), OpenMode::WRITE);
        assert_eq!("ab".parse::<OpenMode>().unwrap(), OpenMode::APPEND);
        assert!("r+b".parse::<OpenMode>().is_ok());
        assert!("wx".parse::<OpenMode>().is_ok());
        for bad in ["", "z", "rx", "r++", "wxx", "q+"] {
            let err = bad.parse::<OpenMode>().unwrap_err();
            assert_eq!(err.category(), ErrorCategory::InvalidMode, "mode {bad:?}");
        }
    }

    #[test]
    fn write_then_append_then_read() {
        let td = tempdir().unwrap();
        let p = td.path().join("f.txt");
        open_file(&p, "w").unwrap().write_all(b"one").unwrap();
        open_file(&p, "a").unwrap().write_all(b"two").unwrap();
        let mut s = String::new();
        open_file(&p, "r").unwrap().read_to_string(&mut s).unwrap();
        assert_eq!(s, "onetwo");
        // "w" truncates.
        open_file(&p, "wb").unwrap().write_all(b"3").unwrap();
        assert_eq!(std::fs::read(&p).unwrap(), b"3");
    }

    #[test]
    fn exclusive_create_refuses_existing() {
        let td = tempdir().unwrap();
        let p = td.path().join("f");
        std::fs::write(&p, b"").unwrap();
        let err = open_file(&p, "wx").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Open);
    }

    #[test]
    fn missing_file_for_read_is_not_retried() {
        let td = tempdir().unwrap();
        let slow = RetryPolicy::new(5, Duration::from_secs(2));
        let started = Instant::now();
        let err = open_file_with(td.path().join("absent"), OpenMode::READ, &slow).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Open);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
