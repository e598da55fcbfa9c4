//! Stateless existence and type queries.
//!
//! None of these raise: any OS error, including the path not existing,
//! answers `false`.

use std::fs;
use std::path::Path;

/// True if `path` is a regular file, following symlinks.
pub fn is_file(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// True if `path` is a directory, following symlinks.
pub fn is_dir(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// True if `path` itself is a symlink (dangling or not).
pub fn is_symlink(path: impl AsRef<Path>) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// True if `path` is a readable directory with no entries.
pub fn is_dir_empty(path: impl AsRef<Path>) -> bool {
    match fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => false,
    }
}

/// Purely syntactic; does not touch the filesystem.
pub fn is_path_absolute(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_absolute()
}

/// True if something exists at `path` after following symlinks.
/// A dangling symlink does not exist.
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).is_ok()
}

/// True if anything, including a dangling symlink, exists at `path`.
pub fn file_or_symlink_exists(path: impl AsRef<Path>) -> bool {
    fs::symlink_metadata(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_path_is_nothing() {
        let td = tempdir().unwrap();
        let p = td.path().join("nope");
        assert!(!is_file(&p));
        assert!(!is_dir(&p));
        assert!(!is_symlink(&p));
        assert!(!is_dir_empty(&p));
        assert!(!file_exists(&p));
        assert!(!file_or_symlink_exists(&p));
    }

    #[test]
    fn file_and_dir() {
        let td = tempdir().unwrap();
        let f = td.path().join("f.txt");
        fs::write(&f, b"x").unwrap();
        assert!(is_file(&f));
        assert!(!is_dir(&f));
        assert!(is_dir(td.path()));
        assert!(!is_dir_empty(td.path()));
        // A file is not an empty directory.
        assert!(!is_dir_empty(&f));
    }

    #[test]
    fn empty_dir() {
        let td = tempdir().unwrap();
        assert!(is_dir_empty(td.path()));
    }

    #[test]
    fn absolute_is_syntactic() {
        assert!(!is_path_absolute("relative/path"));
        #[cfg(unix)]
        assert!(is_path_absolute("/definitely/not/there"));
        #[cfg(windows)]
        assert!(is_path_absolute(r"C:\definitely\not\there"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_resolve_to_target_type() {
        use std::os::unix::fs::symlink;
        let td = tempdir().unwrap();
        let target = td.path().join("target.txt");
        fs::write(&target, b"t").unwrap();
        let link = td.path().join("link");
        symlink(&target, &link).unwrap();
        assert!(is_symlink(&link));
        assert!(is_file(&link));
        assert!(!is_symlink(&target));

        let dangling = td.path().join("dangling");
        symlink(td.path().join("gone"), &dangling).unwrap();
        assert!(is_symlink(&dangling));
        assert!(!is_file(&dangling));
        assert!(!file_exists(&dangling));
        assert!(file_or_symlink_exists(&dangling));
    }
}
