//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/log paths and detects symlinked ancestors for safety.

use anyhow::{bail, Result};
use dirs::{config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::paths::relative_to_absolute;

/// Environment variable naming an explicit config file (or a directory holding `config.xml`).
pub const CONFIG_ENV: &str = "CLIENT_FS_CONFIG";

const APP_DIR: &str = "client_fs";

/// Config path in effect: `$CLIENT_FS_CONFIG` if set, else the OS default.
/// A relative override is resolved against the working directory; a
/// directory override means `config.xml` inside it.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(raw) = env::var_os(CONFIG_ENV)
        && !raw.is_empty()
    {
        let p = relative_to_absolute(PathBuf::from(raw));
        return Ok(if p.is_dir() { p.join("config.xml") } else { p });
    }
    if let Some(base) = config_dir() {
        return Ok(base.join(APP_DIR).join("config.xml"));
    }
    if let Some(home) = env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".config").join(APP_DIR).join("config.xml"));
    }
    bail!("cannot determine a config directory; set {CONFIG_ENV}")
}

/// OS-appropriate default log file path (data dir). Nothing is created.
pub fn default_log_path() -> Result<PathBuf> {
    if let Some(base) = data_dir() {
        return Ok(base.join(APP_DIR).join("client_fs.log"));
    }
    if let Some(home) = env::var_os("HOME") {
        return Ok(PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR)
            .join("client_fs.log"));
    }
    bail!("cannot determine a data directory for the log file")
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.as_os_str().is_empty() {
            break;
        }
        match fs::symlink_metadata(anc) {
            Ok(meta) if meta.file_type().is_symlink() => return Ok(true),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        p = anc.parent();
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn plain_ancestors_are_not_symlinks() {
        let td = tempdir().unwrap();
        let p = td.path().join("a").join("b").join("log.txt");
        assert!(!path_has_symlink_ancestor(&p).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn detects_symlinked_ancestor() {
        let td = tempdir().unwrap();
        let real = td.path().join("real");
        fs::create_dir(&real).unwrap();
        let link = td.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        assert!(path_has_symlink_ancestor(&link.join("log.txt")).unwrap());
    }

    #[test]
    fn default_log_path_is_under_app_dir() {
        if let Ok(p) = default_log_path() {
            assert!(p.ends_with(Path::new(APP_DIR).join("client_fs.log")));
        }
    }
}
