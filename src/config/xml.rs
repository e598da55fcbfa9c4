//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a commented template on request (`client_fs init-config`).
//!
//! Notes:
//! - A missing file is not an error: defaults apply.
//! - Unknown tags, unparsable numbers and unknown log levels are errors, so
//!   a typo never silently falls back to a default.

use anyhow::{bail, Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::de::Error as _;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use crate::fs_ops::{
    io_error_with_help, RetryPolicy, DEFAULT_OPEN_RETRY_ATTEMPTS, DEFAULT_OPEN_RETRY_DELAY,
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY,
};
use crate::platform::write_config_secure_new_0600;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(default, deserialize_with = "de_trimmed_opt")]
    retry_attempts: Option<u32>,
    #[serde(default, deserialize_with = "de_trimmed_opt")]
    retry_delay_ms: Option<u64>,
    #[serde(default, deserialize_with = "de_trimmed_opt")]
    open_retry_attempts: Option<u32>,
    #[serde(default, deserialize_with = "de_trimmed_opt")]
    open_retry_delay_ms: Option<u64>,
    #[serde(default, deserialize_with = "de_trimmed_opt")]
    log_level: Option<LogLevel>,
    log_file: Option<String>,
}

// Parse an optional value from trimmed element text; blank means unset.
fn de_trimmed_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(|e| D::Error::custom(format!("'{s}': {e}"))),
    }
}

fn xml_to_config(parsed: XmlConfig) -> Config {
    let mut cfg = Config::default();
    cfg.retry = RetryPolicy::new(
        parsed.retry_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS),
        parsed
            .retry_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_RETRY_DELAY),
    );
    cfg.open_retry = RetryPolicy::new(
        parsed.open_retry_attempts.unwrap_or(DEFAULT_OPEN_RETRY_ATTEMPTS),
        parsed
            .open_retry_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_OPEN_RETRY_DELAY),
    );
    if let Some(level) = parsed.log_level {
        cfg.log_level = level;
    }
    // An empty <log_file/> disables file logging.
    cfg.log_file = parsed
        .log_file
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Into::into);
    cfg
}

/// Load a Config from a specific XML file.
pub fn load_config_from_xml(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(io_error_with_help("read config xml", path))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(xml_to_config(parsed))
}

/// Load the config in effect (`$CLIENT_FS_CONFIG` or the OS default path).
/// A missing file yields defaults.
pub fn load_config() -> Result<Config> {
    let path = default_config_path()?;
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(Config::default());
    }
    load_config_from_xml(&path)
}

/// Write a commented template config to `path`. Refuses to overwrite an
/// existing file or to write beneath a symlinked directory.
pub fn write_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!("refusing to create config: ancestor of {} is a symlink", path.display());
    }
    if fs::symlink_metadata(path).is_ok() {
        bail!("config already exists at {}", path.display());
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "/path/to/client_fs.log".into());

    let content = format!(
        "<!--\n  client_fs configuration (XML)\n\n    retry_attempts       -> attempts for delete/rename (including the first)\n    retry_delay_ms       -> pause between delete/rename attempts\n    open_retry_attempts  -> attempts for opening files\n    open_retry_delay_ms  -> pause between open attempts\n    log_level            -> quiet | normal | info | debug\n    log_file             -> path to log file (empty = console only)\n\n  CLI flags override these values.\n-->\n<config>\n  <retry_attempts>{}</retry_attempts>\n  <retry_delay_ms>{}</retry_delay_ms>\n  <open_retry_attempts>{}</open_retry_attempts>\n  <open_retry_delay_ms>{}</open_retry_delay_ms>\n  <log_level>normal</log_level>\n  <log_file>{}</log_file>\n</config>\n",
        DEFAULT_RETRY_ATTEMPTS,
        DEFAULT_RETRY_DELAY.as_millis(),
        DEFAULT_OPEN_RETRY_ATTEMPTS,
        DEFAULT_OPEN_RETRY_DELAY.as_millis(),
        suggested_log,
    );

    write_config_secure_new_0600(path, content.as_bytes())?;
    info!("Created template config at {}", path.display());
    Ok(())
}
