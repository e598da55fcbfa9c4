//! Tracing initialization.
//! Builds a subscriber with EnvFilter, compact or JSON formats, and optional file logging.
//!
//! Behavior:
//! - Log level is driven by LogLevel (no RUST_LOG override here).
//! - Console logs go to stderr so listings and file contents on stdout stay clean.
//! - If `log_file` is provided and passes safety checks, a non-blocking file layer is added.
//!
//! Implementation notes:
//! - File logging uses tracing_appender::non_blocking to avoid blocking on I/O.
//! - We refuse file logging if any ancestor of the file path is a symlink.

use anyhow::{anyhow, Result};
use chrono::Local;
use client_fs::fs_ops::io_error_with_help_io;
use client_fs::output as out;
use client_fs::platform::open_log_file_secure_append;
use client_fs::{default_log_path, path_has_symlink_ancestor, LogLevel};
use std::fmt as stdfmt;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{registry, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Human-friendly timestamp formatter (DD/MM/YY HH:MM:SS)
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> stdfmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%d/%m/%y %H:%M:%S"))
    }
}

#[inline]
fn to_level_filter(lvl: &LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::INFO,
        LogLevel::Info => LevelFilter::DEBUG,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

#[inline]
fn env_filter_from_level(level_filter: LevelFilter) -> EnvFilter {
    let level_str = match level_filter {
        LevelFilter::ERROR => "error",
        LevelFilter::WARN => "warn",
        LevelFilter::INFO => "info",
        LevelFilter::DEBUG => "debug",
        LevelFilter::TRACE => "trace",
        _ => "info",
    };
    EnvFilter::new(level_str)
}

fn fmt_layer<W>(json: bool, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = tsfmt::layer()
        .with_timer(LocalHumanTime)
        .with_level(true)
        .with_target(true)
        .with_writer(writer);
    if json {
        base.json().boxed()
    } else {
        base.compact().boxed()
    }
}

/// Try to open a non-blocking file writer for logging:
/// - Refuse if any ancestor is a symlink (prints a warning and returns None)
/// - Open file for append (creating parents) and wrap with non_blocking
fn maybe_open_non_blocking_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(true) => {
            out::print_warn(&format!(
                "Refusing to enable file logging: ancestor of {} is a symlink",
                path.display()
            ));
            return None;
        }
        Err(e) => {
            out::print_warn(&format!(
                "Cannot check log path {} for symlinks: {}",
                path.display(),
                e
            ));
            return None;
        }
        Ok(false) => {}
    }

    match open_log_file_secure_append(path).map_err(io_error_with_help_io("open log file", path)) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            out::print_warn(&format!("Log file disabled: {e}"));
            None
        }
    }
}

/// Initialize tracing based on LogLevel and format. Returns an optional WorkerGuard
/// if a file appender is created (must be held until shutdown to flush logs).
pub fn init_tracing(
    lvl: &LogLevel,
    log_file: Option<&Path>,
    json: bool,
) -> Result<Option<WorkerGuard>> {
    let env_filter = env_filter_from_level(to_level_filter(lvl));
    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(json, std::io::stderr)];
    let mut guard = None;

    if let Some(path) = log_file {
        if let Some((writer, g)) = maybe_open_non_blocking_writer(path) {
            layers.push(fmt_layer(json, writer));
            guard = Some(g);
        } else {
            out::print_warn(&format!(
                "File logging to '{}' was not enabled; logs continue on stderr.",
                path.display()
            ));
            if let Ok(def) = default_log_path() {
                out::print_info(&format!("The default log path is {}", def.display()));
            }
        }
    }

    registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow!("tracing already initialized: {e}"))?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_one_step_down() {
        assert_eq!(to_level_filter(&LogLevel::Quiet), LevelFilter::ERROR);
        assert_eq!(to_level_filter(&LogLevel::Normal), LevelFilter::INFO);
        assert_eq!(to_level_filter(&LogLevel::Info), LevelFilter::DEBUG);
        assert_eq!(to_level_filter(&LogLevel::Debug), LevelFilter::TRACE);
    }
}
