//! CLI definition and parsing.
//! Defines Args/Command and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - --retry-attempts/--retry-delay-ms override the delete/rename policy from config.

use clap::{Parser, Subcommand, ValueHint};
use client_fs::{Config, LogLevel, RetryPolicy};
use std::path::PathBuf;
use std::time::Duration;

/// Retrying, lock-aware filesystem operations for background clients.
/// CLI flags override config values (loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Retrying, lock-aware filesystem operations")]
pub struct Args {
    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, global = true, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Also write logs to this file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath, help = "Append logs to this file")]
    pub log_file: Option<PathBuf>,

    /// Print where client_fs looks for its config file, then exit.
    #[arg(long, help = "Print the config file location and exit")]
    pub print_config: bool,

    /// Attempts for delete/rename (including the first).
    #[arg(long, global = true, value_name = "N")]
    pub retry_attempts: Option<u32>,

    /// Pause between delete/rename attempts.
    #[arg(long, global = true, value_name = "MS")]
    pub retry_delay_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Delete a file, symlink or empty directory (retrying).
    Rm {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
    /// Rename, replacing the destination (retrying).
    Mv {
        #[arg(value_hint = ValueHint::AnyPath)]
        from: PathBuf,
        #[arg(value_hint = ValueHint::AnyPath)]
        to: PathBuf,
    },
    /// Copy a file, replacing the destination.
    Cp {
        #[arg(value_hint = ValueHint::FilePath)]
        from: PathBuf,
        #[arg(value_hint = ValueHint::FilePath)]
        to: PathBuf,
    },
    /// Resize an existing file.
    Truncate {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        size: u64,
    },
    /// Create or replace a file with `size` bytes reserved on disk.
    Allocate {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        size: u64,
    },
    /// Create an empty file if nothing exists at the path.
    Touch {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Create one directory.
    Mkdir {
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
    },
    /// Create the directories leading up to BASE/RELATIVE_FILE.
    Mkdirs {
        #[arg(value_hint = ValueHint::DirPath)]
        base: PathBuf,
        relative_file: PathBuf,
    },
    /// Remove one empty directory.
    Rmdir {
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
    },
    /// Remove everything inside a directory, keeping the directory.
    Clean {
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
    },
    /// List directory entries.
    Ls {
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
        /// Include dot-prefixed names (only `.` and `..` are hidden).
        #[arg(long)]
        all: bool,
        /// Use the handle-style listing (same output as --all).
        #[arg(long)]
        legacy: bool,
    },
    /// Total size of the regular files in a directory.
    Du {
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
        #[arg(short, long)]
        recursive: bool,
        /// Sum allocated rather than logical sizes.
        #[arg(long)]
        allocated: bool,
        /// Print sizes like "1.5 MiB".
        #[arg(long)]
        human: bool,
    },
    /// Print the head (or tail) of a file.
    Cat {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        /// Byte limit (0 = whole file).
        #[arg(long, default_value_t = 0)]
        max_len: u64,
        #[arg(long)]
        tail: bool,
    },
    /// Describe a path: type, size and allocated size.
    Stat {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
    /// Hold an exclusive lock on a file until interrupted.
    Lock {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Write a template config (to the default location unless PATH is given).
    InitConfig {
        #[arg(value_hint = ValueHint::FilePath)]
        path: Option<PathBuf>,
    },
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(p) = &self.log_file {
            cfg.log_file = Some(p.clone());
        }
        if let Some(n) = self.retry_attempts {
            cfg.retry = RetryPolicy::new(n, cfg.retry.delay);
        }
        if let Some(ms) = self.retry_delay_ms {
            cfg.retry = RetryPolicy::new(cfg.retry.attempts, Duration::from_millis(ms));
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
