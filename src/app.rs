//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the signal handler and
//! dispatches the requested filesystem command.

use anyhow::{anyhow, bail, Result};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread::sleep;
use std::time::Duration;
use tracing::{debug, error, info};

use client_fs::config::{load_config, write_template_config, CONFIG_ENV};
use client_fs::fs_ops::{format_bytes, hint_for_fs_error};
use client_fs::output as out;
use client_fs::{
    allocate_file, clean_out_dir, copy, default_config_path, delete_file_with, dir_close,
    dir_open, dir_scan, dir_size, dir_size_alloc, file_size, file_size_alloc, is_dir, is_file,
    is_symlink, make_dir, make_dirs, read_bounded_with, read_dir_names, remove_dir, rename_with,
    shutdown, touch, truncate, Config, EntryFilter, FileLock, FsError,
};

use crate::cli::{Args, Command};
use crate::logging::init_tracing;

const LOCK_POLL: Duration = Duration::from_millis(100);
/// Conventional exit status for a process ended by SIGINT.
const EXIT_INTERRUPTED: i32 = 130;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        if let Ok(cfg_env) = std::env::var(CONFIG_ENV) {
            out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {cfg_env}\n"));
            out::print_info(&format!("To override, unset {CONFIG_ENV} or set it to another file."));
            return Ok(());
        }
        match default_config_path() {
            Ok(p) => {
                out::print_info(&format!("Default client_fs config path:\n  {}\n", p.display()));
                if p.exists() {
                    out::print_info("A config file already exists at that location.");
                } else {
                    out::print_info("No config file exists there yet. Run `client_fs init-config` to create a template.");
                }
            }
            Err(e) => {
                out::print_error(&format!("Could not determine a default config path: {e}"));
            }
        }
        return Ok(());
    }

    let Some(command) = args.command.clone() else {
        bail!("no command given; see `client_fs --help`");
    };

    // File values first, then CLI overrides (CLI wins).
    let mut cfg = load_config()?;
    args.apply_overrides(&mut cfg);

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;

    // Guard needs to be dropped on SIGINT to flush logs. Only `lock` polls the
    // shutdown flag; every other command exits right after the flush.
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    let cooperative = matches!(command, Command::Lock { .. });
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; shutting down...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take(); // drop guard here to flush tracing_appender
            }
            if !cooperative {
                std::process::exit(EXIT_INTERRUPTED);
            }
        })
        .map_err(|e| anyhow!("failed to install signal handler: {e}"))?;
    }

    debug!(?command, retry = ?cfg.retry, "starting client_fs");

    let result = dispatch(&command, &cfg);
    if let Err(e) = &result {
        report(e);
    }

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}

/// Log a failure with its stable code and print a hint when there is one.
fn report(e: &anyhow::Error) {
    let Some(fe) = e.downcast_ref::<FsError>() else {
        error!(error = %e, "command failed");
        return;
    };
    let code = fe.code();
    match fe.path() {
        Some(p) => error!(code, path = %p.display(), "{fe}"),
        None => error!(code, "{fe}"),
    }
    if let Some(h) = hint_for_fs_error(fe) {
        out::print_hint(h);
    }
}

fn dispatch(command: &Command, cfg: &Config) -> Result<()> {
    match command {
        Command::Rm { path } => {
            delete_file_with(path, &cfg.retry)?;
            info!(path = %path.display(), "deleted");
        }
        Command::Mv { from, to } => {
            rename_with(from, to, &cfg.retry)?;
            info!(from = %from.display(), to = %to.display(), "renamed");
        }
        Command::Cp { from, to } => {
            let bytes = copy(from, to)?;
            info!(from = %from.display(), to = %to.display(), bytes, "copied");
        }
        Command::Truncate { path, size } => truncate(path, *size)?,
        Command::Allocate { path, size } => allocate_file(path, *size)?,
        Command::Touch { path } => touch(path)?,
        Command::Mkdir { path } => make_dir(path)?,
        Command::Mkdirs { base, relative_file } => make_dirs(base, relative_file)?,
        Command::Rmdir { path } => remove_dir(path)?,
        Command::Clean { path } => {
            let report = clean_out_dir(path);
            for skipped in &report.skipped {
                out::print_warn(&format!("left in place: {} ({})", skipped.path.display(), skipped.error));
            }
            out::print_user(&format!("removed {} entries", report.removed));
            if !report.is_clean() {
                bail!("{} entries could not be removed", report.skipped.len());
            }
        }
        Command::Ls { path, all, legacy } => list(path, *all, *legacy)?,
        Command::Du { path, recursive, allocated, human } => {
            let total = if *allocated {
                dir_size_alloc(path, *recursive)?
            } else {
                dir_size(path, *recursive)?
            };
            out::print_user(&if *human { format_bytes(total) } else { total.to_string() });
        }
        Command::Cat { path, max_len, tail } => {
            let bytes = read_bounded_with(path, *max_len, *tail, &cfg.open_retry)?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
        Command::Stat { path } => stat(path)?,
        Command::Lock { path } => hold_lock(path)?,
        Command::InitConfig { path } => {
            let target = match path {
                Some(p) => p.clone(),
                None => default_config_path()?,
            };
            write_template_config(&target)?;
            out::print_success(&format!("Template config written to {}", target.display()));
        }
    }
    Ok(())
}

fn list(path: &Path, all: bool, legacy: bool) -> Result<()> {
    let mut names = if legacy {
        let Some(mut handle) = dir_open(path) else {
            bail!("cannot open directory '{}'", path.display());
        };
        let mut names = Vec::new();
        while let Some(name) = dir_scan(&mut handle) {
            names.push(name);
        }
        dir_close(handle);
        names
    } else {
        let filter = if all { EntryFilter::SkipDotAndDotDot } else { EntryFilter::SkipDotPrefixed };
        read_dir_names(path, filter)?
    };
    names.sort();
    for n in names {
        out::print_user(&n);
    }
    Ok(())
}

fn stat(path: &Path) -> Result<(), FsError> {
    let kind = if is_symlink(path) && !path.exists() {
        "broken symlink"
    } else if is_dir(path) {
        "directory"
    } else if is_file(path) {
        "file"
    } else if is_symlink(path) || path.exists() {
        "other"
    } else {
        return Err(FsError::NotFound(path.to_path_buf()));
    };
    out::print_user(&format!("path: {}", path.display()));
    out::print_user(&format!("type: {kind}"));
    if is_symlink(path) {
        out::print_user("symlink: yes");
    }
    if kind == "file" {
        out::print_user(&format!("size: {}", file_size(path)?));
        out::print_user(&format!("allocated: {}", file_size_alloc(path)?));
    } else if kind == "directory" {
        out::print_user(&format!("size: {}", dir_size(path, false)?));
        out::print_user(&format!("size_recursive: {}", dir_size(path, true)?));
    }
    Ok(())
}

/// Take the lock and hold it until Ctrl-C, then release it (deleting the file).
fn hold_lock(path: &Path) -> Result<(), FsError> {
    let mut lock = FileLock::acquire(path)?;
    out::print_success(&format!("locked {}; press Ctrl-C to release", path.display()));
    while !shutdown::is_requested() {
        sleep(LOCK_POLL);
    }
    lock.unlock();
    out::print_info("lock released");
    Ok(())
}
