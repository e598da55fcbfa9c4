use owo_colors::OwoColorize;

/// Consistent, colored user-facing messages for the `client_fs` binary.
/// Colors are enabled only when the target stream is a TTY.
fn stdout_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn stderr_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

pub fn print_info(msg: &str) {
    if stdout_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if stderr_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if stderr_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

/// Follow-up line under an error, e.g. "sharing violation; the file is in use".
pub fn print_hint(msg: &str) {
    if stderr_tty() {
        eprintln!("  {} {}", "hint:".dimmed(), msg);
    } else {
        eprintln!("  hint: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if stdout_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// Print a plain line (no prefix). Used for primary outputs such as
/// directory listings and sizes that users may script against.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}
