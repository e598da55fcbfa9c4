//! Process-wide shutdown flag.
//! Set by the binary's Ctrl-C handler; `client_fs lock` polls it to know
//! when to release its lock and exit. The library itself never reads it.
//!
//! Relaxed atomics are sufficient for a one-way "stop" flag, and `request()`
//! is safe to call from a signal handler.
use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Request a cooperative shutdown (idempotent).
#[inline]
pub fn request() {
    SHUTDOWN.store(true, Ordering::Relaxed);
}

#[inline]
pub fn is_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Clear the flag (tests only).
#[cfg(test)]
pub(crate) fn reset() {
    SHUTDOWN.store(false, Ordering::Relaxed);
}
