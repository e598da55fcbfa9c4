//! Bounded retry: a fixed number of attempts separated by a fixed delay.
//!
//! Used by delete, rename and open to ride out transient contention
//! (antivirus scanners, indexers, another client instance holding a handle).
//! The policy is platform-independent; which errors are worth retrying is
//! decided by `platform::is_permanent_error`.

use std::io;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;
use tracing::debug;

use crate::platform::is_permanent_error;

pub const DEFAULT_RETRY_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_OPEN_RETRY_ATTEMPTS: u32 = 5;
pub const DEFAULT_OPEN_RETRY_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; 0 is treated as 1.
    pub attempts: u32,
    /// Sleep between attempts (not after the last one).
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

impl RetryPolicy {
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Default policy for opening files.
    pub const fn open_default() -> Self {
        Self::new(DEFAULT_OPEN_RETRY_ATTEMPTS, DEFAULT_OPEN_RETRY_DELAY)
    }

    /// A single attempt.
    pub const fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn effective_attempts(&self) -> u32 {
        self.attempts.max(1)
    }

    /// Longest time a call can spend sleeping between attempts.
    pub fn max_wait(&self) -> Duration {
        self.delay * (self.effective_attempts() - 1)
    }
}

/// Run `op` until it succeeds, hits a permanent error, or runs out of attempts.
/// On failure returns the last error and how many attempts were made.
pub(crate) fn retry_io<T>(
    policy: &RetryPolicy,
    op_name: &str,
    path: &Path,
    mut op: impl FnMut() -> io::Result<T>,
) -> Result<T, (io::Error, u32)> {
    let attempts = policy.effective_attempts();
    let mut attempt = 1;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) => {
                if is_permanent_error(&e) || attempt >= attempts {
                    return Err((e, attempt));
                }
                debug!(
                    op = op_name,
                    path = %path.display(),
                    attempt,
                    of = attempts,
                    error = %e,
                    "transient failure; retrying"
                );
                sleep(policy.delay);
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy() -> io::Error {
        io::Error::from(io::ErrorKind::PermissionDenied)
    }

    #[test]
    fn succeeds_after_transient_failures() {
        let policy = RetryPolicy::new(4, Duration::from_millis(1));
        let mut calls = 0;
        let out = retry_io(&policy, "test", Path::new("x"), || {
            calls += 1;
            if calls < 3 { Err(busy()) } else { Ok(calls) }
        });
        assert_eq!(out.unwrap(), 3);
    }

    #[test]
    fn exhausts_budget() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let mut calls = 0;
        let (e, attempts) = retry_io(&policy, "test", Path::new("x"), || -> io::Result<()> {
            calls += 1;
            Err(busy())
        })
        .unwrap_err();
        assert_eq!(calls, 3);
        assert_eq!(attempts, 3);
        assert_eq!(e.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn permanent_error_stops_immediately() {
        let policy = RetryPolicy::new(5, Duration::from_secs(10));
        let mut calls = 0;
        let (_, attempts) = retry_io(&policy, "test", Path::new("x"), || -> io::Result<()> {
            calls += 1;
            Err(io::Error::from(io::ErrorKind::NotFound))
        })
        .unwrap_err();
        assert_eq!(calls, 1);
        assert_eq!(attempts, 1);
    }

    #[test]
    fn zero_attempts_means_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.effective_attempts(), 1);
        assert_eq!(policy.max_wait(), Duration::ZERO);
        assert_eq!(RetryPolicy::default().max_wait(), Duration::from_secs(4));
    }
}
