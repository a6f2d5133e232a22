//! Exponential backoff for transient network failures.

use crate::constants::retry::{INITIAL_BACKOFF_MS, MAX_BACKOFF_SECONDS, MAX_ELAPSED_SECONDS};
use crate::error::AppError;
use rand::Rng;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, warn};

/// Retry schedule for one request.
///
/// Only errors for which [`AppError::is_transient`] holds are retried. Waits
/// double from `initial_backoff` up to `max_backoff` and never run past the
/// `max_elapsed` budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub max_elapsed: Duration,
    pub max_attempts: Option<u32>,
    /// Draw each wait uniformly from `[0, backoff]`
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_secs(MAX_BACKOFF_SECONDS),
            max_elapsed: Duration::from_secs(MAX_ELAPSED_SECONDS),
            max_attempts: None,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Default schedule with a custom total budget
    pub fn with_max_elapsed(max_elapsed: Duration) -> Self {
        Self {
            max_elapsed,
            ..Self::default()
        }
    }

    /// Retries without waiting, bounded by attempt count.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            max_elapsed: Duration::from_secs(MAX_ELAPSED_SECONDS),
            max_attempts: Some(max_attempts),
            jitter: false,
        }
    }

    /// Never retries.
    pub fn none() -> Self {
        Self::immediate(1)
    }

    fn wait_for(&self, backoff: Duration) -> Duration {
        if self.jitter && !backoff.is_zero() {
            let millis = backoff.as_millis() as u64;
            Duration::from_millis(rand::rng().random_range(0..=millis))
        } else {
            backoff
        }
    }

    /// Runs `op` until it succeeds, fails terminally, or the budget is spent.
    pub fn run<T>(
        &self,
        url: &str,
        mut op: impl FnMut() -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let started = Instant::now();
        let mut attempt = 0u32;
        let mut backoff = self.initial_backoff;

        loop {
            attempt += 1;
            let err = match op() {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => e,
            };

            let elapsed = started.elapsed();
            let out_of_attempts = self.max_attempts.is_some_and(|max| attempt >= max);
            if out_of_attempts || elapsed >= self.max_elapsed {
                error!(
                    "Giving up on {} after {} attempts ({:?}): {}",
                    url, attempt, elapsed, err
                );
                return Err(AppError::retries_exhausted(url, attempt, &err));
            }

            let wait = self.wait_for(backoff).min(self.max_elapsed - elapsed);
            warn!(
                "Request error {} for {}. Retrying in {:?} (attempt {})",
                err, url, wait, attempt
            );
            if !wait.is_zero() {
                thread::sleep(wait);
            }
            backoff = backoff.saturating_mul(2).min(self.max_backoff);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_success_on_first_attempt() {
        let calls = Cell::new(0);
        let result = RetryPolicy::immediate(5).run("url", || {
            calls.set(calls.get() + 1);
            Ok::<_, AppError>(42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_transient_failures_are_retried() {
        let calls = Cell::new(0);
        let result = RetryPolicy::immediate(5).run("url", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(AppError::network_timeout("url"))
            } else {
                Ok("done")
            }
        });
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_terminal_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result: Result<(), _> = RetryPolicy::immediate(5).run("url", || {
            calls.set(calls.get() + 1);
            Err(AppError::api_server_error(500, "Internal Server Error", "url"))
        });
        assert!(matches!(result, Err(AppError::ApiServerError { .. })));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_attempt_limit_wraps_last_error() {
        let calls = Cell::new(0);
        let result: Result<(), _> = RetryPolicy::immediate(4).run("http://x/v1/season", || {
            calls.set(calls.get() + 1);
            Err(AppError::network_connection("http://x/v1/season", "refused"))
        });
        match result {
            Err(AppError::RetriesExhausted { attempts, last_error, .. }) => {
                assert_eq!(attempts, 4);
                assert!(last_error.contains("refused"));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn test_time_budget_bounds_total_wait() {
        let policy = RetryPolicy {
            initial_backoff: Duration::from_millis(20),
            max_backoff: Duration::from_millis(40),
            max_elapsed: Duration::from_millis(100),
            max_attempts: None,
            jitter: false,
        };
        let started = Instant::now();
        let result: Result<(), _> =
            policy.run("url", || Err(AppError::network_timeout("url")));

        assert!(matches!(result, Err(AppError::RetriesExhausted { .. })));
        // The last wait is clipped to the remaining budget
        assert!(started.elapsed() < Duration::from_millis(1000));
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn test_jittered_wait_stays_within_backoff() {
        let policy = RetryPolicy::default();
        for _ in 0..50 {
            assert!(policy.wait_for(Duration::from_millis(500)) <= Duration::from_millis(500));
        }
        assert_eq!(policy.wait_for(Duration::ZERO), Duration::ZERO);
    }
}
