//! Bounded retry with exponential backoff
//!
//! Applied to element-resolution and navigation waits only. Wizard steps
//! themselves are never retried, so a wait that exhausts its attempts
//! converts into a fatal failure for the run.

use std::time::Duration;

/// Retry policy: total attempt count and the delay before the second
/// attempt, doubling for each attempt after that.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay,
        }
    }

    /// Backoff delay after the given zero-based attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }

    /// Run `op` until it succeeds or the attempt budget is exhausted,
    /// sleeping between attempts. Returns the last error on exhaustion.
    pub fn run<T, E, F>(&self, mut op: F) -> std::result::Result<T, E>
    where
        F: FnMut() -> std::result::Result<T, E>,
    {
        let attempts = self.attempts.max(1);
        let mut last_err = None;

        for attempt in 0..attempts {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    last_err = Some(e);
                    if attempt + 1 < attempts {
                        std::thread::sleep(self.delay_after(attempt));
                    }
                }
            }
        }

        Err(last_err.expect("at least one attempt"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_succeeds_on_later_attempt() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let mut calls = 0;
        let result: Result<u32, &str> = policy.run(|| {
            calls += 1;
            if calls < 3 { Err("not yet") } else { Ok(42) }
        });
        assert_eq!(result, Ok(42));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_gives_up_after_budget() {
        let policy = RetryPolicy::new(2, Duration::from_millis(1));
        let mut calls = 0;
        let result: Result<(), &str> = policy.run(|| {
            calls += 1;
            Err("still broken")
        });
        assert_eq!(result, Err("still broken"));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_first_success_short_circuits() {
        let policy = RetryPolicy::default();
        let mut calls = 0;
        let result: Result<(), &str> = policy.run(|| {
            calls += 1;
            Ok(())
        });
        assert!(result.is_ok());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::new(4, Duration::from_millis(250));
        assert_eq!(policy.delay_after(0), Duration::from_millis(250));
        assert_eq!(policy.delay_after(1), Duration::from_millis(500));
        assert_eq!(policy.delay_after(2), Duration::from_millis(1000));
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::from_millis(1));
        let mut calls = 0;
        let result: Result<(), &str> = policy.run(|| {
            calls += 1;
            Err("no")
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
