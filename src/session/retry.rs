//! Retry policy with exponential backoff for transient HTTP failures

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::SessionResult;

/// Default attempts, including the first try
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay in milliseconds for exponential backoff
pub const DEFAULT_BASE_DELAY_MS: u64 = 200;

/// Default upper bound for a single backoff delay
pub const DEFAULT_MAX_DELAY_MS: u64 = 5_000;

/// Retry policy applied to every request sent by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first one (1 = no retry)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Cap for any single delay
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_base_delay_ms() -> u64 {
    DEFAULT_BASE_DELAY_MS
}

fn default_max_delay_ms() -> u64 {
    DEFAULT_MAX_DELAY_MS
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    /// A policy that sends every request exactly once
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after the given failed attempt (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let delay = self.base_delay_ms.saturating_mul(1u64 << exponent);
        Duration::from_millis(delay.min(self.max_delay_ms))
    }

    /// Run an async operation, retrying transient errors with backoff.
    ///
    /// Non-retryable errors and the error of the last attempt are returned as is.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> SessionResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = SessionResult<T>>,
    {
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempts < self.max_attempts => {
                    let delay = self.delay_for(attempts);
                    tracing::warn!(
                        error = %e,
                        attempt = attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::errors::SessionError;
    use std::cell::Cell;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay_ms: 1,
            max_delay_ms: 5,
        }
    }

    #[test]
    fn test_delay_grows_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay_ms: 100,
            max_delay_ms: 1_000,
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for(5), Duration::from_millis(1_000));
        assert_eq!(policy.delay_for(64), Duration::from_millis(1_000));
    }

    #[tokio::test]
    async fn test_success_on_first_try() {
        let calls = Cell::new(0);
        let result = fast_policy(3)
            .run(|| {
                calls.set(calls.get() + 1);
                async { Ok::<_, SessionError>(42) }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_success_after_transient_failure() {
        let calls = Cell::new(0);
        let result = fast_policy(3)
            .run(|| {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 2 {
                        Err(SessionError::status(503, "unavailable"))
                    } else {
                        Ok("ok")
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let result: SessionResult<()> = fast_policy(3)
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err(SessionError::status(500, "boom")) }
            })
            .await;
        assert_eq!(result.unwrap_err().status_code(), Some(500));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result: SessionResult<()> = fast_policy(5)
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err(SessionError::status(400, "bad filter")) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
