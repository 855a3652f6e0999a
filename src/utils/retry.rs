use std::future::Future;
use tokio::time::{sleep, Duration};

/// Bounded exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Zero behaves like one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self { max_attempts, base_delay }
    }

    /// A policy that never retries
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay to wait after the given failed attempt (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

/// Runs `f` until it succeeds, fails with an error `should_retry` rejects, or
/// the policy's attempts are used up. The last error is returned.
pub async fn retry_with_backoff<F, Fut, T, E, P>(
    policy: RetryPolicy,
    should_retry: P,
    f: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt >= max_attempts || !should_retry(&e) {
                    return Err(e);
                }
                let delay = policy.delay_for(attempt);
                log::warn!(
                    "Attempt {} failed: {}. Retrying in {}ms... (Attempt {}/{})",
                    attempt,
                    e,
                    delay.as_millis(),
                    attempt + 1,
                    max_attempts
                );
                sleep(delay).await;
            }
        }
    }
}
