use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Bounded attempts with a linearly growing pause between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Pause taken after the given (1-based) failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Terminal state of a retried operation.
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    Succeeded(T),
    /// A non-retryable error ended the loop.
    Failed(E),
    /// Every attempt came back retryable.
    Exhausted { attempts: u32, last_error: E },
}

/// Runs `op` until it succeeds, fails with an error `is_retryable` rejects,
/// or `policy.max_attempts` is used up. `op` receives the 1-based attempt number.
pub async fn retry_with_backoff<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    mut op: F,
    is_retryable: R,
) -> RetryOutcome<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    R: Fn(&E) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => return RetryOutcome::Succeeded(value),
            Err(e) if !is_retryable(&e) => return RetryOutcome::Failed(e),
            Err(e) if attempt >= max_attempts => {
                return RetryOutcome::Exhausted {
                    attempts: attempt,
                    last_error: e,
                }
            }
            Err(_) => {
                let delay = policy.delay_after(attempt);
                debug!(attempt, max_attempts, delay_ms = delay.as_millis() as u64, "Retrying");
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
