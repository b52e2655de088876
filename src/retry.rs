//! Bounded retry with randomized exponential backoff
//!
//! The check-run endpoint is eventually consistent and occasionally fails
//! outright right after a push, so its fetch is retried. Sleeping and
//! randomness are injected so the loop runs deterministically in tests.

use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::CheckRun;
use async_trait::async_trait;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Base of the exponential wait window
    pub multiplier: Duration,
    /// Upper bound on any single wait (`None` = unbounded)
    pub max_wait: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            multiplier: Duration::from_millis(100),
            max_wait: None,
        }
    }
}

impl RetryPolicy {
    /// Upper end of the wait window after the given (1-based) failed attempt.
    ///
    /// `multiplier * 2^(attempt - 1)`, capped by `max_wait`.
    pub fn wait_ceiling(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        let ceiling = self.multiplier.saturating_mul(factor);
        self.max_wait.map_or(ceiling, |max| ceiling.min(max))
    }
}

/// Something that can pause the current task
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Real sleeping on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Source of randomness for backoff waits
pub trait Jitter: Send + Sync {
    /// Pick a wait in `[0, ceiling]`
    fn sample(&self, ceiling: Duration) -> Duration;
}

/// Uniformly random wait ("full jitter")
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl Jitter for RandomJitter {
    fn sample(&self, ceiling: Duration) -> Duration {
        let secs = ceiling.as_secs_f64();
        if secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(rand::thread_rng().gen_range(0.0..=secs))
    }
}

/// A value obtained after one or more attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retried<T> {
    /// The successful result
    pub value: T,
    /// How many attempts it took (1 = first try)
    pub attempts: u32,
}

/// Run `op` until it succeeds or `policy.max_attempts` is exhausted.
///
/// Every error is retried. After the last attempt its error is returned
/// unchanged.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    jitter: &dyn Jitter,
    mut op: F,
) -> Result<Retried<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => {
                return Ok(Retried {
                    value,
                    attempts: attempt,
                });
            }
            Err(e) if attempt >= max_attempts => {
                warn!(attempt, max_attempts, error = %e, "giving up");
                return Err(e);
            }
            Err(e) => {
                warn!(attempt, max_attempts, error = %e, "attempt failed, retrying");
                let wait = jitter.sample(policy.wait_ceiling(attempt));
                debug!(?wait, "backing off");
                sleeper.sleep(wait).await;
                attempt += 1;
            }
        }
    }
}

/// Fetch check runs for `sha`, retrying transient failures
pub async fn fetch_check_runs(
    platform: &dyn PlatformService,
    sha: &str,
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    jitter: &dyn Jitter,
) -> Result<Retried<Vec<CheckRun>>> {
    let retried =
        retry_with_backoff(policy, sleeper, jitter, || platform.list_check_runs(sha)).await?;
    debug!(
        sha,
        attempts = retried.attempts,
        count = retried.value.len(),
        "fetched check runs"
    );
    Ok(retried)
}
