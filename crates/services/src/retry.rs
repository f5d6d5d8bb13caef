use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::warn;

/// Default retry budget for tutor calls.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default first backoff delay; it doubles after every retry.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// Suspension seam for backoff waits.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Exponential backoff wrapper around a single retried async operation.
///
/// Failures are retried uniformly: the policy never inspects what went
/// wrong, it only counts attempts and doubles the delay between them.
#[derive(Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_delay: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Drive `operation` until it succeeds or the retry budget runs out.
    ///
    /// Every intermediate failure is logged and waited out with a doubling
    /// delay; the last failure is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns the operation's final error once no retries remain.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut remaining = self.max_retries;
        let mut delay = self.initial_delay;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if remaining > 0 => {
                    warn!(
                        "request failed ({err}); retrying in {}ms, {remaining} attempt(s) left",
                        delay.as_millis()
                    );
                    self.sleeper.sleep(delay).await;
                    delay *= 2;
                    remaining -= 1;
                }
                Err(err) => {
                    warn!("request failed after all retries: {err}");
                    return Err(err);
                }
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
