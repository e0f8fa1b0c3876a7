//! Bounded retry loop for cache operations

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::error::{CacheError, CacheResult};
use crate::clock::Clock;

/// Fixed-delay retry policy
///
/// An operation is attempted once and then re-attempted up to `retries`
/// times. Every attempt re-runs the whole operation from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Policy that fails on the first error
    pub fn none() -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.retries + 1
    }

    /// Run `attempt` until it succeeds or the retries are used up
    pub async fn run<T, F, Fut>(
        &self,
        clock: &dyn Clock,
        operation: &'static str,
        mut attempt: F,
    ) -> CacheResult<T>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = CacheResult<T>> + Send,
        T: Send,
    {
        let mut retry = 0;
        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) if retry < self.retries => {
                    retry += 1;
                    warn!(
                        "Cache {} failed, retrying ({}/{}): {}",
                        operation, retry, self.retries, err
                    );
                    clock.sleep(self.delay).await;
                }
                Err(err) => {
                    if self.retries == 0 {
                        return Err(err);
                    }
                    return Err(CacheError::RetriesExhausted {
                        operation,
                        attempts: self.max_attempts(),
                        source: Box::new(err),
                    });
                }
            }
        }
    }
}
