//! Timeout and retry around a [`GenerativeModel`].
//!
//! Every attempt is bounded by a timeout. Transient failures
//! ([`ModelError::is_transient`]) are retried per [`RetryPolicy`]; content blocks
//! and permanent errors return immediately.
//!
//! A whole call is bounded by [`ResilientModel::max_elapsed`]: with the 30 s default
//! timeout and two retries that is 3 × 30 s + 0.5 s + 1 s = 91.5 s.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{Generation, GenerationRequest, GenerativeModel, ModelError};

/// Retry policy for transient model failures.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryPolicy {
    /// Fail on the first error.
    None,
    /// Constant delay between attempts.
    Fixed {
        /// Maximum number of retries after the first attempt.
        max_retries: usize,
        interval: Duration,
    },
    /// Exponentially increasing delay, capped at `max_interval`.
    Exponential {
        max_retries: usize,
        initial_interval: Duration,
        max_interval: Duration,
        /// e.g. 2.0 doubles each time.
        multiplier: f64,
    },
}

impl RetryPolicy {
    pub fn none() -> Self {
        RetryPolicy::None
    }

    pub fn fixed(max_retries: usize, interval: Duration) -> Self {
        RetryPolicy::Fixed {
            max_retries,
            interval,
        }
    }

    pub fn exponential(
        max_retries: usize,
        initial_interval: Duration,
        max_interval: Duration,
        multiplier: f64,
    ) -> Self {
        RetryPolicy::Exponential {
            max_retries,
            initial_interval,
            max_interval,
            multiplier,
        }
    }

    /// Two retries: 500 ms, then 1 s, never more than 4 s.
    pub fn default_model_policy(max_retries: usize) -> Self {
        Self::exponential(
            max_retries,
            Duration::from_millis(500),
            Duration::from_secs(4),
            2.0,
        )
    }

    /// Whether retry number `retry` (0-based) may run.
    pub fn should_retry(&self, retry: usize) -> bool {
        retry < self.max_retries()
    }

    /// Delay before retry number `retry` (0-based).
    pub fn delay(&self, retry: usize) -> Duration {
        match self {
            RetryPolicy::None => Duration::ZERO,
            RetryPolicy::Fixed { interval, .. } => *interval,
            RetryPolicy::Exponential {
                initial_interval,
                max_interval,
                multiplier,
                ..
            } => {
                let secs = initial_interval.as_secs_f64() * multiplier.powi(retry as i32);
                Duration::try_from_secs_f64(secs)
                    .unwrap_or(*max_interval)
                    .min(*max_interval)
            }
        }
    }

    /// Sum of the delays slept across every retry.
    pub fn total_delay(&self) -> Duration {
        (0..self.max_retries())
            .fold(Duration::ZERO, |acc, r| acc.saturating_add(self.delay(r)))
    }

    pub fn max_retries(&self) -> usize {
        match self {
            RetryPolicy::None => 0,
            RetryPolicy::Fixed { max_retries, .. } => *max_retries,
            RetryPolicy::Exponential { max_retries, .. } => *max_retries,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::default_model_policy(2)
    }
}

/// Wraps a model with a per-attempt timeout and a retry policy.
///
/// There is no separate deadline for the whole call; its worst case is
/// [`max_elapsed`](Self::max_elapsed).
pub struct ResilientModel {
    inner: Arc<dyn GenerativeModel>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl ResilientModel {
    pub fn new(inner: Arc<dyn GenerativeModel>, timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            inner,
            timeout,
            retry,
        }
    }

    /// Longest a [`generate`](GenerativeModel::generate) call can take: every attempt
    /// timing out plus every retry delay.
    pub fn max_elapsed(&self) -> Duration {
        let attempts =
            u32::try_from(self.retry.max_retries().saturating_add(1)).unwrap_or(u32::MAX);
        self.timeout
            .saturating_mul(attempts)
            .saturating_add(self.retry.total_delay())
    }

    async fn attempt(&self, request: &GenerationRequest) -> Result<Generation, ModelError> {
        match tokio::time::timeout(self.timeout, self.inner.generate(request)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ModelError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl GenerativeModel for ResilientModel {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ModelError> {
        let mut retry = 0;
        loop {
            match self.attempt(request).await {
                Ok(generation) => return Ok(generation),
                Err(e) if e.is_transient() && self.retry.should_retry(retry) => {
                    let delay = self.retry.delay(retry);
                    warn!(error = %e, retry = retry + 1, delay = ?delay, "transient model error, retrying");
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(e) => {
                    debug!(error = %e, retries = retry, "model call failed");
                    return Err(e);
                }
            }
        }
    }
}
