//! Retry wrapper: exponential backoff around any oracle.
//!
//! Transient failures (rate limits, timeouts, network errors, 5xx) are
//! retried with a growing delay up to a cap. Anything else, and the last
//! error once attempts run out, propagates unchanged. The agent above never
//! observes individual attempts.

use async_trait::async_trait;
use readagent_config::RetryConfig;
use readagent_core::error::OracleError;
use readagent_core::oracle::{Completion, Oracle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How many times to try a call and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
    /// Upper bound for a single attempt
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_delay: config.initial_delay(),
            multiplier: config.multiplier.max(1.0),
            max_delay: config.max_delay(),
            timeout: config.request_timeout(),
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn no_retry(timeout: Duration) -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            multiplier: 1.0,
            max_delay: Duration::ZERO,
            timeout,
        }
    }

    /// Delay before retry number `retry` (1-based), capped at `max_delay`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exp = self.multiplier.powi(retry.saturating_sub(1) as i32);
        let millis = (self.initial_delay.as_millis() as f64 * exp).min(self.max_delay.as_millis() as f64);
        Duration::from_millis(millis as u64)
    }

    /// Delay for a given failure: rate limits wait at least as long as the
    /// provider asked, still bounded by `max_delay`.
    fn delay_after(&self, retry: u32, error: &OracleError) -> Duration {
        let backoff = self.delay_for(retry);
        match error {
            OracleError::RateLimited { retry_after_secs } => backoff
                .max(Duration::from_secs(*retry_after_secs))
                .min(self.max_delay.max(backoff)),
            _ => backoff,
        }
    }
}

/// An oracle that retries transient failures of the wrapped oracle.
pub struct RetryingOracle {
    inner: Arc<dyn Oracle>,
    policy: RetryPolicy,
}

impl RetryingOracle {
    pub fn new(inner: Arc<dyn Oracle>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl Oracle for RetryingOracle {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn query_model(&self, prompt: &str) -> Result<Completion, OracleError> {
        let mut attempt = 1;
        loop {
            let outcome =
                match tokio::time::timeout(self.policy.timeout, self.inner.query_model(prompt)).await {
                    Ok(result) => result,
                    Err(_) => Err(OracleError::Timeout(format!(
                        "Oracle '{}' timed out after {}s",
                        self.inner.name(),
                        self.policy.timeout.as_secs()
                    ))),
                };

            let error = match outcome {
                Ok(completion) => {
                    if attempt > 1 {
                        info!(oracle = %self.inner.name(), attempt, "Oracle call succeeded after retry");
                    }
                    return Ok(completion);
                }
                Err(e) => e,
            };

            if !error.is_transient() || attempt >= self.policy.max_attempts {
                warn!(
                    oracle = %self.inner.name(),
                    attempt,
                    error = %error,
                    "Oracle call failed, giving up"
                );
                return Err(error);
            }

            let delay = self.policy.delay_after(attempt, &error);
            warn!(
                oracle = %self.inner.name(),
                attempt,
                max_attempts = self.policy.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Oracle call failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
