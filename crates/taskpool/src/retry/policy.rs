//! Retry attempt budget and backoff schedule.

use std::time::Duration;

use crate::error::{Error, Result};

/// Attempt budget and exponential backoff schedule for a retry sequence.
///
/// The delay before retrying the `n`-th failed attempt (1-indexed) is
/// `initial_delay * backoff_multiplier^(n-1)`, with jitter applied and the
/// result capped at `max_delay`. Jitter defaults to 0, so the schedule is
/// deterministic unless opted into.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use taskpool::RetryPolicy;
///
/// # fn example() -> Result<(), taskpool::Error> {
/// // Defaults: 3 attempts, 1s initial, x2 per attempt, 30s cap, no jitter.
/// let policy = RetryPolicy::default();
///
/// let policy = RetryPolicy::builder()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(100))
///     .max_delay(Duration::from_secs(10))
///     .backoff_multiplier(2.0)
///     .jitter(0.1)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f64,
    jitter: f64,
}

impl RetryPolicy {
    /// Create a new builder for configuring a policy.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Total invocations permitted, including the first (>= 1).
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the first retry.
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Upper bound on any single backoff delay.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Growth factor applied per failed attempt.
    pub fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    /// Randomization factor in `[0, 1]`; 0 means deterministic delays.
    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    /// Backoff delay after the given failed attempt (1-indexed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let base = self.initial_delay.as_secs_f64()
            * self.backoff_multiplier.powi(exponent.min(i32::MAX as u32) as i32);

        let jittered = if self.jitter > 0.0 {
            // Spread of [base * (1 - jitter), base * (1 + jitter)].
            base + base * self.jitter * (rand::random::<f64>() - 0.5) * 2.0
        } else {
            base
        };

        Duration::from_secs_f64(jittered.min(self.max_delay.as_secs_f64()).max(0.0))
    }
}

impl Default for RetryPolicy {
    /// Defaults: 3 attempts, 1s initial delay, x2 multiplier, 30s cap,
    /// no jitter.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
            backoff_multiplier: 2.0,
            jitter: 0.0,
        }
    }
}

/// Builder for configuring a [`RetryPolicy`].
///
/// Unset parameters fall back to the defaults. [`build`](Self::build)
/// validates that every parameter is positive.
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    max_attempts: Option<u32>,
    initial_delay: Option<Duration>,
    max_delay: Option<Duration>,
    backoff_multiplier: Option<f64>,
    jitter: Option<f64>,
}

impl RetryPolicyBuilder {
    /// Set the total attempt budget, including the first invocation.
    ///
    /// Default: 3
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Set the delay before the first retry.
    ///
    /// Default: 1s
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Set the cap on any single backoff delay.
    ///
    /// Default: 30s
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the growth factor applied per failed attempt.
    ///
    /// Default: 2.0 (doubles each time)
    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = Some(multiplier);
        self
    }

    /// Set the jitter factor, clamped to `[0.0, 1.0]`. A jitter of 0.1
    /// lets each delay vary by ±10%.
    ///
    /// Default: 0.0 (deterministic)
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.jitter = Some(jitter.clamp(0.0, 1.0));
        self
    }

    /// Build the policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRetryPolicy`] if `max_attempts` is zero, a
    /// delay is zero, or the multiplier is not a positive finite number.
    pub fn build(self) -> Result<RetryPolicy> {
        let defaults = RetryPolicy::default();
        let policy = RetryPolicy {
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            initial_delay: self.initial_delay.unwrap_or(defaults.initial_delay),
            max_delay: self.max_delay.unwrap_or(defaults.max_delay),
            backoff_multiplier: self
                .backoff_multiplier
                .unwrap_or(defaults.backoff_multiplier),
            jitter: self.jitter.unwrap_or(defaults.jitter),
        };

        if policy.max_attempts < 1 {
            return Err(Error::InvalidRetryPolicy {
                reason: "max_attempts must be at least 1",
            });
        }
        if policy.initial_delay.is_zero() {
            return Err(Error::InvalidRetryPolicy {
                reason: "initial_delay must be positive",
            });
        }
        if policy.max_delay.is_zero() {
            return Err(Error::InvalidRetryPolicy {
                reason: "max_delay must be positive",
            });
        }
        if !(policy.backoff_multiplier.is_finite() && policy.backoff_multiplier > 0.0) {
            return Err(Error::InvalidRetryPolicy {
                reason: "backoff_multiplier must be a positive finite number",
            });
        }

        Ok(policy)
    }
}
