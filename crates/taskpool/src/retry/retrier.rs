//! Retry execution over a policy, with predicate and observer hooks.

use std::error::Error as StdError;
use std::future::Future;
use std::time::Duration;

use crate::delay;
use crate::outcome::RetryOutcome;
use crate::retry::RetryPolicy;

type RetryPredicate = dyn Fn(&(dyn StdError + 'static), u32) -> bool + Send + Sync;
type RetryHook = dyn Fn(&(dyn StdError + 'static), u32, Duration) + Send + Sync;

/// Drives an operation through a [`RetryPolicy`].
///
/// Each attempt either succeeds, exhausts the budget, is vetoed by the
/// retry predicate, or backs off and tries again. The predicate is how
/// callers classify non-retryable errors — the engine never inspects error
/// content itself.
///
/// # Examples
///
/// Only retry errors the caller considers transient:
///
/// ```rust
/// use std::time::Duration;
/// use taskpool::{Retrier, RetryPolicy};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let policy = RetryPolicy::builder()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(50))
///     .build()?;
///
/// let retrier = Retrier::new(policy)
///     .should_retry(|error, _attempt| error.to_string().contains("timeout"))
///     .on_retry(|error, attempt, delay| {
///         eprintln!("attempt {attempt} failed ({error}), retrying in {delay:?}");
///     });
///
/// let value = retrier
///     .run(|| async { Ok::<_, std::io::Error>("response") })
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Retrier {
    policy: RetryPolicy,
    should_retry: Option<Box<RetryPredicate>>,
    on_retry: Option<Box<RetryHook>>,
}

impl Retrier {
    /// Create a retrier over the given policy, with no predicate or hook.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            should_retry: None,
            on_retry: None,
        }
    }

    /// The policy this retrier runs under.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Set the retry predicate, called with the error and the 1-indexed
    /// attempt number after each non-final failure. Returning `false`
    /// aborts the sequence immediately without consuming the remaining
    /// attempt budget.
    ///
    /// Default: always retry while attempts remain.
    pub fn should_retry<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&(dyn StdError + 'static), u32) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Some(Box::new(predicate));
        self
    }

    /// Set an observer hook, called with the error, the 1-indexed attempt
    /// number, and the upcoming delay before each backoff wait. Never
    /// called before the first attempt or after the final failure.
    pub fn on_retry<H>(mut self, hook: H) -> Self
    where
        H: Fn(&(dyn StdError + 'static), u32, Duration) + Send + Sync + 'static,
    {
        self.on_retry = Some(Box::new(hook));
        self
    }

    /// Invoke `operation` until it succeeds, the predicate vetoes, or the
    /// attempt budget runs out.
    ///
    /// This is the only raising entry point in the crate: on exhaustion or
    /// abort it propagates the most recent error. Use
    /// [`run_safe`](Self::run_safe) to capture the full failure history
    /// instead.
    pub async fn run<F, Fut, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: StdError + 'static,
    {
        let mut attempt = 1u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= self.policy.max_attempts() {
                        return Err(error);
                    }
                    if !self.retryable(&error, attempt) {
                        return Err(error);
                    }
                    self.back_off(&error, attempt).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Identical state machine to [`run`](Self::run), but nothing crosses
    /// the call boundary: every failure, including the terminal one, is
    /// recorded in the returned [`RetryOutcome`].
    pub async fn run_safe<F, Fut, T, E>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: StdError + 'static,
    {
        let mut errors = Vec::new();
        let mut attempt = 1u32;
        loop {
            match operation().await {
                Ok(value) => {
                    return RetryOutcome::Success {
                        value,
                        attempts: attempt,
                        errors,
                    };
                }
                Err(error) => {
                    let terminal = attempt >= self.policy.max_attempts()
                        || !self.retryable(&error, attempt);
                    if terminal {
                        errors.push(error);
                        return RetryOutcome::Failure {
                            attempts: attempt,
                            errors,
                        };
                    }
                    self.back_off(&error, attempt).await;
                    errors.push(error);
                    attempt += 1;
                }
            }
        }
    }

    fn retryable<E>(&self, error: &E, attempt: u32) -> bool
    where
        E: StdError + 'static,
    {
        match &self.should_retry {
            Some(predicate) => predicate(error, attempt),
            None => true,
        }
    }

    async fn back_off<E>(&self, error: &E, attempt: u32)
    where
        E: StdError + 'static,
    {
        let wait = self.policy.delay_for(attempt);
        if let Some(hook) = &self.on_retry {
            hook(error, attempt, wait);
        }
        tracing::warn!(
            attempt,
            delay_ms = wait.as_millis() as u64,
            error = %error,
            "attempt failed, backing off before retry"
        );
        delay::sleep(wait).await;
    }
}

impl Default for Retrier {
    /// A retrier over [`RetryPolicy::default`] with no predicate or hook.
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl std::fmt::Debug for Retrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retrier")
            .field("policy", &self.policy)
            .field("should_retry", &self.should_retry.is_some())
            .field("on_retry", &self.on_retry.is_some())
            .finish()
    }
}

/// Invoke `operation` under `policy` with no predicate or hook, propagating
/// the final error on exhaustion.
pub async fn retry<F, Fut, T, E>(policy: RetryPolicy, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: StdError + 'static,
{
    Retrier::new(policy).run(operation).await
}

/// Invoke `operation` under `policy` with no predicate or hook, capturing
/// the full failure history instead of propagating.
pub async fn retry_safe<F, Fut, T, E>(policy: RetryPolicy, operation: F) -> RetryOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: StdError + 'static,
{
    Retrier::new(policy).run_safe(operation).await
}
