//! Structured results for pool tasks and retry sequences.
//!
//! Both outcome types are tagged sums rather than structs with optional
//! fields, so "exactly one of value/error is populated" holds by
//! construction.

use std::time::Duration;

/// The result of one task executed through a [`Pool`](crate::Pool).
///
/// `elapsed` measures task execution only; time spent waiting for slot
/// admission is excluded.
#[derive(Debug)]
pub enum TaskOutcome<T, E> {
    /// The task returned a value.
    Success {
        /// The value the task produced.
        value: T,
        /// Wall-clock execution time.
        elapsed: Duration,
    },
    /// The task returned an error. Captured, never propagated.
    Failure {
        /// The error the task produced.
        error: E,
        /// Wall-clock execution time.
        elapsed: Duration,
    },
}

impl<T, E> TaskOutcome<T, E> {
    /// Whether the task produced a value.
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success { .. })
    }

    /// Wall-clock time the task spent executing.
    pub fn elapsed(&self) -> Duration {
        match self {
            TaskOutcome::Success { elapsed, .. } | TaskOutcome::Failure { elapsed, .. } => *elapsed,
        }
    }

    /// The produced value, if the task succeeded.
    pub fn value(&self) -> Option<&T> {
        match self {
            TaskOutcome::Success { value, .. } => Some(value),
            TaskOutcome::Failure { .. } => None,
        }
    }

    /// The captured error, if the task failed.
    pub fn error(&self) -> Option<&E> {
        match self {
            TaskOutcome::Success { .. } => None,
            TaskOutcome::Failure { error, .. } => Some(error),
        }
    }

    /// Consume the outcome, returning the value if the task succeeded.
    pub fn into_value(self) -> Option<T> {
        match self {
            TaskOutcome::Success { value, .. } => Some(value),
            TaskOutcome::Failure { .. } => None,
        }
    }

    /// Consume the outcome, returning the error if the task failed.
    pub fn into_error(self) -> Option<E> {
        match self {
            TaskOutcome::Success { .. } => None,
            TaskOutcome::Failure { error, .. } => Some(error),
        }
    }

    /// Convert into a plain `Result`, dropping the timing information.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            TaskOutcome::Success { value, .. } => Ok(value),
            TaskOutcome::Failure { error, .. } => Err(error),
        }
    }
}

/// The result of a full retry sequence from
/// [`Retrier::run_safe`](crate::Retrier::run_safe).
///
/// `attempts` counts invocations actually made (always at least 1).
/// `errors` holds every failure observed in order: its length equals
/// `attempts` when the sequence failed, and `attempts - 1` when it
/// eventually succeeded.
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    /// An attempt succeeded.
    Success {
        /// The value the operation produced.
        value: T,
        /// Number of invocations made.
        attempts: u32,
        /// Errors from the failed attempts that preceded success.
        errors: Vec<E>,
    },
    /// Every permitted attempt failed, or the retry predicate aborted.
    ///
    /// Abort is distinguishable from exhaustion only by
    /// `errors.len() < max_attempts`.
    Failure {
        /// Number of invocations made.
        attempts: u32,
        /// Every error observed, in attempt order.
        errors: Vec<E>,
    },
}

impl<T, E> RetryOutcome<T, E> {
    /// Whether any attempt succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, RetryOutcome::Success { .. })
    }

    /// Number of invocations made (>= 1).
    pub fn attempts(&self) -> u32 {
        match self {
            RetryOutcome::Success { attempts, .. } | RetryOutcome::Failure { attempts, .. } => {
                *attempts
            }
        }
    }

    /// Every failure observed, in attempt order.
    pub fn errors(&self) -> &[E] {
        match self {
            RetryOutcome::Success { errors, .. } | RetryOutcome::Failure { errors, .. } => errors,
        }
    }

    /// The final value, if any attempt succeeded.
    pub fn value(&self) -> Option<&T> {
        match self {
            RetryOutcome::Success { value, .. } => Some(value),
            RetryOutcome::Failure { .. } => None,
        }
    }

    /// Consume the outcome, returning the value if any attempt succeeded.
    pub fn into_value(self) -> Option<T> {
        match self {
            RetryOutcome::Success { value, .. } => Some(value),
            RetryOutcome::Failure { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn task_outcome_success_accessors() {
        let outcome: TaskOutcome<i32, io::Error> = TaskOutcome::Success {
            value: 7,
            elapsed: Duration::from_millis(3),
        };

        assert!(outcome.is_success());
        assert_eq!(outcome.value(), Some(&7));
        assert!(outcome.error().is_none());
        assert_eq!(outcome.elapsed(), Duration::from_millis(3));
        assert_eq!(outcome.into_result().unwrap(), 7);
    }

    #[test]
    fn task_outcome_failure_accessors() {
        let outcome: TaskOutcome<i32, io::Error> = TaskOutcome::Failure {
            error: io::Error::other("boom"),
            elapsed: Duration::from_millis(1),
        };

        assert!(!outcome.is_success());
        assert!(outcome.value().is_none());
        assert!(outcome.error().is_some());
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn retry_outcome_error_history_lengths() {
        let succeeded: RetryOutcome<i32, io::Error> = RetryOutcome::Success {
            value: 1,
            attempts: 3,
            errors: vec![io::Error::other("a"), io::Error::other("b")],
        };
        assert!(succeeded.is_success());
        assert_eq!(succeeded.attempts(), 3);
        assert_eq!(succeeded.errors().len(), succeeded.attempts() as usize - 1);

        let failed: RetryOutcome<i32, io::Error> = RetryOutcome::Failure {
            attempts: 2,
            errors: vec![io::Error::other("a"), io::Error::other("b")],
        };
        assert!(!failed.is_success());
        assert_eq!(failed.errors().len(), failed.attempts() as usize);
        assert!(failed.into_value().is_none());
    }
}
