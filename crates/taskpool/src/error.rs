//! Configuration error types.
//!
//! Only invalid construction parameters surface through this module. Task
//! failures are captured inside [`TaskOutcome`](crate::TaskOutcome) and
//! retry failures are surfaced as the caller's own error type — neither is
//! wrapped in [`Error`].

use thiserror::Error;

/// Result type alias for fallible construction in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors raised at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A pool was built with a concurrency bound of zero.
    #[error("pool concurrency must be at least 1")]
    InvalidConcurrency,

    /// A retry policy was built with a non-positive parameter.
    #[error("invalid retry policy: {reason}")]
    InvalidRetryPolicy {
        /// Which parameter was rejected and why.
        reason: &'static str,
    },
}
