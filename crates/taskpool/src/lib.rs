#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Bounded-concurrency task execution for unreliable async operations.
//!
//! This crate provides two cooperating utilities used to wrap flaky
//! asynchronous work (network calls, external-process invocations,
//! rate-limited AI requests):
//!
//! - **[`Pool`]** — a slot-limited admission gate with strict FIFO fairness.
//!   At most `concurrency` tasks run at once; everyone else queues. Each
//!   task's success/failure and wall-clock duration are captured into a
//!   [`TaskOutcome`] — a failing task never takes its siblings down.
//! - **[`Retrier`]** — an exponential-backoff retry engine driven by a
//!   validated [`RetryPolicy`], with an optional retry predicate and an
//!   optional per-retry observer hook.
//!
//! The two compose but do not nest: a retried operation may itself be
//! pool-gated, the engine does no gating of its own.
//!
//! # Examples
//!
//! Bounded fan-out over a batch of inputs:
//!
//! ```rust
//! use taskpool::Pool;
//!
//! # async fn example() -> Result<(), taskpool::Error> {
//! let pool = Pool::new(2)?;
//! let outcomes = pool
//!     .map([1, 2, 3, 4], |x, _index| async move {
//!         Ok::<_, std::io::Error>(x * 2)
//!     })
//!     .await;
//!
//! assert!(outcomes.iter().all(|o| o.is_success()));
//! # Ok(())
//! # }
//! ```
//!
//! Retrying a transiently failing operation:
//!
//! ```rust
//! use std::time::Duration;
//! use taskpool::{Retrier, RetryPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = RetryPolicy::builder()
//!     .max_attempts(3)
//!     .initial_delay(Duration::from_millis(100))
//!     .build()?;
//!
//! let value = Retrier::new(policy)
//!     .run(|| async { Ok::<_, std::io::Error>(42) })
//!     .await?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

pub mod delay;
pub mod error;
pub mod outcome;
pub mod pool;
pub mod retry;

pub use delay::{sleep, sleep_ms};
pub use error::{Error, Result};
pub use outcome::{RetryOutcome, TaskOutcome};
pub use pool::{Pool, PoolBuilder};
pub use retry::{Retrier, RetryPolicy, RetryPolicyBuilder, retry, retry_safe};

/// Convenient re-exports of commonly used items.
///
/// Import everything with:
///
/// ```rust
/// use taskpool::prelude::*;
/// ```
pub mod prelude {
    pub use crate::delay::{sleep, sleep_ms};
    pub use crate::error::Error;
    pub use crate::outcome::{RetryOutcome, TaskOutcome};
    pub use crate::pool::Pool;
    pub use crate::retry::{Retrier, RetryPolicy, retry, retry_safe};
}
