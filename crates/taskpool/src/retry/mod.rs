//! Exponential-backoff retry engine.
//!
//! A [`RetryPolicy`] describes the attempt budget and backoff schedule; a
//! [`Retrier`] drives an operation through it, optionally consulting a
//! retry predicate and notifying an observer hook before each wait.
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//! use taskpool::retry::{Retrier, RetryPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = RetryPolicy::builder()
//!     .max_attempts(3)
//!     .initial_delay(Duration::from_millis(100))
//!     .build()?;
//!
//! let value = Retrier::new(policy)
//!     .run(|| async {
//!         // Your operation here
//!         Ok::<_, std::io::Error>(42)
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod policy;
mod retrier;

pub use policy::{RetryPolicy, RetryPolicyBuilder};
pub use retrier::{Retrier, retry, retry_safe};
