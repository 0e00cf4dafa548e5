//! Example: Retrying an unreliable operation with exponential backoff
//!
//! This example demonstrates:
//! 1. Simple retry with a deterministic backoff schedule
//! 2. A retry predicate that aborts on non-transient errors
//! 3. `run_safe` capturing the full failure history
//!
//! Run with:
//! ```bash
//! cargo run -p taskpool --example retry_example
//! ```

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use taskpool::{Retrier, RetryPolicy};

/// A simulated API that fails the first few times.
struct UnreliableApi {
    attempts: Arc<AtomicU32>,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Self {
        Self {
            attempts: Arc::new(AtomicU32::new(0)),
            fail_count,
        }
    }

    async fn call(&self) -> Result<String, io::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.fail_count {
            println!("  attempt {}: FAILED (transient)", attempt + 1);
            Err(io::Error::other("transient error"))
        } else {
            println!("  attempt {}: SUCCESS", attempt + 1);
            Ok("API response data".to_string())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let policy = RetryPolicy::builder()
        .max_attempts(5)
        .initial_delay(Duration::from_millis(50))
        .backoff_multiplier(2.0)
        .max_delay(Duration::from_millis(500))
        .build()?;

    println!("=== retry until success ===");
    let api = UnreliableApi::new(2);
    let value = Retrier::new(policy.clone())
        .on_retry(|error, attempt, delay| {
            println!("  backing off {delay:?} after attempt {attempt} ({error})");
        })
        .run(|| api.call())
        .await?;
    println!("  got: {value}\n");

    println!("=== predicate aborts on permanent errors ===");
    let result = Retrier::new(policy.clone())
        .should_retry(|error, _attempt| error.to_string().contains("transient"))
        .run(|| async { Err::<(), _>(io::Error::other("permanent: bad credentials")) })
        .await;
    println!("  aborted immediately: {result:?}\n");

    println!("=== run_safe keeps the whole error history ===");
    let outcome = Retrier::new(policy)
        .run_safe(|| async { Err::<(), _>(io::Error::other("still down")) })
        .await;
    println!(
        "  success: {}, attempts: {}, errors: {}",
        outcome.is_success(),
        outcome.attempts(),
        outcome.errors().len()
    );

    Ok(())
}
