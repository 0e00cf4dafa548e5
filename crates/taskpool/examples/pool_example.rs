//! Example: Bounded fan-out with a slot pool
//!
//! This example demonstrates:
//! 1. Running a batch of simulated network calls under a concurrency bound
//! 2. Order-preserving results independent of completion order
//! 3. `map_settled` dropping failed entries
//!
//! Run with:
//! ```bash
//! cargo run -p taskpool --example pool_example
//! ```

use std::io;
use std::time::Duration;

use taskpool::Pool;

/// Simulate a request that takes longer for earlier items and fails for
/// every fourth one.
async fn fetch(id: u32, delay_ms: u64) -> Result<String, io::Error> {
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    if id % 4 == 0 {
        Err(io::Error::other(format!("request {id} timed out")))
    } else {
        Ok(format!("payload-{id}"))
    }
}

#[tokio::main]
async fn main() -> Result<(), taskpool::Error> {
    let pool = Pool::new(3)?;

    println!("=== map: all outcomes, input order ===");
    let ids: Vec<u32> = (1..=8).collect();
    let outcomes = pool
        .map(ids.clone(), |id, index| async move {
            // Earlier items sleep longer, so completion order reverses.
            fetch(id, 80 - (index as u64) * 10).await
        })
        .await;

    for (id, outcome) in ids.iter().zip(&outcomes) {
        match outcome.value() {
            Some(payload) => println!("  request {id}: {payload} ({:?})", outcome.elapsed()),
            None => println!("  request {id}: FAILED"),
        }
    }

    println!("\n=== map_settled: failures silently dropped ===");
    let survivors = pool
        .map_settled(ids, |id, index| async move {
            fetch(id, 80 - (index as u64) * 10).await
        })
        .await;
    println!("  kept {} of 8: {survivors:?}", survivors.len());

    Ok(())
}
