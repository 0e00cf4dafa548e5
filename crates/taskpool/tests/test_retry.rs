//! Retry engine integration tests
//!
//! End-to-end coverage for the backoff state machine:
//! - Exhaustion vs abort surfaced through both entry points
//! - Backoff schedule observed through the hook
//! - Composition with a pool-gated operation

use std::io;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use taskpool::{Pool, Retrier, RetryOutcome, RetryPolicy, retry, retry_safe};

fn failing_after(successes_start_at: u32, calls: Arc<AtomicU32>) -> impl FnMut() -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<u32, io::Error>> + Send>> {
    move || {
        let calls = Arc::clone(&calls);
        Box::pin(async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < successes_start_at {
                Err(io::Error::other(format!("attempt {n} failed")))
            } else {
                Ok(n)
            }
        })
    }
}

#[tokio::test]
async fn retry_and_retry_safe_agree_on_exhaustion() {
    let policy = RetryPolicy::builder()
        .max_attempts(3)
        .initial_delay(Duration::from_millis(1))
        .build()
        .unwrap();

    let calls = Arc::new(AtomicU32::new(0));
    let result = retry(policy.clone(), failing_after(u32::MAX, Arc::clone(&calls))).await;
    assert_eq!(result.unwrap_err().to_string(), "attempt 3 failed");
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let calls = Arc::new(AtomicU32::new(0));
    let outcome = retry_safe(policy, failing_after(u32::MAX, Arc::clone(&calls))).await;
    match outcome {
        RetryOutcome::Failure { attempts, errors } => {
            assert_eq!(attempts, 3);
            assert_eq!(errors.len(), 3);
        }
        RetryOutcome::Success { .. } => panic!("expected failure"),
    }
}

#[tokio::test]
async fn backoff_schedule_doubles_until_success() {
    let policy = RetryPolicy::builder()
        .max_attempts(4)
        .initial_delay(Duration::from_millis(10))
        .backoff_multiplier(2.0)
        .max_delay(Duration::from_millis(100))
        .build()
        .unwrap();

    let delays: Arc<Mutex<Vec<Duration>>> = Arc::new(Mutex::new(Vec::new()));
    let calls = Arc::new(AtomicU32::new(0));

    let delays_in_hook = Arc::clone(&delays);
    let started = Instant::now();
    let value = Retrier::new(policy)
        .on_retry(move |_error, _attempt, delay| {
            delays_in_hook.lock().unwrap().push(delay);
        })
        .run(failing_after(3, Arc::clone(&calls)))
        .await
        .unwrap();

    assert_eq!(value, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        *delays.lock().unwrap(),
        [Duration::from_millis(10), Duration::from_millis(20)]
    );
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn abort_leaves_the_remaining_budget_unconsumed() {
    let policy = RetryPolicy::builder()
        .max_attempts(5)
        .initial_delay(Duration::from_secs(60))
        .build()
        .unwrap();
    let calls = Arc::new(AtomicU32::new(0));

    let started = Instant::now();
    let outcome = Retrier::new(policy)
        .should_retry(|_error, _attempt| false)
        .run_safe(failing_after(u32::MAX, Arc::clone(&calls)))
        .await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.attempts(), 1);
    // Abort is distinguishable from exhaustion only by the error count.
    assert!(outcome.errors().len() < 5);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn predicate_sees_one_based_attempt_numbers() {
    let policy = RetryPolicy::builder()
        .max_attempts(4)
        .initial_delay(Duration::from_millis(1))
        .build()
        .unwrap();
    let seen: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));
    let calls = Arc::new(AtomicU32::new(0));

    let seen_in_predicate = Arc::clone(&seen);
    let outcome = Retrier::new(policy)
        .should_retry(move |_error, attempt| {
            seen_in_predicate.lock().unwrap().push(attempt);
            true
        })
        .run_safe(failing_after(u32::MAX, Arc::clone(&calls)))
        .await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.attempts(), 4);
    // The final attempt exhausts the budget before the predicate runs.
    assert_eq!(*seen.lock().unwrap(), [1, 2, 3]);
}

#[tokio::test]
async fn retry_composes_with_a_pool_gated_operation() {
    let pool = Pool::new(1).unwrap();
    let policy = RetryPolicy::builder()
        .max_attempts(3)
        .initial_delay(Duration::from_millis(1))
        .build()
        .unwrap();
    let calls = Arc::new(AtomicU32::new(0));

    let value = Retrier::new(policy)
        .run(|| {
            let pool = pool.clone();
            let calls = Arc::clone(&calls);
            async move {
                pool.exec(move || async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 1 {
                        Err(io::Error::other("transient"))
                    } else {
                        Ok("delivered")
                    }
                })
                .await
                .into_result()
            }
        })
        .await
        .unwrap();

    assert_eq!(value, "delivered");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(pool.running(), 0);
}
