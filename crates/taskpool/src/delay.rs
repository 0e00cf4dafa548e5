//! Cooperative delay primitive.

use std::time::Duration;

/// Suspend the current task for `delay` without blocking other scheduled
/// work.
pub async fn sleep(delay: Duration) {
    tokio::time::sleep(delay).await;
}

/// Suspend the current task for `ms` milliseconds.
///
/// Non-positive values resolve as soon as scheduling allows; they are a
/// no-op delay, not an error.
pub async fn sleep_ms(ms: i64) {
    if ms <= 0 {
        return;
    }
    sleep(Duration::from_millis(ms as u64)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn non_positive_delays_resolve_immediately() {
        let started = Instant::now();
        sleep_ms(0).await;
        sleep_ms(-5).await;
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn positive_delay_elapses() {
        let started = Instant::now();
        sleep_ms(20).await;
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
