//! Slot-limited task pool with strict FIFO admission.
//!
//! A [`Pool`] bounds how many async tasks run at once. Tasks over the bound
//! queue, and a freed slot is handed directly to the longest-waiting caller
//! — the running count never dips in between, so a late arrival cannot
//! steal a slot from someone already queued.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::sync::oneshot;

use crate::error::{Error, Result};
use crate::outcome::TaskOutcome;

struct PoolState {
    running: usize,
    waiters: VecDeque<oneshot::Sender<SlotToken>>,
}

struct Shared {
    concurrency: usize,
    state: Mutex<PoolState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        // Critical sections never panic, but don't propagate poison if one did.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquire a slot, queueing FIFO behind earlier callers if the pool is
    /// full.
    async fn admit(shared: &Arc<Shared>) -> SlotToken {
        loop {
            let rx = {
                let mut state = shared.lock();
                if state.running < shared.concurrency {
                    state.running += 1;
                    return SlotToken::armed(Arc::clone(shared));
                }
                let (tx, rx) = oneshot::channel();
                state.waiters.push_back(tx);
                tracing::trace!(waiting = state.waiters.len(), "pool full, queueing");
                rx
            };
            match rx.await {
                Ok(token) => return token,
                // Sender dropped without a handoff; queue again.
                Err(_) => continue,
            }
        }
    }

    /// Free a slot: hand it directly to the head waiter if there is one,
    /// otherwise decrement the running count.
    fn release(shared: &Arc<Shared>) {
        let mut state = shared.lock();
        while let Some(tx) = state.waiters.pop_front() {
            match tx.send(SlotToken::armed(Arc::clone(shared))) {
                // Slot transferred; `running` stays untouched so nobody can
                // slip in between the release and the waiter's wakeup.
                Ok(()) => return,
                // The waiter gave up while queued; skip to the next one.
                Err(token) => token.disarm(),
            }
        }
        state.running = state.running.saturating_sub(1);
    }
}

/// One admitted slot. Releasing happens in `Drop`, so the slot is freed on
/// every exit path: normal return, task error, panic unwind, or the owning
/// future being dropped mid-flight.
struct SlotToken {
    shared: Option<Arc<Shared>>,
}

impl SlotToken {
    fn armed(shared: Arc<Shared>) -> Self {
        Self {
            shared: Some(shared),
        }
    }

    /// Neutralize the token so dropping it does not release the slot the
    /// caller still holds.
    fn disarm(mut self) {
        self.shared = None;
    }
}

impl Drop for SlotToken {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            Shared::release(&shared);
        }
    }
}

/// A counting admission gate bounding concurrent async work.
///
/// Cloning is cheap and clones share the same slots. The pool spawns no
/// background tasks; it only reacts to [`exec`](Pool::exec) and
/// [`map`](Pool::map) calls.
///
/// # Examples
///
/// ```rust
/// use taskpool::Pool;
///
/// # async fn example() -> Result<(), taskpool::Error> {
/// let pool = Pool::new(4)?;
/// let outcome = pool
///     .exec(|| async { Ok::<_, std::io::Error>("done") })
///     .await;
/// assert_eq!(outcome.value(), Some(&"done"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Pool {
    shared: Arc<Shared>,
}

impl Pool {
    /// Create a pool admitting at most `concurrency` tasks at once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConcurrency`] if `concurrency` is zero.
    pub fn new(concurrency: usize) -> Result<Self> {
        if concurrency < 1 {
            return Err(Error::InvalidConcurrency);
        }
        Ok(Self {
            shared: Arc::new(Shared {
                concurrency,
                state: Mutex::new(PoolState {
                    running: 0,
                    waiters: VecDeque::new(),
                }),
            }),
        })
    }

    /// Create a builder for configuring a pool.
    pub fn builder() -> PoolBuilder {
        PoolBuilder::default()
    }

    /// The fixed concurrency bound.
    pub fn concurrency(&self) -> usize {
        self.shared.concurrency
    }

    /// Tasks currently holding a slot. Always within
    /// `0..=concurrency`.
    pub fn running(&self) -> usize {
        self.shared.lock().running
    }

    /// Admission requests currently queued.
    pub fn waiting(&self) -> usize {
        self.shared.lock().waiters.len()
    }

    /// Run one task under the pool's admission control.
    ///
    /// Waits for a slot, invokes the task, and captures its result and
    /// wall-clock execution time (admission wait excluded) into a
    /// [`TaskOutcome`]. Task errors are captured, never propagated, and the
    /// slot is released on every exit path.
    pub async fn exec<F, Fut, T, E>(&self, task: F) -> TaskOutcome<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let slot = Shared::admit(&self.shared).await;
        let started = Instant::now();
        let result = task().await;
        let elapsed = started.elapsed();
        drop(slot);

        match result {
            Ok(value) => TaskOutcome::Success { value, elapsed },
            Err(error) => TaskOutcome::Failure { error, elapsed },
        }
    }

    /// Apply `f` to every item, never exceeding the pool's concurrency
    /// bound.
    ///
    /// The returned vector has the same length as the input and
    /// `outcomes[i]` corresponds to `items[i]`, regardless of the order in
    /// which tasks actually complete. A failing task does not disturb its
    /// siblings or the ordering.
    pub async fn map<I, T, E, F, Fut>(
        &self,
        items: impl IntoIterator<Item = I>,
        f: F,
    ) -> Vec<TaskOutcome<T, E>>
    where
        F: Fn(I, usize) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let f = &f;
        let tasks = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.exec(move || f(item, index)));
        futures::future::join_all(tasks).await
    }

    /// Like [`map`](Pool::map), but keeps only the successful values.
    ///
    /// **This discards failures silently.** Failed entries are omitted from
    /// the result with no trace — not even their errors; callers that need
    /// to know what failed must use [`map`](Pool::map) instead. Surviving
    /// values keep their original input order with the failures removed.
    pub async fn map_settled<I, T, E, F, Fut>(
        &self,
        items: impl IntoIterator<Item = I>,
        f: F,
    ) -> Vec<T>
    where
        F: Fn(I, usize) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        self.map(items, f)
            .await
            .into_iter()
            .filter_map(TaskOutcome::into_value)
            .collect()
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("Pool")
            .field("concurrency", &self.shared.concurrency)
            .field("running", &state.running)
            .field("waiting", &state.waiters.len())
            .finish()
    }
}

/// Builder for configuring a [`Pool`].
#[derive(Debug, Default)]
pub struct PoolBuilder {
    concurrency: Option<usize>,
    auto_start: Option<bool>,
}

impl PoolBuilder {
    /// Set the concurrency bound. Required, must be at least 1.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Reserved flag for deferred-start pools.
    ///
    /// Accepted for forward compatibility but currently a no-op: admission
    /// behaves identically whether or not it is set.
    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = Some(auto_start);
        self
    }

    /// Build the pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConcurrency`] if the bound is unset or zero.
    pub fn build(self) -> Result<Pool> {
        Pool::new(self.concurrency.unwrap_or(0))
    }
}
