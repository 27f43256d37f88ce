//! Consumer-facing query state and rate-limit affordances
//!
//! The presentation layer never sees futures or transport types: it sees
//! a `{data, is_loading, error}` snapshot per operation, and for
//! rate-limited requests a gate with a countdown that opens once the
//! advisory wait elapses.

use crate::error::ApiError;
use crate::format::format_time_remaining;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Snapshot of an asynchronous fetch as consumers observe it
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    /// Settled data, once available
    pub data: Option<T>,
    /// True while the fetch is in flight
    pub is_loading: bool,
    /// Terminal failure, if the fetch settled with one
    pub error: Option<ApiError>,
}

impl<T> QueryState<T> {
    /// State while the fetch is in flight
    pub fn loading() -> Self {
        Self {
            data: None,
            is_loading: true,
            error: None,
        }
    }

    /// State after a successful fetch
    pub fn ready(data: T) -> Self {
        Self {
            data: Some(data),
            is_loading: false,
            error: None,
        }
    }

    /// State after a terminal failure
    pub fn failed(error: ApiError) -> Self {
        Self {
            data: None,
            is_loading: false,
            error: Some(error),
        }
    }
}

/// Handle to a query running in the background
///
/// States are published over a watch channel: `Loading` first, then
/// exactly one settled snapshot. Dropping the handle aborts the task, so
/// an abandoned query's result is discarded without side effects.
pub struct QueryHandle<T> {
    states: watch::Receiver<QueryState<T>>,
    task: JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> QueryHandle<T> {
    /// Spawns `fut` and exposes its progress as query states
    pub fn spawn<Fut>(fut: Fut) -> Self
    where
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(QueryState::loading());
        let task = tokio::spawn(async move {
            let state = match fut.await {
                Ok(data) => QueryState::ready(data),
                Err(error) => QueryState::failed(error),
            };
            let _ = tx.send(state);
        });

        Self { states: rx, task }
    }

    /// Current snapshot
    pub fn state(&self) -> QueryState<T> {
        self.states.borrow().clone()
    }

    /// Waits for the query to settle and returns the final snapshot
    pub async fn settled(&mut self) -> QueryState<T> {
        loop {
            {
                let current = self.states.borrow();
                if !current.is_loading {
                    return current.clone();
                }
            }
            if self.states.changed().await.is_err() {
                return self.states.borrow().clone();
            }
        }
    }
}

impl<T> Drop for QueryHandle<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct Tripped {
    error: ApiError,
    until: Instant,
}

/// Tracks a rate-limit rejection and when retrying becomes allowed
///
/// Trip the gate with the failure an operation returned; the gate stays
/// closed for the advisory wait and opens on its own once the countdown
/// reaches zero. Non-rate-limit failures clear the gate.
#[derive(Default)]
pub struct RateLimitGate {
    tripped: Option<Tripped>,
}

impl RateLimitGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an operation failure
    pub fn observe(&mut self, error: &ApiError) {
        match error.retry_after_secs() {
            Some(retry_after) => {
                tracing::warn!(retry_after_secs = retry_after, "Rate limit gate tripped");
                self.tripped = Some(Tripped {
                    error: error.clone(),
                    until: Instant::now() + Duration::from_secs(retry_after),
                });
            }
            None => self.clear(),
        }
    }

    /// True while a rate-limit rejection is being waited out
    pub fn is_rate_limited(&self) -> bool {
        self.tripped.is_some()
    }

    /// The failure that tripped the gate, if any
    pub fn error(&self) -> Option<&ApiError> {
        self.tripped.as_ref().map(|t| &t.error)
    }

    /// Whole seconds left on the countdown, rounding up
    pub fn seconds_remaining(&self) -> u64 {
        let Some(tripped) = &self.tripped else {
            return 0;
        };
        let remaining = tripped.until.saturating_duration_since(Instant::now());
        remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
    }

    /// True once the countdown has elapsed (or the gate never tripped)
    pub fn can_retry(&self) -> bool {
        self.tripped
            .as_ref()
            .map(|t| Instant::now() >= t.until)
            .unwrap_or(true)
    }

    /// Clears the gate if retrying is allowed; returns whether it was
    pub fn retry(&mut self) -> bool {
        if self.can_retry() {
            self.clear();
            true
        } else {
            false
        }
    }

    /// Resets the gate unconditionally
    pub fn clear(&mut self) {
        self.tripped = None;
    }

    /// Countdown rendered for display, e.g. `45s` or `2m 05s`
    pub fn time_remaining_display(&self) -> String {
        format_time_remaining(self.seconds_remaining())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn query_starts_loading_and_settles_with_data() {
        let mut handle = QueryHandle::spawn(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok("payload".to_string())
        });

        let initial = handle.state();
        assert!(initial.is_loading);
        assert!(initial.data.is_none());

        let settled = handle.settled().await;
        assert!(!settled.is_loading);
        assert_eq!(settled.data.as_deref(), Some("payload"));
        assert!(settled.error.is_none());
    }

    #[tokio::test]
    async fn query_settles_with_the_failure() {
        let mut handle: QueryHandle<String> =
            QueryHandle::spawn(async { Err(ApiError::Timeout) });

        let settled = handle.settled().await;
        assert!(settled.data.is_none());
        assert_eq!(settled.error, Some(ApiError::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_discards_the_result() {
        let observed = Arc::new(AtomicBool::new(false));
        let flag = observed.clone();

        let handle = QueryHandle::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });
        drop(handle);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!observed.load(Ordering::SeqCst));
    }

    #[test]
    fn gate_trips_only_on_rate_limits() {
        let mut gate = RateLimitGate::new();
        assert!(gate.can_retry());
        assert!(!gate.is_rate_limited());

        gate.observe(&ApiError::rate_limited(Some(60)));
        assert!(gate.is_rate_limited());
        assert!(!gate.can_retry());
        let remaining = gate.seconds_remaining();
        assert!(remaining > 58 && remaining <= 60);
        assert!(!gate.retry());
        assert!(gate.is_rate_limited());

        gate.observe(&ApiError::Timeout);
        assert!(!gate.is_rate_limited());
        assert!(gate.can_retry());
    }

    #[test]
    fn gate_opens_when_the_countdown_is_zero() {
        let mut gate = RateLimitGate::new();
        gate.observe(&ApiError::rate_limited(Some(0)));
        assert!(gate.is_rate_limited());
        assert!(gate.can_retry());
        assert!(gate.retry());
        assert!(!gate.is_rate_limited());
    }

    #[test]
    fn gate_renders_its_countdown() {
        let mut gate = RateLimitGate::new();
        gate.observe(&ApiError::rate_limited(Some(125)));
        let display = gate.time_remaining_display();
        assert!(display.starts_with("2m"), "unexpected display: {display}");
    }
}
