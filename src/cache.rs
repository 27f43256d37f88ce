//! Keyed response cache with staleness and in-flight deduplication
//!
//! Each entry is a `{value, fetched_at}` pair checked against the cache's
//! staleness window on lookup. Concurrent lookups for the same key join a
//! single underlying fetch instead of issuing duplicates; the first caller
//! runs the fetch and broadcasts the result to everyone waiting on it.

use crate::error::ApiError;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, RwLock};

struct CacheEntry<T> {
    value: T,
    fetched_at: Instant,
}

type InFlightMap<T> = Mutex<HashMap<String, broadcast::Sender<Result<T, ApiError>>>>;

/// Removes the in-flight marker even if the leading fetch is dropped
/// mid-await, so abandoned fetches never wedge later callers.
struct InFlightGuard<'a, T: Clone> {
    key: &'a str,
    map: &'a InFlightMap<T>,
}

impl<T: Clone> Drop for InFlightGuard<'_, T> {
    fn drop(&mut self) {
        self.map
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(self.key);
    }
}

/// In-memory cache for one operation's responses, keyed by parameters
pub struct ResponseCache<T: Clone> {
    stale_after: Duration,
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    in_flight: InFlightMap<T>,
}

impl<T: Clone> ResponseCache<T> {
    /// Creates a cache whose entries go stale after `stale_after`
    pub fn new(stale_after: Duration) -> Self {
        Self {
            stale_after,
            entries: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key` if it is still fresh
    pub async fn get_if_fresh(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.stale_after)
            .map(|entry| entry.value.clone())
    }

    /// Drops the entry for `key`, forcing the next lookup to fetch
    pub async fn invalidate(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    /// Returns a fresh cached value, joins an in-flight fetch for the same
    /// key, or runs `fetch` and publishes its result
    ///
    /// Only successful results are stored; a failure is fanned out to all
    /// waiters and the next lookup fetches again.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        loop {
            if let Some(value) = self.get_if_fresh(key).await {
                tracing::debug!(key, "Cache hit");
                return Ok(value);
            }

            let mut receiver = {
                let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
                let existing = in_flight.get(key).map(|sender| sender.subscribe());
                if existing.is_none() {
                    let (sender, _) = broadcast::channel(1);
                    in_flight.insert(key.to_string(), sender);
                }
                existing
            };

            if let Some(rx) = receiver.as_mut() {
                tracing::debug!(key, "Joining in-flight fetch");
                match rx.recv().await {
                    Ok(result) => return result,
                    // Leader was dropped before settling; start over.
                    Err(_) => continue,
                }
            }

            let guard = InFlightGuard {
                key,
                map: &self.in_flight,
            };
            let result = fetch().await;

            if let Ok(value) = &result {
                let mut entries = self.entries.write().await;
                entries.insert(
                    key.to_string(),
                    CacheEntry {
                        value: value.clone(),
                        fetched_at: Instant::now(),
                    },
                );
            }

            if let Some(sender) = self
                .in_flight
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(key)
            {
                let _ = sender.send(result.clone());
            }
            drop(guard);

            return result;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_fetch(
        calls: &Arc<AtomicUsize>,
        value: &str,
    ) -> impl Fn() -> std::pin::Pin<Box<dyn Future<Output = Result<String, ApiError>> + Send>> {
        let calls = calls.clone();
        let value = value.to_string();
        move || {
            let calls = calls.clone();
            let value = value.clone();
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            })
        }
    }

    #[tokio::test]
    async fn fresh_entries_are_served_without_fetching() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));
        let fetch = counting_fetch(&calls, "v1");

        assert_eq!(cache.get_or_fetch("k", &fetch).await.unwrap(), "v1");
        assert_eq!(cache.get_or_fetch("k", &fetch).await.unwrap(), "v1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_entries_are_refetched() {
        let cache = ResponseCache::new(Duration::from_millis(20));
        let calls = Arc::new(AtomicUsize::new(0));
        let fetch = counting_fetch(&calls, "v");

        cache.get_or_fetch("k", &fetch).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        cache.get_or_fetch("k", &fetch).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn distinct_keys_do_not_share_entries() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));
        let fetch = counting_fetch(&calls, "v");

        cache.get_or_fetch("a", &fetch).await.unwrap();
        cache.get_or_fetch("b", &fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_same_key_lookups_share_one_fetch() {
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        let slow_fetch = {
            let calls = calls.clone();
            move || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok("shared".to_string())
                }
            }
        };

        let first = {
            let cache = cache.clone();
            let fetch = slow_fetch.clone();
            tokio::spawn(async move { cache.get_or_fetch("k", fetch).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = {
            let cache = cache.clone();
            let fetch = slow_fetch.clone();
            tokio::spawn(async move { cache.get_or_fetch("k", fetch).await })
        };

        let (a, b) = (first.await.unwrap(), second.await.unwrap());
        assert_eq!(a.unwrap(), "shared");
        assert_eq!(b.unwrap(), "shared");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache: ResponseCache<String> = ResponseCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        let failing = {
            let calls = calls.clone();
            move || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<String, _>(ApiError::Network("connection reset".to_string()))
                }
            }
        };

        assert!(cache.get_or_fetch("k", &failing).await.is_err());
        assert!(cache.get_or_fetch("k", &failing).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_a_refetch() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));
        let fetch = counting_fetch(&calls, "v");

        cache.get_or_fetch("k", &fetch).await.unwrap();
        cache.invalidate("k").await;
        cache.get_or_fetch("k", &fetch).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
