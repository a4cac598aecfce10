//! In-process query cache shared by every view.
//!
//! Entries are type-erased (`Arc<dyn Any>`) and keyed by [`QueryKey`]. Reads are
//! served from cache while fresh, refetched once stale, and retried on transient
//! failures. Mutations never go through [`QueryClient::fetch`] and so never retry.

use std::{
    any::Any,
    collections::HashMap,
    future::Future,
    sync::{
        Arc, PoisonError, RwLock, RwLockWriteGuard,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use common::config::Config;
use tokio::time::Instant;

use super::keys::QueryKey;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    /// How long a fetched value is served without refetching.
    pub stale_time: Duration,
    /// Entries not read for this long are dropped by [`QueryClient::gc`].
    pub gc_time: Duration,
    /// Extra attempts for a read after a transient failure.
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(30),
            gc_time: Duration::from_secs(600),
            retries: 1,
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl QueryOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            stale_time: config.query_stale_time(),
            gc_time: config.query_gc_time(),
            retries: config.query_retries,
            ..Self::default()
        }
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    updated_at: Instant,
    last_used: Instant,
    stale: bool,
}

#[derive(Clone, Default)]
pub struct QueryClient {
    entries: Arc<RwLock<HashMap<QueryKey, Entry>>>,
    /// Bumped on every invalidation; a fetch that straddles one stores its result as stale.
    epoch: Arc<AtomicU64>,
    options: QueryOptions,
}

impl QueryClient {
    pub fn new(options: QueryOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn fresh<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let mut map = self.write();
        let entry = map.get_mut(key)?;
        if entry.stale || entry.updated_at.elapsed() >= self.options.stale_time {
            return None;
        }
        entry.last_used = Instant::now();
        entry.value.clone().downcast::<T>().ok()
    }

    /// Returns the cached value for `key` if fresh, otherwise runs `fetcher` and caches the result.
    ///
    /// Transient failures (network, timeout, 5xx) are retried up to `retries` times.
    /// Nothing is written if the returned future is dropped before completion.
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<Arc<T>, ApiError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(hit) = self.fresh::<T>(key) {
            tracing::trace!(%key, "query cache hit");
            return Ok(hit);
        }

        let started_epoch = self.epoch.load(Ordering::SeqCst);
        let mut attempt = 0;
        let value = loop {
            match fetcher().await {
                Ok(v) => break v,
                Err(e) if e.is_transient() && attempt < self.options.retries => {
                    attempt += 1;
                    tracing::warn!(%key, attempt, error = %e, "retrying query after transient failure");
                    tokio::time::sleep(self.options.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        };

        let value = Arc::new(value);
        let now = Instant::now();
        let stale = self.epoch.load(Ordering::SeqCst) != started_epoch;
        self.write().insert(
            key.clone(),
            Entry {
                value: value.clone(),
                updated_at: now,
                last_used: now,
                stale,
            },
        );
        Ok(value)
    }

    /// Cached value regardless of freshness.
    pub fn get_query_data<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let map = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        map.get(key)?.value.clone().downcast::<T>().ok()
    }

    pub fn set_query_data<T: Send + Sync + 'static>(&self, key: &QueryKey, value: T) {
        let now = Instant::now();
        self.write().insert(
            key.clone(),
            Entry {
                value: Arc::new(value),
                updated_at: now,
                last_used: now,
                stale: false,
            },
        );
    }

    /// Applies `f` to a copy of the cached value and swaps the copy in.
    ///
    /// Returns `None` when nothing of type `T` is cached under `key`. Freshness is
    /// left untouched.
    pub fn update_data<T, R>(&self, key: &QueryKey, f: impl FnOnce(&mut T) -> R) -> Option<R>
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut map = self.write();
        let entry = map.get_mut(key)?;
        let mut copy = entry.value.downcast_ref::<T>()?.clone();
        let out = f(&mut copy);
        entry.value = Arc::new(copy);
        Some(out)
    }

    /// Marks `prefix` and every key below it stale. Returns how many entries were hit.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let mut map = self.write();
        let mut hit = 0;
        for (key, entry) in map.iter_mut() {
            if key.starts_with(prefix) {
                entry.stale = true;
                hit += 1;
            }
        }
        tracing::debug!(%prefix, hit, "invalidated queries");
        hit
    }

    pub fn is_stale(&self, key: &QueryKey) -> Option<bool> {
        let map = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        map.get(key)
            .map(|e| e.stale || e.updated_at.elapsed() >= self.options.stale_time)
    }

    /// Drops entries unused for longer than `gc_time`. Returns how many were removed.
    pub fn gc(&self) -> usize {
        let gc_time = self.options.gc_time;
        let mut map = self.write();
        let before = map.len();
        map.retain(|_, e| e.last_used.elapsed() < gc_time);
        before - map.len()
    }

    pub fn clear(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::keys;
    use std::sync::atomic::AtomicUsize;

    fn client() -> QueryClient {
        QueryClient::new(QueryOptions {
            retry_delay: Duration::ZERO,
            ..QueryOptions::default()
        })
    }

    fn counting(calls: &Arc<AtomicUsize>) -> impl Fn() -> std::future::Ready<Result<u32, ApiError>> {
        let calls = calls.clone();
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) as u32;
            std::future::ready(Ok(n))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn serves_fresh_values_from_cache() {
        let qc = client();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = keys::courses::list();

        assert_eq!(*qc.fetch(&key, counting(&calls)).await.unwrap(), 0);
        assert_eq!(*qc.fetch(&key, counting(&calls)).await.unwrap(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(*qc.fetch(&key, counting(&calls)).await.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidation_is_by_prefix() {
        let qc = client();
        qc.set_query_data(&keys::attendance::by_course(1), 1u32);
        qc.set_query_data(&keys::attendance::by_course(12), 12u32);
        qc.set_query_data(&keys::courses::my(), 0u32);

        assert_eq!(qc.invalidate(&keys::attendance::by_course(1)), 1);
        assert_eq!(qc.is_stale(&keys::attendance::by_course(1)), Some(true));
        assert_eq!(qc.is_stale(&keys::attendance::by_course(12)), Some(false));

        assert_eq!(qc.invalidate(&keys::attendance::all()), 2);
        assert_eq!(qc.is_stale(&keys::courses::my()), Some(false));
        // Stale entries still serve as last-known data.
        assert_eq!(
            *qc.get_query_data::<u32>(&keys::attendance::by_course(12)).unwrap(),
            12
        );
    }

    #[tokio::test]
    async fn retries_transient_read_failures_once() {
        let qc = client();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let value = qc
            .fetch(&keys::courses::list(), move || {
                let n = c.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(ApiError::Status { status: 503, message: None })
                    } else {
                        Ok("ok")
                    }
                }
            })
            .await
            .unwrap();
        assert_eq!(*value, "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn gives_up_after_one_retry_and_skips_non_transient() {
        let qc = client();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let err = qc
            .fetch::<u32, _, _>(&keys::courses::list(), move || {
                c.fetch_add(1, Ordering::SeqCst);
                async { Err(ApiError::Timeout) }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Timeout));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let err = qc
            .fetch::<u32, _, _>(&keys::courses::my(), move || {
                c.fetch_add(1, Ordering::SeqCst);
                async { Err(ApiError::Status { status: 404, message: None }) }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(qc.get_query_data::<u32>(&keys::courses::my()).is_none());
    }

    #[tokio::test]
    async fn fetch_straddling_an_invalidation_is_stored_stale() {
        let qc = client();
        let key = keys::attendance::by_course(3);
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let rx = std::sync::Mutex::new(Some(rx));

        let fetch = qc.fetch(&key, || {
            let rx = rx.lock().unwrap().take();
            async move {
                if let Some(rx) = rx {
                    let _ = rx.await;
                }
                Ok(5u32)
            }
        });
        let invalidate = async {
            tokio::task::yield_now().await;
            qc.invalidate(&keys::attendance::all());
            let _ = tx.send(());
        };
        let (value, _) = tokio::join!(fetch, invalidate);

        assert_eq!(*value.unwrap(), 5);
        assert_eq!(qc.is_stale(&key), Some(true));
    }

    #[tokio::test]
    async fn dropped_fetch_writes_nothing() {
        let qc = client();
        let key = keys::courses::detail(4);
        let fut = qc.fetch(&key, || std::future::pending::<Result<u32, ApiError>>());
        let timed_out = tokio::time::timeout(Duration::from_millis(10), fut).await;
        assert!(timed_out.is_err());
        assert!(qc.get_query_data::<u32>(&key).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn gc_evicts_unused_entries() {
        let qc = client();
        qc.set_query_data(&keys::courses::list(), 1u32);
        tokio::time::advance(Duration::from_secs(300)).await;
        qc.set_query_data(&keys::courses::my(), 2u32);
        tokio::time::advance(Duration::from_secs(301)).await;

        assert_eq!(qc.gc(), 1);
        assert!(qc.get_query_data::<u32>(&keys::courses::list()).is_none());
        assert!(qc.get_query_data::<u32>(&keys::courses::my()).is_some());
    }

    #[tokio::test]
    async fn update_data_requires_matching_type() {
        let qc = client();
        let key = keys::courses::list();
        qc.set_query_data(&key, vec![1u32, 2, 3]);
        assert_eq!(qc.update_data(&key, |v: &mut Vec<u32>| v.push(4)), Some(()));
        assert_eq!(qc.get_query_data::<Vec<u32>>(&key).unwrap().len(), 4);
        assert_eq!(qc.update_data(&key, |_: &mut String| ()), None);

        qc.clear();
        assert!(qc.is_empty());
    }
}
