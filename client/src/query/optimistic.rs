use std::future::Future;

use super::{client::QueryClient, keys::QueryKey};
use crate::error::ApiError;

/// Puts the previous value of one record back unless disarmed, then marks the
/// key stale. Runs on error and when the mutation future is dropped mid-flight.
struct Rollback<'a, T, V, S>
where
    T: Clone + Send + Sync + 'static,
    V: PartialEq,
    S: Fn(&mut T) -> Option<&mut V>,
{
    queries: &'a QueryClient,
    key: &'a QueryKey,
    select: &'a S,
    tentative: V,
    previous: Option<V>,
    _cached: std::marker::PhantomData<fn() -> T>,
}

impl<T, V, S> Rollback<'_, T, V, S>
where
    T: Clone + Send + Sync + 'static,
    V: PartialEq,
    S: Fn(&mut T) -> Option<&mut V>,
{
    fn disarm(mut self) {
        self.previous = None;
    }
}

impl<T, V, S> Drop for Rollback<'_, T, V, S>
where
    T: Clone + Send + Sync + 'static,
    V: PartialEq,
    S: Fn(&mut T) -> Option<&mut V>,
{
    fn drop(&mut self) {
        let Some(previous) = self.previous.take() else {
            return;
        };
        let restored = self.queries.update_data(self.key, |cached: &mut T| {
            match (self.select)(cached) {
                // Only undo our own write; anything else means newer data landed.
                Some(slot) if *slot == self.tentative => {
                    *slot = previous;
                    true
                }
                _ => false,
            }
        });
        // With overlapping mutations the restored value may itself be tentative.
        self.queries.invalidate(self.key);
        tracing::debug!(key = %self.key, restored = restored.unwrap_or(false), "rolled back optimistic update");
    }
}

impl QueryClient {
    /// Optimistically replaces one record inside the cached value at `key`, then runs `call`.
    ///
    /// `select` locates the record; only that record is touched. On success the key
    /// is invalidated so the next read pulls server truth. On failure (or if this
    /// future is dropped) the record is restored, the key is invalidated as well,
    /// and the error is returned. If
    /// nothing is cached or `select` finds no record, `call` still runs and only the
    /// invalidation applies.
    pub async fn mutate_optimistic<T, V, R, S, C, Fut>(
        &self,
        key: &QueryKey,
        select: S,
        tentative: V,
        call: C,
    ) -> Result<R, ApiError>
    where
        T: Clone + Send + Sync + 'static,
        V: Clone + PartialEq,
        S: Fn(&mut T) -> Option<&mut V>,
        C: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, ApiError>>,
    {
        let previous = self
            .update_data(key, |cached: &mut T| {
                select(cached).map(|slot| std::mem::replace(slot, tentative.clone()))
            })
            .flatten();

        let guard = Rollback {
            queries: self,
            key,
            select: &select,
            tentative,
            previous,
            _cached: std::marker::PhantomData,
        };

        match call().await {
            Ok(out) => {
                guard.disarm();
                self.invalidate(key);
                Ok(out)
            }
            Err(e) => {
                drop(guard);
                tracing::warn!(%key, error = %e, "optimistic mutation failed");
                Err(e)
            }
        }
    }
}
