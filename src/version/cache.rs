//! In-memory cache of version check results
//!
//! Each source owns one slot holding its last successful result and, while a
//! fetch is running, the future of that fetch. Slots live in a sharded map so
//! checks for different sources do not contend on a single lock, and the
//! in-flight marker is checked and set under the slot's shard lock so only
//! one fetch per source runs at a time.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use tracing::debug;

use crate::version::future::{AsyncFuture, Outcome, Promise};
use crate::version::source::SourceKey;
use crate::version::types::VersionFetchResult;

/// Result handle shared by the cache and every caller that received it
pub type SharedResult = Arc<VersionFetchResult>;

static SHARED_CACHE: LazyLock<Arc<ResultCache>> = LazyLock::new(|| Arc::new(ResultCache::new()));

#[derive(Default)]
struct Slot {
    result: Option<SharedResult>,
    in_flight: Option<AsyncFuture<SharedResult>>,
}

/// What a caller should do after asking the cache for a source's result
pub enum FetchTicket {
    /// A cached result is available and no fetch is needed
    Cached(SharedResult),
    /// Another caller is already fetching; await its future
    Joined(AsyncFuture<SharedResult>),
    /// The caller owns the fetch and must settle the lease
    Started(FetchLease, AsyncFuture<SharedResult>),
}

/// Ownership of the single in-flight fetch for a source
///
/// Settling stores a successful result, clears the in-flight marker and then
/// completes the shared future. A lease dropped without being settled (for
/// example when the fetch task panics) clears the marker and fails the
/// future, so the next call can retry.
pub struct FetchLease {
    cache: Arc<ResultCache>,
    key: SourceKey,
    promise: Option<Promise<SharedResult>>,
}

impl FetchLease {
    pub fn key(&self) -> SourceKey {
        self.key
    }

    pub fn settle(mut self, outcome: Outcome<SharedResult>) {
        self.cache.finish_fetch(self.key, outcome.as_ref().ok());
        if let Some(promise) = self.promise.take() {
            promise.complete(outcome);
        }
    }
}

impl Drop for FetchLease {
    fn drop(&mut self) {
        if let Some(promise) = self.promise.take() {
            self.cache.finish_fetch(self.key, None);
            drop(promise);
        }
    }
}

/// Per-source result cache with in-flight fetch tracking
#[derive(Default)]
pub struct ResultCache {
    entries: DashMap<SourceKey, Slot>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache used by updaters that are not given their own
    pub fn shared() -> Arc<ResultCache> {
        Arc::clone(&SHARED_CACHE)
    }

    /// Last successful result for a source
    pub fn get(&self, key: SourceKey) -> Option<SharedResult> {
        self.entries.get(&key).and_then(|slot| slot.result.clone())
    }

    /// Replace the result for a source, returning the previous one
    pub fn store(&self, key: SourceKey, result: SharedResult) -> Option<SharedResult> {
        self.entries.entry(key).or_default().result.replace(result)
    }

    /// Drop the cached result for a source; a running fetch is unaffected
    pub fn invalidate(&self, key: SourceKey) -> Option<SharedResult> {
        self.entries
            .get_mut(&key)
            .and_then(|mut slot| slot.result.take())
    }

    pub fn is_fetching(&self, key: SourceKey) -> bool {
        self.entries
            .get(&key)
            .is_some_and(|slot| slot.in_flight.is_some())
    }

    /// Number of sources with a cached result
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|slot| slot.result.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decide atomically whether to serve from cache, join or start a fetch
    ///
    /// Without `force` a cached result wins. Otherwise a fetch already in
    /// flight is joined, and only when none is running a new one is started.
    pub fn begin_fetch(self: &Arc<Self>, key: SourceKey, force: bool) -> FetchTicket {
        let mut slot = self.entries.entry(key).or_default();

        if !force && let Some(result) = &slot.result {
            debug!("Cache hit for {}", key);
            return FetchTicket::Cached(Arc::clone(result));
        }

        if let Some(in_flight) = &slot.in_flight {
            debug!("Joining in-flight fetch for {}", key);
            return FetchTicket::Joined(in_flight.clone());
        }

        let (promise, future) = AsyncFuture::pending();
        slot.in_flight = Some(future.clone());

        let lease = FetchLease {
            cache: Arc::clone(self),
            key,
            promise: Some(promise),
        };
        FetchTicket::Started(lease, future)
    }

    fn finish_fetch(&self, key: SourceKey, result: Option<&SharedResult>) {
        let mut slot = self.entries.entry(key).or_default();
        if let Some(result) = result {
            slot.result = Some(Arc::clone(result));
        }
        slot.in_flight = None;
    }
}
