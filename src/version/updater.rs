//! Version check orchestration for one source
//!
//! A check moves a source through `NoResult → Fetching → Cached`:
//! the descriptor is fetched on the updater's runtime, compared with the
//! configured strategy, stored in the cache and handed to every caller
//! waiting on the same fetch.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{error, info};

use crate::version::builder::{UpdaterConfig, VersionBuilder};
use crate::version::cache::{FetchLease, FetchTicket, ResultCache, SharedResult};
use crate::version::comparator::compare;
use crate::version::error::UpdateError;
use crate::version::fetcher::DescriptorFetcher;
use crate::version::future::AsyncFuture;
use crate::version::source::Source;
use crate::version::types::VersionFetchResult;

/// Checks a source for updates and caches the outcome
///
/// Cheap to clone; clones share configuration, fetcher and cache.
#[derive(Clone)]
pub struct VersionUpdater {
    config: Arc<UpdaterConfig>,
    fetcher: Arc<dyn DescriptorFetcher>,
    cache: Arc<ResultCache>,
    runtime: Handle,
}

impl VersionUpdater {
    pub(crate) fn new(
        config: UpdaterConfig,
        fetcher: Arc<dyn DescriptorFetcher>,
        cache: Arc<ResultCache>,
        runtime: Handle,
    ) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            cache,
            runtime,
        }
    }

    /// Start configuring an updater for `source`
    pub fn builder(source: Source) -> VersionBuilder {
        VersionBuilder::new(source)
    }

    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Last successful result, without triggering a fetch
    pub fn cached(&self) -> Option<SharedResult> {
        self.cache.get(self.config.source().key())
    }

    /// Check the remote descriptor
    ///
    /// Without `force` a cached result completes the future immediately and
    /// no request is made. A fetch already running for this source is joined
    /// rather than repeated, so concurrent callers share one result or one
    /// error. Failures leave the cache untouched.
    pub fn fetch(&self, force: bool) -> AsyncFuture<SharedResult> {
        match self.cache.begin_fetch(self.config.source().key(), force) {
            FetchTicket::Cached(result) => AsyncFuture::completed(Ok(result)),
            FetchTicket::Joined(future) => future,
            FetchTicket::Started(lease, future) => {
                self.spawn_fetch(lease);
                future
            }
        }
    }

    /// Cached result if present, otherwise a forced fetch
    pub fn get(&self) -> AsyncFuture<SharedResult> {
        // With nothing cached a non-forced fetch starts or joins exactly like a forced one
        self.fetch(false)
    }

    fn spawn_fetch(&self, lease: FetchLease) {
        let config = Arc::clone(&self.config);
        let fetcher = Arc::clone(&self.fetcher);

        self.runtime.spawn(async move {
            let source = config.source();
            let outcome = run_check(&config, fetcher.as_ref()).await.map(Arc::new);

            match &outcome {
                Ok(result) => info!(
                    "Checked {}: remote {} (up to date: {})",
                    source,
                    result.remote_version(),
                    result.is_up_to_date()
                ),
                Err(e) => error!("Version check for {} failed: {}", source, e),
            }

            lease.settle(outcome);
        });
    }
}

/// Fetch, parse and compare; the pure part of a check
async fn run_check(
    config: &UpdaterConfig,
    fetcher: &dyn DescriptorFetcher,
) -> Result<VersionFetchResult, UpdateError> {
    let source = config.source();
    let descriptor = fetcher.fetch(config.check_url(), source.version()).await?;

    let comparison = compare(
        source.version(),
        &descriptor.remote_version,
        config.strategy(),
    );

    Ok(VersionFetchResult::new(
        comparison.is_up_to_date,
        descriptor,
        source.version(),
        config.resolver().cloned(),
    ))
}
