//! Validated construction of version updaters

use std::sync::Arc;

use reqwest::Url;
use tokio::runtime::Handle;

use crate::config::{DESCRIPTOR_SUFFIX, FetcherConfig};
use crate::version::cache::ResultCache;
use crate::version::comparator::{CheckType, Strategy};
use crate::version::error::UpdateError;
use crate::version::fetcher::{DescriptorFetcher, HttpDescriptorFetcher};
use crate::version::resolver::VersionResolver;
use crate::version::source::Source;
use crate::version::updater::VersionUpdater;

/// Immutable configuration of one updater
///
/// Only obtainable through [`VersionBuilder`], which guarantees the URL points
/// at a descriptor and that a resolver is present exactly for the
/// resolvable-ID strategy.
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    source: Source,
    check_url: Url,
    strategy: Strategy,
}

impl UpdaterConfig {
    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn check_url(&self) -> &Url {
        &self.check_url
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn check_type(&self) -> CheckType {
        self.strategy.check_type()
    }

    pub fn resolver(&self) -> Option<&Arc<dyn VersionResolver>> {
        self.strategy.resolver()
    }
}

/// Builder for [`VersionUpdater`]
///
/// Defaults to the numeric strategy, an HTTP fetcher, the process-wide
/// result cache and the ambient Tokio runtime.
pub struct VersionBuilder {
    source: Source,
    check_type: CheckType,
    resolver: Option<Arc<dyn VersionResolver>>,
    fetcher: Option<Arc<dyn DescriptorFetcher>>,
    fetcher_config: FetcherConfig,
    cache: Option<Arc<ResultCache>>,
    runtime: Option<Handle>,
}

impl VersionBuilder {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            check_type: CheckType::default(),
            resolver: None,
            fetcher: None,
            fetcher_config: FetcherConfig::default(),
            cache: None,
            runtime: None,
        }
    }

    pub fn with_strategy(mut self, check_type: CheckType) -> Self {
        self.check_type = check_type;
        self
    }

    /// Set the resolver used by the resolvable-ID strategy
    ///
    /// Fails unless the strategy is already [`CheckType::ResolvableId`].
    pub fn with_resolver(mut self, resolver: Arc<dyn VersionResolver>) -> Result<Self, UpdateError> {
        if self.check_type != CheckType::ResolvableId {
            return Err(UpdateError::InvalidConfiguration(format!(
                "Cannot set a version resolver for the {} strategy",
                self.check_type.as_str()
            )));
        }
        self.resolver = Some(resolver);
        Ok(self)
    }

    /// Use a custom descriptor fetcher instead of HTTP
    pub fn with_fetcher(mut self, fetcher: Arc<dyn DescriptorFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Settings for the default HTTP fetcher; ignored with [`Self::with_fetcher`]
    pub fn with_fetcher_config(mut self, config: FetcherConfig) -> Self {
        self.fetcher_config = config;
        self
    }

    /// Use a dedicated cache instead of the process-wide one
    pub fn with_cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Runtime that runs the fetch pipeline
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Validate the settings without creating an updater
    pub fn build_config(&self) -> Result<UpdaterConfig, UpdateError> {
        let check_url = parse_check_url(self.source.update_url())?;

        let strategy = match (self.check_type, &self.resolver) {
            (CheckType::ResolvableId, Some(resolver)) => Strategy::ResolvableId(Arc::clone(resolver)),
            (CheckType::ResolvableId, None) => {
                return Err(UpdateError::InvalidConfiguration(
                    "Cannot build a version updater for the resolvable_id strategy without a resolver"
                        .to_string(),
                ));
            }
            (other, Some(_)) => {
                return Err(UpdateError::InvalidConfiguration(format!(
                    "A version resolver is only valid for the resolvable_id strategy, not {}",
                    other.as_str()
                )));
            }
            (CheckType::ExactId, None) => Strategy::ExactId,
            (CheckType::Numeric, None) => Strategy::Numeric,
        };

        Ok(UpdaterConfig {
            source: self.source.clone(),
            check_url,
            strategy,
        })
    }

    /// Validate the settings and create the updater; performs no network I/O
    pub fn build(self) -> Result<VersionUpdater, UpdateError> {
        let config = self.build_config()?;

        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| {
                UpdateError::InvalidConfiguration(
                    "No Tokio runtime available to run version checks".to_string(),
                )
            })?,
        };

        let fetcher: Arc<dyn DescriptorFetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpDescriptorFetcher::new(self.fetcher_config)?),
        };

        let cache = self.cache.unwrap_or_else(ResultCache::shared);

        Ok(VersionUpdater::new(config, fetcher, cache, runtime))
    }
}

fn parse_check_url(raw: &str) -> Result<Url, UpdateError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UpdateError::InvalidConfiguration(
            "Cannot build a version updater with an empty check URL".to_string(),
        ));
    }

    let url = Url::parse(raw).map_err(|e| {
        UpdateError::InvalidConfiguration(format!("Invalid check URL {:?}: {}", raw, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UpdateError::InvalidConfiguration(format!(
            "Unsupported check URL scheme {:?}",
            url.scheme()
        )));
    }

    if !url.path().ends_with(DESCRIPTOR_SUFFIX) {
        return Err(UpdateError::InvalidConfiguration(format!(
            "Check URL must reference a {} file: {}",
            DESCRIPTOR_SUFFIX, url
        )));
    }

    Ok(url)
}
