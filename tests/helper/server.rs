//! Updaters wired to a mock HTTP descriptor host

use std::sync::Arc;

use mockito::ServerGuard;
use tempfile::TempDir;

use version_updater::config::FetcherConfig;
use version_updater::version::{CheckType, ResultCache, Source, VersionBuilder, VersionUpdater};

/// Path of the descriptor served by the mock host
pub fn descriptor_path() -> &'static str {
    "/plugins/karma.kupdter"
}

/// Create an HTTP-backed updater for a source published on `server`
///
/// Each updater gets its own cache; scratch files go to `scratch`.
pub fn create_http_updater(
    server: &ServerGuard,
    scratch: &TempDir,
    current_version: &str,
    check_type: CheckType,
) -> VersionUpdater {
    let url = format!("{}{}", server.url(), descriptor_path());

    VersionBuilder::new(Source::new("karma", current_version, url))
        .with_strategy(check_type)
        .with_fetcher_config(FetcherConfig {
            scratch_dir: Some(scratch.path().to_path_buf()),
            ..FetcherConfig::default()
        })
        .with_cache(Arc::new(ResultCache::new()))
        .build()
        .unwrap()
}
