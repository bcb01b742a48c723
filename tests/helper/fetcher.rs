//! Descriptor fetcher test doubles

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tokio::sync::Notify;

use version_updater::version::{DescriptorFetcher, UpdateError, VersionDescriptor};

/// Build a descriptor reporting `version`
pub fn descriptor(version: &str) -> VersionDescriptor {
    VersionDescriptor {
        remote_version: version.to_string(),
        update_note: "Download the latest build".to_string(),
        changelog: vec!["Improved startup time".to_string()],
    }
}

/// Fetcher that blocks every fetch until [`GatedFetcher::open`] is called
pub struct GatedFetcher {
    outcome: Result<VersionDescriptor, UpdateError>,
    calls: AtomicUsize,
    started: Notify,
    gate: Notify,
}

impl GatedFetcher {
    pub fn new(outcome: Result<VersionDescriptor, UpdateError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            started: Notify::new(),
            gate: Notify::new(),
        }
    }

    /// Number of network fetches performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Wait until a fetch has entered the fetcher
    pub async fn wait_started(&self) {
        tokio::time::timeout(Duration::from_secs(5), self.started.notified())
            .await
            .expect("fetch never started");
    }

    /// Let the waiting fetch complete
    pub fn open(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl DescriptorFetcher for GatedFetcher {
    async fn fetch(
        &self,
        _url: &Url,
        _current_version: &str,
    ) -> Result<VersionDescriptor, UpdateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.gate.notified().await;
        self.outcome.clone()
    }
}
