//! Descriptor retrieval from remote sources

use std::io::Write;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

use reqwest::Url;
use tracing::{debug, warn};

use crate::config::{DESCRIPTOR_SUFFIX, FetcherConfig};
use crate::version::descriptor::VersionDescriptor;
use crate::version::error::UpdateError;

/// Trait for retrieving the version descriptor published at a URL
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DescriptorFetcher: Send + Sync {
    /// Retrieves and parses the descriptor at `url`
    ///
    /// # Arguments
    /// * `url` - Location of the descriptor resource
    /// * `current_version` - Reported as the remote version when the descriptor has none
    ///
    /// # Returns
    /// * `Ok(VersionDescriptor)` - Parsed descriptor
    /// * `Err(UpdateError::FetchFailed)` - Transport error, timeout or non-success status
    /// * `Err(UpdateError::MalformedDescriptor)` - Content is not a key/value descriptor
    async fn fetch(
        &self,
        url: &Url,
        current_version: &str,
    ) -> Result<VersionDescriptor, UpdateError>;
}

/// Fetcher that downloads descriptors over HTTP(S)
///
/// The body is streamed into a temporary file inside the scratch directory
/// and parsed from there; the file is removed when the fetch returns,
/// whether it succeeded or not.
pub struct HttpDescriptorFetcher {
    client: reqwest::Client,
    config: FetcherConfig,
}

impl HttpDescriptorFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, UpdateError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                UpdateError::InvalidConfiguration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl DescriptorFetcher for HttpDescriptorFetcher {
    async fn fetch(
        &self,
        url: &Url,
        current_version: &str,
    ) -> Result<VersionDescriptor, UpdateError> {
        let mut response = self.client.get(url.clone()).send().await?;

        let status = response.status();

        if !status.is_success() {
            warn!("Descriptor host returned status {}: {}", status, url);
            return Err(UpdateError::FetchFailed(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let mut scratch = tempfile::Builder::new()
            .prefix("descriptor-")
            .suffix(DESCRIPTOR_SUFFIX)
            .tempfile_in(self.config.scratch_dir())?;

        let limit = self.config.max_descriptor_bytes;
        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            written += chunk.len() as u64;
            if written > limit {
                warn!("Descriptor at {} exceeds {} bytes", url, limit);
                return Err(UpdateError::MalformedDescriptor(format!(
                    "descriptor exceeds {} bytes",
                    limit
                )));
            }
            scratch.write_all(&chunk)?;
        }
        scratch.flush()?;

        debug!(
            "Downloaded {} descriptor bytes from {} into {:?}",
            written,
            url,
            scratch.path()
        );

        let bytes = std::fs::read(scratch.path())?;
        let content = String::from_utf8(bytes).map_err(|_| {
            UpdateError::MalformedDescriptor("descriptor is not valid UTF-8".to_string())
        })?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

        VersionDescriptor::parse(content, current_version)
    }
}
