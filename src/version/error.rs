use thiserror::Error;

/// Errors surfaced by the builder and the fetch pipeline
///
/// `Clone` because a single failed fetch is delivered to every caller that
/// joined it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Malformed descriptor: {0}")]
    MalformedDescriptor(String),
}

impl From<reqwest::Error> for UpdateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpdateError::FetchFailed(format!("request timed out: {}", err))
        } else {
            UpdateError::FetchFailed(err.to_string())
        }
    }
}

impl From<std::io::Error> for UpdateError {
    fn from(err: std::io::Error) -> Self {
        UpdateError::FetchFailed(format!("scratch storage error: {}", err))
    }
}

/// A version string that is not a dotted numeric tuple
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed version {version:?}: invalid component {component:?}")]
pub struct MalformedVersion {
    pub version: String,
    pub component: String,
}
