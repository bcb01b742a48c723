//! Identity of the application or plugin whose version is checked

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SOURCE_KEY: AtomicU64 = AtomicU64::new(1);

/// Opaque, process-unique identity of a [`Source`]
///
/// Results are cached per key, so two sources that happen to share a name
/// and version still cache independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceKey(u64);

impl SourceKey {
    fn next() -> Self {
        SourceKey(NEXT_SOURCE_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

/// A versioned entity together with the location of its remote descriptor
///
/// Clones share the identity of the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    key: SourceKey,
    name: String,
    version: String,
    update_url: String,
}

impl Source {
    /// Create a source with a fresh identity
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        update_url: impl Into<String>,
    ) -> Self {
        Self {
            key: SourceKey::next(),
            name: name.into(),
            version: version.into(),
            update_url: update_url.into(),
        }
    }

    pub fn key(&self) -> SourceKey {
        self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version currently installed
    pub fn version(&self) -> &str {
        &self.version
    }

    /// URL of the remote descriptor, as declared by the source
    pub fn update_url(&self) -> &str {
        &self.update_url
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.version, self.key)
    }
}
