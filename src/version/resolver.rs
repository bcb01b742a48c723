//! Version identifier resolution
//!
//! Some sources publish opaque identifiers ("alpha", "build-42") instead of
//! numeric versions. A resolver maps each identifier to a dotted numeric
//! token so the resolvable-ID strategy can order them.

use std::collections::HashMap;

#[cfg(test)]
use mockall::automock;

/// Maps an arbitrary version identifier to a comparable numeric token
///
/// The returned string is compared with the numeric rule, e.g. `"1.4.0"`.
/// Tokens that are not numeric make the comparison conservatively report
/// "not up to date".
#[cfg_attr(test, automock)]
pub trait VersionResolver: Send + Sync {
    fn resolve(&self, id: &str) -> String;
}

impl<F> VersionResolver for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn resolve(&self, id: &str) -> String {
        self(id)
    }
}

/// Resolver backed by a fixed identifier table
///
/// Unknown identifiers resolve to themselves, so a source that already uses
/// numeric versions keeps working without table entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapResolver {
    table: HashMap<String, String>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping from `id` to the numeric `token`
    pub fn with(mut self, id: impl Into<String>, token: impl Into<String>) -> Self {
        self.table.insert(id.into(), token.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl FromIterator<(String, String)> for MapResolver {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            table: iter.into_iter().collect(),
        }
    }
}

impl VersionResolver for MapResolver {
    fn resolve(&self, id: &str) -> String {
        self.table
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_acts_as_resolver() {
        let resolver = |id: &str| id.trim_start_matches("build-").to_string();

        assert_eq!(resolver.resolve("build-42"), "42");
    }

    #[test]
    fn map_resolver_returns_mapped_token() {
        let resolver = MapResolver::new().with("alpha", "1.0").with("beta", "1.1");

        assert_eq!(resolver.resolve("alpha"), "1.0");
        assert_eq!(resolver.resolve("beta"), "1.1");
    }

    #[test]
    fn map_resolver_passes_unknown_ids_through() {
        let resolver = MapResolver::new().with("alpha", "1.0");

        assert_eq!(resolver.resolve("2.3.1"), "2.3.1");
    }

    #[test]
    fn map_resolver_collects_from_pairs() {
        let resolver: MapResolver = vec![("rc".to_string(), "0.9".to_string())]
            .into_iter()
            .collect();

        assert!(!resolver.is_empty());
        assert_eq!(resolver.resolve("rc"), "0.9");
    }
}
