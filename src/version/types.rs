use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::version::descriptor::VersionDescriptor;
use crate::version::resolver::VersionResolver;

/// Outcome of one completed version check
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionFetchResult {
    is_up_to_date: bool,
    remote_version: String,
    current_version: String,
    update_note: String,
    changelog: Vec<String>,
    #[serde(skip)]
    resolver: Option<Arc<dyn VersionResolver>>,
}

impl VersionFetchResult {
    pub fn new(
        is_up_to_date: bool,
        descriptor: VersionDescriptor,
        current_version: impl Into<String>,
        resolver: Option<Arc<dyn VersionResolver>>,
    ) -> Self {
        Self {
            is_up_to_date,
            remote_version: descriptor.remote_version,
            current_version: current_version.into(),
            update_note: descriptor.update_note,
            changelog: descriptor.changelog,
            resolver,
        }
    }

    pub fn is_up_to_date(&self) -> bool {
        self.is_up_to_date
    }

    /// Latest version reported by the remote descriptor
    pub fn remote_version(&self) -> &str {
        &self.remote_version
    }

    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    pub fn update_note(&self) -> &str {
        &self.update_note
    }

    pub fn changelog(&self) -> &[String] {
        &self.changelog
    }

    /// Resolver used for the comparison, present for the resolvable-ID strategy
    pub fn resolver(&self) -> Option<&Arc<dyn VersionResolver>> {
        self.resolver.as_ref()
    }

    /// Remote version as the comparison saw it
    pub fn resolved_remote_version(&self) -> String {
        match &self.resolver {
            Some(resolver) => resolver.resolve(&self.remote_version),
            None => self.remote_version.clone(),
        }
    }
}

impl PartialEq for VersionFetchResult {
    fn eq(&self, other: &Self) -> bool {
        let same_resolver = match (&self.resolver, &other.resolver) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_resolver
            && self.is_up_to_date == other.is_up_to_date
            && self.remote_version == other.remote_version
            && self.current_version == other.current_version
            && self.update_note == other.update_note
            && self.changelog == other.changelog
    }
}

impl fmt::Debug for VersionFetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionFetchResult")
            .field("is_up_to_date", &self.is_up_to_date)
            .field("remote_version", &self.remote_version)
            .field("current_version", &self.current_version)
            .field("update_note", &self.update_note)
            .field("changelog", &self.changelog)
            .field("has_resolver", &self.resolver.is_some())
            .finish()
    }
}
