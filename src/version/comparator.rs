//! Version comparison strategies
//!
//! Three strategies decide whether the local version is up to date:
//! - Exact ID: byte-exact equality, e.g. `build-42` vs `build-43`
//! - Numeric: dotted numeric tuples, `1.2` == `1.2.0` < `1.10`
//! - Resolvable ID: identifiers mapped through a [`VersionResolver`], then numeric

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::version::error::MalformedVersion;
use crate::version::resolver::VersionResolver;

/// Strategy selector used while configuring an updater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckType {
    ExactId,
    #[default]
    Numeric,
    ResolvableId,
}

impl CheckType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckType::ExactId => "exact_id",
            CheckType::Numeric => "numeric",
            CheckType::ResolvableId => "resolvable_id",
        }
    }
}

/// Validated comparison strategy; the resolver travels with the variant that needs it
#[derive(Clone)]
pub enum Strategy {
    ExactId,
    Numeric,
    ResolvableId(Arc<dyn VersionResolver>),
}

impl Strategy {
    pub fn check_type(&self) -> CheckType {
        match self {
            Strategy::ExactId => CheckType::ExactId,
            Strategy::Numeric => CheckType::Numeric,
            Strategy::ResolvableId(_) => CheckType::ResolvableId,
        }
    }

    pub fn resolver(&self) -> Option<&Arc<dyn VersionResolver>> {
        match self {
            Strategy::ResolvableId(resolver) => Some(resolver),
            Strategy::ExactId | Strategy::Numeric => None,
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.check_type().as_str())
    }
}

/// Verdict of comparing the current version against the remote one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub is_up_to_date: bool,
    /// Ordering of current relative to remote, when the strategy defines one
    pub ordering: Option<Ordering>,
}

impl Comparison {
    /// Verdict used when either side could not be interpreted
    const NOT_UP_TO_DATE: Comparison = Comparison {
        is_up_to_date: false,
        ordering: None,
    };
}

/// Dotted numeric version, compared with missing trailing components as zero
#[derive(Debug, Clone)]
pub struct NumericVersion(Vec<u64>);

impl NumericVersion {
    /// Parse `"1.12.3"` into `[1, 12, 3]`
    ///
    /// Every component must be a non-empty run of ASCII digits.
    pub fn parse(version: &str) -> Result<Self, MalformedVersion> {
        let trimmed = version.trim();
        let malformed = |component: &str| MalformedVersion {
            version: version.to_string(),
            component: component.to_string(),
        };

        if trimmed.is_empty() {
            return Err(malformed(""));
        }

        trimmed
            .split('.')
            .map(|component| {
                if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(malformed(component));
                }
                component.parse::<u64>().map_err(|_| malformed(component))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(NumericVersion)
    }

    pub fn components(&self) -> &[u64] {
        &self.0
    }
}

impl Ord for NumericVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|i| {
                let a = self.0.get(i).copied().unwrap_or(0);
                let b = other.0.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for NumericVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NumericVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for NumericVersion {}

/// Compare `current` against `remote` under `strategy`
///
/// Never fails: versions that cannot be interpreted produce a
/// "not up to date" verdict.
pub fn compare(current: &str, remote: &str, strategy: &Strategy) -> Comparison {
    match strategy {
        Strategy::ExactId => compare_exact(current, remote),
        Strategy::Numeric => compare_numeric(current, remote),
        Strategy::ResolvableId(resolver) => {
            compare_numeric(&resolver.resolve(current), &resolver.resolve(remote))
        }
    }
}

fn compare_exact(current: &str, remote: &str) -> Comparison {
    let equal = current == remote;
    Comparison {
        is_up_to_date: equal,
        ordering: equal.then_some(Ordering::Equal),
    }
}

fn compare_numeric(current: &str, remote: &str) -> Comparison {
    match (NumericVersion::parse(current), NumericVersion::parse(remote)) {
        (Ok(current), Ok(remote)) => {
            let ordering = current.cmp(&remote);
            Comparison {
                is_up_to_date: ordering.is_ge(),
                ordering: Some(ordering),
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            warn!("Treating version as not up to date: {}", e);
            Comparison::NOT_UP_TO_DATE
        }
    }
}
