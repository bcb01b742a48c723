//! Version update resolution engine
//!
//! This module fetches a source's remote version descriptor, compares it
//! against the installed version, caches the outcome per source and delivers
//! it to every interested caller through a single-assignment future.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Builder   │────▶│   Updater   │────▶│    Cache    │
//! │ (validate)  │     │ (fetch/get) │     │ (per source)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                        │       │
//!                        ▼       ▼
//!              ┌─────────────┐ ┌─────────────┐
//!              │   Fetcher   │ │ Comparator  │
//!              │(descriptor) │ │ (strategy)  │
//!              └─────────────┘ └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`builder`]: Validating builder producing an immutable `UpdaterConfig`
//! - [`cache`]: Per-source result cache with in-flight fetch tracking
//! - [`comparator`]: Exact, numeric and resolvable-ID comparison strategies
//! - [`descriptor`]: Parser for the key/value descriptor format
//! - [`error`]: Error types for configuration, fetching and parsing
//! - [`fetcher`]: Descriptor retrieval trait and HTTP implementation
//! - [`future`]: Single-assignment, multi-subscriber future
//! - [`resolver`]: Identifier-to-version resolution for the resolvable-ID strategy
//! - [`source`]: Identity of the checked application or plugin
//! - [`types`]: The `VersionFetchResult` handed to callers
//! - [`updater`]: Orchestration of fetch, compare and cache

pub mod builder;
pub mod cache;
pub mod comparator;
pub mod descriptor;
pub mod error;
pub mod fetcher;
pub mod future;
pub mod resolver;
pub mod source;
pub mod types;
pub mod updater;

pub use builder::{UpdaterConfig, VersionBuilder};
pub use cache::ResultCache;
pub use comparator::{CheckType, Comparison, Strategy, compare};
pub use descriptor::VersionDescriptor;
pub use error::{MalformedVersion, UpdateError};
pub use fetcher::{DescriptorFetcher, HttpDescriptorFetcher};
pub use future::AsyncFuture;
pub use resolver::{MapResolver, VersionResolver};
pub use source::{Source, SourceKey};
pub use types::VersionFetchResult;
pub use updater::VersionUpdater;
