use serde::Deserialize;
use std::path::PathBuf;

// =============================================================================
// Descriptor constants
// =============================================================================

/// File suffix every remote descriptor URL must end with
pub const DESCRIPTOR_SUFFIX: &str = ".kupdter";

/// Transport timeout for descriptor downloads in milliseconds (30 seconds)
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;

/// Largest descriptor accepted before the download is rejected (64 KiB)
pub const DEFAULT_MAX_DESCRIPTOR_BYTES: u64 = 64 * 1024;

/// User agent sent with descriptor requests
pub const USER_AGENT: &str = "version-updater";

/// Environment variable read by [`crate::logging::init_logging`]
pub const LOG_ENV_VAR: &str = "VERSION_UPDATER_LOG";

/// Descriptor fetcher configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FetcherConfig {
    /// Transport timeout in milliseconds
    pub timeout_ms: u64,
    pub user_agent: String,
    /// Upper bound on the downloaded descriptor size
    pub max_descriptor_bytes: u64,
    /// Directory for transient descriptor files, system temp dir when unset
    pub scratch_dir: Option<PathBuf>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            user_agent: USER_AGENT.to_string(),
            max_descriptor_bytes: DEFAULT_MAX_DESCRIPTOR_BYTES,
            scratch_dir: None,
        }
    }
}

impl FetcherConfig {
    /// Directory where transient descriptor files are created
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Returns the path to the data directory for version-updater.
/// Uses $XDG_DATA_HOME/version-updater if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/version-updater,
/// or ./version-updater if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("version-updater.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("version-updater")
}
