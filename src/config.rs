use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Deserialize;

// =============================================================================
// Constants
// =============================================================================

/// Manifest path fetched when the caller does not override it
pub const DEFAULT_SERVER_FILE_PATH: &str = "/meta.json";

/// Storage key of the refresh marker
pub const REFRESH_MARKER_KEY: &str = "was-refreshed-before";

/// Value written under [`REFRESH_MARKER_KEY`] when a reload is forced
pub const REFRESH_MARKER_VALUE: &str = "true";

/// Timeout for the manifest request in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Prefix of every diagnostic line emitted by the controller
pub const LOG_PREFIX: &str = "VERSION-CHECK";

/// Whether the status overlay is shown
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Default,
    #[serde(rename = "none")]
    Hidden,
}

/// Screen edge the overlay is anchored to
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Options recognized by the staleness check
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckConfig {
    /// Version the client was built with
    pub current_version: String,
    /// Path of the manifest file on the server, e.g. `/meta.json`
    #[serde(default = "default_server_file_path")]
    pub server_file_path: String,
    /// Values whose change triggers a new check
    #[serde(default)]
    pub dependencies: Vec<serde_json::Value>,
    /// Emit diagnostics through `tracing`
    #[serde(default = "default_logs")]
    pub logs: bool,
    #[serde(default)]
    pub display: DisplayMode,
    #[serde(default)]
    pub class_name: String,
    /// Style overrides merged over the default overlay style
    #[serde(default)]
    pub style: IndexMap<String, String>,
    #[serde(default)]
    pub side: Side,
}

impl CheckConfig {
    pub fn new(current_version: impl Into<String>) -> Self {
        Self {
            current_version: current_version.into(),
            server_file_path: default_server_file_path(),
            dependencies: Vec::new(),
            logs: default_logs(),
            display: DisplayMode::default(),
            class_name: String::new(),
            style: IndexMap::new(),
            side: Side::default(),
        }
    }
}

fn default_server_file_path() -> String {
    DEFAULT_SERVER_FILE_PATH.to_string()
}

fn default_logs() -> bool {
    true
}

/// Returns the path to the data directory for version-check.
/// Uses $XDG_DATA_HOME/version-check if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/version-check,
/// or ./version-check if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the key/value store holding the refresh marker.
pub fn store_path() -> PathBuf {
    data_dir().join("state.db")
}

/// Returns the directory whose subdirectories are the cache buckets.
pub fn cache_dir() -> PathBuf {
    data_dir().join("caches")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("version-check.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("version-check")
}
