//! Configuration loading for netinspect
//!
//! Configuration is loaded from the first of:
//! 1. An explicit path (`--config`)
//! 2. Environment variable NETINSPECT_CONFIG_PATH
//! 3. ~/.binks/netinspect.toml
//! 4. $XDG_CONFIG_HOME/netinspect/config.toml
//! 5. Default values
//!
//! `LOG_FORMAT=json` overrides the configured log format.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where OS network state is read from
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Allow-list for capability-gated fields
    #[serde(default)]
    pub capabilities: CapabilitiesConfig,
    /// Query execution limits
    #[serde(default)]
    pub query: QueryConfig,
    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
    /// File this configuration was read from, if any
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

/// Locations of the kernel interfaces and helper tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_proc_root")]
    pub proc_root: PathBuf,
    #[serde(default = "default_sys_root")]
    pub sys_root: PathBuf,
    #[serde(default = "default_resolv_conf")]
    pub resolv_conf: PathBuf,
    /// Wireless configuration tool used for association details
    #[serde(default = "default_iw_command")]
    pub iw_command: String,
}

/// Capability-gated fields the host is allowed to report. Each flag is
/// combined with what the host actually supports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CapabilitiesConfig {
    #[serde(default = "default_true")]
    pub wireless_frequency: bool,
    #[serde(default = "default_true")]
    pub link_bandwidth: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Upper bound for one inspection when run from an async caller
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// Default level for this crate's events when RUST_LOG is unset
    #[serde(default = "default_level")]
    pub level: String,
}

// Default value functions
fn default_proc_root() -> PathBuf {
    PathBuf::from("/proc")
}

fn default_sys_root() -> PathBuf {
    PathBuf::from("/sys")
}

fn default_resolv_conf() -> PathBuf {
    PathBuf::from("/etc/resolv.conf")
}

fn default_iw_command() -> String {
    "iw".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            proc_root: default_proc_root(),
            sys_root: default_sys_root(),
            resolv_conf: default_resolv_conf(),
            iw_command: default_iw_command(),
        }
    }
}

impl Default for CapabilitiesConfig {
    fn default() -> Self {
        Self {
            wireless_frequency: true,
            link_bandwidth: true,
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_level(),
        }
    }
}

impl Config {
    /// Load configuration, preferring `explicit` over the standard locations
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => Self::load_first(&Self::candidate_paths())?,
        };

        if let Ok(format) = std::env::var("LOG_FORMAT") {
            if format.eq_ignore_ascii_case("json") {
                config.logging.format = LogFormat::Json;
            }
        }

        Ok(config)
    }

    /// Parse a single config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.loaded_from = Some(path.to_path_buf());
        Ok(config)
    }

    /// First existing file among `candidates`, or defaults
    fn load_first(candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        match candidates.iter().find(|path| path.exists()) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var("NETINSPECT_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".binks").join("netinspect.toml"));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("netinspect").join("config.toml"));
        }

        paths
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query.timeout_ms)
    }
}
