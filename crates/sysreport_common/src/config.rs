//! sysreport configuration
//!
//! Optional TOML file at `<config-dir>/sysreport/config.toml`:
//!
//! ```toml
//! url = "https://metrics.sysreport.dev"
//! timeout_secs = 10
//! cache_root = "/var/cache/reports"   # default: $XDG_CACHE_HOME, then the platform cache dir
//! root = "/"                          # system root metrics are read from
//! ```
//!
//! The environment is only consulted here, never by the reporter itself.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::sender::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

const CONFIG_DIR: &str = "sysreport";
const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the per-user cache root
pub const CACHE_HOME_ENV: &str = "XDG_CACHE_HOME";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Base URL of the collection server
    #[serde(default = "default_url")]
    pub url: String,

    /// Upload timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cache root override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_root: Option<PathBuf>,

    /// System root metrics are collected from
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

fn default_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_root() -> PathBuf {
    PathBuf::from("/")
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            cache_root: None,
            root: default_root(),
        }
    }
}

impl ReportConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and defaults are used when it's absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p),
                _ => {
                    debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// `<config-dir>/sysreport/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Cache root from the config file, then `$XDG_CACHE_HOME`, then the
    /// platform default.
    pub fn cache_root(&self) -> io::Result<PathBuf> {
        match &self.cache_root {
            Some(root) => Ok(root.clone()),
            None => resolve_cache_root(std::env::var_os(CACHE_HOME_ENV)),
        }
    }
}

/// Resolve the cache root from an environment override.
///
/// Empty overrides are ignored, matching the XDG base directory rules.
pub fn resolve_cache_root(env_override: Option<OsString>) -> io::Result<PathBuf> {
    if let Some(dir) = env_override.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    if let Some(dir) = dirs::cache_dir() {
        return Ok(dir);
    }

    dirs::home_dir()
        .map(|home| home.join(".cache"))
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no cache directory for this user"))
}
