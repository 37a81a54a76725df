//! Configuration file handling
//!
//! Settings live in `~/.dropfeed/config.toml`. Every key is optional and
//! command-line flags take precedence over the file.

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::{DateBasis, DropfeedError, GroupMode, Result};

/// Default feed location, relative to the working directory
pub const DEFAULT_FEED: &str = "output_updated.csv";

/// Default product site prefix for item links
pub const DEFAULT_BASE_URL: &str = "https://www.hermes.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed CSV: file path or http(s) URL
    pub feed: String,
    /// Prefix joined with each listing's `url`
    pub product_base_url: String,
    /// Clock used for day/week bucketing
    pub date_basis: DateBasis,
    /// Mode shown first
    pub default_mode: GroupMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed: DEFAULT_FEED.to_string(),
            product_base_url: DEFAULT_BASE_URL.to_string(),
            date_basis: DateBasis::default(),
            default_mode: GroupMode::default(),
        }
    }
}

impl Config {
    /// `~/.dropfeed/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| DropfeedError::Config("Cannot determine home directory".into()))?;
        Ok(base_dirs.home_dir().join(".dropfeed").join("config.toml"))
    }

    /// Load from an explicit path; the file must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DropfeedError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| DropfeedError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the default file, falling back to defaults when it does not exist
    pub fn load_default() -> Result<Self> {
        let path = match Self::default_path() {
            Ok(path) => path,
            Err(e) => {
                debug!("no home directory, using default config: {}", e);
                return Ok(Self::default());
            }
        };
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Effective settings as TOML, printed by `dropfeed config`
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}
