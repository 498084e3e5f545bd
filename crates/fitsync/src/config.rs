//! Configuration loading
//!
//! Layered resolution: built-in defaults, then `fitsync.toml` in the
//! platform config directory (or an explicit `--config` path), then
//! `FITSYNC_*` environment variables. Nested keys use a double underscore
//! in the environment, e.g. `FITSYNC_STORE__TOKEN`.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Default configuration directory name
const CONFIG_DIR_NAME: &str = "fitsync";

/// Source platform connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// API base URL
    pub base_url: String,
    /// Ready-to-use bearer token (authentication happens outside fitsync)
    pub token: String,
    /// Account display name, used by the sleep endpoint
    pub user: String,
}

/// Workspace database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// API base URL
    pub base_url: String,
    /// Integration bearer token
    pub token: String,
    /// API version header value
    pub version: String,
    /// Database holding one record per activity
    pub activity_database: String,
    /// Database holding one record per sleep night
    pub sleep_database: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub store: StoreConfig,
    /// IANA timezone used for sleep formatting and goal evaluation
    pub timezone: String,
    /// Query page size for paginated store scans
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig {
                base_url: "https://connectapi.garmin.com".to_string(),
                token: String::new(),
                user: String::new(),
            },
            store: StoreConfig {
                base_url: "https://api.notion.com".to_string(),
                token: String::new(),
                version: "2022-06-28".to_string(),
                activity_database: String::new(),
                sleep_database: String::new(),
            },
            timezone: "Europe/Paris".to_string(),
            page_size: 100,
        }
    }
}

impl Config {
    /// Load configuration, optionally from an explicit file path
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };

        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("FITSYNC_").split("__"))
            .extract()
            .map_err(|e| SyncError::config(e.to_string()))
    }

    /// Parse the configured timezone name
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| SyncError::config(format!("invalid timezone: {}", self.timezone)))
    }

    /// Verify everything a sync run needs is present
    pub fn ensure_ready(&self) -> Result<()> {
        if self.source.token.is_empty() {
            return Err(SyncError::config("source token is not configured"));
        }
        if self.store.token.is_empty() {
            return Err(SyncError::config("store token is not configured"));
        }
        if self.store.activity_database.is_empty() {
            return Err(SyncError::config("activity database id is not configured"));
        }
        self.timezone().map(|_| ())
    }
}

/// Path of the default configuration file
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join("fitsync.toml")
}
