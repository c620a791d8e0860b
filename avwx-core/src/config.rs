use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use url::Url;

use crate::{error::Error, options::StationQuery};

/// Aviation Weather Center text data server.
pub const DEFAULT_ENDPOINT: &str = "https://aviationweather.gov/adds/dataserver_current/httpparam";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// endpoint = "https://aviationweather.gov/adds/dataserver_current/httpparam"
/// timeout_secs = 30
///
/// [defaults]
/// enabled = true
/// hours_before_now = 6
/// most_recent_for_each_station = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Server endpoint; `DEFAULT_ENDPOINT` when unset.
    pub endpoint: Option<String>,

    /// HTTP timeout in seconds; no timeout when unset.
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub defaults: RequestDefaults,
}

/// Values filled into requests for filters the user left absent.
///
/// These are an explicit, user-visible choice rather than behaviour baked
/// into the option types: with `enabled = false` nothing is added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RequestDefaults {
    pub enabled: bool,

    /// Applied only when no start time, end time or hour window is given.
    pub hours_before_now: Option<u32>,

    pub most_recent_for_each_station: Option<bool>,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            enabled: true,
            hours_before_now: Some(6),
            most_recent_for_each_station: Some(true),
        }
    }
}

impl RequestDefaults {
    pub fn apply(&self, query: &mut StationQuery) {
        if !self.enabled {
            return;
        }

        let has_time_window =
            query.start_time.is_some() || query.end_time.is_some() || query.hours_before_now.is_some();
        if !has_time_window {
            query.hours_before_now = self.hours_before_now;
        }

        if query.most_recent_for_each_station.is_none() {
            query.most_recent_for_each_station = self.most_recent_for_each_station;
        }
    }
}

impl Config {
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn endpoint_url(&self) -> std::result::Result<Url, Error> {
        Ok(Url::parse(self.endpoint())?)
    }

    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        self.endpoint = Some(endpoint.into());
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("org", "avwx", "avwx")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
