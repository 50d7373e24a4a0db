//! Configuration file support
//!
//! Settings are read from `~/.config/swa/config.toml` on Linux (the platform
//! equivalent elsewhere). Every key is optional; a missing file means
//! defaults. Command-line flags override file values.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the configuration file inside the config directory
const CONFIG_FILE: &str = "config.toml";

/// Honolulu, HI: used when no location was given and none is remembered
pub const FALLBACK_LATITUDE: f64 = 21.306944;
pub const FALLBACK_LONGITUDE: f64 = -157.858333;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid TOML for our settings
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting is out of range
    #[error("Invalid setting '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Latitude used when no location is given or remembered
    pub fallback_latitude: f64,
    /// Longitude used when no location is given or remembered
    pub fallback_longitude: f64,
    /// Minutes between automatic refreshes, 0 disables them
    pub refresh_minutes: u64,
    /// User-Agent sent to weather.gov
    pub user_agent: String,
    /// How long a remembered point stays fresh, in hours
    pub point_ttl_hours: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_latitude: FALLBACK_LATITUDE,
            fallback_longitude: FALLBACK_LONGITUDE,
            refresh_minutes: 15,
            user_agent: default_user_agent(),
            point_ttl_hours: 24 * 30,
        }
    }
}

fn default_user_agent() -> String {
    format!("swa/{} (terminal weather dashboard)", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Platform path of the config file, if a home directory exists
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "swa").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Loads the config from the default path
    ///
    /// Returns defaults when there is no home directory or no config file.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads and validates the config at `path`
    ///
    /// # Returns
    /// * `Ok(Config)` with defaults for any missing keys, or all defaults if the file is absent
    /// * `Err(ConfigError)` if the file is unreadable, malformed, or out of range
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Checks that all settings are in range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_latitude(self.fallback_latitude) {
            return Err(ConfigError::Invalid {
                field: "fallback_latitude",
                message: format!("{} is not between -90 and 90", self.fallback_latitude),
            });
        }
        if !is_valid_longitude(self.fallback_longitude) {
            return Err(ConfigError::Invalid {
                field: "fallback_longitude",
                message: format!("{} is not between -180 and 180", self.fallback_longitude),
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "user_agent",
                message: "weather.gov requires a User-Agent".to_string(),
            });
        }
        Ok(())
    }
}

/// Whether `lat` is a finite latitude in degrees
pub fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}

/// Whether `lon` is a finite longitude in degrees
pub fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon)
}
