//! Command-line interface parsing
//!
//! This module handles parsing of CLI arguments using clap and turns them,
//! together with the config file, into the settings the app starts with.

use clap::Parser;
use thiserror::Error;

use crate::config::{is_valid_latitude, is_valid_longitude, Config};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// Latitude outside -90..=90
    #[error("Invalid latitude: {0}. Expected a value between -90 and 90")]
    InvalidLatitude(f64),

    /// Longitude outside -180..=180
    #[error("Invalid longitude: {0}. Expected a value between -180 and 180")]
    InvalidLongitude(f64),
}

/// swa - weather.gov forecast dashboard for the terminal
#[derive(Parser, Debug)]
#[command(name = "swa")]
#[command(about = "Weather.gov alerts, hourly feels-like chart, and forecast in your terminal")]
#[command(version)]
pub struct Cli {
    /// Latitude of the forecast location (requires --lon)
    ///
    /// The resolved point is remembered, so later runs can omit the location.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the forecast location (requires --lat)
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Print the dashboard as text and exit instead of starting the TUI
    #[arg(long)]
    pub once: bool,

    /// Forget the remembered location before starting
    #[arg(long)]
    pub forget: bool,

    /// Minutes between automatic refreshes (0 disables), overrides the config file
    #[arg(long, value_name = "MINUTES")]
    pub refresh: Option<u64>,
}

/// Where the dashboard location comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationSource {
    /// Coordinates given on the command line
    Explicit { latitude: f64, longitude: f64 },
    /// The remembered point, or the fallback location if there is none
    Remembered,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    pub location: LocationSource,
    /// Print once and exit
    pub once: bool,
    /// Clear the remembered point before starting
    pub forget_point: bool,
    /// Refresh interval override in minutes
    pub refresh_minutes: Option<u64>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            location: LocationSource::Remembered,
            once: false,
            forget_point: false,
            refresh_minutes: None,
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if a coordinate is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let location = match (cli.lat, cli.lon) {
            (Some(latitude), Some(longitude)) => {
                if !is_valid_latitude(latitude) {
                    return Err(CliError::InvalidLatitude(latitude));
                }
                if !is_valid_longitude(longitude) {
                    return Err(CliError::InvalidLongitude(longitude));
                }
                LocationSource::Explicit {
                    latitude,
                    longitude,
                }
            }
            // clap enforces that --lat and --lon come together
            _ => LocationSource::Remembered,
        };

        Ok(StartupConfig {
            location,
            once: cli.once,
            forget_point: cli.forget,
            refresh_minutes: cli.refresh,
        })
    }

    /// Effective refresh interval in minutes, CLI over config file
    pub fn refresh_minutes(&self, config: &Config) -> u64 {
        self.refresh_minutes.unwrap_or(config.refresh_minutes)
    }
}
