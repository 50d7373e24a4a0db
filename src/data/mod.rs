//! Core data models for the weather dashboard
//!
//! This module contains the types shared by the weather.gov client, the
//! hourly normalizer, and the UI: the resolved forecast point, active alerts,
//! forecast periods, and the assembled dashboard.

pub mod apparent;
pub mod hourly;
pub mod nws;

pub use apparent::apparent_temperature_f;
pub use hourly::{leading_number, normalize, HourlyObservation, NormalizedPeriod, CHART_WINDOW};
pub use nws::{NwsClient, NwsError};

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Base URL of the human-facing forecast page
const FORECAST_PAGE_URL: &str = "https://forecast.weather.gov/MapClick.php";

/// A resolved weather.gov forecast point
///
/// This is the record remembered between runs so the location does not
/// have to be resolved every time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Latitude as returned by the points endpoint
    pub latitude: f64,
    /// Longitude as returned by the points endpoint
    pub longitude: f64,
    /// Nearest city
    pub city: String,
    /// State abbreviation
    pub state: String,
    /// URL of the multi-day forecast document
    pub forecast_url: String,
    /// URL of the hourly forecast document
    pub forecast_hourly_url: String,
}

impl Point {
    /// Human readable location, e.g. "Topeka, KS"
    pub fn place_name(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }

    /// Link to the forecast.weather.gov page for this point
    pub fn forecast_page_url(&self) -> String {
        format!(
            "{}?lat={}&lon={}",
            FORECAST_PAGE_URL, self.latitude, self.longitude
        )
    }
}

/// Severity levels used by NWS alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertSeverity {
    Extreme,
    Severe,
    Moderate,
    Minor,
    Unknown,
}

impl AlertSeverity {
    /// Parses the severity string used by the alerts API
    ///
    /// Unrecognized values map to `Unknown`.
    pub fn from_api(s: &str) -> Self {
        match s {
            "Extreme" => AlertSeverity::Extreme,
            "Severe" => AlertSeverity::Severe,
            "Moderate" => AlertSeverity::Moderate,
            "Minor" => AlertSeverity::Minor,
            _ => AlertSeverity::Unknown,
        }
    }
}

/// An active weather alert for the point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    /// Event name, e.g. "Heat Advisory"
    pub event: String,
    pub severity: AlertSeverity,
    /// Short headline shown in the alert list
    pub headline: String,
    pub description: String,
    pub instruction: Option<String>,
}

/// One named period of the multi-day forecast ("Tonight", "Tuesday", ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub name: String,
    #[serde(default)]
    pub detailed_forecast: String,
    #[serde(default)]
    pub short_forecast: String,
    #[serde(default)]
    pub is_daytime: bool,
    #[serde(default)]
    pub temperature: Option<Reading>,
}

/// A numeric reading that the API may send as a number, as text, or as null
///
/// Text readings carry units ("10 mph", "10 to 15 mph") and are reduced to
/// their leading number with [`leading_number`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Number(f64),
    Text(String),
    /// Null or absent
    #[default]
    Missing,
}

impl Reading {
    /// Numeric value of the reading, NaN if the text has no leading number
    pub fn value(&self) -> f64 {
        match self {
            Reading::Number(n) => *n,
            Reading::Text(s) => leading_number(s),
            Reading::Missing => f64::NAN,
        }
    }
}

/// A `{ "unitCode": ..., "value": ... }` object where the value may be null
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantitativeValue {
    #[serde(default)]
    pub unit_code: Option<String>,
    #[serde(default)]
    pub value: Option<Reading>,
}

impl QuantitativeValue {
    /// The value as a number, NaN when missing or not numeric
    pub fn value_or_nan(&self) -> f64 {
        self.value.as_ref().map_or(f64::NAN, Reading::value)
    }
}

/// One hourly slot of the hourly forecast document, as received
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPeriod {
    pub start_time: DateTime<FixedOffset>,
    /// Temperature in °F
    #[serde(default)]
    pub temperature: Reading,
    #[serde(default)]
    pub relative_humidity: QuantitativeValue,
    /// Wind speed, usually text such as "10 mph"
    #[serde(default)]
    pub wind_speed: Reading,
    #[serde(default)]
    pub probability_of_precipitation: QuantitativeValue,
    #[serde(default)]
    pub short_forecast: String,
}

/// Everything the dashboard shows for one refresh
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub point: Point,
    pub alerts: Vec<Alert>,
    /// Multi-day forecast periods
    pub forecast: Vec<ForecastPeriod>,
    /// The normalized chart window of the hourly forecast
    pub hourly: Vec<NormalizedPeriod>,
    /// When this data was fetched
    pub fetched_at: DateTime<Utc>,
}
