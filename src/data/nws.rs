//! weather.gov API client
//!
//! This module fetches the forecast point, active alerts, and the multi-day
//! and hourly forecasts from the National Weather Service API and parses
//! them into our data structures.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use super::{Alert, AlertSeverity, ForecastPeriod, HourlyPeriod, Point, CHART_WINDOW};

/// Base URL for the weather.gov API
const NWS_BASE_URL: &str = "https://api.weather.gov";

/// The points endpoint answers GeoJSON with nested `properties`
const GEO_JSON: &str = "application/geo+json";

/// JSON-LD flattens forecasts to a top-level `periods` and alerts to `@graph`
const LD_JSON: &str = "application/ld+json";

/// Maximum number of alerts requested for a point
const ALERT_LIMIT: u32 = 50;

/// Request timeout for every API call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur when talking to weather.gov
#[derive(Debug, Error)]
pub enum NwsError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("weather.gov returned {status} for {url}")]
    Status { status: u16, url: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),
}

/// Client for the weather.gov API
#[derive(Debug, Clone)]
pub struct NwsClient {
    client: Client,
    base_url: String,
}

impl NwsClient {
    /// Create a new NwsClient
    ///
    /// weather.gov rejects requests without a `User-Agent`, so one is required.
    ///
    /// # Arguments
    /// * `user_agent` - Identifies this application to the API
    pub fn new(user_agent: &str) -> Result<Self, NwsError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: NWS_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API host (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Resolve a coordinate to its forecast point
    ///
    /// Coordinates are rounded to 4 decimal places, the precision the API
    /// accepts without redirecting.
    ///
    /// # Arguments
    /// * `lat` - Latitude coordinate
    /// * `lon` - Longitude coordinate
    ///
    /// # Returns
    /// * `Ok(Point)` - City, state, and forecast URLs for the location
    /// * `Err(NwsError)` - If the request or parsing fails
    pub async fn fetch_point(&self, lat: f64, lon: f64) -> Result<Point, NwsError> {
        let url = format!("{}/points/{:.4},{:.4}", self.base_url, lat, lon);
        tracing::debug!(%url, "fetching point");

        let response: PointResponse = self.get_json(&url, GEO_JSON).await?;
        parse_point(response)
    }

    /// Fetch active alerts for a coordinate
    pub async fn fetch_alerts(&self, lat: f64, lon: f64) -> Result<Vec<Alert>, NwsError> {
        let url = format!(
            "{}/alerts?active=true&status=actual&message_type=alert,update&point={:.4},{:.4}\
             &limit={}",
            self.base_url, lat, lon, ALERT_LIMIT
        );
        tracing::debug!(%url, "fetching alerts");

        let response: AlertsResponse = self.get_json(&url, LD_JSON).await?;
        Ok(response.graph.into_iter().map(parse_alert).collect())
    }

    /// Fetch the multi-day forecast from the point's forecast URL
    pub async fn fetch_forecast(&self, url: &str) -> Result<Vec<ForecastPeriod>, NwsError> {
        tracing::debug!(%url, "fetching forecast");
        let response: ForecastResponse<ForecastPeriod> = self.get_json(url, LD_JSON).await?;
        Ok(response.periods)
    }

    /// Fetch the chart window of the hourly forecast
    ///
    /// Only the first [`CHART_WINDOW`] periods are parsed; the rest of the
    /// document is never read.
    pub async fn fetch_hourly(&self, url: &str) -> Result<Vec<HourlyPeriod>, NwsError> {
        tracing::debug!(%url, "fetching hourly forecast");
        let response: ForecastResponse<serde_json::Value> = self.get_json(url, LD_JSON).await?;

        let periods = response
            .periods
            .into_iter()
            .take(CHART_WINDOW)
            .map(serde_json::from_value)
            .collect::<Result<Vec<HourlyPeriod>, _>>()?;
        Ok(periods)
    }

    /// GET a URL and parse the body as JSON
    async fn get_json<T: DeserializeOwned>(&self, url: &str, accept: &str) -> Result<T, NwsError> {
        let response = self.client.get(url).header(ACCEPT, accept).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "weather.gov request failed");
            return Err(NwsError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Build a Point from the GeoJSON points response
fn parse_point(response: PointResponse) -> Result<Point, NwsError> {
    let [longitude, latitude] = response.geometry.coordinates;
    let properties = response.properties;

    let forecast_url = properties
        .forecast
        .ok_or_else(|| NwsError::MissingField("properties.forecast".to_string()))?;
    let forecast_hourly_url = properties
        .forecast_hourly
        .ok_or_else(|| NwsError::MissingField("properties.forecastHourly".to_string()))?;
    let location = properties.relative_location.properties;

    Ok(Point {
        latitude,
        longitude,
        city: location.city,
        state: location.state,
        forecast_url,
        forecast_hourly_url,
    })
}

/// Convert an API alert, picking the most specific headline available
fn parse_alert(alert: ApiAlert) -> Alert {
    let headline = alert
        .parameters
        .nws_headline
        .into_iter()
        .next()
        .or(alert.headline)
        .unwrap_or_else(|| alert.event.clone());

    Alert {
        id: alert.id,
        severity: AlertSeverity::from_api(&alert.severity),
        event: alert.event,
        headline,
        description: alert.description.unwrap_or_default(),
        instruction: alert.instruction,
    }
}

/// weather.gov points response (GeoJSON)
#[derive(Debug, Deserialize)]
struct PointResponse {
    geometry: PointGeometry,
    properties: PointProperties,
}

/// GeoJSON point geometry, `[longitude, latitude]`
#[derive(Debug, Deserialize)]
struct PointGeometry {
    coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointProperties {
    // Null for points outside a forecast office's grid
    forecast: Option<String>,
    forecast_hourly: Option<String>,
    relative_location: RelativeLocation,
}

#[derive(Debug, Deserialize)]
struct RelativeLocation {
    properties: RelativeLocationProperties,
}

#[derive(Debug, Deserialize)]
struct RelativeLocationProperties {
    city: String,
    state: String,
}

/// Alerts response (JSON-LD)
#[derive(Debug, Deserialize)]
struct AlertsResponse {
    #[serde(rename = "@graph", default)]
    graph: Vec<ApiAlert>,
}

#[derive(Debug, Deserialize)]
struct ApiAlert {
    #[serde(default)]
    id: String,
    event: String,
    #[serde(default)]
    severity: String,
    headline: Option<String>,
    description: Option<String>,
    instruction: Option<String>,
    #[serde(default)]
    parameters: ApiAlertParameters,
}

#[derive(Debug, Default, Deserialize)]
struct ApiAlertParameters {
    #[serde(rename = "NWSheadline", default)]
    nws_headline: Vec<String>,
}

/// Forecast and hourly forecast responses (JSON-LD)
#[derive(Debug, Deserialize)]
struct ForecastResponse<T> {
    periods: Vec<T>,
}
