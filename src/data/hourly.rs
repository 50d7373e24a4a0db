//! Hourly series normalization
//!
//! Turns the raw hourly forecast into the fixed chart window: numeric wind
//! speed, temperature and humidity, plus the apparent temperature for each
//! hour. The transform is pure; the fetched periods are left untouched.

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use super::apparent::apparent_temperature_f;
use super::HourlyPeriod;

/// Number of hourly periods shown in the chart
pub const CHART_WINDOW: usize = 8;

/// Extracts the leading number from a unit string such as "10 mph"
///
/// Only the first whitespace-separated token is considered, so ranges like
/// "10 to 15 mph" yield their lower bound. The token is read the way
/// JavaScript's `parseFloat` reads it: the longest numeric prefix wins
/// ("12mph" is 12) and a case-sensitive "Infinity" is infinite. Returns NaN
/// when there is no leading number.
pub fn leading_number(text: &str) -> f64 {
    let Some(token) = text.split_whitespace().next() else {
        return f64::NAN;
    };

    let end = numeric_prefix_len(token);
    token[..end].parse().unwrap_or(f64::NAN)
}

/// Length in bytes of the longest `[+-]digits[.digits][e[+-]digits]` or
/// `[+-]Infinity` prefix
fn numeric_prefix_len(token: &str) -> usize {
    let bytes = token.as_bytes();
    let mut i = 0;

    if matches!(bytes.first().copied(), Some(b'+' | b'-')) {
        i += 1;
    }

    if bytes[i..].starts_with(b"Infinity") {
        return i + "Infinity".len();
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        if digits > 0 {
            i = j;
        }
    }

    if digits == 0 {
        return 0;
    }

    // Exponent only counts when at least one digit follows it
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}

/// Read access to the fields the normalizer needs from an hourly slot
///
/// Implemented for raw [`HourlyPeriod`]s and for [`NormalizedPeriod`]s, so
/// normalizing an already normalized series is a no-op.
pub trait HourlyObservation {
    fn start_time(&self) -> DateTime<FixedOffset>;
    /// Temperature in °F
    fn temperature_f(&self) -> f64;
    /// Relative humidity in percent, NaN when unknown
    fn relative_humidity_pct(&self) -> f64;
    /// Wind speed in mph, NaN when unparsable
    fn wind_speed_mph(&self) -> f64;
    /// Chance of precipitation in percent
    fn precipitation_chance(&self) -> Option<f64>;
}

impl HourlyObservation for HourlyPeriod {
    fn start_time(&self) -> DateTime<FixedOffset> {
        self.start_time
    }

    fn temperature_f(&self) -> f64 {
        self.temperature.value()
    }

    fn relative_humidity_pct(&self) -> f64 {
        self.relative_humidity.value_or_nan()
    }

    fn wind_speed_mph(&self) -> f64 {
        self.wind_speed.value()
    }

    fn precipitation_chance(&self) -> Option<f64> {
        self.probability_of_precipitation
            .value
            .as_ref()
            .map(|v| v.value())
    }
}

/// An hourly slot with numeric fields and its apparent temperature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedPeriod {
    pub start_time: DateTime<FixedOffset>,
    /// Temperature in °F
    pub temperature: f64,
    /// Relative humidity in percent
    pub relative_humidity: f64,
    /// Wind speed in mph
    pub wind_speed: f64,
    /// Chance of precipitation in percent
    pub precipitation_chance: Option<f64>,
    /// Feels-like temperature in °F, `None` between the wind chill and
    /// heat index bands
    pub apparent_temperature: Option<f64>,
}

impl NormalizedPeriod {
    /// Builds the normalized record for one hourly slot
    pub fn from_observation<P: HourlyObservation>(period: &P) -> Self {
        let temperature = period.temperature_f();
        let relative_humidity = period.relative_humidity_pct();
        let wind_speed = period.wind_speed_mph();

        Self {
            start_time: period.start_time(),
            temperature,
            relative_humidity,
            wind_speed,
            precipitation_chance: period.precipitation_chance(),
            apparent_temperature: apparent_temperature_f(
                temperature,
                relative_humidity,
                wind_speed,
            ),
        }
    }

    /// Value plotted in the feels-like series
    ///
    /// Falls back to the air temperature when no apparent temperature is
    /// defined or it is not a finite number.
    pub fn feels_like_f(&self) -> f64 {
        match self.apparent_temperature {
            Some(t) if t.is_finite() => t,
            _ => self.temperature,
        }
    }

    /// Whether `feels_like_f` is a computed index rather than the fallback
    pub fn has_apparent_temperature(&self) -> bool {
        self.apparent_temperature.is_some_and(f64::is_finite)
    }

    /// 12-hour clock label for the chart axis, e.g. "12 AM", "3 PM"
    ///
    /// Uses the forecast office's local time carried in the timestamp.
    pub fn hour_label(&self) -> String {
        hour_label(self.start_time.hour())
    }
}

impl HourlyObservation for NormalizedPeriod {
    fn start_time(&self) -> DateTime<FixedOffset> {
        self.start_time
    }

    fn temperature_f(&self) -> f64 {
        self.temperature
    }

    fn relative_humidity_pct(&self) -> f64 {
        self.relative_humidity
    }

    fn wind_speed_mph(&self) -> f64 {
        self.wind_speed
    }

    fn precipitation_chance(&self) -> Option<f64> {
        self.precipitation_chance
    }
}

/// Normalizes the first [`CHART_WINDOW`] hourly periods
///
/// Output index `i` corresponds to input index `i`; periods past the
/// window are never read. A shorter input yields a shorter output.
pub fn normalize<P: HourlyObservation>(periods: &[P]) -> Vec<NormalizedPeriod> {
    if periods.len() < CHART_WINDOW {
        tracing::warn!(
            available = periods.len(),
            expected = CHART_WINDOW,
            "hourly forecast shorter than chart window"
        );
    }

    periods
        .iter()
        .take(CHART_WINDOW)
        .map(NormalizedPeriod::from_observation)
        .collect()
}

/// Formats an hour of the day (0-23) on a 12-hour clock
pub fn hour_label(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        12 => "12 PM".to_string(),
        h if h > 12 => format!("{} PM", h - 12),
        h => format!("{} AM", h),
    }
}
