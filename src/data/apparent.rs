//! Apparent ("feels like") temperature
//!
//! Picks between the NWS wind-chill formula for cold readings and the
//! Rothfusz heat-index regression for hot ones, approximating what
//! forecast.weather.gov shows. Between the two bands there is no
//! apparent temperature at all.
//!
//! Inputs are not validated: NaN goes in, NaN (or `None`) comes out.

/// Highest temperature (°F) that uses the wind-chill formula
pub const WIND_CHILL_MAX_F: f64 = 51.0;

/// Temperatures (°F) above this use the heat-index regression
pub const HEAT_INDEX_MIN_F: f64 = 79.0;

/// Scaling applied to the forecast wind speed before the wind-chill formula
const WIND_SPEED_FACTOR: f64 = 1.15;

/// Scaled wind speeds at or below this are too light to cause wind chill
const CALM_WIND: f64 = 3.0;

/// Computes the apparent temperature in Fahrenheit
///
/// # Arguments
/// * `temp_f` - Air temperature in °F
/// * `rel_humidity_pct` - Relative humidity, 0-100
/// * `wind_speed_mph` - Sustained wind speed in mph
///
/// # Returns
/// * `Some(wind chill)` when `temp_f <= 51`
/// * `None` when `51 < temp_f <= 79`
/// * `Some(heat index)` when `temp_f > 79`
///
/// A NaN temperature falls in no band and yields `None`.
pub fn apparent_temperature_f(
    temp_f: f64,
    rel_humidity_pct: f64,
    wind_speed_mph: f64,
) -> Option<f64> {
    if temp_f <= WIND_CHILL_MAX_F {
        return Some(wind_chill_f(temp_f, wind_speed_mph));
    }

    if temp_f > HEAT_INDEX_MIN_F {
        return Some(heat_index_f(temp_f, rel_humidity_pct));
    }

    None
}

/// NWS wind-chill temperature in °F
///
/// Returns `temp_f` unchanged when the scaled wind is calm.
pub fn wind_chill_f(temp_f: f64, wind_speed_mph: f64) -> f64 {
    let mag = wind_speed_mph * WIND_SPEED_FACTOR;
    if mag <= CALM_WIND {
        return temp_f;
    }

    let wind_term = mag.powf(0.16);
    35.74 + 0.6215 * temp_f - 35.75 * wind_term + 0.4275 * temp_f * wind_term
}

/// Heat index in °F, including the low and high humidity adjustments
pub fn heat_index_f(temp_f: f64, rel_humidity_pct: f64) -> f64 {
    let t = temp_f;
    let rh = rel_humidity_pct;

    let mut heat_index = rothfusz(t, rh);

    // Dry air: the regression overestimates
    if rh < 13.0 && t > 80.0 && t < 112.0 {
        heat_index -= ((13.0 - rh) / 4.0) * ((17.0 - (t - 95.0).abs()) / 17.0).sqrt();
    }

    // Muggy air: the regression underestimates
    if rh > 85.0 && t >= 80.0 && t < 87.0 {
        heat_index += ((rh - 85.0) / 10.0) * ((87.0 - t) / 5.0);
    }

    heat_index
}

/// Rothfusz regression without adjustments
fn rothfusz(t: f64, rh: f64) -> f64 {
    let t2 = t * t;
    let rh2 = rh * rh;

    -42.379 + 2.049_015_23 * t + 10.143_331_27 * rh
        - 0.224_755_41 * t * rh
        - 0.006_837_83 * t2
        - 0.054_817_17 * rh2
        + 0.001_228_74 * t2 * rh
        + 0.000_852_82 * t * rh2
        - 0.000_001_99 * t2 * rh2
}
