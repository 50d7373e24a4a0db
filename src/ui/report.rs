//! Plain-text dashboard for `--once`

use std::fmt::Write;

use crate::data::{AlertSeverity, Dashboard};
use crate::ui::dashboard::{format_degrees, format_feels_like, format_percent, FORECAST_PERIODS};

const LABEL_WIDTH: usize = 12;
const COLUMN_WIDTH: usize = 7;

/// Renders the dashboard as plain text
pub fn render_text(dashboard: &Dashboard) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    write_report(&mut out, dashboard)?;
    Ok(out)
}

fn write_report(out: &mut String, dashboard: &Dashboard) -> std::fmt::Result {
    writeln!(out, "Weather for {}", dashboard.point.place_name())?;
    writeln!(out)?;

    writeln!(out, "ALERTS")?;
    if dashboard.alerts.is_empty() {
        writeln!(out, "  No active alerts")?;
    }
    for alert in &dashboard.alerts {
        match severity_tag(alert.severity) {
            Some(tag) => writeln!(out, "  [{}] {}", tag, alert.headline)?,
            None => writeln!(out, "  {}", alert.headline)?,
        }
    }
    writeln!(out)?;

    writeln!(out, "NEXT 8 HOURS")?;
    if dashboard.hourly.is_empty() {
        writeln!(out, "  No hourly forecast available")?;
    } else {
        let hourly = &dashboard.hourly;
        write_row(out, "", hourly.iter().map(|p| p.hour_label()))?;
        write_row(out, "Temp", hourly.iter().map(|p| format_degrees(p.temperature)))?;
        write_row(out, "Feels like", hourly.iter().map(format_feels_like))?;
        write_row(
            out,
            "Precip",
            hourly.iter().map(|p| format_percent(p.precipitation_chance)),
        )?;
    }
    writeln!(out)?;

    writeln!(out, "FORECAST")?;
    if dashboard.forecast.is_empty() {
        writeln!(out, "  No forecast available")?;
    }
    for period in dashboard.forecast.iter().take(FORECAST_PERIODS) {
        writeln!(out, "{}", period.name)?;
        writeln!(out, "  {}", period.detailed_forecast)?;
    }
    writeln!(out)?;

    writeln!(out, "{}", dashboard.point.forecast_page_url())?;
    writeln!(out, "Data: National Weather Service (api.weather.gov)")
}

fn write_row(
    out: &mut String,
    label: &str,
    cells: impl Iterator<Item = String>,
) -> std::fmt::Result {
    write!(out, "{:<width$}", label, width = LABEL_WIDTH)?;
    for cell in cells {
        write!(out, "{:<width$}", cell, width = COLUMN_WIDTH)?;
    }
    writeln!(out)?;
    Ok(())
}

fn severity_tag(severity: AlertSeverity) -> Option<&'static str> {
    match severity {
        AlertSeverity::Extreme => Some("Extreme"),
        AlertSeverity::Severe => Some("Severe"),
        AlertSeverity::Moderate => Some("Moderate"),
        AlertSeverity::Minor => Some("Minor"),
        AlertSeverity::Unknown => None,
    }
}
