//! Dashboard screen UI
//!
//! Renders the location header, the 8-hour feels-like chart, and a scrollable
//! pane with active alerts, the multi-day forecast, and the footer link.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::{Alert, AlertSeverity, Dashboard, ForecastPeriod, NormalizedPeriod};
use crate::ui::widgets::{value_range, SeriesSparkline};

/// Number of multi-day forecast periods shown
pub const FORECAST_PERIODS: usize = 6;

/// Width of the row labels left of the chart
const LABEL_WIDTH: u16 = 12;

/// Width of one hour column in the chart
const COLUMN_WIDTH: u16 = 7;

/// Rows in the chart section: title, hours, and a value and sparkline row per series
const CHART_HEIGHT: u16 = 8;

mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Cyan;
    pub const PRIMARY: Color = Color::White;
    pub const SECONDARY: Color = Color::Gray;
    pub const UNKNOWN: Color = Color::DarkGray;
    pub const EXTREME: Color = Color::Red;
    pub const SEVERE: Color = Color::Yellow;
    pub const TEMPERATURE: Color = Color::LightRed;
    pub const FEELS_LIKE: Color = Color::Magenta;
    pub const PRECIPITATION: Color = Color::Blue;
    pub const ERROR: Color = Color::Red;
}

/// Renders the dashboard screen
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `app` - The application state
/// * `dashboard` - The data to show
pub fn render(frame: &mut Frame, app: &App, dashboard: &Dashboard) {
    let area = frame.area();

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            format!(" Weather for {} ", dashboard.point.place_name()),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Status line
            Constraint::Length(CHART_HEIGHT), // Hourly chart
            Constraint::Min(0),               // Alerts, forecast, footer (scrollable)
            Constraint::Length(1),            // Help text
        ])
        .split(inner_area);

    render_status_line(frame, chunks[0], app, dashboard);
    render_chart(frame, chunks[1], &dashboard.hourly);
    render_details(frame, chunks[2], app, dashboard);
    render_help_text(frame, chunks[3]);
}

/// Renders the last update time, or the last refresh error
fn render_status_line(frame: &mut Frame, area: Rect, app: &App, dashboard: &Dashboard) {
    let updated = dashboard
        .fetched_at
        .with_timezone(&chrono::Local)
        .format("%-I:%M %p");

    let mut spans = vec![Span::styled(
        format!("Updated {}", updated),
        Style::default().fg(colors::SECONDARY),
    )];
    if let Some(error) = &app.last_error {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("Refresh failed: {}", error),
            Style::default().fg(colors::ERROR),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders the hourly chart: hour labels, then a value row and a sparkline
/// row for temperature, feels-like, and precipitation chance
fn render_chart(frame: &mut Frame, area: Rect, hourly: &[NormalizedPeriod]) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); CHART_HEIGHT as usize])
        .split(area);

    frame.render_widget(
        Paragraph::new(section_title("NEXT 8 HOURS")),
        rows[0],
    );

    if hourly.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "No hourly forecast available",
                Style::default().fg(colors::UNKNOWN),
            ))),
            rows[1],
        );
        return;
    }

    let temperatures: Vec<f64> = hourly.iter().map(|p| p.temperature).collect();
    let feels_like: Vec<f64> = hourly.iter().map(NormalizedPeriod::feels_like_f).collect();
    let precipitation: Vec<f64> = hourly
        .iter()
        .map(|p| p.precipitation_chance.unwrap_or(f64::NAN))
        .collect();

    let (min, max) = value_range([&temperatures[..], &feels_like[..]]).unwrap_or((0.0, 100.0));

    frame.render_widget(Paragraph::new(hour_label_line(hourly)), rows[1]);

    frame.render_widget(
        Paragraph::new(value_line(
            "Temp",
            hourly.iter().map(|p| format_degrees(p.temperature)),
            colors::TEMPERATURE,
        )),
        rows[2],
    );
    render_sparkline_row(
        frame,
        rows[3],
        SeriesSparkline::new(&temperatures, min, max)
            .style(Style::default().fg(colors::TEMPERATURE)),
    );

    frame.render_widget(
        Paragraph::new(value_line(
            "Feels like",
            hourly.iter().map(format_feels_like),
            colors::FEELS_LIKE,
        )),
        rows[4],
    );
    render_sparkline_row(
        frame,
        rows[5],
        SeriesSparkline::new(&feels_like, min, max).style(Style::default().fg(colors::FEELS_LIKE)),
    );

    frame.render_widget(
        Paragraph::new(value_line(
            "Precip",
            hourly.iter().map(|p| format_percent(p.precipitation_chance)),
            colors::PRECIPITATION,
        )),
        rows[6],
    );
    render_sparkline_row(
        frame,
        rows[7],
        SeriesSparkline::new(&precipitation, 0.0, 100.0)
            .style(Style::default().fg(colors::PRECIPITATION)),
    );
}

/// Renders a sparkline aligned with the chart's hour columns
fn render_sparkline_row(frame: &mut Frame, area: Rect, sparkline: SeriesSparkline) {
    let plot = Rect {
        x: area.x + LABEL_WIDTH.min(area.width),
        width: area.width.saturating_sub(LABEL_WIDTH),
        ..area
    };
    frame.render_widget(sparkline.column_width(COLUMN_WIDTH), plot);
}

fn hour_label_line(hourly: &[NormalizedPeriod]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ".repeat(LABEL_WIDTH as usize))];
    spans.extend(hourly.iter().map(|p| {
        Span::styled(
            format!("{:<width$}", p.hour_label(), width = COLUMN_WIDTH as usize),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )
    }));
    Line::from(spans)
}

fn value_line(
    label: &str,
    values: impl Iterator<Item = String>,
    color: Color,
) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{:<width$}", label, width = LABEL_WIDTH as usize),
        Style::default().fg(colors::SECONDARY),
    )];
    spans.extend(values.map(|v| {
        let style = if v == "--" {
            Style::default().fg(colors::UNKNOWN)
        } else {
            Style::default().fg(color)
        };
        Span::styled(format!("{:<width$}", v, width = COLUMN_WIDTH as usize), style)
    }));
    Line::from(spans)
}

/// Formats a temperature as whole degrees, `--` when not a number
pub fn format_degrees(value: f64) -> String {
    if value.is_finite() {
        format!("{:.0}°", value)
    } else {
        "--".to_string()
    }
}

/// Formats the feels-like value, `--` when no index is defined for the hour
pub fn format_feels_like(period: &NormalizedPeriod) -> String {
    if period.has_apparent_temperature() {
        format_degrees(period.feels_like_f())
    } else {
        "--".to_string()
    }
}

/// Formats a percentage, `--` when missing
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.0}%", v),
        _ => "--".to_string(),
    }
}

/// Renders alerts, forecast, and footer with the app's scroll offset
fn render_details(frame: &mut Frame, area: Rect, app: &App, dashboard: &Dashboard) {
    let mut lines = build_alert_lines(&dashboard.alerts, app.selected_alert, app.expanded_alert);
    lines.push(Line::default());
    lines.extend(build_forecast_lines(&dashboard.forecast));
    lines.push(Line::default());
    lines.extend(build_footer_lines(dashboard));

    let content_height = wrapped_height(&lines, area.width);
    let max_scroll = content_height.saturating_sub(area.height);
    let offset = app.scroll_offset.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));
    frame.render_widget(paragraph, area);
}

/// Rows the lines occupy once wrapped to `width`
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = width.max(1) as usize;
    let rows: usize = lines.iter().map(|l| l.width().max(1).div_ceil(width)).sum();
    rows.min(u16::MAX as usize) as u16
}

/// Color used for an alert headline
pub fn severity_color(severity: AlertSeverity) -> Color {
    match severity {
        AlertSeverity::Extreme => colors::EXTREME,
        AlertSeverity::Severe => colors::SEVERE,
        _ => colors::PRIMARY,
    }
}

/// Builds the alert list, with description and instruction under the
/// expanded alert
fn build_alert_lines(
    alerts: &[Alert],
    selected: usize,
    expanded: Option<usize>,
) -> Vec<Line<'static>> {
    let mut lines = vec![section_title("ALERTS")];

    if alerts.is_empty() {
        lines.push(Line::from(Span::styled(
            "No active alerts",
            Style::default().fg(colors::UNKNOWN),
        )));
        return lines;
    }

    for (i, alert) in alerts.iter().enumerate() {
        let marker = if i == selected { "▶ " } else { "  " };
        let mut style = Style::default().fg(severity_color(alert.severity));
        if i == selected {
            style = style.add_modifier(Modifier::BOLD);
        }
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(colors::HEADER)),
            Span::styled(alert.headline.clone(), style),
        ]));

        if expanded == Some(i) {
            for text in alert.description.lines() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", text),
                    Style::default().fg(colors::SECONDARY),
                )));
            }
            if let Some(instruction) = &alert.instruction {
                lines.push(Line::default());
                for text in instruction.lines() {
                    lines.push(Line::from(Span::styled(
                        format!("    {}", text),
                        Style::default().fg(colors::PRIMARY),
                    )));
                }
            }
        }
    }

    lines
}

/// Builds the multi-day forecast: the first periods, name and detailed text
fn build_forecast_lines(forecast: &[ForecastPeriod]) -> Vec<Line<'static>> {
    let mut lines = vec![section_title("FORECAST")];

    if forecast.is_empty() {
        lines.push(Line::from(Span::styled(
            "No forecast available",
            Style::default().fg(colors::UNKNOWN),
        )));
        return lines;
    }

    for period in forecast.iter().take(FORECAST_PERIODS) {
        lines.push(Line::from(Span::styled(
            period.name.clone(),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", period.detailed_forecast),
            Style::default().fg(colors::SECONDARY),
        )));
    }

    lines
}

fn build_footer_lines(dashboard: &Dashboard) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            dashboard.point.forecast_page_url(),
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::UNDERLINED),
        )),
        Line::from(Span::styled(
            "Data: National Weather Service (api.weather.gov)",
            Style::default().fg(colors::UNKNOWN),
        )),
    ]
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(colors::HEADER)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Renders the key hints at the bottom
fn render_help_text(frame: &mut Frame, area: Rect) {
    let help_line = Line::from(vec![
        Span::styled("r", Style::default().fg(colors::HEADER)),
        Span::styled(" Refresh", Style::default().fg(colors::SECONDARY)),
        Span::raw("  "),
        Span::styled("n/p", Style::default().fg(colors::HEADER)),
        Span::styled(" Alert", Style::default().fg(colors::SECONDARY)),
        Span::raw("  "),
        Span::styled("Enter", Style::default().fg(colors::HEADER)),
        Span::styled(" Details", Style::default().fg(colors::SECONDARY)),
        Span::raw("  "),
        Span::styled("j/k", Style::default().fg(colors::HEADER)),
        Span::styled(" Scroll", Style::default().fg(colors::SECONDARY)),
        Span::raw("  "),
        Span::styled("?", Style::default().fg(colors::HEADER)),
        Span::styled(" Help", Style::default().fg(colors::SECONDARY)),
        Span::raw("  "),
        Span::styled("q", Style::default().fg(colors::HEADER)),
        Span::styled(" Quit", Style::default().fg(colors::SECONDARY)),
    ]);

    frame.render_widget(Paragraph::new(help_line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Point;
    use chrono::{DateTime, Utc};
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn period(
        hour: u32,
        temperature: f64,
        apparent: Option<f64>,
        precip: Option<f64>,
    ) -> NormalizedPeriod {
        NormalizedPeriod {
            start_time: DateTime::parse_from_rfc3339(&format!("2024-07-15T{:02}:00:00-05:00", hour))
                .unwrap(),
            temperature,
            relative_humidity: 50.0,
            wind_speed: 5.0,
            precipitation_chance: precip,
            apparent_temperature: apparent,
        }
    }

    fn alert(headline: &str, severity: AlertSeverity) -> Alert {
        Alert {
            id: headline.to_string(),
            event: "Event".to_string(),
            severity,
            headline: headline.to_string(),
            description: "Line one of the description.\nLine two.".to_string(),
            instruction: Some("Stay indoors.".to_string()),
        }
    }

    fn sample_dashboard() -> Dashboard {
        Dashboard {
            point: Point {
                latitude: 39.7456,
                longitude: -97.0892,
                city: "Linn".to_string(),
                state: "KS".to_string(),
                forecast_url: String::new(),
                forecast_hourly_url: String::new(),
            },
            alerts: vec![
                alert("EXCESSIVE HEAT WARNING", AlertSeverity::Extreme),
                alert("HEAT ADVISORY", AlertSeverity::Severe),
            ],
            forecast: (0..8)
                .map(|i| ForecastPeriod {
                    name: format!("Period {}", i),
                    detailed_forecast: format!("Details for period {}.", i),
                    short_forecast: "Sunny".to_string(),
                    is_daytime: i % 2 == 0,
                    temperature: None,
                })
                .collect(),
            hourly: vec![
                period(12, 95.0, Some(101.0), Some(10.0)),
                period(13, 70.0, None, None),
                period(14, 45.0, Some(40.5), Some(60.0)),
            ],
            fetched_at: Utc::now(),
        }
    }

    fn test_app() -> App {
        let client = crate::data::NwsClient::new("swa-test").unwrap();
        let mut app = App::new(
            client,
            None,
            &crate::cli::StartupConfig::default(),
            &crate::config::Config::default(),
        );
        app.dashboard = Some(sample_dashboard());
        app.state = crate::app::AppState::Dashboard;
        app
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buffer.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
            }
            text.push('\n');
        }
        text
    }

    fn render_to_text(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        let dashboard = app.dashboard.clone().unwrap();
        terminal
            .draw(|frame| render(frame, app, &dashboard))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_render_header_and_chart() {
        let app = test_app();
        let text = render_to_text(&app, 80, 40);

        assert!(text.contains("Weather for Linn, KS"));
        assert!(text.contains("NEXT 8 HOURS"));
        assert!(text.contains("12 PM"));
        assert!(text.contains("1 PM"));
        assert!(text.contains("95°"));
        assert!(text.contains("101°"));
        assert!(text.contains("Feels like"));
    }

    #[test]
    fn test_render_alerts_and_forecast() {
        let app = test_app();
        let text = render_to_text(&app, 80, 50);

        assert!(text.contains("EXCESSIVE HEAT WARNING"));
        assert!(text.contains("HEAT ADVISORY"));
        assert!(text.contains("Period 0"));
        assert!(text.contains("Period 5"));
        assert!(!text.contains("Period 6"), "only the first 6 periods are shown");
        assert!(text.contains("forecast.weather.gov/MapClick.php?lat=39.7456&lon=-97.0892"));
    }

    #[test]
    fn test_render_expanded_alert_shows_description() {
        let mut app = test_app();
        let collapsed = render_to_text(&app, 80, 50);
        assert!(!collapsed.contains("Stay indoors."));

        app.expanded_alert = Some(0);
        let expanded = render_to_text(&app, 80, 50);
        assert!(expanded.contains("Line one of the description."));
        assert!(expanded.contains("Stay indoors."));
    }

    #[test]
    fn test_render_shows_refresh_error() {
        let mut app = test_app();
        app.last_error = Some("weather.gov returned 503".to_string());

        let text = render_to_text(&app, 100, 40);

        assert!(text.contains("Refresh failed: weather.gov returned 503"));
    }

    #[test]
    fn test_render_large_scroll_offset_is_clamped() {
        let mut app = test_app();
        app.scroll_offset = 200;

        let text = render_to_text(&app, 80, 24);

        assert!(text.contains("Data: National Weather Service"));
    }

    #[test]
    fn test_render_without_hourly_data() {
        let mut app = test_app();
        app.dashboard.as_mut().unwrap().hourly.clear();

        let text = render_to_text(&app, 80, 40);

        assert!(text.contains("No hourly forecast available"));
    }

    #[test]
    fn test_alert_severity_colors() {
        assert_eq!(severity_color(AlertSeverity::Extreme), Color::Red);
        assert_eq!(severity_color(AlertSeverity::Severe), Color::Yellow);
        assert_eq!(severity_color(AlertSeverity::Moderate), colors::PRIMARY);
        assert_eq!(severity_color(AlertSeverity::Unknown), colors::PRIMARY);
    }

    #[test]
    fn test_format_feels_like_undefined_band() {
        assert_eq!(format_feels_like(&period(13, 70.0, None, None)), "--");
        assert_eq!(format_feels_like(&period(13, 70.0, Some(f64::NAN), None)), "--");
        assert_eq!(format_feels_like(&period(12, 95.0, Some(101.4), None)), "101°");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(20.0)), "20%");
        assert_eq!(format_percent(None), "--");
        assert_eq!(format_percent(Some(f64::NAN)), "--");
    }

    #[test]
    fn test_format_degrees_nan() {
        assert_eq!(format_degrees(f64::NAN), "--");
        assert_eq!(format_degrees(72.4), "72°");
    }

    #[test]
    fn test_wrapped_height() {
        let lines = vec![Line::from("a".repeat(25)), Line::default(), Line::from("b")];
        assert_eq!(wrapped_height(&lines, 10), 5);
    }
}
