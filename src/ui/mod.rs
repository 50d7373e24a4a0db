//! UI rendering module for swa
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod dashboard;
pub mod help_overlay;
pub mod report;
pub mod widgets;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState};

pub use help_overlay::render as render_help_overlay;
pub use report::render_text;

/// Renders the UI based on the current application state
pub fn render(frame: &mut Frame, app: &App) {
    match (&app.state, &app.dashboard) {
        (AppState::Dashboard, Some(dashboard)) => dashboard::render(frame, app, dashboard),
        (AppState::Failed(message), _) => render_failed(frame, message),
        _ => render_loading(frame),
    }

    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Vertically centered area for a short message
fn message_area(area: Rect, height: u16) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(height),
            Constraint::Percentage(45),
        ])
        .split(area);
    chunks[1]
}

/// Renders a loading message while data is being fetched
fn render_loading(frame: &mut Frame) {
    let loading_text = Paragraph::new("Loading weather.gov forecast...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, message_area(frame.area(), 3));
}

/// Renders the error from a failed first load
fn render_failed(frame: &mut Frame, message: &str) {
    let lines = vec![
        Line::styled("Could not load the forecast", Style::default().fg(Color::Red)),
        Line::styled(message.to_string(), Style::default().fg(Color::Gray)),
        Line::default(),
        Line::styled("r Retry  q Quit", Style::default().fg(Color::DarkGray)),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, message_area(frame.area(), 5));
}
