//! Block sparkline widget for the hourly chart

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for different levels (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A one-row sparkline with one fixed-width column per value
///
/// Values are scaled between `min` and `max`. NaN values leave their column
/// empty.
pub struct SeriesSparkline<'a> {
    /// One value per column
    values: &'a [f64],
    /// Value drawn as the lowest block
    min: f64,
    /// Value drawn as the highest block
    max: f64,
    /// Cells per value, including a one-cell gap
    column_width: u16,
    /// Style for the sparkline
    style: Style,
}

impl<'a> SeriesSparkline<'a> {
    pub fn new(values: &'a [f64], min: f64, max: f64) -> Self {
        Self {
            values,
            min,
            max,
            column_width: 1,
            style: Style::default().fg(Color::Cyan),
        }
    }

    pub fn column_width(mut self, width: u16) -> Self {
        self.column_width = width.max(1);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn value_to_block(&self, value: f64) -> Option<char> {
        if value.is_nan() {
            return None;
        }
        let span = self.max - self.min;
        let normalized = if span > 0.0 {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let index = ((normalized * 7.0).round() as usize).min(7);
        Some(BLOCKS[index])
    }
}

/// Finite minimum and maximum of several series, ignoring NaN
pub fn value_range<'a>(series: impl IntoIterator<Item = &'a [f64]>) -> Option<(f64, f64)> {
    series
        .into_iter()
        .flat_map(|values| values.iter().copied())
        .filter(|v| v.is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

impl<'a> Widget for SeriesSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let bar_width = self.column_width.saturating_sub(1).max(1);
        let columns = (area.width / self.column_width) as usize;

        for (i, value) in self.values.iter().take(columns).enumerate() {
            let Some(block) = self.value_to_block(*value) else {
                continue;
            };

            let x0 = area.x + i as u16 * self.column_width;
            for dx in 0..bar_width {
                if let Some(cell) = buf.cell_mut((x0 + dx, area.y)) {
                    cell.set_char(block).set_style(self.style);
                }
            }
        }
    }
}
