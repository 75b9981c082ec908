//! Progress indicator and the on-screen step buttons.

use ratatui::{
    layout::Position,
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, Gauge},
};

/// Completion of the walk through the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct Progress {
    /// `(position + 1) / len`, in `(0, 1]`.
    pub fraction: f64,
    /// "`position + 1` of `len`".
    pub label: String,
    pub can_retreat: bool,
    pub can_advance: bool,
}

impl Progress {
    pub fn project(position: usize, len: usize) -> Self {
        let len = len.max(1);
        let position = position.min(len - 1);
        Self {
            fraction: (position + 1) as f64 / len as f64,
            label: format!("{} of {}", position + 1, len),
            can_retreat: position > 0,
            can_advance: position + 1 < len,
        }
    }
}

/// On-screen step controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Previous,
    Next,
}

/// Where each part of the controls panel lands for a given area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlsLayout {
    pub header: Rect,
    pub gauge: Rect,
    pub previous: Rect,
    pub next: Rect,
}

impl ControlsLayout {
    /// Rows needed by the panel, borders included.
    pub const HEIGHT: u16 = 6;

    pub fn new(area: Rect) -> Self {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);
        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .spacing(2)
            .split(rows[3]);

        Self {
            header: rows[0],
            gauge: rows[1],
            previous: buttons[0],
            next: buttons[1],
        }
    }

    pub fn button_at(&self, column: u16, row: u16) -> Option<Button> {
        let position = Position::new(column, row);
        if self.previous.contains(position) {
            Some(Button::Previous)
        } else if self.next.contains(position) {
            Some(Button::Next)
        } else {
            None
        }
    }
}

pub fn render_progress(progress: &Progress, area: Rect, buf: &mut Buffer) {
    Clear.render(area, buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    block.render(area, buf);

    let layout = ControlsLayout::new(area);

    buf.set_string(layout.header.x, layout.header.y, "Timeline Progress", Style::default().fg(Color::Gray));
    let label_width = progress.label.chars().count() as u16;
    if layout.header.width > label_width {
        buf.set_string(
            layout.header.right() - label_width,
            layout.header.y,
            &progress.label,
            Style::default().fg(Color::Gray),
        );
    }

    Gauge::default()
        .gauge_style(Style::default().fg(Color::Rgb(99, 102, 241)).bg(Color::Rgb(30, 41, 59)))
        .ratio(progress.fraction.clamp(0.0, 1.0))
        .label("")
        .render(layout.gauge, buf);

    render_button(" ◀ Previous ", progress.can_retreat, Color::Rgb(51, 65, 85), layout.previous, buf);
    render_button(" Next ▶ ", progress.can_advance, Color::Rgb(79, 70, 229), layout.next, buf);
}

fn render_button(text: &str, enabled: bool, bg: Color, area: Rect, buf: &mut Buffer) {
    let style = if enabled {
        Style::default().fg(Color::White).bg(bg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray).bg(Color::Rgb(30, 41, 59))
    };
    buf.set_style(area, style);
    let width = text.chars().count() as u16;
    let x = area.x + area.width.saturating_sub(width) / 2;
    let truncated: String = text.chars().take(area.width as usize).collect();
    buf.set_string(x, area.y, &truncated, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::buffer_text;

    #[test]
    fn test_fraction_and_label() {
        let first = Progress::project(0, 5);
        assert_eq!(first.fraction, 0.2);
        assert_eq!(first.label, "1 of 5");
        assert!(!first.can_retreat);
        assert!(first.can_advance);

        let last = Progress::project(4, 5);
        assert_eq!(last.fraction, 1.0);
        assert_eq!(last.label, "5 of 5");
        assert!(last.can_retreat);
        assert!(!last.can_advance);
    }

    #[test]
    fn test_fraction_is_never_zero() {
        for len in 1..20 {
            for position in 0..len {
                let p = Progress::project(position, len);
                assert!(p.fraction > 0.0 && p.fraction <= 1.0);
            }
        }
    }

    #[test]
    fn test_button_hit_areas() {
        let layout = ControlsLayout::new(Rect::new(0, 10, 40, ControlsLayout::HEIGHT));
        assert_eq!(layout.previous.y, 14);
        assert_eq!(layout.button_at(layout.previous.x, 14), Some(Button::Previous));
        assert_eq!(layout.button_at(layout.next.right() - 1, 14), Some(Button::Next));
        assert_eq!(layout.button_at(layout.next.x, 12), None);
        assert!(layout.previous.right() <= layout.next.x);
    }

    #[test]
    fn test_render_shows_label_and_buttons() {
        let area = Rect::new(0, 0, 40, ControlsLayout::HEIGHT);
        let mut buf = Buffer::empty(area);
        render_progress(&Progress::project(2, 12), area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("Timeline Progress"));
        assert!(text.contains("3 of 12"));
        assert!(text.contains("Previous"));
        assert!(text.contains("Next"));
    }
}
