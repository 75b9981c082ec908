//! Event detail card.

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::timeline::{EventId, HistoricalEvent, Phase};

/// Frames of dimmed text after the card switches to another event.
const FADE_FRAMES: u8 = 4;

/// View model for the card describing the current event.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailCard {
    /// Identity of the card; a new key restarts the fade.
    pub key: EventId,
    pub year_label: String,
    pub title: String,
    pub location: String,
    pub phase: Phase,
    pub description: String,
    pub key_figure: Option<String>,
    pub impact: String,
}

impl DetailCard {
    pub fn project(event: &HistoricalEvent) -> Self {
        Self {
            key: event.id,
            year_label: event.display_year.clone(),
            title: event.title.clone(),
            location: event.location_name.clone(),
            phase: event.phase,
            description: event.description.clone(),
            key_figure: event.key_figure.clone(),
            impact: event.impact.clone(),
        }
    }

    fn lines(&self, dim: bool) -> Vec<Line<'static>> {
        let text = |color: Color| {
            let style = Style::default().fg(color);
            if dim {
                style.add_modifier(Modifier::DIM)
            } else {
                style
            }
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled(self.year_label.clone(), text(Color::White).add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(format!("[{}]", self.phase.name()), text(self.phase.color())),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                self.title.clone(),
                text(Color::Rgb(224, 231, 255)).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format!("@ {}", self.location), text(Color::Gray))),
            Line::from(""),
            Line::from(Span::styled(self.description.clone(), text(Color::Rgb(203, 213, 225)))),
        ];

        if let Some(figure) = &self.key_figure {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("KEY FIGURE", text(Color::DarkGray))));
            lines.push(Line::from(Span::styled(
                format!("▌ {}", figure),
                text(Color::Rgb(165, 180, 252)),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("HISTORICAL IMPACT", text(Color::DarkGray))));
        lines.push(Line::from(Span::styled(
            format!("▌ \"{}\"", self.impact),
            text(Color::Rgb(167, 243, 208)).add_modifier(Modifier::ITALIC),
        )));
        lines
    }
}

/// Short fade played when the card changes identity.
#[derive(Clone, Debug, Default)]
pub struct CardTransition {
    last_key: Option<EventId>,
    remaining: u8,
}

impl CardTransition {
    /// Record the key about to be drawn. Returns true while fading.
    pub fn observe(&mut self, key: EventId) -> bool {
        if self.last_key != Some(key) {
            // The very first card appears without a fade.
            if self.last_key.is_some() {
                self.remaining = FADE_FRAMES;
            }
            self.last_key = Some(key);
        }
        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }
}

/// Draw the detail card. `fading` dims the text.
pub fn render_detail(card: &DetailCard, fading: bool, area: Rect, buf: &mut Buffer) {
    Clear.render(area, buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(card.phase.color()))
        .title(format!(" {} ", card.phase.name()));

    Paragraph::new(card.lines(fading))
        .block(block)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}
