//! Terminal timeline viewer using ratatui.
//!
//! Detail card and progress controls on the left, world map on the right.
//! Step with the arrow keys or the on-screen buttons, click a marker on the
//! map to jump to its event.

use std::error::Error;
use std::io::stdout;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Position,
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Terminal,
};
use tracing::{debug, info, warn};

use crate::config::ViewerConfig;
use crate::timeline::{Catalog, EventId, Navigator};
use crate::view::detail::render_detail;
use crate::view::map::{canvas_area, clamp_zoom, legend_area, marker_at, render_map, MAX_ZOOM, MIN_ZOOM};
use crate::view::progress::render_progress;
use crate::view::{Button, CardTransition, ControlsLayout, DetailCard, MapScene, Progress};

/// Screen regions from the most recent frame, kept for mouse hit-tests.
#[derive(Clone, Copy, Debug)]
struct FrameLayout {
    header: Rect,
    card: Rect,
    controls: Rect,
    map: Rect,
    status: Rect,
}

impl FrameLayout {
    fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title and current era
                Constraint::Min(1),
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(36), Constraint::Min(1)])
            .split(rows[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(ControlsLayout::HEIGHT)])
            .split(columns[0]);

        Self {
            header: rows[0],
            card: left[0],
            controls: left[1],
            map: columns[1],
            status: rows[2],
        }
    }
}

/// Viewer state: the timeline cursor plus display toggles.
pub struct TimelineApp<'a> {
    nav: Navigator<'a>,
    zoom: f64,
    show_legend: bool,
    show_help: bool,
    should_quit: bool,
    /// Message shown in the status bar until the next input
    message: Option<String>,
    transition: CardTransition,
    layout: Option<FrameLayout>,
}

impl<'a> TimelineApp<'a> {
    pub fn new(catalog: &'a Catalog, config: &ViewerConfig) -> Self {
        let mut nav = Navigator::new(catalog);
        if let Some(id) = config.start_at {
            if !nav.jump_to(EventId(id)) {
                warn!(id, "start event not in catalog, opening at the first event");
            }
        }

        Self {
            nav,
            zoom: clamp_zoom(config.zoom),
            show_legend: config.show_legend,
            show_help: false,
            should_quit: false,
            message: None,
            transition: CardTransition::default(),
            layout: None,
        }
    }

    pub fn navigator(&self) -> &Navigator<'a> {
        &self.nav
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn zoom_in(&mut self) {
        if self.zoom < MAX_ZOOM {
            self.zoom = clamp_zoom(self.zoom * 2.0);
            self.message = Some(format!("Zoom: {}x", self.zoom));
        }
    }

    fn zoom_out(&mut self) {
        if self.zoom > MIN_ZOOM {
            self.zoom = clamp_zoom(self.zoom / 2.0);
            self.message = Some(format!("Zoom: {}x", self.zoom));
        }
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, code: KeyCode) {
        self.message = None;

        if self.show_help {
            self.show_help = false;
            return;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Left | KeyCode::Char('h') => {
                self.nav.retreat();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.nav.advance();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom_in(),
            KeyCode::Char('-') | KeyCode::Char('_') => self.zoom_out(),
            KeyCode::Char('g') | KeyCode::Char('G') => {
                self.show_legend = !self.show_legend;
            }
            _ => {}
        }
    }

    /// Apply a left click at a terminal cell. Clicks before the first
    /// frame has been drawn, or on the legend, are ignored.
    pub fn handle_click(&mut self, column: u16, row: u16) {
        self.message = None;

        if self.show_help {
            self.show_help = false;
            return;
        }
        let Some(layout) = self.layout else {
            return;
        };

        match ControlsLayout::new(layout.controls).button_at(column, row) {
            Some(Button::Previous) => {
                self.nav.retreat();
                return;
            }
            Some(Button::Next) => {
                self.nav.advance();
                return;
            }
            None => {}
        }

        let canvas = canvas_area(layout.map);
        let cell = Position::new(column, row);
        if !canvas.contains(cell) {
            return;
        }
        let scene = MapScene::project(self.nav.catalog(), self.nav.current_position(), self.zoom);
        if self.show_legend && legend_area(&scene, canvas).is_some_and(|legend| legend.contains(cell)) {
            return;
        }
        if let Some(id) = marker_at(&scene, canvas, column, row) {
            debug!(%id, "marker clicked");
            self.nav.jump_to(id);
        }
    }

    /// Draw a full frame.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let layout = FrameLayout::new(area);
        self.layout = Some(layout);

        let event = self.nav.current_event();
        self.render_header(layout.header, buf);

        let card = DetailCard::project(event);
        let fading = self.transition.observe(card.key);
        render_detail(&card, fading, layout.card, buf);

        let progress = Progress::project(self.nav.current_position(), self.nav.len());
        render_progress(&progress, layout.controls, buf);

        let scene = MapScene::project(self.nav.catalog(), self.nav.current_position(), self.zoom);
        render_map(&scene, self.show_legend, layout.map, buf);

        self.render_status(layout.status, buf);

        if self.show_help {
            self.render_help(layout.map, buf);
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let phase = self.nav.current_event().phase;

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        let title = Line::from(vec![
            Span::styled(" Empire of Cotton ", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            Span::styled("棉花帝国", Style::default().fg(Color::Rgb(129, 140, 248)).add_modifier(Modifier::BOLD)),
        ]);
        buf.set_line(inner.x, inner.y, &title, inner.width);

        if inner.height > 1 {
            buf.set_string(
                inner.x,
                inner.y + 1,
                " A Global History of Capitalism / Sven Beckert",
                Style::default().fg(Color::Gray),
            );
        }

        let badge = format!(" {} ", phase.name());
        let label = "CURRENT ERA ";
        let width = (badge.chars().count() + label.len()) as u16;
        if inner.width > width + 48 {
            let x = inner.right() - width - 1;
            buf.set_string(x, inner.y, label, Style::default().fg(Color::DarkGray));
            buf.set_string(
                x + label.len() as u16,
                inner.y,
                &badge,
                Style::default().fg(Color::Black).bg(phase.color()).add_modifier(Modifier::BOLD),
            );
        }
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let msg_str = self.message.as_ref().map(|m| format!(" | {}", m)).unwrap_or_default();
        let status = format!(
            " {} | <-/->: Step  Click marker: Jump  +/-: Zoom  G: Legend  ?: Help  Q: Quit{}",
            self.nav.current_event().display_year,
            msg_str,
        );
        Paragraph::new(status)
            .style(Style::default().bg(Color::DarkGray).fg(Color::White))
            .render(area, buf);
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let help_text = [
            "=== Empire of Cotton ===",
            "",
            "Timeline:",
            "  Left / H  - Previous event",
            "  Right / L - Next event",
            "  Click Previous / Next buttons",
            "",
            "Map:",
            "  Click a marker - Jump to that event",
            "  +/- - Zoom in/out",
            "  G - Toggle legend",
            "",
            "Only events already reached are marked;",
            "routes and regions follow the current era.",
            "",
            "  ? - Toggle this help",
            "  Q / Esc - Quit",
            "",
            "Press any key to close",
        ];

        let width = 46.min(area.width);
        let height = (help_text.len() as u16 + 2).min(area.height);
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let help_area = Rect::new(x, y, width, height);

        Clear.render(help_area, buf);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::DarkGray));
        let inner = block.inner(help_area);
        block.render(help_area, buf);

        for (i, line) in help_text.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let truncated: String = line.chars().take(inner.width as usize).collect();
            buf.set_string(inner.x, inner.y + i as u16, &truncated, Style::default().fg(Color::White));
        }
    }
}

/// Run the interactive viewer until the user quits.
pub fn run_app(catalog: &Catalog, config: &ViewerConfig) -> Result<(), Box<dyn Error>> {
    terminal::enable_raw_mode()?;
    let result = run_in_terminal(catalog, config);

    // Restore runs even when setup or the loop failed
    let restored = restore_terminal();
    result?;
    restored?;
    Ok(())
}

fn run_in_terminal(catalog: &Catalog, config: &ViewerConfig) -> Result<(), Box<dyn Error>> {
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = TimelineApp::new(catalog, config);
    info!(events = catalog.len(), position = app.navigator().current_position(), "viewer started");

    let result = event_loop(&mut terminal, &mut app, Duration::from_millis(config.tick_ms));
    info!(position = app.navigator().current_position(), "viewer closed");
    result
}

/// Undo terminal setup. Every step runs; the first failure is returned.
fn restore_terminal() -> std::io::Result<()> {
    let raw = terminal::disable_raw_mode();
    let screen = execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture);
    let shown = execute!(stdout(), cursor::Show);
    raw.and(screen).and(shown)
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut TimelineApp,
    tick: Duration,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| app.render(f.area(), f.buffer_mut()))?;

        if app.should_quit() {
            return Ok(());
        }

        // Each input is fully applied before the next one is read
        if event::poll(tick)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key.code),
                Event::Mouse(MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, .. }) => {
                    app.handle_click(column, row);
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::catalog::tests::{catalog_with_ids, event};
    use crate::timeline::{Coordinates, Phase};
    use crate::view::buffer_text;
    use crate::view::map::project_to_cell;

    fn draw(app: &mut TimelineApp) -> String {
        let area = Rect::new(0, 0, 160, 48);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buffer_text(&buf)
    }

    fn visible_ids(app: &TimelineApp) -> Vec<u64> {
        let nav = app.navigator();
        MapScene::project(nav.catalog(), nav.current_position(), app.zoom())
            .markers
            .iter()
            .map(|m| m.event.id.0)
            .collect()
    }

    #[test]
    fn test_jump_retreat_and_stale_jump() {
        let catalog = catalog_with_ids(&[10, 20, 30]);
        let mut app = TimelineApp::new(&catalog, &ViewerConfig::default());
        assert_eq!(app.navigator().current_position(), 0);

        app.nav.jump_to(EventId(30));
        assert_eq!(app.navigator().current_position(), 2);
        assert_eq!(visible_ids(&app), vec![10, 20, 30]);

        app.handle_key(KeyCode::Left);
        assert_eq!(app.navigator().current_position(), 1);
        assert_eq!(visible_ids(&app), vec![10, 20]);

        app.nav.jump_to(EventId(999));
        assert_eq!(app.navigator().current_position(), 1);
    }

    #[test]
    fn test_arrow_keys_step_and_saturate() {
        let catalog = catalog_with_ids(&[1, 2, 3]);
        let mut app = TimelineApp::new(&catalog, &ViewerConfig::default());
        app.handle_key(KeyCode::Left);
        assert_eq!(app.navigator().current_position(), 0);
        for _ in 0..5 {
            app.handle_key(KeyCode::Right);
        }
        assert_eq!(app.navigator().current_position(), 2);
        app.handle_key(KeyCode::Char('h'));
        assert_eq!(app.navigator().current_position(), 1);
    }

    #[test]
    fn test_start_at_config() {
        let catalog = catalog_with_ids(&[10, 20, 30]);
        let config = ViewerConfig { start_at: Some(20), ..ViewerConfig::default() };
        let app = TimelineApp::new(&catalog, &config);
        assert_eq!(app.navigator().current_position(), 1);

        let stale = ViewerConfig { start_at: Some(25), ..ViewerConfig::default() };
        let app = TimelineApp::new(&catalog, &stale);
        assert_eq!(app.navigator().current_position(), 0);
    }

    #[test]
    fn test_zoom_keys_stay_in_range() {
        let catalog = catalog_with_ids(&[1]);
        let mut app = TimelineApp::new(&catalog, &ViewerConfig::default());
        for _ in 0..10 {
            app.handle_key(KeyCode::Char('+'));
        }
        assert_eq!(app.zoom(), MAX_ZOOM);
        for _ in 0..10 {
            app.handle_key(KeyCode::Char('-'));
        }
        assert_eq!(app.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let catalog = catalog_with_ids(&[1, 2]);
        let mut app = TimelineApp::new(&catalog, &ViewerConfig::default());
        app.handle_key(KeyCode::Char('?'));
        app.handle_key(KeyCode::Right);
        assert_eq!(app.navigator().current_position(), 0);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.navigator().current_position(), 1);
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_click_before_first_frame_is_ignored() {
        let catalog = catalog_with_ids(&[1, 2]);
        let mut app = TimelineApp::new(&catalog, &ViewerConfig::default());
        app.handle_click(10, 10);
        assert_eq!(app.navigator().current_position(), 0);
    }

    #[test]
    fn test_on_screen_buttons_step() {
        let catalog = Catalog::builtin().unwrap();
        let mut app = TimelineApp::new(&catalog, &ViewerConfig::default());
        draw(&mut app);

        let controls = ControlsLayout::new(app.layout.unwrap().controls);
        app.handle_click(controls.next.x + 1, controls.next.y);
        app.handle_click(controls.next.x + 1, controls.next.y);
        assert_eq!(app.navigator().current_position(), 2);
        app.handle_click(controls.previous.x + 1, controls.previous.y);
        assert_eq!(app.navigator().current_position(), 1);
    }

    #[test]
    fn test_marker_click_jumps_back() {
        let catalog = Catalog::builtin().unwrap();
        // Gujarat, with the earlier Indus Valley marker close by.
        let config = ViewerConfig { start_at: Some(3), ..ViewerConfig::default() };
        let mut app = TimelineApp::new(&catalog, &config);
        draw(&mut app);

        let canvas = canvas_area(app.layout.unwrap().map);
        let scene = MapScene::project(&catalog, app.navigator().current_position(), app.zoom());
        let target = catalog.events()[0].coordinates;
        let (x, y) = project_to_cell(&scene.camera, canvas, target).unwrap();

        app.handle_click(x, y);
        assert_eq!(app.navigator().current_event().id, EventId(1));
        assert_eq!(app.navigator().current_position(), 0);
    }

    #[test]
    fn test_marker_under_legend_is_not_clickable() {
        let mut far = event(1, Phase::Origins);
        far.coordinates = Coordinates::new(40.0, 80.0);
        let mut here = event(2, Phase::Origins);
        here.coordinates = Coordinates::new(0.0, 0.0);
        let catalog = Catalog::new(vec![far, here], Vec::new(), Vec::new()).unwrap();

        let config = ViewerConfig { start_at: Some(2), ..ViewerConfig::default() };
        let mut app = TimelineApp::new(&catalog, &config);
        draw(&mut app);

        let canvas = canvas_area(app.layout.unwrap().map);
        let scene = MapScene::project(&catalog, app.navigator().current_position(), app.zoom());
        let (x, y) = project_to_cell(&scene.camera, canvas, catalog.events()[0].coordinates).unwrap();
        let legend = legend_area(&scene, canvas).unwrap();
        assert!(legend.contains(Position::new(x, y)));

        app.handle_click(x, y);
        assert_eq!(app.navigator().current_position(), 1);

        // With the legend hidden the same marker is visible and clickable.
        app.handle_key(KeyCode::Char('g'));
        draw(&mut app);
        app.handle_click(x, y);
        assert_eq!(app.navigator().current_position(), 0);
    }

    #[test]
    fn test_frame_shows_all_panels() {
        let catalog = Catalog::builtin().unwrap();
        let mut app = TimelineApp::new(&catalog, &ViewerConfig::default());
        let text = draw(&mut app);
        let first = &catalog.events()[0];
        assert!(text.contains("Empire of Cotton"));
        assert!(text.contains("CURRENT ERA"));
        assert!(text.contains(&first.display_year));
        assert!(text.contains("Timeline Progress"));
        assert!(text.contains(&format!("1 of {}", catalog.len())));
        assert!(text.contains("Legend"));
    }
}
