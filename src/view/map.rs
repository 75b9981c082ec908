//! World map projection.
//!
//! Overlays (trade routes and production regions) are filtered by exact
//! phase match with the current event. Event markers are filtered by
//! position instead: only events at or before the cursor are shown, so the
//! map fills in as the user walks forward through history.

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    symbols,
    text::Line as TextLine,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine, Map, MapResolution},
        Block, BorderType, Borders, Clear,
    },
};

use crate::timeline::{Catalog, Coordinates, EventId, HistoricalEvent, Phase, ProductionRegion, RouteKind, TradeRoute};

pub const DEFAULT_ZOOM: f64 = 2.0;
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 8.0;

/// Horizontal/vertical cell tolerance for marker clicks.
const HIT_COLUMNS: i32 = 2;
const HIT_ROWS: i32 = 1;

const OCEAN: Color = Color::Rgb(15, 23, 42);
const LAND: Color = Color::Rgb(71, 85, 105);

/// Map viewport centred on a point with a fixed zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub center: Coordinates,
    pub zoom: f64,
}

impl Camera {
    /// Zoom is clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn new(center: Coordinates, zoom: f64) -> Self {
        Self { center, zoom: clamp_zoom(zoom) }
    }

    /// Visible longitude range.
    pub fn x_bounds(&self) -> [f64; 2] {
        let half = 180.0 / self.zoom;
        [self.center.lng - half, self.center.lng + half]
    }

    /// Visible latitude range.
    pub fn y_bounds(&self) -> [f64; 2] {
        let half = 90.0 / self.zoom;
        [self.center.lat - half, self.center.lat + half]
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        let [left, right] = self.x_bounds();
        let [bottom, top] = self.y_bounds();
        (left..=right).contains(&point.lng) && (bottom..=top).contains(&point.lat)
    }
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        DEFAULT_ZOOM
    }
}

/// A visible event marker.
#[derive(Clone, Copy, Debug)]
pub struct MarkerView<'a> {
    pub event: &'a HistoricalEvent,
    pub is_current: bool,
}

/// Everything the map draws for one cursor position.
#[derive(Clone, Debug)]
pub struct MapScene<'a> {
    pub phase: Phase,
    pub routes: Vec<&'a TradeRoute>,
    pub regions: Vec<&'a ProductionRegion>,
    /// Events at positions `0..=position`, in catalog order.
    pub markers: Vec<MarkerView<'a>>,
    pub camera: Camera,
}

impl<'a> MapScene<'a> {
    /// Project the catalog as seen from `position`. Positions past the end
    /// are treated as the last event.
    pub fn project(catalog: &'a Catalog, position: usize, zoom: f64) -> Self {
        let position = position.min(catalog.len().saturating_sub(1));
        let current = &catalog.events()[position];
        let phase = current.phase;

        let routes = catalog.routes().iter().filter(|r| r.phase == phase).collect();
        let regions = catalog.regions().iter().filter(|r| r.phase == phase).collect();
        let markers = catalog.events()[..=position]
            .iter()
            .map(|event| MarkerView { event, is_current: event.id == current.id })
            .collect();

        Self {
            phase,
            routes,
            regions,
            markers,
            camera: Camera::new(current.coordinates, zoom),
        }
    }

    pub fn current(&self) -> Option<&'a HistoricalEvent> {
        self.markers.iter().find(|m| m.is_current).map(|m| m.event)
    }

    /// Route kinds present in this scene, in legend order.
    pub fn route_kinds(&self) -> Vec<RouteKind> {
        RouteKind::all()
            .iter()
            .copied()
            .filter(|kind| self.routes.iter().any(|r| r.kind == *kind))
            .collect()
    }
}

/// Inner drawing area of a map panel occupying `area`.
pub fn canvas_area(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

/// Terminal cell a point lands on, using the canvas label mapping.
/// `None` when the point is outside the camera window.
pub fn project_to_cell(camera: &Camera, area: Rect, point: Coordinates) -> Option<(u16, u16)> {
    if area.width == 0 || area.height == 0 || !camera.contains(point) {
        return None;
    }
    let [left, right] = camera.x_bounds();
    let [bottom, top] = camera.y_bounds();
    let cols = f64::from(area.width) - 1.0;
    let rows = f64::from(area.height) - 1.0;
    let x = ((point.lng - left) * cols / (right - left)) as u16;
    let y = ((top - point.lat) * rows / (top - bottom)) as u16;
    Some((area.x + x, area.y + y))
}

/// Visible marker under a clicked cell, if any. Later markers win ties,
/// matching draw order. Routes and regions are never hit.
pub fn marker_at(scene: &MapScene, area: Rect, column: u16, row: u16) -> Option<EventId> {
    let mut best: Option<(i32, EventId)> = None;
    for marker in scene.markers.iter().rev() {
        let Some((x, y)) = project_to_cell(&scene.camera, area, marker.event.coordinates) else {
            continue;
        };
        let dx = (i32::from(column) - i32::from(x)).abs();
        let dy = (i32::from(row) - i32::from(y)).abs();
        if dx > HIT_COLUMNS || dy > HIT_ROWS {
            continue;
        }
        // Cells are roughly twice as tall as wide.
        let distance = dx * dx + 4 * dy * dy;
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, marker.event.id));
        }
    }
    best.map(|(_, id)| id)
}

/// Draw the map panel: base layer, overlays, markers and legend.
pub fn render_map(scene: &MapScene, show_legend: bool, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Map | {} | {}x ", scene.phase.name(), scene.camera.zoom));

    let [left, right] = scene.camera.x_bounds();
    let [bottom, top] = scene.camera.y_bounds();
    let zoom = scene.camera.zoom;

    Canvas::default()
        .block(block)
        .background_color(OCEAN)
        .marker(symbols::Marker::Braille)
        .x_bounds([left, right])
        .y_bounds([bottom, top])
        .paint(|ctx| {
            ctx.draw(&Map { color: LAND, resolution: MapResolution::High });
            ctx.layer();

            for region in &scene.regions {
                ctx.draw(&Circle {
                    x: region.coordinates.lng,
                    y: region.coordinates.lat,
                    radius: region.radius,
                    color: region.phase.color(),
                });
            }
            for route in &scene.routes {
                ctx.draw(&CanvasLine {
                    x1: route.start.lng,
                    y1: route.start.lat,
                    x2: route.end.lng,
                    y2: route.end.lat,
                    color: route.kind.color(),
                });
            }
            ctx.layer();

            for region in &scene.regions {
                ctx.print(
                    region.coordinates.lng,
                    region.coordinates.lat - region.radius,
                    TextLine::styled(region.name.clone(), Style::default().fg(region.phase.color()).add_modifier(Modifier::DIM)),
                );
            }
            for marker in scene.markers.iter().filter(|m| !m.is_current) {
                let c = marker.event.coordinates;
                ctx.print(c.lng, c.lat, TextLine::styled("•", Style::default().fg(marker.event.phase.color())));
            }
            if let Some(current) = scene.current() {
                let c = current.coordinates;
                ctx.draw(&Circle { x: c.lng, y: c.lat, radius: 6.0 / zoom, color: Color::White });
                ctx.print(
                    c.lng,
                    c.lat,
                    TextLine::styled("◉", Style::default().fg(current.phase.color()).add_modifier(Modifier::BOLD)),
                );
                ctx.print(
                    c.lng,
                    c.lat + 24.0 / zoom,
                    TextLine::styled(
                        current.location_name.clone(),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                );
            }
        })
        .render(area, buf);

    if show_legend {
        render_legend(scene, canvas_area(area), buf);
    }
}

/// Cells the legend covers in the top-right corner of `canvas`, or `None`
/// when the canvas is too small to hold it.
pub fn legend_area(scene: &MapScene, canvas: Rect) -> Option<Rect> {
    let kinds = scene.route_kinds().len();
    let rows = Phase::all().len() + if kinds == 0 { 0 } else { kinds + 1 };
    let width = 30u16.min(canvas.width);
    let height = (rows as u16 + 2).min(canvas.height);
    if width < 8 || height < 3 {
        return None;
    }
    Some(Rect::new(canvas.right() - width, canvas.y, width, height))
}

/// Phase colors, plus the route kinds on screen.
fn render_legend(scene: &MapScene, canvas: Rect, buf: &mut Buffer) {
    let Some(legend_area) = legend_area(scene, canvas) else {
        return;
    };
    let kinds = scene.route_kinds();

    Clear.render(legend_area, buf);
    let block = Block::default()
        .title(" Legend ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(legend_area);
    block.render(legend_area, buf);

    let mut lines: Vec<(String, Style)> = Phase::all()
        .iter()
        .map(|phase| {
            let mut style = Style::default().fg(phase.color());
            if *phase == scene.phase {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            (format!("● {}", phase.name()), style)
        })
        .collect();
    if !kinds.is_empty() {
        lines.push((String::new(), Style::default()));
        for kind in kinds {
            lines.push((format!("─ {}", kind.name()), Style::default().fg(kind.color())));
        }
    }

    for (i, (text, style)) in lines.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        let truncated: String = text.chars().take(inner.width as usize).collect();
        buf.set_string(inner.x, inner.y + i as u16, &truncated, *style);
    }
}
