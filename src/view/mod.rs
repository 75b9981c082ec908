//! Pure projections from the timeline cursor to what is drawn.
//!
//! Each renderer is split into a view model built from catalog data and a
//! `render_*` function that draws it into a ratatui buffer. None of them
//! keep state between frames except the cosmetic card fade.

pub mod detail;
pub mod map;
pub mod progress;

pub use detail::{CardTransition, DetailCard};
pub use map::{Camera, MapScene};
pub use progress::{Button, ControlsLayout, Progress};

#[cfg(test)]
pub(crate) fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
