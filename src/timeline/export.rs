//! Plain-text chronicle export.

use std::fmt::Write as _;
use std::path::Path;

use chrono::Local;
use tracing::info;

use super::catalog::Catalog;
use super::types::Phase;

const RULE: &str = "═══════════════════════════════════════════════════════════════════════════════";

/// Render the whole catalog as a chronicle grouped by phase.
///
/// Phases appear in the order their first event appears in the catalog;
/// phases with no events are skipped.
pub fn render_timeline(catalog: &Catalog) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "{:^79}", "EMPIRE OF COTTON: A TIMELINE");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out);

    let mut current_phase: Option<Phase> = None;
    for event in catalog.events() {
        if current_phase != Some(event.phase) {
            current_phase = Some(event.phase);
            let _ = writeln!(out, "┌─ {} ", event.phase.name().to_uppercase());
            let _ = writeln!(out, "│");
        }

        let _ = writeln!(out, "│ {} — {} ({})", event.display_year, event.title, event.location_name);
        for line in wrap(&event.description, 74) {
            let _ = writeln!(out, "│     {}", line);
        }
        if let Some(figure) = &event.key_figure {
            let _ = writeln!(out, "│     Key figure: {}", figure);
        }
        let _ = writeln!(out, "│     Impact: \"{}\"", event.impact);
        let _ = writeln!(out, "│");
    }

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(
        out,
        "{} events, {} trade routes, {} production regions",
        catalog.len(),
        catalog.routes().len(),
        catalog.regions().len(),
    );
    out
}

/// Write the chronicle to `path` with a generation timestamp.
pub fn export_timeline(catalog: &Catalog, path: &Path) -> std::io::Result<()> {
    let mut text = render_timeline(catalog);
    let _ = writeln!(text, "Exported {}", Local::now().format("%Y-%m-%d %H:%M"));
    std::fs::write(path, text)?;
    info!(path = %path.display(), events = catalog.len(), "exported timeline");
    Ok(())
}

/// Greedy word wrap.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
