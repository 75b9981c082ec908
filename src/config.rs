//! Viewer settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::view::map::{clamp_zoom, DEFAULT_ZOOM};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime settings for the interactive viewer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Map zoom, clamped to 1..8 (default: 2).
    pub zoom: f64,

    /// Event id to open on instead of the first event.
    pub start_at: Option<u64>,

    /// Draw the phase legend over the map.
    pub show_legend: bool,

    /// Input poll interval in milliseconds (default: 50).
    pub tick_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            start_at: None,
            show_legend: true,
            tick_ms: 50,
        }
    }
}

impl ViewerConfig {
    /// Read settings from a JSON file. Missing keys take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ViewerConfig = serde_json::from_str(&json)?;
        Ok(config.normalized())
    }

    /// Clamp out-of-range values instead of rejecting them.
    pub fn normalized(mut self) -> Self {
        self.zoom = clamp_zoom(self.zoom);
        self.tick_ms = self.tick_ms.clamp(10, 1000);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::map::MAX_ZOOM;

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, r#"{ "start_at": 12, "zoom": 40.0 }"#).unwrap();

        let config = ViewerConfig::load(&path).unwrap();
        assert_eq!(config.start_at, Some(12));
        assert_eq!(config.zoom, MAX_ZOOM);
        assert!(config.show_legend);
        assert_eq!(config.tick_ms, 50);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ViewerConfig::load(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, "zoom = 3").unwrap();
        assert!(matches!(ViewerConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
