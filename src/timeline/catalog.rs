//! The event catalog: events plus trade-route and production-region overlays.
//!
//! Loaded once at startup and never mutated. The bundled "Empire of Cotton"
//! catalog is embedded in the binary via `include_str!`; a JSON file with
//! the same layout can replace it.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::types::{EventId, HistoricalEvent, ProductionRegion, TradeRoute};

const DEFAULT_CATALOG_JSON: &str = include_str!("../../data/defaults/empire_of_cotton.json");

/// Startup precondition violations and load failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog contains no events")]
    Empty,
    #[error("event ids must be strictly increasing: {next} follows {previous}")]
    UnorderedIds { previous: EventId, next: EventId },
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk layout of a catalog file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub events: Vec<HistoricalEvent>,
    #[serde(default)]
    pub routes: Vec<TradeRoute>,
    #[serde(default)]
    pub regions: Vec<ProductionRegion>,
}

/// Immutable, ordered collection of events and overlays.
///
/// Only read accessors exist; the cursor that walks it lives in
/// [`Navigator`](super::navigation::Navigator).
#[derive(Clone, Debug)]
pub struct Catalog {
    events: Vec<HistoricalEvent>,
    routes: Vec<TradeRoute>,
    regions: Vec<ProductionRegion>,
    /// Event id -> position, built once so jumps don't scan.
    positions: HashMap<EventId, usize>,
}

impl Catalog {
    /// Build a catalog, checking the event list is non-empty and sorted by
    /// strictly increasing id. Overlays are taken as-is.
    pub fn new(
        events: Vec<HistoricalEvent>,
        routes: Vec<TradeRoute>,
        regions: Vec<ProductionRegion>,
    ) -> Result<Self, CatalogError> {
        if events.is_empty() {
            return Err(CatalogError::Empty);
        }
        for pair in events.windows(2) {
            if pair[1].id <= pair[0].id {
                return Err(CatalogError::UnorderedIds {
                    previous: pair[0].id,
                    next: pair[1].id,
                });
            }
        }

        let positions = events
            .iter()
            .enumerate()
            .map(|(pos, event)| (event.id, pos))
            .collect();

        Ok(Self { events, routes, regions, positions })
    }

    /// Parse a catalog from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.events, file.routes, file.regions)
    }

    /// Load a catalog from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            events = catalog.len(),
            routes = catalog.routes.len(),
            regions = catalog.regions.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// The bundled Empire of Cotton catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_CATALOG_JSON)
    }

    pub fn events(&self) -> &[HistoricalEvent] {
        &self.events
    }

    pub fn routes(&self) -> &[TradeRoute] {
        &self.routes
    }

    pub fn regions(&self) -> &[ProductionRegion] {
        &self.regions
    }

    /// Number of events. Never zero.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Always false for a constructed catalog; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn event_at(&self, position: usize) -> Option<&HistoricalEvent> {
        self.events.get(position)
    }

    /// Resolve an event id to its position in catalog order.
    pub fn position_of(&self, id: EventId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Snapshot in file layout, for writing a catalog back out.
    pub fn to_file(&self) -> CatalogFile {
        CatalogFile {
            events: self.events.clone(),
            routes: self.routes.clone(),
            regions: self.regions.clone(),
        }
    }
}
