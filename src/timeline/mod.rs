//! Timeline core: the static catalog and the cursor that walks it.

pub mod catalog;
pub mod export;
pub mod navigation;
pub mod types;

pub use catalog::{Catalog, CatalogError};
pub use navigation::Navigator;
pub use types::{Coordinates, EventId, HistoricalEvent, Phase, ProductionRegion, RouteKind, TradeRoute};
