//! Catalog record types: events, trade routes, production regions.

use std::fmt;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Macro to generate newtype ID wrappers with common derives and Display.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_id!(EventId);
define_id!(RouteId);
define_id!(RegionId);

/// Historical era an event or overlay belongs to.
///
/// Closed set: overlay filtering compares these by value, so there is no
/// way for a misspelled tag to silently fall through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Origins,
    WarCapitalism,
    IndustrialCapitalism,
    GlobalReconstruction,
    ReturnOfSouth,
}

impl Phase {
    /// All phases in historical order.
    pub fn all() -> &'static [Phase] {
        &[
            Phase::Origins,
            Phase::WarCapitalism,
            Phase::IndustrialCapitalism,
            Phase::GlobalReconstruction,
            Phase::ReturnOfSouth,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Origins => "Origins",
            Phase::WarCapitalism => "War Capitalism",
            Phase::IndustrialCapitalism => "Industrial Capitalism",
            Phase::GlobalReconstruction => "Global Reconstruction",
            Phase::ReturnOfSouth => "Return of the Global South",
        }
    }

    /// Display color for markers, badges and the legend.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Phase::Origins => (16, 185, 129),
            Phase::WarCapitalism => (239, 68, 68),
            Phase::IndustrialCapitalism => (59, 130, 246),
            Phase::GlobalReconstruction => (245, 158, 11),
            Phase::ReturnOfSouth => (139, 92, 246),
        }
    }

    pub fn color(&self) -> Color {
        let (r, g, b) = self.rgb();
        Color::Rgb(r, g, b)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A point on the globe in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Overlay geometry is authored as `[lng, lat]` pairs.
impl From<[f64; 2]> for Coordinates {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.lng, c.lat]
    }
}

/// One point in the timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalEvent {
    pub id: EventId,
    pub year: i32,
    /// Presentational only; may read "c. 3000 BC" or "1860s".
    pub display_year: String,
    pub title: String,
    pub location_name: String,
    pub coordinates: Coordinates,
    pub phase: Phase,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_figure: Option<String>,
    pub impact: String,
}

/// What moved along a trade route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Cotton,
    Textiles,
    Slaves,
    Machinery,
}

impl RouteKind {
    pub fn all() -> &'static [RouteKind] {
        &[RouteKind::Cotton, RouteKind::Textiles, RouteKind::Slaves, RouteKind::Machinery]
    }

    pub fn name(&self) -> &'static str {
        match self {
            RouteKind::Cotton => "Raw cotton",
            RouteKind::Textiles => "Textiles",
            RouteKind::Slaves => "Enslaved people",
            RouteKind::Machinery => "Machinery",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            RouteKind::Cotton => Color::Rgb(241, 245, 249),
            RouteKind::Textiles => Color::Rgb(129, 140, 248),
            RouteKind::Slaves => Color::Rgb(220, 38, 38),
            RouteKind::Machinery => Color::Rgb(148, 163, 184),
        }
    }
}

/// A directed overlay edge shown while its phase is active.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeRoute {
    pub id: RouteId,
    pub phase: Phase,
    #[serde(with = "lng_lat")]
    pub start: Coordinates,
    #[serde(with = "lng_lat")]
    pub end: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub kind: RouteKind,
}

/// A labelled production area shown while its phase is active.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionRegion {
    pub id: RegionId,
    pub phase: Phase,
    #[serde(with = "lng_lat")]
    pub coordinates: Coordinates,
    pub name: String,
    /// Visual scale only, in degrees.
    pub radius: f64,
}

/// `[lng, lat]` pair encoding for overlay geometry.
mod lng_lat {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Coordinates;

    pub fn serialize<S: Serializer>(c: &Coordinates, s: S) -> Result<S::Ok, S::Error> {
        <[f64; 2]>::from(*c).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Coordinates, D::Error> {
        <[f64; 2]>::deserialize(d).map(Coordinates::from)
    }
}
