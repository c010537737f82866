//! Named places shown as markers on the map.

use serde::{Deserialize, Serialize};

/// Geographic point (lat/lon).
///
/// This is the only coordinate type used inside the crate. It serializes as
/// the Leaflet-style array `[lat, lon]`. GeoJSON positions arrive as
/// `[lon, lat]` and are converted by [`LatLng::from_position`] and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Read a GeoJSON position (`[lon, lat, ...]`).
    ///
    /// Returns `None` when the position carries fewer than two ordinates.
    /// Altitude and any further ordinates are ignored.
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lon, lat, ..] => Some(Self::new(*lat, *lon)),
            _ => None,
        }
    }

    /// Back to a GeoJSON position (`[lon, lat]`).
    pub fn to_position(self) -> Vec<f64> {
        vec![self.lon, self.lat]
    }

    /// Whether both ordinates lie in the WGS84 range.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self::new(lat, lon)
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(p: LatLng) -> Self {
        [p.lat, p.lon]
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

/// Kind of named place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    City,
    Province,
}

impl PlaceKind {
    /// CSS class of the marker label
    pub fn icon_class(&self) -> &'static str {
        match self {
            PlaceKind::City => "city-icon",
            PlaceKind::Province => "province-icon",
        }
    }
}

impl std::fmt::Display for PlaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceKind::City => write!(f, "city"),
            PlaceKind::Province => write!(f, "province"),
        }
    }
}

impl std::str::FromStr for PlaceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "city" => Ok(PlaceKind::City),
            "province" => Ok(PlaceKind::Province),
            other => Err(format!("unknown place kind '{}'", other)),
        }
    }
}

/// A city or province label loaded from the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPoint {
    pub name: String,

    pub position: LatLng,

    /// Province the city belongs to (cities only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
}

impl NamedPoint {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            position: LatLng::new(lat, lon),
            province: None,
        }
    }

    pub fn with_province(mut self, province: impl Into<String>) -> Self {
        self.province = Some(province.into());
        self
    }

    /// Popup text: "Name, Province" or just "Name"
    pub fn popup_text(&self) -> String {
        match &self.province {
            Some(province) => format!("{}, {}", self.name, province),
            None => self.name.clone(),
        }
    }
}
