//! Axis-aligned bounding box in latitude/longitude space.

use geo_types::{coord, LineString, Polygon};
use serde::{Deserialize, Serialize};

use super::LatLng;

/// Bounding box as a (southwest, northeast) corner pair.
///
/// No antimeridian handling: a box spanning ±180° is simply very wide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub southwest: LatLng,
    pub northeast: LatLng,
}

impl BoundingBox {
    /// Fold seed: inverted so that the first extended point replaces both corners.
    pub const SEED: BoundingBox = BoundingBox {
        southwest: LatLng::new(90.0, 180.0),
        northeast: LatLng::new(-90.0, -180.0),
    };

    pub fn new(southwest: LatLng, northeast: LatLng) -> Self {
        Self {
            southwest,
            northeast,
        }
    }

    /// Degenerate box around a single point
    pub fn from_point(point: LatLng) -> Self {
        Self::new(point, point)
    }

    /// Grow the box to include `point`
    pub fn extend(&mut self, point: LatLng) {
        self.southwest.lat = self.southwest.lat.min(point.lat);
        self.southwest.lon = self.southwest.lon.min(point.lon);
        self.northeast.lat = self.northeast.lat.max(point.lat);
        self.northeast.lon = self.northeast.lon.max(point.lon);
    }

    /// Smallest box containing both
    pub fn union(mut self, other: &BoundingBox) -> Self {
        self.extend(other.southwest);
        self.extend(other.northeast);
        self
    }

    /// `southwest <= northeast` on both axes
    pub fn is_ordered(&self) -> bool {
        self.southwest.lat <= self.northeast.lat && self.southwest.lon <= self.northeast.lon
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.southwest.lat + self.northeast.lat) / 2.0,
            (self.southwest.lon + self.northeast.lon) / 2.0,
        )
    }

    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.southwest.lat
            && point.lat <= self.northeast.lat
            && point.lon >= self.southwest.lon
            && point.lon <= self.northeast.lon
    }

    /// Leaflet `LatLngBounds` literal: `[[south, west], [north, east]]`
    pub fn to_leaflet(&self) -> [[f64; 2]; 2] {
        [self.southwest.into(), self.northeast.into()]
    }

    /// Closed rectangle ring in (x = lon, y = lat), counter-clockwise.
    pub fn to_polygon(&self) -> Polygon<f64> {
        let (s, w) = (self.southwest.lat, self.southwest.lon);
        let (n, e) = (self.northeast.lat, self.northeast.lon);
        Polygon::new(
            LineString::new(vec![
                coord! { x: w, y: s },
                coord! { x: e, y: s },
                coord! { x: e, y: n },
                coord! { x: w, y: n },
                coord! { x: w, y: s },
            ]),
            vec![],
        )
    }
}
