//! Mask layer hiding everything outside the outline.
//!
//! The mask is an ordinary GeoJSON polygon: the whole world as the exterior
//! ring with the region of interest punched out as holes. Any mapping library
//! that can draw a filled polygon can render it.

use geo::orient::{Direction, Orient};
use geo::{LineString, MultiPolygon, Polygon};
use geojson::{Feature, Geometry, Value};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Outline;
use crate::models::{BoundingBox, LatLng};

/// What the mask cuts out of the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskMode {
    /// Holes follow the outline polygons
    #[default]
    Outline,
    /// A single rectangular hole at the outline bounds
    Bounds,
    /// No mask
    None,
}

/// Leaflet path options for the mask polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskStyle {
    pub fill_color: String,
    pub fill_opacity: f64,
    pub stroke: bool,
    pub interactive: bool,
}

impl Default for MaskStyle {
    fn default() -> Self {
        Self {
            fill_color: "white".to_string(),
            fill_opacity: 1.0,
            stroke: false,
            interactive: false,
        }
    }
}

fn world_ring() -> LineString<f64> {
    BoundingBox::new(LatLng::new(-90.0, -180.0), LatLng::new(90.0, 180.0))
        .to_polygon()
        .exterior()
        .clone()
}

/// World polygon with one hole per outline polygon exterior.
///
/// Interior rings of the outline (enclaves) are not masked.
pub fn outline_mask(outline: &MultiPolygon<f64>) -> Polygon<f64> {
    let holes = outline.0.iter().map(|p| p.exterior().clone()).collect();
    Polygon::new(world_ring(), holes).orient(Direction::Default)
}

/// World polygon with the bounding box as its only hole
pub fn bounds_mask(bounds: &BoundingBox) -> Polygon<f64> {
    let hole = bounds.to_polygon().exterior().clone();
    Polygon::new(world_ring(), vec![hole]).orient(Direction::Default)
}

/// Mask polygon ready to hand to the map surface
#[derive(Debug, Clone, Serialize)]
pub struct MaskLayer {
    /// Mode actually used (may differ from the requested one, see [`MaskLayer::build`])
    pub mode: MaskMode,
    pub data: Feature,
    pub style: MaskStyle,
    #[serde(skip)]
    polygon: Polygon<f64>,
}

impl MaskLayer {
    /// Build the mask for an outline.
    ///
    /// Returns `None` for [`MaskMode::None`]. An outline without any polygon
    /// (only points or lines) falls back to the bounds mask.
    pub fn build(outline: &Outline, mode: MaskMode) -> Option<Self> {
        let (mode, polygon) = match mode {
            MaskMode::None => return None,
            MaskMode::Outline if outline.polygons().0.is_empty() => {
                warn!("Outline has no polygons, masking its bounds instead");
                (MaskMode::Bounds, bounds_mask(&outline.bounds()))
            }
            MaskMode::Outline => (MaskMode::Outline, outline_mask(outline.polygons())),
            MaskMode::Bounds => (MaskMode::Bounds, bounds_mask(&outline.bounds())),
        };

        Some(Self {
            mode,
            data: polygon_feature(&polygon),
            style: MaskStyle::default(),
            polygon,
        })
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    pub fn hole_count(&self) -> usize {
        self.polygon.interiors().len()
    }
}

fn polygon_feature(polygon: &Polygon<f64>) -> Feature {
    let rings = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.coords().map(|c| vec![c.x, c.y]).collect())
        .collect();
    Feature::from(Geometry::new(Value::Polygon(rings)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, Contains, Point};

    const TWO_ISLANDS: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[60.0, 20.0], [65.0, 20.0], [65.0, 25.0], [60.0, 20.0]]],
                    [[[70.0, 30.0], [75.0, 30.0], [75.0, 35.0], [70.0, 35.0], [70.0, 30.0]]]
                ]
            }
        }]
    }"#;

    #[test]
    fn test_one_hole_per_polygon() {
        let outline = Outline::from_geojson_str(TWO_ISLANDS).unwrap();
        let mask = MaskLayer::build(&outline, MaskMode::Outline).unwrap();
        assert_eq!(mask.mode, MaskMode::Outline);
        assert_eq!(mask.hole_count(), 2);

        // Inside an island is uncovered, the open sea is covered
        assert!(!mask.polygon().contains(&Point::new(72.0, 32.0)));
        assert!(mask.polygon().contains(&Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_bounds_mode_uses_rectangle() {
        let outline = Outline::from_geojson_str(TWO_ISLANDS).unwrap();
        let mask = MaskLayer::build(&outline, MaskMode::Bounds).unwrap();
        assert_eq!(mask.hole_count(), 1);
        // Between the islands, inside the bounding rectangle
        assert!(!mask.polygon().contains(&Point::new(67.0, 27.0)));
    }

    #[test]
    fn test_none_mode() {
        let outline = Outline::from_geojson_str(TWO_ISLANDS).unwrap();
        assert!(MaskLayer::build(&outline, MaskMode::None).is_none());
    }

    #[test]
    fn test_point_outline_falls_back_to_bounds() {
        let outline =
            Outline::from_geojson_str(r#"{"type": "MultiPoint", "coordinates": [[66.0, 24.0], [75.0, 36.0]]}"#)
                .unwrap();
        let mask = MaskLayer::build(&outline, MaskMode::Outline).unwrap();
        assert_eq!(mask.mode, MaskMode::Bounds);
        assert_eq!(mask.hole_count(), 1);
    }

    #[test]
    fn test_rfc7946_winding() {
        let outline = Outline::bundled().unwrap();
        let mask = MaskLayer::build(&outline, MaskMode::Outline).unwrap();
        // Exterior counter-clockwise, holes clockwise
        assert!(Polygon::new(mask.polygon().exterior().clone(), vec![]).signed_area() > 0.0);
        for hole in mask.polygon().interiors() {
            assert!(Polygon::new(hole.clone(), vec![]).signed_area() < 0.0);
        }
    }

    #[test]
    fn test_feature_serializes_as_polygon() {
        let outline = Outline::bundled().unwrap();
        let mask = MaskLayer::build(&outline, MaskMode::Outline).unwrap();
        let json = serde_json::to_value(&mask).unwrap();
        assert_eq!(json["mode"], "outline");
        assert_eq!(json["data"]["geometry"]["type"], "Polygon");
        assert_eq!(json["style"]["fillColor"], "white");
        assert_eq!(json["data"]["geometry"]["coordinates"].as_array().unwrap().len(), 2);
    }
}
