//! Country outline loaded from GeoJSON.

use std::fs;
use std::path::Path;

use geo::{Contains, Coord, LineString, MultiPolygon, Point, Polygon};
use geojson::{Feature, FeatureCollection, GeoJson, Value};
use tracing::{debug, info};

use super::{compute_bounds, GeometryError};
use crate::models::{BoundingBox, LatLng};

/// Coarse outline of Pakistan shipped with the crate.
const BUNDLED_OUTLINE: &str = include_str!("../../data/pakistan.geojson");

/// Parse GeoJSON text into a feature collection.
///
/// A bare Feature or Geometry document is wrapped into a single-feature
/// collection. Text that is not JSON yields [`GeometryError::Json`]; JSON that
/// is not GeoJSON-shaped yields [`GeometryError::MalformedGeometry`].
pub fn parse_feature_collection(text: &str) -> Result<FeatureCollection, GeometryError> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    let geojson =
        GeoJson::from_json_value(json).map_err(|e| GeometryError::malformed(e.to_string()))?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => return Ok(fc),
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature::from(geometry)],
    };

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Outline overlay: the raw feature collection plus derived geometry.
#[derive(Debug, Clone)]
pub struct Outline {
    collection: FeatureCollection,
    bounds: BoundingBox,
    polygons: MultiPolygon<f64>,
}

impl Outline {
    /// Build from an already parsed collection. Bounds are computed eagerly so
    /// malformed input is rejected here rather than at draw time.
    pub fn new(collection: FeatureCollection) -> Result<Self, GeometryError> {
        let bounds = compute_bounds(&collection)?;

        let mut polygons = Vec::new();
        for feature in &collection.features {
            if let Some(geometry) = &feature.geometry {
                collect_polygons(&geometry.value, &mut polygons);
            }
        }

        debug!(
            "Outline has {} features, {} polygons",
            collection.features.len(),
            polygons.len()
        );

        Ok(Self {
            collection,
            bounds,
            polygons: MultiPolygon::new(polygons),
        })
    }

    pub fn from_geojson_str(text: &str) -> Result<Self, GeometryError> {
        Self::new(parse_feature_collection(text)?)
    }

    /// Load an outline from a GeoJSON file on disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GeometryError> {
        let path = path.as_ref();
        info!("Loading outline from {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_geojson_str(&text)
    }

    /// The outline bundled with the crate
    pub fn bundled() -> Result<Self, GeometryError> {
        Self::from_geojson_str(BUNDLED_OUTLINE)
    }

    pub fn collection(&self) -> &FeatureCollection {
        &self.collection
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Polygonal part of the outline (points and lines are dropped)
    pub fn polygons(&self) -> &MultiPolygon<f64> {
        &self.polygons
    }

    pub fn feature_count(&self) -> usize {
        self.collection.features.len()
    }

    /// Whether a point lies inside one of the outline polygons
    pub fn contains(&self, point: LatLng) -> bool {
        self.polygons.contains(&Point::new(point.lon, point.lat))
    }
}

fn collect_polygons(value: &Value, out: &mut Vec<Polygon<f64>>) {
    match value {
        Value::Polygon(rings) => out.extend(polygon_from_rings(rings)),
        Value::MultiPolygon(polygons) => {
            out.extend(polygons.iter().filter_map(|rings| polygon_from_rings(rings)))
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                collect_polygons(&geometry.value, out);
            }
        }
        _ => {}
    }
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let (exterior, holes) = rings.split_first()?;
    let exterior = ring(exterior);
    // Polygon::new closes the ring, so three distinct corners are enough
    if exterior.0.len() < 3 {
        return None;
    }
    let holes = holes
        .iter()
        .map(|r| ring(r))
        .filter(|r| r.0.len() >= 3)
        .collect();
    Some(Polygon::new(exterior, holes))
}

fn ring(positions: &[Vec<f64>]) -> LineString<f64> {
    positions
        .iter()
        .filter_map(|p| LatLng::from_position(p))
        .map(|p| Coord { x: p.lon, y: p.lat })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "square"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[60.0, 20.0], [80.0, 20.0], [80.0, 40.0], [60.0, 40.0], [60.0, 20.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"name": "river"},
                "geometry": {"type": "LineString", "coordinates": [[70.0, 25.0], [85.0, 30.0]]}
            }
        ]
    }"#;

    #[test]
    fn test_bounds_include_non_polygonal_features() {
        let outline = Outline::from_geojson_str(SQUARE).unwrap();
        assert_eq!(outline.feature_count(), 2);
        assert_eq!(outline.polygons().0.len(), 1);
        assert_eq!(outline.bounds().northeast, LatLng::new(40.0, 85.0));
    }

    #[test]
    fn test_contains() {
        let outline = Outline::from_geojson_str(SQUARE).unwrap();
        assert!(outline.contains(LatLng::new(30.0, 70.0)));
        assert!(!outline.contains(LatLng::new(30.0, 82.0)));
    }

    #[test]
    fn test_bare_geometry_is_wrapped() {
        let text = r#"{"type": "Point", "coordinates": [74.3436, 31.5497]}"#;
        let fc = parse_feature_collection(text).unwrap();
        assert_eq!(fc.features.len(), 1);
        let outline = Outline::new(fc).unwrap();
        assert!(outline.polygons().0.is_empty());
        assert_eq!(
            outline.bounds(),
            BoundingBox::from_point(LatLng::new(31.5497, 74.3436))
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_feature_collection("{not json"),
            Err(GeometryError::Json(_))
        ));
    }

    #[test]
    fn test_not_geojson_is_malformed() {
        assert!(matches!(
            parse_feature_collection(r#"{"type": "Banana"}"#),
            Err(GeometryError::MalformedGeometry(_))
        ));
        assert!(matches!(
            Outline::from_geojson_str(r#"{"type": "FeatureCollection", "features": []}"#),
            Err(GeometryError::MalformedGeometry(_))
        ));
    }

    #[test]
    fn test_bundled_outline() {
        let outline = Outline::bundled().unwrap();
        let bounds = outline.bounds();
        assert!(bounds.is_ordered());
        assert!(bounds.southwest.lat > 23.0 && bounds.northeast.lat < 38.0);
        assert!(bounds.southwest.lon > 60.0 && bounds.northeast.lon < 78.0);
        // Lahore and Karachi sit inside the coarse outline
        assert!(outline.contains(LatLng::new(31.5497, 74.3436)));
        assert!(outline.contains(LatLng::new(24.8607, 67.0011)));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.geojson");
        fs::write(&path, SQUARE).unwrap();
        let outline = Outline::load(&path).unwrap();
        assert_eq!(outline.feature_count(), 2);
        assert!(matches!(
            Outline::load(dir.path().join("missing.geojson")),
            Err(GeometryError::Io(_))
        ));
    }
}
