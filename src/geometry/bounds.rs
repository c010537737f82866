//! Bounding box of a GeoJSON feature collection.

use geojson::{Feature, FeatureCollection, Value};
use tracing::debug;

use super::{parse_feature_collection, GeometryError};
use crate::models::{BoundingBox, LatLng};

/// Running min/max over visited positions.
struct BoundsAccumulator {
    bounds: BoundingBox,
    visited: usize,
}

impl BoundsAccumulator {
    fn new() -> Self {
        Self {
            bounds: BoundingBox::SEED,
            visited: 0,
        }
    }

    fn visit_position(&mut self, position: &[f64]) -> Result<(), GeometryError> {
        let point = LatLng::from_position(position).ok_or_else(|| {
            GeometryError::malformed(format!(
                "position has {} ordinate(s), expected at least 2",
                position.len()
            ))
        })?;
        if !point.lat.is_finite() || !point.lon.is_finite() {
            return Err(GeometryError::malformed(format!(
                "position [{}, {}] is not finite",
                point.lon, point.lat
            )));
        }
        self.bounds.extend(point);
        self.visited += 1;
        Ok(())
    }

    fn visit_positions<'a, I>(&mut self, positions: I) -> Result<(), GeometryError>
    where
        I: IntoIterator<Item = &'a Vec<f64>>,
    {
        for position in positions {
            self.visit_position(position)?;
        }
        Ok(())
    }

    /// Walk every leaf position of a geometry value
    fn visit_value(&mut self, value: &Value) -> Result<(), GeometryError> {
        match value {
            Value::Point(position) => self.visit_position(position),
            Value::MultiPoint(positions) | Value::LineString(positions) => {
                self.visit_positions(positions)
            }
            Value::MultiLineString(lines) | Value::Polygon(lines) => {
                self.visit_positions(lines.iter().flatten())
            }
            Value::MultiPolygon(polygons) => {
                self.visit_positions(polygons.iter().flatten().flatten())
            }
            Value::GeometryCollection(geometries) => {
                for geometry in geometries {
                    self.visit_value(&geometry.value)?;
                }
                Ok(())
            }
        }
    }

    fn visit_feature(&mut self, index: usize, feature: &Feature) -> Result<(), GeometryError> {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| GeometryError::malformed(format!("feature {} has no geometry", index)))?;
        self.visit_value(&geometry.value).map_err(|e| match e {
            GeometryError::MalformedGeometry(msg) => {
                GeometryError::malformed(format!("feature {}: {}", index, msg))
            }
            other => other,
        })
    }

    fn finish(self) -> Result<BoundingBox, GeometryError> {
        if self.visited == 0 {
            return Err(GeometryError::malformed("geometry contains no coordinates"));
        }
        Ok(self.bounds)
    }
}

/// Compute the bounding box of every coordinate in the collection.
///
/// Fails with [`GeometryError::MalformedGeometry`] for an empty collection, a
/// feature without geometry, a position with fewer than two ordinates or a
/// non-finite ordinate, or a collection whose geometries hold no coordinates at all. The inverted seed
/// box is never returned.
pub fn compute_bounds(collection: &FeatureCollection) -> Result<BoundingBox, GeometryError> {
    if collection.features.is_empty() {
        return Err(GeometryError::malformed("feature collection is empty"));
    }

    let mut acc = BoundsAccumulator::new();
    for (index, feature) in collection.features.iter().enumerate() {
        acc.visit_feature(index, feature)?;
    }

    debug!(
        "Computed bounds over {} positions in {} features",
        acc.visited,
        collection.features.len()
    );

    acc.finish()
}

/// Bounding box of a single feature
pub fn feature_bounds(feature: &Feature) -> Result<BoundingBox, GeometryError> {
    let mut acc = BoundsAccumulator::new();
    acc.visit_feature(0, feature)?;
    acc.finish()
}

/// Parse GeoJSON text and compute its bounds
pub fn compute_bounds_str(text: &str) -> Result<BoundingBox, GeometryError> {
    let collection = parse_feature_collection(text)?;
    compute_bounds(&collection)
}
