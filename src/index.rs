//! Spatial index over the named places.
//!
//! Distances are planar in degrees, which is good enough to pick the
//! closest label at country scale.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use serde::Serialize;
use tracing::info;

use crate::config::MapConfig;
use crate::models::{BoundingBox, LatLng, NamedPoint, PlaceKind};

/// Wrapper for R-tree indexing of places. Envelope axes are (x = lon, y = lat).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedPlace {
    pub kind: PlaceKind,
    pub place: NamedPoint,
}

impl IndexedPlace {
    fn xy(&self) -> [f64; 2] {
        [self.place.position.lon, self.place.position.lat]
    }
}

impl RTreeObject for IndexedPlace {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.xy())
    }
}

impl PointDistance for IndexedPlace {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let [x, y] = self.xy();
        let dx = x - point[0];
        let dy = y - point[1];
        dx * dx + dy * dy
    }
}

fn envelope_of(bounds: &BoundingBox) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [bounds.southwest.lon, bounds.southwest.lat],
        [bounds.northeast.lon, bounds.northeast.lat],
    )
}

/// R-tree of cities and provinces
pub struct PlaceIndex {
    tree: RTree<IndexedPlace>,
}

impl PlaceIndex {
    pub fn build<'a, I>(places: I) -> Self
    where
        I: IntoIterator<Item = (PlaceKind, &'a NamedPoint)>,
    {
        let entries: Vec<IndexedPlace> = places
            .into_iter()
            .map(|(kind, place)| IndexedPlace {
                kind,
                place: place.clone(),
            })
            .collect();
        let tree = RTree::bulk_load(entries);
        info!("Place index built with {} entries", tree.size());
        Self { tree }
    }

    pub fn from_config(config: &MapConfig) -> Self {
        Self::build(config.places())
    }

    /// Closest place to `point`, of any kind
    pub fn nearest(&self, point: LatLng) -> Option<&IndexedPlace> {
        self.tree.nearest_neighbor(&[point.lon, point.lat])
    }

    /// Closest place of the given kind
    pub fn nearest_of(&self, point: LatLng, kind: PlaceKind) -> Option<&IndexedPlace> {
        self.tree
            .nearest_neighbor_iter(&[point.lon, point.lat])
            .find(|p| p.kind == kind)
    }

    /// Places inside the box (edges included)
    pub fn within(&self, bounds: &BoundingBox) -> Vec<&IndexedPlace> {
        self.tree.locate_in_envelope(&envelope_of(bounds)).collect()
    }

    /// Places outside the box
    pub fn outside(&self, bounds: &BoundingBox) -> Vec<&IndexedPlace> {
        self.tree
            .iter()
            .filter(|p| !bounds.contains(p.place.position))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedPlace> {
        self.tree.iter()
    }
}
