//! Core data models for the map.

pub mod bounds;
pub mod place;

pub use bounds::BoundingBox;
pub use place::{LatLng, NamedPoint, PlaceKind};
