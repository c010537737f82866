//! Pakmap - an interactive map of Pakistan served over HTTP
//!
//! This library provides the dataset, geometry and scene types shared by the
//! serve and bounds binaries.

pub mod config;
pub mod geometry;
pub mod index;
pub mod models;
pub mod scene;
pub mod surface;

pub use config::MapConfig;
pub use geometry::{compute_bounds, GeometryError, Outline};
pub use models::{BoundingBox, LatLng, NamedPoint, PlaceKind};
pub use scene::MapScene;
