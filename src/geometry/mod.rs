//! GeoJSON geometry handling.
//!
//! Bounds computation over feature collections, the outline overlay and the
//! mask layer that hides everything outside the outline.

mod bounds;
mod mask;
mod outline;

pub use bounds::{compute_bounds, compute_bounds_str, feature_bounds};
pub use mask::{bounds_mask, outline_mask, MaskLayer, MaskMode, MaskStyle};
pub use outline::{parse_feature_collection, Outline};

/// Errors raised while reading or measuring GeoJSON geometry.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed geometry: {0}")]
    MalformedGeometry(String),
}

impl GeometryError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        GeometryError::MalformedGeometry(message.into())
    }
}
