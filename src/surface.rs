//! Seam between the map data and whatever draws it.
//!
//! The drawing side is handed in as a [`MapSurface`] instead of being held
//! globally, so the mask step runs the same way against a browser-facing
//! scene or a test double.

use serde::Serialize;
use tracing::debug;

use crate::geometry::{MaskLayer, MaskMode, Outline};
use crate::models::BoundingBox;
use crate::scene::OverlayDescriptor;

/// Layer drawn on top of the tiles
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SurfaceLayer {
    /// Outline drawn as a stroked GeoJSON overlay
    Outline(OverlayDescriptor),
    /// Polygon hiding everything outside the outline
    Mask(MaskLayer),
}

/// Something that renders map layers
pub trait MapSurface {
    /// Move the viewport so `bounds` is visible
    fn fit_bounds(&mut self, bounds: BoundingBox);

    fn add_layer(&mut self, layer: SurfaceLayer);
}

/// Installs the mask once the surface reports its tiles as loaded.
///
/// Tile layers report "loaded" again after every pan and zoom; only the first
/// notification has an effect. The viewport is left alone unless fitting is
/// switched on with [`MaskController::with_fit`].
pub struct MaskController<'a> {
    outline: &'a Outline,
    mode: MaskMode,
    fit: bool,
    installed: bool,
}

impl<'a> MaskController<'a> {
    pub fn new(outline: &'a Outline, mode: MaskMode) -> Self {
        Self {
            outline,
            mode,
            fit: false,
            installed: false,
        }
    }

    /// Also fit the surface to the outline bounds on the first notification
    pub fn with_fit(mut self, fit: bool) -> Self {
        self.fit = fit;
        self
    }

    /// Handle a "tiles loaded" notification. Returns whether anything was drawn.
    pub fn on_tiles_loaded<S: MapSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if self.installed {
            return false;
        }

        let bounds = self.outline.bounds();
        debug!(
            "Tiles loaded, masking outside {} - {}",
            bounds.southwest, bounds.northeast
        );
        if self.fit {
            surface.fit_bounds(bounds);
        }

        if let Some(mask) = MaskLayer::build(self.outline, self.mode) {
            surface.add_layer(SurfaceLayer::Mask(mask));
        }

        self.installed = true;
        true
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }
}
