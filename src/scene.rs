//! Scene description consumed by the browser map.
//!
//! A [`MapScene`] carries everything the mapping widget needs: the initial
//! view, the tile source, label markers with popups, the outline overlay and
//! the mask. It is built once from the dataset and served as JSON.

use geojson::FeatureCollection;
use serde::Serialize;

use crate::config::MapConfig;
use crate::geometry::{MaskLayer, Outline};
use crate::models::{BoundingBox, LatLng, NamedPoint, PlaceKind};
use crate::surface::{MapSurface, MaskController, SurfaceLayer};

/// Text-only marker icon (Leaflet `DivIcon` options)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivIcon {
    pub class_name: String,
    pub html: String,
}

impl DivIcon {
    /// Label icon: `<div>NAME</div>` with the name escaped
    pub fn label(kind: PlaceKind, name: &str) -> Self {
        Self {
            class_name: kind.icon_class().to_string(),
            html: format!("<div>{}</div>", escape_html(name)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerDescriptor {
    pub kind: PlaceKind,
    pub name: String,
    pub position: LatLng,
    pub icon: DivIcon,
    /// Popup HTML (escaped)
    pub popup: String,
}

impl MarkerDescriptor {
    pub fn for_place(kind: PlaceKind, place: &NamedPoint) -> Self {
        Self {
            kind,
            name: place.name.clone(),
            position: place.position,
            icon: DivIcon::label(kind, &place.name),
            popup: escape_html(&place.popup_text()),
        }
    }
}

/// Leaflet path options for the outline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayStyle {
    pub fill: bool,
    pub color: String,
    pub weight: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            fill: false,
            color: "red".to_string(),
            weight: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverlayDescriptor {
    pub data: FeatureCollection,
    pub style: OverlayStyle,
}

impl OverlayDescriptor {
    pub fn new(outline: &Outline) -> Self {
        Self {
            data: outline.collection().clone(),
            style: OverlayStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MapScene {
    pub center: LatLng,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    /// Viewport to fit once tiles are loaded, when `view.fit_bounds` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
    pub markers: Vec<MarkerDescriptor>,
    pub layers: Vec<SurfaceLayer>,
}

impl MapScene {
    /// View and markers only, no layers yet
    pub fn new(config: &MapConfig) -> Self {
        Self {
            center: config.view.center,
            zoom: config.view.zoom,
            tile_url: config.view.tile_url.clone(),
            attribution: config.view.attribution.clone(),
            bounds: None,
            markers: config
                .places()
                .map(|(kind, place)| MarkerDescriptor::for_place(kind, place))
                .collect(),
            layers: Vec::new(),
        }
    }

    /// Full scene: markers, outline overlay, then the mask installed by the
    /// mask controller as if the tiles had just loaded.
    pub fn build(config: &MapConfig, outline: &Outline) -> Self {
        let mut scene = Self::new(config);
        scene.add_layer(SurfaceLayer::Outline(OverlayDescriptor::new(outline)));

        let mut controller =
            MaskController::new(outline, config.view.mask).with_fit(config.view.fit_bounds);
        controller.on_tiles_loaded(&mut scene);

        scene
    }

    pub fn markers_of(&self, kind: PlaceKind) -> impl Iterator<Item = &MarkerDescriptor> {
        self.markers.iter().filter(move |m| m.kind == kind)
    }

    pub fn overlay(&self) -> Option<&OverlayDescriptor> {
        self.layers.iter().find_map(|l| match l {
            SurfaceLayer::Outline(o) => Some(o),
            _ => None,
        })
    }

    pub fn mask(&self) -> Option<&MaskLayer> {
        self.layers.iter().find_map(|l| match l {
            SurfaceLayer::Mask(m) => Some(m),
            _ => None,
        })
    }
}

impl MapSurface for MapScene {
    fn fit_bounds(&mut self, bounds: BoundingBox) {
        self.bounds = Some(bounds);
    }

    fn add_layer(&mut self, layer: SurfaceLayer) {
        self.layers.push(layer);
    }
}

/// Minimal HTML escaping for text placed into marker labels and popups
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
