//! HTTP handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, Json},
};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use tracing::debug;

use pakmap::geometry::MaskLayer;
use pakmap::scene::MarkerDescriptor;
use pakmap::{BoundingBox, LatLng, MapScene, PlaceKind};

use crate::page::INDEX_HTML;
use crate::AppState;

type HandlerResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Leaflet page
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    markers: usize,
    layers: usize,
    outline_features: usize,
}

/// Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        markers: state.scene.markers.len(),
        layers: state.scene.layers.len(),
        outline_features: state.outline.feature_count(),
    })
}

/// Everything the page needs to draw the map
pub async fn scene_handler(State(state): State<Arc<AppState>>) -> Json<MapScene> {
    Json(state.scene.clone())
}

#[derive(Debug, Serialize)]
pub struct BoundsResponse {
    #[serde(flatten)]
    bounds: BoundingBox,
    center: LatLng,
    /// `[[south, west], [north, east]]`
    leaflet: [[f64; 2]; 2],
}

/// Bounds of the outline
pub async fn bounds_handler(State(state): State<Arc<AppState>>) -> Json<BoundsResponse> {
    let bounds = state.outline.bounds();
    Json(BoundsResponse {
        bounds,
        center: bounds.center(),
        leaflet: bounds.to_leaflet(),
    })
}

#[derive(Debug, Deserialize)]
pub struct MarkersQueryParams {
    /// "city" or "province"; all markers when absent
    kind: Option<String>,
}

/// Marker descriptors, optionally filtered by kind
pub async fn markers_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MarkersQueryParams>,
) -> HandlerResult<Vec<MarkerDescriptor>> {
    let markers = match params.kind.as_deref() {
        Some(kind) => {
            let kind = parse_kind(kind)?;
            state.scene.markers_of(kind).cloned().collect()
        }
        None => state.scene.markers.clone(),
    };
    Ok(Json(markers))
}

/// Mask polygon, 404 when masking is disabled
pub async fn mask_handler(State(state): State<Arc<AppState>>) -> HandlerResult<MaskLayer> {
    state
        .scene
        .mask()
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "masking is disabled".to_string()))
}

/// Raw outline GeoJSON
pub async fn outline_handler(State(state): State<Arc<AppState>>) -> Json<FeatureCollection> {
    Json(state.outline.collection().clone())
}

#[derive(Debug, Deserialize)]
pub struct NearestQueryParams {
    lat: f64,
    lon: f64,
    /// Restrict to "city" or "province"
    kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NearestResponse {
    kind: PlaceKind,
    name: String,
    position: LatLng,
    #[serde(skip_serializing_if = "Option::is_none")]
    province: Option<String>,
    /// Whether the query point lies inside the outline
    inside_outline: bool,
}

/// Closest city or province to a point
pub async fn nearest_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearestQueryParams>,
) -> HandlerResult<NearestResponse> {
    let point = LatLng::new(params.lat, params.lon);
    if !point.is_valid() {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("point {} is out of range", point),
        ));
    }

    let hit = match params.kind.as_deref() {
        Some(kind) => state.index.nearest_of(point, parse_kind(kind)?),
        None => state.index.nearest(point),
    }
    .ok_or((StatusCode::NOT_FOUND, "no places loaded".to_string()))?;

    debug!("Nearest to {}: {} '{}'", point, hit.kind, hit.place.name);

    Ok(Json(NearestResponse {
        kind: hit.kind,
        name: hit.place.name.clone(),
        position: hit.place.position,
        province: hit.place.province.clone(),
        inside_outline: state.outline.contains(point),
    }))
}

fn parse_kind(kind: &str) -> Result<PlaceKind, (StatusCode, String)> {
    kind.parse().map_err(|e| (StatusCode::BAD_REQUEST, e))
}
