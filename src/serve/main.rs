//! Map server.
//!
//! Serves a Leaflet page plus the JSON scene it renders: label markers,
//! the country outline and the mask hiding everything outside it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pakmap::index::PlaceIndex;
use pakmap::{MapConfig, MapScene, Outline};

mod handlers;
mod page;

use handlers::{
    bounds_handler, health_handler, index_handler, markers_handler, mask_handler,
    nearest_handler, outline_handler, scene_handler,
};

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Interactive map server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Dataset config (TOML); built-in dataset when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GeoJSON outline, overrides the one named in the config
    #[arg(long)]
    outline: Option<PathBuf>,
}

/// Application state shared across handlers
pub struct AppState {
    pub scene: MapScene,
    pub outline: Outline,
    pub index: PlaceIndex,
}

impl AppState {
    /// Build everything the handlers read, once
    pub fn build(config: &MapConfig, outline: Outline) -> Self {
        let index = PlaceIndex::from_config(config);

        for entry in index.iter() {
            if !outline.contains(entry.place.position) {
                warn!(
                    "{} '{}' at {} lies outside the outline",
                    entry.kind, entry.place.name, entry.place.position
                );
            }
        }

        let scene = MapScene::build(config, &outline);
        Self {
            scene,
            outline,
            index,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Pakmap Server");

    let config = match &args.config {
        Some(path) => MapConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            info!("No config given, using built-in dataset");
            MapConfig::default()
        }
    };

    let outline = match &args.outline {
        Some(path) => Outline::load(path),
        None => config.load_outline(),
    }
    .context("Failed to load outline")?;

    let bounds = outline.bounds();
    info!(
        "Outline: {} features, bounds {} - {}",
        outline.feature_count(),
        bounds.southwest,
        bounds.northeast
    );

    let state = Arc::new(AppState::build(&config, outline));
    info!(
        "Scene ready with {} markers and {} layers",
        state.scene.markers.len(),
        state.scene.layers.len()
    );

    // Build router
    let app = router(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/v1/scene", get(scene_handler))
        .route("/v1/bounds", get(bounds_handler))
        .route("/v1/markers", get(markers_handler))
        .route("/v1/mask", get(mask_handler))
        .route("/v1/outline", get(outline_handler))
        .route("/v1/nearest", get(nearest_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
