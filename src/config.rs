//! Map dataset configuration.
//!
//! The view settings and the city/province lists are loaded from a TOML
//! file instead of being compiled in, so any dataset can be rendered.

use std::fs;
use std::path::{Path, PathBuf};

use hashbrown::HashSet;
use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::geometry::{GeometryError, MaskMode, Outline};
use crate::models::{LatLng, NamedPoint, PlaceKind};

/// Highest zoom level accepted for the initial view
pub const MAX_ZOOM: u8 = 22;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MapConfig {
    /// GeoJSON outline; relative paths resolve against the config file.
    /// The bundled outline is used when absent.
    #[serde(default)]
    pub outline: Option<PathBuf>,

    #[serde(default)]
    pub view: ViewConfig,

    #[serde(default)]
    pub cities: Vec<NamedPoint>,

    #[serde(default)]
    pub provinces: Vec<NamedPoint>,

    /// Directory of the file this config was loaded from
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ViewConfig {
    #[serde(default = "default_center")]
    pub center: LatLng,

    #[serde(default = "default_zoom")]
    pub zoom: u8,

    #[serde(default = "default_tile_url")]
    pub tile_url: String,

    #[serde(default = "default_attribution")]
    pub attribution: String,

    #[serde(default)]
    pub mask: MaskMode,

    /// Snap the viewport to the outline bounds once tiles load, overriding
    /// `center` and `zoom`
    #[serde(default)]
    pub fit_bounds: bool,
}

fn default_center() -> LatLng {
    LatLng::new(30.3753, 69.3451)
}

fn default_zoom() -> u8 {
    5
}

fn default_tile_url() -> String {
    OSM_TILE_URL.to_string()
}

fn default_attribution() -> String {
    OSM_ATTRIBUTION.to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: default_center(),
            zoom: default_zoom(),
            tile_url: default_tile_url(),
            attribution: default_attribution(),
            mask: MaskMode::default(),
            fit_bounds: false,
        }
    }
}

impl Default for MapConfig {
    /// Two cities and two provinces centred on Pakistan
    fn default() -> Self {
        Self {
            outline: None,
            view: ViewConfig::default(),
            cities: vec![
                NamedPoint::new("Lahore", 31.5497, 74.3436).with_province("Punjab"),
                NamedPoint::new("Karachi", 24.8607, 67.0011).with_province("Sindh"),
            ],
            provinces: vec![
                NamedPoint::new("Punjab", 30.3753, 69.3451),
                NamedPoint::new("Sindh", 30.1625, 66.9961),
            ],
            base_dir: None,
        }
    }
}

impl MapConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        info!(
            "Loaded {} cities and {} provinces from {}",
            config.cities.len(),
            config.provinces.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: MapConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check view settings and place entries
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.view.zoom > MAX_ZOOM {
            return Err(ConfigError::Invalid(format!(
                "zoom {} exceeds maximum {}",
                self.view.zoom, MAX_ZOOM
            )));
        }
        if !self.view.center.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "view center {} is out of range",
                self.view.center
            )));
        }
        validate_tile_url(&self.view.tile_url)?;

        for (kind, list) in [
            (PlaceKind::City, &self.cities),
            (PlaceKind::Province, &self.provinces),
        ] {
            let mut seen = HashSet::new();
            for place in list {
                if place.name.trim().is_empty() {
                    return Err(ConfigError::Invalid(format!("{} with empty name", kind)));
                }
                if !place.position.is_valid() {
                    return Err(ConfigError::Invalid(format!(
                        "{} '{}' has out-of-range position {}",
                        kind, place.name, place.position
                    )));
                }
                if !seen.insert(place.name.as_str()) {
                    return Err(ConfigError::Invalid(format!(
                        "duplicate {} '{}'",
                        kind, place.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// All places tagged with their kind, cities first
    pub fn places(&self) -> impl Iterator<Item = (PlaceKind, &NamedPoint)> {
        self.cities
            .iter()
            .map(|p| (PlaceKind::City, p))
            .chain(self.provinces.iter().map(|p| (PlaceKind::Province, p)))
    }

    /// Resolved outline path, if one is configured
    pub fn outline_path(&self) -> Option<PathBuf> {
        let path = self.outline.as_ref()?;
        match &self.base_dir {
            Some(base) if path.is_relative() => Some(base.join(path)),
            _ => Some(path.clone()),
        }
    }

    /// Load the configured outline, or the bundled one
    pub fn load_outline(&self) -> Result<Outline, GeometryError> {
        match self.outline_path() {
            Some(path) => Outline::load(path),
            None => Outline::bundled(),
        }
    }
}

/// Tile URL templates must carry `{z}`, `{x}` and `{y}` and be a valid URL
/// once the placeholders are filled in.
fn validate_tile_url(template: &str) -> Result<(), ConfigError> {
    for placeholder in ["{z}", "{x}", "{y}"] {
        if !template.contains(placeholder) {
            return Err(ConfigError::Invalid(format!(
                "tile URL '{}' lacks {}",
                template, placeholder
            )));
        }
    }

    let sample = template
        .replace("{s}", "a")
        .replace("{z}", "0")
        .replace("{x}", "0")
        .replace("{y}", "0")
        .replace("{r}", "");
    let url = Url::parse(&sample)
        .map_err(|e| ConfigError::Invalid(format!("tile URL '{}': {}", template, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(format!(
            "tile URL '{}' must use http or https",
            template
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = r#"
        [view]
        center = [30.0, 70.0]
        zoom = 6
        mask = "bounds"

        [[cities]]
        name = "Quetta"
        position = [30.1798, 66.9750]
        province = "Balochistan"

        [[cities]]
        name = "Peshawar"
        position = [34.0151, 71.5249]
        province = "Khyber Pakhtunkhwa"

        [[provinces]]
        name = "Balochistan"
        position = [28.4907, 65.0958]
    "#;

    #[test]
    fn test_default_dataset() {
        let config = MapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.view.zoom, 5);
        assert_eq!(config.view.center, LatLng::new(30.3753, 69.3451));
        assert_eq!(config.places().count(), 4);
        assert_eq!(config.cities[0].province.as_deref(), Some("Punjab"));
    }

    #[test]
    fn test_parse_dataset() {
        let config = MapConfig::from_toml_str(DATASET).unwrap();
        assert_eq!(config.view.zoom, 6);
        assert_eq!(config.view.mask, MaskMode::Bounds);
        assert!(!config.view.fit_bounds);
        assert_eq!(config.view.tile_url, OSM_TILE_URL);
        assert_eq!(config.cities.len(), 2);
        assert_eq!(config.cities[1].position, LatLng::new(34.0151, 71.5249));
        assert!(config.provinces[0].province.is_none());

        let kinds: Vec<PlaceKind> = config.places().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![PlaceKind::City, PlaceKind::City, PlaceKind::Province]
        );
    }

    #[test]
    fn test_fit_bounds_opt_in() {
        let config = MapConfig::from_toml_str("[view]\nzoom = 8\nfit_bounds = true\n").unwrap();
        assert!(config.view.fit_bounds);
        assert_eq!(config.view.zoom, 8);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = MapConfig::from_toml_str("").unwrap();
        assert_eq!(config.view, ViewConfig::default());
        assert!(config.cities.is_empty());
    }

    #[test]
    fn test_rejects_bad_zoom() {
        let err = MapConfig::from_toml_str("[view]\nzoom = 30\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_tile_urls() {
        for url in [
            "https://tiles.example.com/{z}/{x}.png",
            "not a url/{z}/{x}/{y}",
            "ftp://tiles.example.com/{z}/{x}/{y}.png",
        ] {
            let toml = format!("[view]\ntile_url = \"{}\"\n", url);
            assert!(
                matches!(MapConfig::from_toml_str(&toml), Err(ConfigError::Invalid(_))),
                "accepted {}",
                url
            );
        }
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let toml = r#"
            [[cities]]
            name = "Lahore"
            position = [31.5, 74.3]
            [[cities]]
            name = "Lahore"
            position = [31.6, 74.4]
        "#;
        assert!(matches!(
            MapConfig::from_toml_str(toml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_same_name_across_kinds_is_allowed() {
        let toml = r#"
            [[cities]]
            name = "Punjab"
            position = [31.5, 74.3]
            [[provinces]]
            name = "Punjab"
            position = [30.4, 69.3]
        "#;
        assert!(MapConfig::from_toml_str(toml).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_position() {
        let toml = "[[provinces]]\nname = \"Nowhere\"\nposition = [95.0, 70.0]\n";
        assert!(matches!(
            MapConfig::from_toml_str(toml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(
            MapConfig::from_toml_str("[view\nzoom = 5"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_outline_resolves_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("outline.geojson"),
            r#"{"type": "Point", "coordinates": [69.0, 30.0]}"#,
        )
        .unwrap();
        let config_path = dir.path().join("map.toml");
        fs::write(&config_path, "outline = \"outline.geojson\"\n").unwrap();

        let config = MapConfig::load_from_file(&config_path).unwrap();
        assert_eq!(
            config.outline_path(),
            Some(dir.path().join("outline.geojson"))
        );
        let outline = config.load_outline().unwrap();
        assert_eq!(outline.feature_count(), 1);
    }

    #[test]
    fn test_shipped_dataset() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/map.toml");
        let config = MapConfig::load_from_file(&path).unwrap();
        assert_eq!(config.cities.len(), 8);
        assert_eq!(config.provinces.len(), 5);
        let outline = config.load_outline().unwrap();
        assert!(outline.contains(config.view.center));
    }

    #[test]
    fn test_missing_outline_uses_bundled() {
        let config = MapConfig::default();
        assert!(config.outline_path().is_none());
        assert!(config.load_outline().is_ok());
    }
}
