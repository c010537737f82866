//! Bounding box of a GeoJSON file.
//!
//! Prints the southwest/northeast corners of every coordinate in the file,
//! optionally per feature.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pakmap::geometry::{feature_bounds, parse_feature_collection};
use pakmap::{compute_bounds, BoundingBox, LatLng};

#[derive(Parser, Debug)]
#[command(name = "bounds")]
#[command(about = "Compute the bounding box of a GeoJSON file")]
struct Args {
    /// GeoJSON file (FeatureCollection, Feature or bare Geometry)
    #[arg(short, long)]
    file: PathBuf,

    /// Also print the bounds of each feature
    #[arg(long)]
    per_feature: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human readable corners, full precision
    Text,
    /// JSON object with southwest/northeast
    Json,
    /// Leaflet bounds literal
    Leaflet,
}

#[derive(Debug, Serialize)]
struct Report {
    bounds: BoundingBox,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    features: Vec<FeatureReport>,
}

#[derive(Debug, Serialize)]
struct FeatureReport {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    bounds: BoundingBox,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine readable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read GeoJSON file: {}", args.file.display()))?;
    let report = build_report(&text, args.per_feature)
        .with_context(|| format!("Failed to compute bounds of {}", args.file.display()))?;

    info!(
        "{}: {} feature(s) reported",
        args.file.display(),
        report.features.len()
    );

    println!("{}", render(&report, args.format)?);
    Ok(())
}

fn build_report(text: &str, per_feature: bool) -> Result<Report> {
    let collection = parse_feature_collection(text)?;
    let bounds = compute_bounds(&collection)?;

    let mut features = Vec::new();
    if per_feature {
        for (index, feature) in collection.features.iter().enumerate() {
            let name = feature
                .property("name")
                .and_then(|v| v.as_str())
                .map(String::from);
            features.push(FeatureReport {
                index,
                name,
                bounds: feature_bounds(feature)?,
            });
        }
    }

    Ok(Report { bounds, features })
}

fn render(report: &Report, format: OutputFormat) -> Result<String> {
    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Leaflet => {
            let mut lines = vec![serde_json::to_string(&report.bounds.to_leaflet())?];
            for f in &report.features {
                lines.push(serde_json::to_string(&f.bounds.to_leaflet())?);
            }
            lines.join("\n")
        }
        OutputFormat::Text => {
            let mut lines = vec![
                format!("southwest: {}", corner(report.bounds.southwest)),
                format!("northeast: {}", corner(report.bounds.northeast)),
            ];
            for f in &report.features {
                lines.push(format!(
                    "  feature {} {}: {} - {}",
                    f.index,
                    f.name.as_deref().unwrap_or("-"),
                    corner(f.bounds.southwest),
                    corner(f.bounds.northeast)
                ));
            }
            lines.join("\n")
        }
    };
    Ok(out)
}

/// `(lat, lon)` without rounding; `LatLng`'s `Display` rounds to 4 decimals
fn corner(p: LatLng) -> String {
    format!("({}, {})", p.lat, p.lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pakmap::GeometryError;

    const TWO_FEATURES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "Lahore"},
             "geometry": {"type": "Point", "coordinates": [74.3436, 31.5497]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Point", "coordinates": [67.0011, 24.8607]}}
        ]
    }"#;

    #[test]
    fn test_report() {
        let report = build_report(TWO_FEATURES, true).unwrap();
        assert_eq!(report.bounds.southwest, LatLng::new(24.8607, 67.0011));
        assert_eq!(report.bounds.northeast, LatLng::new(31.5497, 74.3436));
        assert_eq!(report.features.len(), 2);
        assert_eq!(report.features[0].name.as_deref(), Some("Lahore"));
        assert!(report.features[1].name.is_none());
    }

    #[test]
    fn test_text_output() {
        let report = build_report(TWO_FEATURES, false).unwrap();
        let out = render(&report, OutputFormat::Text).unwrap();
        assert_eq!(
            out,
            "southwest: (24.8607, 67.0011)\nnortheast: (31.5497, 74.3436)"
        );
    }

    #[test]
    fn test_text_output_keeps_full_precision() {
        let text = r#"{"type": "LineString", "coordinates": [[67.00112345678, 24.86071234567], [74.3436, 31.5497]]}"#;
        let report = build_report(text, true).unwrap();
        let out = render(&report, OutputFormat::Text).unwrap();
        assert!(out.starts_with("southwest: (24.86071234567, 67.00112345678)\n"));
        assert!(out.contains("  feature 0 -: (24.86071234567, 67.00112345678) - (31.5497, 74.3436)"));
    }

    #[test]
    fn test_leaflet_output() {
        let report = build_report(TWO_FEATURES, false).unwrap();
        let out = render(&report, OutputFormat::Leaflet).unwrap();
        assert_eq!(out, "[[24.8607,67.0011],[31.5497,74.3436]]");
    }

    #[test]
    fn test_empty_collection_fails() {
        let err = build_report(r#"{"type": "FeatureCollection", "features": []}"#, false)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GeometryError>(),
            Some(GeometryError::MalformedGeometry(_))
        ));
    }
}
