//! GeoJSON FeatureCollection import
//!
//! Polygon/MultiPolygon features become buildings, Point features tagged
//! `entrance=main|yes` become entrances, everything else is skipped.

use super::tags::Tags;
use super::{Conversion, ConversionStats};
use crate::geometry::{is_closed_ring, BuildingFeature, BuildingGeometry, EntrancePoint, LonLat, Ring};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Deserialize)]
struct FeatureCollectionDoc {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct FeatureDoc {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    properties: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    geometry: Option<serde_json::Value>,
}

type Position = Vec<f64>;

#[derive(Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum GeometryDoc {
    Point(Position),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

/// Import a GeoJSON FeatureCollection value.
///
/// Fails only when the document is not a FeatureCollection; bad features are skipped.
pub fn import_geojson_value(value: serde_json::Value) -> Result<Conversion> {
    let collection: FeatureCollectionDoc =
        serde_json::from_value(value).context("GeoJSON document has no type member")?;
    anyhow::ensure!(
        collection.kind == "FeatureCollection",
        "expected a FeatureCollection, found '{}'",
        collection.kind
    );

    let mut stats = ConversionStats::default();
    let mut buildings = Vec::new();
    let mut entrances = Vec::new();

    for raw in collection.features {
        let feature: FeatureDoc = match serde_json::from_value(raw) {
            Ok(f) => f,
            Err(e) => {
                log::debug!("Skipping malformed GeoJSON feature: {}", e);
                stats.skipped_unsupported += 1;
                continue;
            }
        };

        let tags = properties_to_tags(feature.properties.as_ref());
        let geometry = feature
            .geometry
            .and_then(|g| serde_json::from_value::<GeometryDoc>(g).ok());

        match geometry {
            Some(GeometryDoc::Point(position)) => {
                match (to_lon_lat(&position), tags.entrance_kind()) {
                    (Some([lon, lat]), Some(kind)) => entrances.push(EntrancePoint { id: None, lon, lat, kind }),
                    _ => stats.skipped_unsupported += 1,
                }
            }
            Some(GeometryDoc::Polygon(rings)) => match polygon_from_rings(rings, &mut stats) {
                Some(polygon) => buildings.push(building(feature.id, tags, BuildingGeometry::Polygon(polygon))),
                None => stats.skipped_unclosed += 1,
            },
            Some(GeometryDoc::MultiPolygon(polygons)) => {
                let polygons: Vec<Vec<Ring>> = polygons
                    .into_iter()
                    .filter_map(|rings| polygon_from_rings(rings, &mut stats))
                    .collect();
                if polygons.is_empty() {
                    stats.skipped_unclosed += 1;
                } else {
                    buildings.push(building(feature.id, tags, BuildingGeometry::MultiPolygon(polygons)));
                }
            }
            None => stats.skipped_unsupported += 1,
        }
    }

    stats.buildings = buildings.len();
    stats.entrances = entrances.len();
    Ok(Conversion { buildings, entrances, stats })
}

/// Import GeoJSON text
pub fn import_geojson_str(json: &str) -> Result<Conversion> {
    let value: serde_json::Value = serde_json::from_str(json).context("Failed to parse GeoJSON")?;
    import_geojson_value(value)
}

/// Read and import a GeoJSON file
pub fn import_geojson_file<P: AsRef<Path>>(path: P) -> Result<Conversion> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse GeoJSON in {}", path.display()))?;
    import_geojson_value(value)
}

fn building(id: Option<serde_json::Value>, tags: Tags, geometry: BuildingGeometry) -> BuildingFeature {
    let id = match id {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => tags.global_id().map(str::to_string),
    };
    BuildingFeature { id, name: tags.display_name(), tags, geometry }
}

/// Keep the valid rings of one polygon; `None` when the outer ring is unusable
fn polygon_from_rings(rings: Vec<Vec<Position>>, stats: &mut ConversionStats) -> Option<Vec<Ring>> {
    let mut rings = rings.into_iter().map(|ring| ring.iter().filter_map(|p| to_lon_lat(p)).collect::<Ring>());
    let outer = rings.next().filter(|ring| is_closed_ring(ring))?;

    let mut polygon = vec![outer];
    for hole in rings {
        if is_closed_ring(&hole) {
            polygon.push(hole);
        } else {
            stats.dropped_inner_rings += 1;
        }
    }
    Some(polygon)
}

fn to_lon_lat(position: &[f64]) -> Option<LonLat> {
    match position {
        [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Some([*lon, *lat]),
        _ => None,
    }
}

/// String properties are copied; numbers and booleans are stringified; the rest is dropped
fn properties_to_tags(properties: Option<&serde_json::Map<String, serde_json::Value>>) -> Tags {
    let Some(properties) = properties else {
        return Tags::new();
    };
    properties
        .iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::String(s) => Some((key.clone(), s.clone())),
            serde_json::Value::Number(n) => Some((key.clone(), n.to_string())),
            serde_json::Value::Bool(b) => Some((key.clone(), b.to_string())),
            _ => None,
        })
        .collect()
}
