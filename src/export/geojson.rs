//! GeoJSON FeatureCollection export of the current rows

use crate::geometry::BuildingGeometry;
use crate::reconcile::OrientationRow;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
struct FeatureCollectionOut<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<FeatureOut<'a>>,
}

#[derive(Serialize)]
struct FeatureOut<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    id: &'a str,
    geometry: &'a BuildingGeometry,
    properties: PropertiesOut<'a>,
}

#[derive(Serialize)]
struct PropertiesOut<'a> {
    id: &'a str,
    name: &'a str,
    lat: f64,
    lon: f64,
    orientation_deg: f64,
    deviation_deg: f64,
}

fn collection(rows: &[OrientationRow]) -> FeatureCollectionOut<'_> {
    FeatureCollectionOut {
        kind: "FeatureCollection",
        features: rows
            .iter()
            .map(|row| FeatureOut {
                kind: "Feature",
                id: &row.id,
                geometry: &row.geometry,
                properties: PropertiesOut {
                    id: &row.id,
                    name: &row.name,
                    lat: row.center_lat,
                    lon: row.center_lon,
                    orientation_deg: row.orientation_deg,
                    deviation_deg: row.deviation_deg,
                },
            })
            .collect(),
    }
}

/// One Feature per row carrying the original footprint
pub fn rows_to_geojson(rows: &[OrientationRow]) -> Result<String> {
    serde_json::to_string(&collection(rows)).context("Failed to serialize GeoJSON")
}

pub fn export_geojson_file<P: AsRef<Path>>(rows: &[OrientationRow], path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &collection(rows))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer.flush().with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Exported {} features to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::OrientationSource;
    use serde_json::Value;

    #[test]
    fn test_feature_shape() {
        let row = OrientationRow {
            id: "way/42".to_string(),
            name: "San Lorenzo".to_string(),
            center_lon: 9.18,
            center_lat: 45.45,
            pca_deg: 95.0,
            entrance_deg: Some(275.0),
            altar_deg: Some(95.0),
            entrance_kind: None,
            orientation_deg: 95.0,
            deviation_deg: 5.0,
            source: OrientationSource::Altar,
            geometry: BuildingGeometry::Polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]),
        };
        let value: Value = serde_json::from_str(&rows_to_geojson(&[row]).unwrap()).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        let feature = &value["features"][0];
        assert_eq!(feature["type"], "Feature");
        assert_eq!(feature["id"], "way/42");
        assert_eq!(feature["geometry"]["type"], "Polygon");
        assert_eq!(feature["geometry"]["coordinates"][0][1][0], 1.0);

        let properties = feature["properties"].as_object().unwrap();
        let mut keys: Vec<&str> = properties.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["deviation_deg", "id", "lat", "lon", "name", "orientation_deg"]);
        assert_eq!(properties["name"], "San Lorenzo");
        assert_eq!(properties["orientation_deg"], 95.0);
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(rows_to_geojson(&[]).unwrap(), r#"{"type":"FeatureCollection","features":[]}"#);
    }
}
