//! Request text for Overpass and response parsing for Nominatim geocoding.
//!
//! Transport is left to the caller; these helpers only build and read payloads.

use anyhow::{bail, ensure, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Bounding box in Overpass order. (De)serializes as `[south, west, north, east]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl From<[f64; 4]> for BoundingBox {
    fn from([south, west, north, east]: [f64; 4]) -> Self {
        Self { south, west, north, east }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.south, bbox.west, bbox.north, bbox.east]
    }
}

impl BoundingBox {
    pub fn validate(&self) -> Result<()> {
        let values: [f64; 4] = (*self).into();
        ensure!(values.iter().all(|v| v.is_finite()), "bounding box has non-finite values");
        ensure!(
            (-90.0..=90.0).contains(&self.south) && (-90.0..=90.0).contains(&self.north),
            "latitude out of range in bounding box"
        );
        ensure!(
            (-180.0..=180.0).contains(&self.west) && (-180.0..=180.0).contains(&self.east),
            "longitude out of range in bounding box"
        );
        ensure!(self.south <= self.north, "south {} is north of north {}", self.south, self.north);
        Ok(())
    }
}

/// Overpass QL for church and cathedral ways and relations inside `bbox`.
/// Recursed member nodes are printed with `out body` so `entrance` tags survive.
pub fn overpass_query(bbox: &BoundingBox) -> Result<String> {
    bbox.validate()?;
    let area = format!("{},{},{},{}", bbox.south, bbox.west, bbox.north, bbox.east);
    let church = r#"["building"~"^(church|cathedral)$"]"#;
    Ok(format!(
        "[out:json][timeout:60];\n(\n  way{church}({area});\n  relation{church}({area});\n);\n\
         out body;\n>;\nout body qt;\n"
    ))
}

/// Query parameters for a single-hit Nominatim search
pub fn geocode_params(place: &str) -> Vec<(&'static str, String)> {
    vec![
        ("q", place.to_string()),
        ("format", "json".to_string()),
        ("addressdetails", "0".to_string()),
        ("limit", "1".to_string()),
        ("polygon_geojson", "0".to_string()),
    ]
}

/// Endpoint and parameters of a Nominatim search; the caller sends it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeRequest {
    pub endpoint: &'static str,
    pub params: IndexMap<&'static str, String>,
}

pub fn geocode_request(place: &str) -> Result<GeocodeRequest> {
    let place = place.trim();
    ensure!(!place.is_empty(), "place name is empty");
    Ok(GeocodeRequest { endpoint: NOMINATIM_URL, params: geocode_params(place).into_iter().collect() })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub lat: f64,
    pub lon: f64,
    pub bounding_box: BoundingBox,
}

/// Nominatim sends numbers as strings; accept both
fn number_field(item: &Value, key: &str) -> Result<f64> {
    match item.get(key) {
        Some(Value::String(s)) => {
            s.trim().parse::<f64>().with_context(|| format!("invalid number in '{}': {}", key, s))
        }
        Some(Value::Number(n)) => n.as_f64().with_context(|| format!("invalid number in '{}'", key)),
        _ => bail!("missing '{}' in geocoding result", key),
    }
}

fn number_value(value: &Value) -> Result<f64> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().with_context(|| format!("invalid bounding box value: {}", s)),
        Value::Number(n) => n.as_f64().context("invalid bounding box value"),
        other => bail!("invalid bounding box value: {}", other),
    }
}

/// First hit of a Nominatim search response.
/// Nominatim's `boundingbox` is `[south, north, west, east]`; it is reordered here.
pub fn parse_geocode_response(response: &Value) -> Result<GeocodeResult> {
    let hits = response.as_array().context("geocoding response is not an array")?;
    let Some(item) = hits.first() else {
        bail!("place not found");
    };

    let lat = number_field(item, "lat")?;
    let lon = number_field(item, "lon")?;

    let raw_box = item
        .get("boundingbox")
        .and_then(Value::as_array)
        .context("missing 'boundingbox' in geocoding result")?;
    ensure!(raw_box.len() == 4, "boundingbox must have 4 values, got {}", raw_box.len());
    let [south, north, west, east] = [
        number_value(&raw_box[0])?,
        number_value(&raw_box[1])?,
        number_value(&raw_box[2])?,
        number_value(&raw_box[3])?,
    ];

    Ok(GeocodeResult { lat, lon, bounding_box: BoundingBox { south, west, north, east } })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overpass_query_text() {
        let bbox = BoundingBox { south: 45.4, west: 9.1, north: 45.5, east: 9.2 };
        let query = overpass_query(&bbox).unwrap();
        assert!(query.starts_with("[out:json][timeout:60];"));
        assert!(query.contains("way[\"building\"~\"^(church|cathedral)$\"](45.4,9.1,45.5,9.2);"));
        assert!(query.contains("relation[\"building\"~\"^(church|cathedral)$\"](45.4,9.1,45.5,9.2);"));
        assert!(query.ends_with("out body;\n>;\nout body qt;\n"));
        assert!(!query.contains("skel"));
    }

    #[test]
    fn test_recursed_entrance_nodes_keep_tags() {
        // a response to the query above: church way first, then its member nodes with tags
        let response = r#"{"elements":[
            {"type":"way","id":10,"nodes":[1,2,3,4,1],"tags":{"building":"church","name":"San Babila"}},
            {"type":"node","id":1,"lat":45.466,"lon":9.198},
            {"type":"node","id":2,"lat":45.466,"lon":9.199},
            {"type":"node","id":3,"lat":45.4665,"lon":9.199},
            {"type":"node","id":4,"lat":45.4665,"lon":9.198,"tags":{"entrance":"main"}}
        ]}"#;
        let result = crate::pipeline::orient_overpass_str(response, crate::SelectionMode::Altar).unwrap();
        assert_eq!(result.stats.entrances, 1);
        assert_eq!(result.rows[0].source, crate::OrientationSource::Altar);
        assert!(result.rows[0].altar_deg.is_some());
    }

    #[test]
    fn test_overpass_query_rejects_bad_bbox() {
        assert!(overpass_query(&BoundingBox { south: 46.0, west: 9.1, north: 45.0, east: 9.2 }).is_err());
        assert!(overpass_query(&BoundingBox { south: f64::NAN, west: 9.1, north: 45.0, east: 9.2 }).is_err());
        assert!(overpass_query(&BoundingBox { south: 0.0, west: 200.0, north: 1.0, east: 9.2 }).is_err());
    }

    #[test]
    fn test_bbox_serializes_as_array() {
        let bbox: BoundingBox = serde_json::from_value(json!([1.0, 2.0, 3.0, 4.0])).unwrap();
        assert_eq!(bbox.west, 2.0);
        assert_eq!(serde_json::to_value(bbox).unwrap(), json!([1.0, 2.0, 3.0, 4.0]));
    }

    #[test]
    fn test_parse_geocode_reorders_bbox() {
        let response = json!([{
            "lat": "45.4641943",
            "lon": "9.1896346",
            "boundingbox": ["45.3867381", "45.5358482", "9.0408867", "9.2781103"],
            "display_name": "Milano, Lombardia, Italia"
        }]);
        let result = parse_geocode_response(&response).unwrap();
        assert_eq!(result.lat, 45.4641943);
        assert_eq!(result.lon, 9.1896346);
        assert_eq!(
            result.bounding_box,
            BoundingBox { south: 45.3867381, west: 9.0408867, north: 45.5358482, east: 9.2781103 }
        );
    }

    #[test]
    fn test_parse_geocode_errors() {
        assert_eq!(parse_geocode_response(&json!([])).unwrap_err().to_string(), "place not found");
        assert!(parse_geocode_response(&json!({"lat": "1"})).is_err());
        assert!(parse_geocode_response(&json!([{"lat": "x", "lon": "1", "boundingbox": []}])).is_err());
    }

    #[test]
    fn test_geocode_params() {
        let params = geocode_params("Milano");
        assert_eq!(params[0], ("q", "Milano".to_string()));
        assert!(params.contains(&("limit", "1".to_string())));
    }

    #[test]
    fn test_geocode_request() {
        let request = geocode_request("  Milano ").unwrap();
        assert_eq!(request.endpoint, NOMINATIM_URL);
        assert_eq!(request.params["q"], "Milano");
        assert_eq!(
            serde_json::to_value(&request).unwrap()["params"],
            json!({"q": "Milano", "format": "json", "addressdetails": "0", "limit": "1", "polygon_geojson": "0"})
        );
        assert!(geocode_request("   ").is_err());
    }
}
