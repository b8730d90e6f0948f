//! Overpass JSON element parsing
//!
//! Elements are decoded one by one so a single malformed entry does not
//! sink the whole response.

use super::tags::Tags;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One raw OSM element as returned by Overpass `out body` / `out skel`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawElement {
    Node {
        id: i64,
        lon: f64,
        lat: f64,
        #[serde(default)]
        tags: Tags,
    },
    Way {
        id: i64,
        #[serde(default)]
        nodes: Vec<i64>,
        #[serde(default)]
        tags: Tags,
    },
    Relation {
        id: i64,
        #[serde(default)]
        members: Vec<Member>,
        #[serde(default)]
        tags: Tags,
    },
}

impl RawElement {
    pub fn id(&self) -> i64 {
        match self {
            RawElement::Node { id, .. } | RawElement::Way { id, .. } | RawElement::Relation { id, .. } => *id,
        }
    }

    pub fn tags(&self) -> &Tags {
        match self {
            RawElement::Node { tags, .. } | RawElement::Way { tags, .. } | RawElement::Relation { tags, .. } => tags,
        }
    }
}

/// Relation member reference
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Member {
    #[serde(rename = "type")]
    pub member_type: String,
    #[serde(rename = "ref")]
    pub reference: i64,
    #[serde(default)]
    pub role: String,
}

impl Member {
    pub fn is_outer_way(&self) -> bool {
        self.member_type == "way" && self.role == "outer"
    }
}

#[derive(Deserialize)]
struct OverpassDocument {
    #[serde(default)]
    elements: Vec<serde_json::Value>,
}

/// Decoded Overpass response
#[derive(Debug, Clone, Default)]
pub struct OverpassElements {
    pub elements: Vec<RawElement>,
    /// Entries that were not a node/way/relation or lacked required fields
    pub malformed: usize,
}

/// Decode an Overpass JSON value (`{"elements": [...]}`)
pub fn parse_overpass_value(value: serde_json::Value) -> Result<OverpassElements> {
    let document: OverpassDocument =
        serde_json::from_value(value).context("Overpass response is not an object with an elements array")?;

    let mut parsed = OverpassElements::default();
    for entry in document.elements {
        match serde_json::from_value::<RawElement>(entry) {
            Ok(element) => parsed.elements.push(element),
            Err(e) => {
                log::debug!("Skipping malformed OSM element: {}", e);
                parsed.malformed += 1;
            }
        }
    }
    Ok(parsed)
}

/// Decode Overpass JSON text
pub fn parse_overpass_str(json: &str) -> Result<OverpassElements> {
    let value: serde_json::Value = serde_json::from_str(json).context("Failed to parse Overpass JSON")?;
    parse_overpass_value(value)
}

/// Read and decode an Overpass JSON file
pub fn parse_overpass_file<P: AsRef<Path>>(path: P) -> Result<OverpassElements> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse Overpass JSON in {}", path.display()))?;
    parse_overpass_value(value)
}
