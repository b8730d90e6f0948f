//! Input parsing: Overpass JSON and GeoJSON into building features
//!
//! # Submodules
//! - `tags` - OSM tag bag with typed accessors
//! - `elements` - Overpass element decoding
//! - `osm` - Way/relation to polygon conversion and entrance extraction
//! - `geojson` - FeatureCollection import

mod elements;
mod geojson;
mod osm;
pub mod tags;

use crate::geometry::{BuildingFeature, EntrancePoint};
use serde::Serialize;

pub use elements::{parse_overpass_file, parse_overpass_str, parse_overpass_value, Member, OverpassElements, RawElement};
pub use geojson::{import_geojson_file, import_geojson_str, import_geojson_value};
pub use osm::convert;
pub use tags::Tags;

/// Counters describing what a conversion kept and skipped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub ways: usize,
    pub relations: usize,
    pub buildings: usize,
    pub entrances: usize,
    pub malformed_elements: usize,
    pub unresolved_node_refs: usize,
    pub skipped_unclosed: usize,
    pub skipped_no_outer: usize,
    pub skipped_unsupported: usize,
    pub dropped_inner_rings: usize,
}

/// Buildings and entrances from one input document
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    pub buildings: Vec<BuildingFeature>,
    pub entrances: Vec<EntrancePoint>,
    pub stats: ConversionStats,
}

/// Convert an already decoded Overpass response, carrying its malformed count along
pub fn convert_overpass(parsed: &OverpassElements) -> Conversion {
    let mut conversion = convert(&parsed.elements);
    conversion.stats.malformed_elements = parsed.malformed;
    conversion
}
