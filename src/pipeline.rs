//! One complete computation pass: input document to reconciled rows

use crate::parsing::{
    convert_overpass, import_geojson_file, import_geojson_str, import_geojson_value, parse_overpass_file,
    parse_overpass_str, parse_overpass_value, Conversion, ConversionStats,
};
use crate::reconcile::{reconcile, OrientationRow, SelectionMode};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// Rows of one pass plus what the converter kept and skipped
#[derive(Debug, Clone, Serialize)]
pub struct PassResult {
    pub rows: Vec<OrientationRow>,
    pub stats: ConversionStats,
}

impl PassResult {
    /// Short status line, e.g. `12 buildings (3 skipped)`
    pub fn summary(&self) -> String {
        let skipped = self.stats.skipped_unclosed
            + self.stats.skipped_no_outer
            + self.stats.skipped_unsupported
            + self.stats.malformed_elements;
        if skipped == 0 {
            format!("{} buildings", self.rows.len())
        } else {
            format!("{} buildings ({} skipped)", self.rows.len(), skipped)
        }
    }
}

pub fn orient_conversion(conversion: Conversion, mode: SelectionMode) -> PassResult {
    let rows = reconcile(&conversion.buildings, &conversion.entrances, mode);
    PassResult { rows, stats: conversion.stats }
}

fn finish(conversion: Conversion, mode: SelectionMode, source: &str, start: Instant) -> PassResult {
    let result = orient_conversion(conversion, mode);
    log::info!("{}: {} in {:.2?}", source, result.summary(), start.elapsed());
    log::debug!("{}: {:?}", source, result.stats);
    result
}

pub fn orient_overpass_str(json: &str, mode: SelectionMode) -> Result<PassResult> {
    let start = Instant::now();
    let parsed = parse_overpass_str(json)?;
    Ok(finish(convert_overpass(&parsed), mode, "Overpass data", start))
}

pub fn orient_overpass_value(value: serde_json::Value, mode: SelectionMode) -> Result<PassResult> {
    let start = Instant::now();
    let parsed = parse_overpass_value(value)?;
    Ok(finish(convert_overpass(&parsed), mode, "Overpass data", start))
}

pub fn orient_overpass_file<P: AsRef<Path>>(path: P, mode: SelectionMode) -> Result<PassResult> {
    let start = Instant::now();
    let path = path.as_ref();
    let parsed = parse_overpass_file(path)?;
    Ok(finish(convert_overpass(&parsed), mode, &path.display().to_string(), start))
}

pub fn orient_geojson_str(json: &str, mode: SelectionMode) -> Result<PassResult> {
    let start = Instant::now();
    Ok(finish(import_geojson_str(json)?, mode, "GeoJSON data", start))
}

pub fn orient_geojson_value(value: serde_json::Value, mode: SelectionMode) -> Result<PassResult> {
    let start = Instant::now();
    Ok(finish(import_geojson_value(value)?, mode, "GeoJSON data", start))
}

pub fn orient_geojson_file<P: AsRef<Path>>(path: P, mode: SelectionMode) -> Result<PassResult> {
    let start = Instant::now();
    let path = path.as_ref();
    Ok(finish(import_geojson_file(path)?, mode, &path.display().to_string(), start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_elements_is_valid() {
        let result = orient_overpass_str(r#"{"elements":[]}"#, SelectionMode::Altar).unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.summary(), "0 buildings");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(orient_overpass_str("{not json", SelectionMode::Altar).is_err());
        assert!(orient_geojson_str(r#"{"type":"Feature"}"#, SelectionMode::Altar).is_err());
    }

    #[test]
    fn test_summary_counts_skips() {
        let result = orient_overpass_str(
            r#"{"elements":[
                {"type":"node","id":1,"lon":0.0,"lat":0.0},
                {"type":"node","id":2,"lon":0.001,"lat":0.0},
                {"type":"node","id":3,"lon":0.001,"lat":0.001},
                {"type":"way","id":10,"nodes":[1,2,3,1],"tags":{"building":"church"}},
                {"type":"way","id":11,"nodes":[1,2,3],"tags":{"building":"church"}},
                {"type":"bogus","id":12}
            ]}"#,
            SelectionMode::Altar,
        )
        .unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].id, "way/10");
        assert_eq!(result.summary(), "1 buildings (2 skipped)");
    }
}
