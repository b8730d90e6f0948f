//! Core geometry types for church buildings
//!
//! Coordinates are `[lon, lat]` in degrees, the GeoJSON axis order.

use crate::parsing::Tags;
use serde::{Deserialize, Serialize};

/// A `[lon, lat]` position in degrees
pub type LonLat = [f64; 2];

/// A linear ring; closed rings repeat the first position at the end
pub type Ring = Vec<LonLat>;

/// A ring is usable when it has at least 4 positions and the first equals the last exactly
pub fn is_closed_ring(ring: &[LonLat]) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => ring.len() >= 4 && first == last,
        _ => false,
    }
}

/// Building footprint. Serializes as a GeoJSON geometry object.
///
/// Each polygon is a list of rings: the first ring is the outer boundary,
/// any following rings are holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum BuildingGeometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl BuildingGeometry {
    /// Component polygons, one slice of rings each
    pub fn polygons(&self) -> &[Vec<Ring>] {
        match self {
            BuildingGeometry::Polygon(rings) => std::slice::from_ref(rings),
            BuildingGeometry::MultiPolygon(polygons) => polygons,
        }
    }

    /// Outer boundary of every component polygon
    pub fn outer_rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons().iter().filter_map(|rings| rings.first())
    }

    /// All positions of all rings, closing positions included
    pub fn all_positions(&self) -> Vec<LonLat> {
        self.polygons()
            .iter()
            .flat_map(|rings| rings.iter())
            .flat_map(|ring| ring.iter().copied())
            .collect()
    }

    /// All distinct ring vertices: closing positions of closed rings are left out
    /// so the first corner of each ring is not counted twice
    pub fn ring_vertices(&self) -> Vec<LonLat> {
        let mut out = Vec::new();
        for ring in self.polygons().iter().flat_map(|rings| rings.iter()) {
            let take = if is_closed_ring(ring) { ring.len() - 1 } else { ring.len() };
            out.extend_from_slice(&ring[..take]);
        }
        out
    }

    /// Bounding box `[min_lon, min_lat, max_lon, max_lat]` of the outer rings
    pub fn bounds(&self) -> Option<[f64; 4]> {
        let mut positions = self.outer_rings().flat_map(|ring| ring.iter());
        let first = positions.next()?;
        let mut bounds = [first[0], first[1], first[0], first[1]];
        for p in positions {
            bounds[0] = bounds[0].min(p[0]);
            bounds[1] = bounds[1].min(p[1]);
            bounds[2] = bounds[2].max(p[0]);
            bounds[3] = bounds[3].max(p[1]);
        }
        Some(bounds)
    }

    pub fn is_empty(&self) -> bool {
        self.outer_rings().next().is_none()
    }
}

/// A church or cathedral footprint ready for orientation estimation
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingFeature {
    /// Global id such as `way/123`; `None` when the source carries none
    pub id: Option<String>,
    pub name: String,
    pub tags: Tags,
    pub geometry: BuildingGeometry,
}

/// Strength of an entrance tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntranceKind {
    /// `entrance=main`
    Main,
    /// `entrance=yes`
    Yes,
}

impl EntranceKind {
    /// Higher rank wins when several entrances sit on one building
    pub fn rank(self) -> u8 {
        match self {
            EntranceKind::Main => 1,
            EntranceKind::Yes => 0,
        }
    }

    pub fn from_tag(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("main") {
            Some(EntranceKind::Main)
        } else if value.eq_ignore_ascii_case("yes") {
            Some(EntranceKind::Yes)
        } else {
            None
        }
    }
}

/// An entrance node
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntrancePoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub lon: f64,
    pub lat: f64,
    pub kind: EntranceKind,
}

impl EntrancePoint {
    pub fn position(&self) -> LonLat {
        [self.lon, self.lat]
    }
}
