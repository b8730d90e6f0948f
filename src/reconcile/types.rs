//! Orientation row and selection types

use crate::estimate::{arrow_endpoint, east_west_deviation};
use crate::geometry::{BuildingGeometry, EntranceKind, LonLat};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which signal becomes the canonical orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Altar bearing (opposite the entrance), the default
    #[default]
    Altar,
    Entrance,
    Pca,
}

impl FromStr for SelectionMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "altar" => Ok(SelectionMode::Altar),
            "entrance" => Ok(SelectionMode::Entrance),
            "pca" => Ok(SelectionMode::Pca),
            other => anyhow::bail!("unknown selection mode '{}' (expected altar, entrance or pca)", other),
        }
    }
}

/// Signal actually used for `orientation_deg`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrientationSource {
    Altar,
    Entrance,
    Pca,
}

/// Pick the orientation for a mode; unavailable signals fall back to PCA
pub fn choose_orientation(
    mode: SelectionMode,
    pca_deg: f64,
    entrance_deg: Option<f64>,
    altar_deg: Option<f64>,
) -> (f64, OrientationSource) {
    match (mode, entrance_deg, altar_deg) {
        (SelectionMode::Altar, _, Some(altar)) => (altar, OrientationSource::Altar),
        (SelectionMode::Entrance, Some(entrance), _) => (entrance, OrientationSource::Entrance),
        _ => (pca_deg, OrientationSource::Pca),
    }
}

/// One building's orientation signals and the reconciled result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrientationRow {
    pub id: String,
    pub name: String,
    pub center_lon: f64,
    pub center_lat: f64,
    pub pca_deg: f64,
    pub entrance_deg: Option<f64>,
    pub altar_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrance_kind: Option<EntranceKind>,
    pub orientation_deg: f64,
    pub deviation_deg: f64,
    pub source: OrientationSource,
    pub geometry: BuildingGeometry,
}

impl OrientationRow {
    pub fn center(&self) -> LonLat {
        [self.center_lon, self.center_lat]
    }

    /// A copy of this row reconciled under another mode; geometry signals are unchanged
    pub fn with_mode(&self, mode: SelectionMode) -> OrientationRow {
        let (orientation_deg, source) = choose_orientation(mode, self.pca_deg, self.entrance_deg, self.altar_deg);
        OrientationRow {
            orientation_deg,
            deviation_deg: east_west_deviation(orientation_deg),
            source,
            ..self.clone()
        }
    }

    /// Arrow from the centre along the orientation, `[start, end]` as `[lon, lat]`
    pub fn arrow(&self, length_m: f64) -> [LonLat; 2] {
        [self.center(), arrow_endpoint(self.center(), self.orientation_deg, length_m)]
    }
}

/// Row identity: the global id when present, else `name@lat,lon` with 6 decimals.
/// Synthesized ids can collide for nearby buildings with the same name.
pub fn row_id(global_id: Option<&str>, name: &str, center: LonLat) -> String {
    match global_id {
        Some(id) => id.to_string(),
        None => format!("{}@{:.6},{:.6}", name, center[1], center[0]),
    }
}
