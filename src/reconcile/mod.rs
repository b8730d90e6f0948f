//! Orientation reconciliation: one row per building from PCA, entrance and altar signals
//!
//! # Submodules
//! - `types` - Rows, selection modes and row identity

mod types;

use crate::estimate::{centroid, east_west_deviation, great_circle_bearing, opposite_bearing, pca_orientation_deg};
use crate::geometry::{BuildingFeature, EntranceIndex, EntrancePoint};
use rayon::prelude::*;

pub use types::{choose_orientation, row_id, OrientationRow, OrientationSource, SelectionMode};

/// Buildings with fewer positions than this get a 0° PCA axis
pub const MIN_PCA_POSITIONS: usize = 4;

/// Reconcile every building into exactly one row, in input order
pub fn reconcile(
    buildings: &[BuildingFeature],
    entrances: &[EntrancePoint],
    mode: SelectionMode,
) -> Vec<OrientationRow> {
    let index = EntranceIndex::new(entrances);
    let start = std::time::Instant::now();

    // Buildings are independent; collect keeps input order
    let rows: Vec<OrientationRow> = buildings
        .par_iter()
        .map(|building| orient_building(building, &index, mode))
        .collect();

    let with_entrance = rows.iter().filter(|r| r.entrance_deg.is_some()).count();
    log::info!(
        "Reconciled {} buildings ({} with entrance, {} entrances indexed) in {:.2?}",
        rows.len(),
        with_entrance,
        index.len(),
        start.elapsed()
    );
    rows
}

/// Compute all signals for one building
pub fn orient_building(building: &BuildingFeature, entrances: &EntranceIndex, mode: SelectionMode) -> OrientationRow {
    let center = centroid(&building.geometry);

    let pca_deg = if building.geometry.all_positions().len() < MIN_PCA_POSITIONS {
        0.0
    } else {
        pca_orientation_deg(&building.geometry.ring_vertices())
    };

    let best = entrances.best_entrance(&building.geometry, center);
    let entrance_deg = best.map(|entrance| great_circle_bearing(center, entrance.position()));
    let altar_deg = entrance_deg.map(opposite_bearing);

    let (orientation_deg, source) = choose_orientation(mode, pca_deg, entrance_deg, altar_deg);

    OrientationRow {
        id: row_id(building.id.as_deref(), &building.name, center),
        name: building.name.clone(),
        center_lon: center[0],
        center_lat: center[1],
        pca_deg,
        entrance_deg,
        altar_deg,
        entrance_kind: best.map(|entrance| entrance.kind),
        orientation_deg,
        deviation_deg: east_west_deviation(orientation_deg),
        source,
        geometry: building.geometry.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BuildingGeometry, EntranceKind};
    use crate::parsing::Tags;
    use approx::assert_relative_eq;

    fn building(id: Option<&str>, ring: Vec<[f64; 2]>) -> BuildingFeature {
        BuildingFeature {
            id: id.map(str::to_string),
            name: "Sant'Ambrogio".to_string(),
            tags: Tags::new(),
            geometry: BuildingGeometry::Polygon(vec![ring]),
        }
    }

    fn milan_rectangle() -> Vec<[f64; 2]> {
        vec![[9.189, 45.4637], [9.191, 45.4637], [9.191, 45.4647], [9.189, 45.4647], [9.189, 45.4637]]
    }

    #[test]
    fn test_entrance_due_east_gives_altar_west() {
        let entrances = [EntrancePoint { id: Some(1), lon: 9.191, lat: 45.4642, kind: EntranceKind::Main }];
        let rows = reconcile(&[building(Some("way/1"), milan_rectangle())], &entrances, SelectionMode::Altar);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_relative_eq!(row.center_lon, 9.19, epsilon = 1e-9);
        assert_relative_eq!(row.center_lat, 45.4642, epsilon = 1e-9);
        let entrance = row.entrance_deg.unwrap();
        assert_relative_eq!(entrance, 90.0, epsilon = 0.01);
        assert_eq!(row.altar_deg, Some((entrance + 180.0) % 360.0));
        assert_relative_eq!(row.orientation_deg, 270.0, epsilon = 0.01);
        assert!(row.deviation_deg < 0.01);
        assert_eq!(row.source, OrientationSource::Altar);
        assert_eq!(row.entrance_kind, Some(EntranceKind::Main));
    }

    #[test]
    fn test_entrance_outside_is_ignored() {
        let entrances = [EntrancePoint { id: None, lon: 9.2, lat: 45.4642, kind: EntranceKind::Main }];
        let rows = reconcile(&[building(None, milan_rectangle())], &entrances, SelectionMode::Altar);
        let row = &rows[0];
        assert_eq!(row.entrance_deg, None);
        assert_eq!(row.altar_deg, None);
        assert_eq!(row.source, OrientationSource::Pca);
        assert_eq!(row.orientation_deg, row.pca_deg);
        assert_eq!(row.id, "Sant'Ambrogio@45.464200,9.190000");
    }

    #[test]
    fn test_modes_select_signal() {
        let entrances = [EntrancePoint { id: None, lon: 9.19, lat: 45.4637, kind: EntranceKind::Yes }];
        let buildings = [building(Some("way/1"), milan_rectangle())];

        let entrance_rows = reconcile(&buildings, &entrances, SelectionMode::Entrance);
        let entrance_row = &entrance_rows[0];
        assert_relative_eq!(entrance_row.orientation_deg, 180.0, epsilon = 1e-6);
        assert_eq!(entrance_row.source, OrientationSource::Entrance);

        let pca_rows = reconcile(&buildings, &entrances, SelectionMode::Pca);
        let pca_row = &pca_rows[0];
        assert_eq!(pca_row.orientation_deg, pca_row.pca_deg);

        let altar_row = entrance_row.with_mode(SelectionMode::Altar);
        let altar = altar_row.orientation_deg;
        assert!(altar < 1e-6 || 360.0 - altar < 1e-6, "altar {}", altar);
        assert_relative_eq!(altar_row.deviation_deg, 90.0, epsilon = 1e-6);
        assert_eq!(altar_row.geometry, entrance_row.geometry);
    }

    #[test]
    fn test_unit_square_without_entrance() {
        let square = building(None, vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]);
        let rows = reconcile(&[square], &[], SelectionMode::Altar);
        let row = &rows[0];
        let axis_ok = row.pca_deg.abs() < 1e-9 || (row.pca_deg - 90.0).abs() < 1e-9;
        assert!(axis_ok, "pca {}", row.pca_deg);
        let deviation_ok = (row.deviation_deg - 90.0).abs() < 1e-9 || row.deviation_deg.abs() < 1e-9;
        assert!(deviation_ok, "deviation {}", row.deviation_deg);
        assert_eq!(row.source, OrientationSource::Pca);
    }

    #[test]
    fn test_every_building_yields_a_row() {
        let tiny = building(Some("way/2"), vec![[9.0, 45.0], [9.0, 45.0]]);
        let rows = reconcile(&[building(Some("way/1"), milan_rectangle()), tiny], &[], SelectionMode::Altar);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].pca_deg, 0.0);
        assert_eq!(rows[1].id, "way/2");
    }
}
