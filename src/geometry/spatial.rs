//! Spatial indexing for entrance lookup
//!
//! Entrances are bulk-loaded into an R-tree once per pass; each building
//! queries it with its bounding box and then runs the exact containment test
//! on the few candidates that come back.

use super::containment::geometry_contains;
use super::types::{BuildingGeometry, EntrancePoint, LonLat};
use rstar::{RTree, RTreeObject, AABB};

/// Matches the on-edge tolerance of the containment test
const ENVELOPE_MARGIN: f64 = 1e-8;

/// Entrance wrapper for R-tree spatial indexing
#[derive(Clone, Debug)]
pub struct IndexedEntrance {
    pub entrance: EntrancePoint,
    /// Position in the input slice, used for stable tie breaking
    pub order: usize,
}

impl RTreeObject for IndexedEntrance {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.entrance.position())
    }
}

/// R-tree over all entrance points of one computation pass
pub struct EntranceIndex {
    tree: RTree<IndexedEntrance>,
}

impl EntranceIndex {
    pub fn new(entrances: &[EntrancePoint]) -> Self {
        let objects: Vec<IndexedEntrance> = entrances
            .iter()
            .enumerate()
            .map(|(order, entrance)| IndexedEntrance { entrance: *entrance, order })
            .collect();
        Self { tree: RTree::bulk_load(objects) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Entrances lying inside the geometry, in input order
    pub fn entrances_within(&self, geometry: &BuildingGeometry) -> Vec<&IndexedEntrance> {
        let Some([min_lon, min_lat, max_lon, max_lat]) = geometry.bounds() else {
            return Vec::new();
        };
        let envelope = AABB::from_corners(
            [min_lon - ENVELOPE_MARGIN, min_lat - ENVELOPE_MARGIN],
            [max_lon + ENVELOPE_MARGIN, max_lat + ENVELOPE_MARGIN],
        );
        let mut hits: Vec<&IndexedEntrance> = self
            .tree
            .locate_in_envelope(&envelope)
            .filter(|candidate| geometry_contains(geometry, candidate.entrance.position()))
            .collect();
        hits.sort_by_key(|candidate| candidate.order);
        hits
    }

    /// Best entrance of a building: `main` over `yes`, then closest to the centre.
    /// Distances use longitude scaled by cos(latitude).
    pub fn best_entrance(&self, geometry: &BuildingGeometry, center: LonLat) -> Option<EntrancePoint> {
        let kx = center[1].to_radians().cos();
        let distance_sq = |p: &EntrancePoint| {
            let dx = (p.lon - center[0]) * kx;
            let dy = p.lat - center[1];
            dx * dx + dy * dy
        };

        self.entrances_within(geometry)
            .into_iter()
            .map(|candidate| candidate.entrance)
            .min_by(|a, b| {
                b.kind
                    .rank()
                    .cmp(&a.kind.rank())
                    .then_with(|| distance_sq(a).total_cmp(&distance_sq(b)))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::EntranceKind;

    fn rectangle() -> BuildingGeometry {
        BuildingGeometry::Polygon(vec![vec![
            [9.0, 45.0],
            [9.004, 45.0],
            [9.004, 45.001],
            [9.0, 45.001],
            [9.0, 45.0],
        ]])
    }

    fn entrance(lon: f64, lat: f64, kind: EntranceKind) -> EntrancePoint {
        EntrancePoint { id: None, lon, lat, kind }
    }

    #[test]
    fn test_entrances_within_filters_outside_points() {
        let index = EntranceIndex::new(&[
            entrance(9.001, 45.0005, EntranceKind::Yes),
            entrance(9.010, 45.0005, EntranceKind::Main),
        ]);
        assert_eq!(index.len(), 2);
        let hits = index.entrances_within(&rectangle());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].order, 0);
    }

    #[test]
    fn test_main_entrance_beats_closer_yes() {
        let index = EntranceIndex::new(&[
            entrance(9.002, 45.0005, EntranceKind::Yes),
            entrance(9.0, 45.0005, EntranceKind::Main),
        ]);
        let best = index.best_entrance(&rectangle(), [9.002, 45.0005]).unwrap();
        assert_eq!(best.kind, EntranceKind::Main);
    }

    #[test]
    fn test_nearest_entrance_breaks_ties() {
        let index = EntranceIndex::new(&[
            entrance(9.0, 45.0005, EntranceKind::Yes),
            entrance(9.003, 45.0005, EntranceKind::Yes),
        ]);
        let best = index.best_entrance(&rectangle(), [9.002, 45.0005]).unwrap();
        assert_eq!(best.lon, 9.003);
    }

    #[test]
    fn test_no_entrances() {
        let index = EntranceIndex::new(&[]);
        assert!(index.is_empty());
        assert!(index.best_entrance(&rectangle(), [9.002, 45.0005]).is_none());
    }
}
