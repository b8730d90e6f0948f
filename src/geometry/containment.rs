//! Point-in-polygon tests on lon/lat rings
//!
//! Positions on a ring edge count as inside: OSM entrance nodes are usually
//! vertices of the building outline.

use super::types::{BuildingGeometry, LonLat};

/// Tolerance in degrees for the on-edge test (about 1 mm)
const EDGE_EPSILON: f64 = 1e-8;

/// Check if a point lies on any edge of the ring
pub fn point_on_ring(point: LonLat, ring: &[LonLat]) -> bool {
    ring.windows(2).any(|edge| point_on_segment(point, edge[0], edge[1]))
}

fn point_on_segment(p: LonLat, a: LonLat, b: LonLat) -> bool {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return (p[0] - a[0]).abs() <= EDGE_EPSILON && (p[1] - a[1]).abs() <= EDGE_EPSILON;
    }
    let t = (((p[0] - a[0]) * dx + (p[1] - a[1]) * dy) / len_sq).clamp(0.0, 1.0);
    let (cx, cy) = (a[0] + t * dx, a[1] + t * dy);
    let (ex, ey) = (p[0] - cx, p[1] - cy);
    ex * ex + ey * ey <= EDGE_EPSILON * EDGE_EPSILON
}

/// Even-odd ray casting test; does not treat edge points specially
pub fn point_in_ring(point: LonLat, ring: &[LonLat]) -> bool {
    let [px, py] = point;
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Check if a point is inside any component polygon of the geometry.
/// Holes exclude their interior but not their boundary.
pub fn geometry_contains(geometry: &BuildingGeometry, point: LonLat) -> bool {
    geometry.polygons().iter().any(|rings| {
        let Some((outer, holes)) = rings.split_first() else {
            return false;
        };
        if point_on_ring(point, outer) {
            return true;
        }
        if !point_in_ring(point, outer) {
            return false;
        }
        holes
            .iter()
            .all(|hole| point_on_ring(point, hole) || !point_in_ring(point, hole))
    })
}
