//! Area-weighted centroid of building footprints

use crate::geometry::{is_closed_ring, BuildingGeometry, LonLat};

/// Below this absolute area (degrees squared) a footprint counts as degenerate
const MIN_AREA: f64 = 1e-12;

/// Signed area and first moments of one ring, computed relative to its first
/// vertex to keep precision for small rings at large coordinates
fn ring_moments(ring: &[LonLat]) -> Option<(f64, LonLat)> {
    let origin = *ring.first()?;
    let mut area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;

    for edge in ring.windows(2) {
        let (x0, y0) = (edge[0][0] - origin[0], edge[0][1] - origin[1]);
        let (x1, y1) = (edge[1][0] - origin[0], edge[1][1] - origin[1]);
        let cross = x0 * y1 - x1 * y0;
        area += cross;
        cx += (x0 + x1) * cross;
        cy += (y0 + y1) * cross;
    }

    area *= 0.5;
    if area.abs() < MIN_AREA {
        return None;
    }
    Some((area, [cx / (6.0 * area) + origin[0], cy / (6.0 * area) + origin[1]]))
}

/// Mean of the ring vertices, closing positions excluded
pub fn vertex_average(geometry: &BuildingGeometry) -> Option<LonLat> {
    let mut sum = [0.0, 0.0];
    let mut count = 0usize;
    for ring in geometry.outer_rings() {
        let take = if is_closed_ring(ring) { ring.len() - 1 } else { ring.len() };
        for p in &ring[..take] {
            sum[0] += p[0];
            sum[1] += p[1];
            count += 1;
        }
    }
    (count > 0).then(|| [sum[0] / count as f64, sum[1] / count as f64])
}

/// Centre of mass of the footprint.
///
/// Outer rings add their area, holes subtract theirs. Zero-area footprints
/// fall back to the vertex average; an empty geometry yields `[0, 0]`.
pub fn centroid(geometry: &BuildingGeometry) -> LonLat {
    let mut total = 0.0;
    let mut weighted = [0.0, 0.0];

    for rings in geometry.polygons() {
        for (i, ring) in rings.iter().enumerate() {
            let Some((area, center)) = ring_moments(ring) else {
                continue;
            };
            let weight = if i == 0 { area.abs() } else { -area.abs() };
            total += weight;
            weighted[0] += center[0] * weight;
            weighted[1] += center[1] * weight;
        }
    }

    if total.abs() < MIN_AREA {
        return vertex_average(geometry).unwrap_or([0.0, 0.0]);
    }
    [weighted[0] / total, weighted[1] / total]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rectangle(min: LonLat, max: LonLat) -> Vec<LonLat> {
        vec![min, [max[0], min[1]], max, [min[0], max[1]], min]
    }

    #[test]
    fn test_rectangle_centroid() {
        let geometry = BuildingGeometry::Polygon(vec![rectangle([9.189, 45.4637], [9.191, 45.4647])]);
        let c = centroid(&geometry);
        assert_relative_eq!(c[0], 9.19, epsilon = 1e-9);
        assert_relative_eq!(c[1], 45.4642, epsilon = 1e-9);
    }

    #[test]
    fn test_orientation_of_ring_does_not_matter() {
        let mut ring = rectangle([0.0, 0.0], [4.0, 2.0]);
        ring.reverse();
        let c = centroid(&BuildingGeometry::Polygon(vec![ring]));
        assert_relative_eq!(c[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(c[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_area_weighting_across_polygons() {
        // 4x4 square at the origin and a 1x1 square far east
        let geometry = BuildingGeometry::MultiPolygon(vec![
            vec![rectangle([0.0, 0.0], [4.0, 4.0])],
            vec![rectangle([10.0, 0.0], [11.0, 1.0])],
        ]);
        let c = centroid(&geometry);
        assert_relative_eq!(c[0], (2.0 * 16.0 + 10.5) / 17.0, epsilon = 1e-9);
        assert_relative_eq!(c[1], (2.0 * 16.0 + 0.5) / 17.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hole_shifts_centroid() {
        let geometry = BuildingGeometry::Polygon(vec![
            rectangle([0.0, 0.0], [4.0, 4.0]),
            rectangle([0.0, 0.0], [2.0, 4.0]),
        ]);
        let c = centroid(&geometry);
        assert_relative_eq!(c[0], 3.0, epsilon = 1e-9);
        assert_relative_eq!(c[1], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_falls_back_to_vertex_average() {
        let geometry = BuildingGeometry::Polygon(vec![vec![
            [0.0, 0.0],
            [1.0, 1.0],
            [2.0, 2.0],
            [0.0, 0.0],
        ]]);
        let c = centroid(&geometry);
        assert_relative_eq!(c[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(c[1], 1.0, epsilon = 1e-12);
    }
}
