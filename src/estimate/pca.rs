//! Principal axis of a footprint via closed-form 2x2 PCA

use super::bearing::normalize_deg;
use crate::geometry::LonLat;

/// Eigenvector components below this are treated as zero
const EIGEN_EPSILON: f64 = 1e-9;

/// Population covariance of the longitude-corrected points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Covariance {
    pub sxx: f64,
    pub syy: f64,
    pub sxy: f64,
}

impl Covariance {
    /// Longitudes are scaled by cos(mean latitude) so x and y are roughly
    /// equidistant near the footprint
    pub fn from_lon_lat(points: &[LonLat]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let n = points.len() as f64;
        let lat0 = points.iter().map(|p| p[1]).sum::<f64>() / n;
        let kx = lat0.to_radians().cos();

        let mx = points.iter().map(|p| p[0] * kx).sum::<f64>() / n;
        let my = points.iter().map(|p| p[1]).sum::<f64>() / n;

        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for p in points {
            let dx = p[0] * kx - mx;
            let dy = p[1] - my;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }
        Some(Self { sxx: sxx / n, syy: syy / n, sxy: sxy / n })
    }

    /// Larger eigenvalue from the trace/determinant formula
    pub fn major_eigenvalue(&self) -> f64 {
        let trace = self.sxx + self.syy;
        let det = self.sxx * self.syy - self.sxy * self.sxy;
        trace / 2.0 + (trace * trace / 4.0 - det).max(0.0).sqrt()
    }

    /// Eigenvector of the larger eigenvalue, solving `(A - λI)v = 0`
    pub fn major_axis(&self) -> [f64; 2] {
        let lambda = self.major_eigenvalue();
        let (vx, vy) = (lambda - self.syy, self.sxy);
        if vx.abs() < EIGEN_EPSILON && vy.abs() < EIGEN_EPSILON {
            [self.sxy, lambda - self.sxx]
        } else {
            [vx, vy]
        }
    }
}

/// Compass bearing (0 = north, 90 = east) of the principal axis, in [0, 360).
/// Fewer than 2 points yields 0.
pub fn pca_orientation_deg(points: &[LonLat]) -> f64 {
    let Some(covariance) = Covariance::from_lon_lat(points) else {
        return 0.0;
    };
    let [vx, vy] = covariance.major_axis();
    // atan2(vx, vy) is 90 - atan2(vy, vx) folded into one call: clockwise from north
    normalize_deg(vx.atan2(vy).to_degrees())
}
