//! Compass bearings, east-west deviation and orientation arrows

use crate::geometry::LonLat;

/// WGS84 equatorial radius used for the arrow approximation
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Fold an angle into [0, 360)
pub fn normalize_deg(angle: f64) -> f64 {
    let folded = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if folded >= 360.0 {
        0.0
    } else {
        folded
    }
}

/// Initial great-circle bearing from `from` to `to`, in [0, 360)
pub fn great_circle_bearing(from: LonLat, to: LonLat) -> f64 {
    let (lat1, lat2) = (from[1].to_radians(), to[1].to_radians());
    let dlon = (to[0] - from[0]).to_radians();
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    normalize_deg(y.atan2(x).to_degrees())
}

/// Angular distance of an orientation from the nearest of due east / due west, in [0, 90]
pub fn east_west_deviation(theta: f64) -> f64 {
    let t = normalize_deg(theta);
    (t - 90.0).abs().min((t - 270.0).abs())
}

/// The bearing opposite an entrance bearing
pub fn opposite_bearing(bearing: f64) -> f64 {
    normalize_deg(bearing + 180.0)
}

/// End point of an arrow `length_m` metres long from `center` along `bearing_deg`.
/// Uses a local equirectangular approximation, good for short arrows.
pub fn arrow_endpoint(center: LonLat, bearing_deg: f64, length_m: f64) -> LonLat {
    let rad = (90.0 - bearing_deg).to_radians();
    let d_lat = length_m * rad.sin() / EARTH_RADIUS_M;
    let d_lon = length_m * rad.cos() / (EARTH_RADIUS_M * center[1].to_radians().cos());
    [center[0] + d_lon.to_degrees(), center[1] + d_lat.to_degrees()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_deg() {
        assert_eq!(normalize_deg(0.0), 0.0);
        assert_eq!(normalize_deg(360.0), 0.0);
        assert_eq!(normalize_deg(-90.0), 270.0);
        assert_eq!(normalize_deg(725.0), 5.0);
        assert_eq!(normalize_deg(-1e-20), 0.0);
    }

    #[test]
    fn test_cardinal_bearings() {
        let origin = [9.19, 45.4642];
        assert_relative_eq!(great_circle_bearing(origin, [9.19, 45.4652]), 0.0, epsilon = 1e-9);
        assert_relative_eq!(great_circle_bearing(origin, [9.191, 45.4642]), 90.0, epsilon = 1e-3);
        assert_relative_eq!(great_circle_bearing(origin, [9.19, 45.4632]), 180.0, epsilon = 1e-9);
        assert_relative_eq!(great_circle_bearing(origin, [9.189, 45.4642]), 270.0, epsilon = 1e-3);
    }

    #[test]
    fn test_east_west_deviation() {
        assert_eq!(east_west_deviation(90.0), 0.0);
        assert_eq!(east_west_deviation(270.0), 0.0);
        assert_eq!(east_west_deviation(0.0), 90.0);
        assert_eq!(east_west_deviation(180.0), 90.0);
        assert_relative_eq!(east_west_deviation(87.3), 2.7, epsilon = 1e-9);
        assert_relative_eq!(east_west_deviation(-95.0), 5.0, epsilon = 1e-9);
        for i in -720..=720 {
            let d = east_west_deviation(i as f64 * 0.5);
            assert!((0.0..=90.0).contains(&d), "deviation {} out of range", d);
        }
    }

    #[test]
    fn test_opposite_bearing() {
        assert_eq!(opposite_bearing(90.0), 270.0);
        assert_eq!(opposite_bearing(270.0), 90.0);
        assert_eq!(opposite_bearing(180.0), 0.0);
    }

    #[test]
    fn test_arrow_endpoint_points_along_bearing() {
        let center = [9.19, 45.4642];
        let east = arrow_endpoint(center, 90.0, 60.0);
        assert!(east[0] > center[0]);
        assert_relative_eq!(east[1], center[1], epsilon = 1e-12);

        let north = arrow_endpoint(center, 0.0, 60.0);
        assert_relative_eq!(north[0], center[0], epsilon = 1e-12);
        assert_relative_eq!((north[1] - center[1]).to_radians() * EARTH_RADIUS_M, 60.0, epsilon = 1e-6);
    }
}
