//! Geometric orientation estimation
//!
//! # Submodules
//! - `centroid` - Area-weighted centre of mass with vertex-average fallback
//! - `pca` - Principal axis bearing from the 2x2 covariance matrix
//! - `bearing` - Great-circle bearing, east-west deviation, arrow endpoints

mod bearing;
mod centroid;
mod pca;

pub use bearing::{
    arrow_endpoint, east_west_deviation, great_circle_bearing, normalize_deg, opposite_bearing,
    EARTH_RADIUS_M,
};
pub use centroid::{centroid, vertex_average};
pub use pca::{pca_orientation_deg, Covariance};
