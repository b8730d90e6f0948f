//! Geometry module for church buildings
//!
//! # Submodules
//! - `types` - Core geometric types (rings, building geometry, entrances)
//! - `containment` - Point-in-polygon tests
//! - `spatial` - R-tree index over entrance points

mod containment;
mod spatial;
mod types;

pub use types::{
    is_closed_ring,
    BuildingFeature,
    BuildingGeometry,
    EntranceKind,
    EntrancePoint,
    LonLat,
    Ring,
};

pub use containment::{geometry_contains, point_in_ring, point_on_ring};

pub use spatial::{EntranceIndex, IndexedEntrance};
