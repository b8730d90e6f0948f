//! Church orientation estimation from OpenStreetMap building polygons.
//!
//! The pipeline runs one way: raw Overpass elements (or an imported GeoJSON
//! FeatureCollection) are converted into closed building polygons and
//! entrance points, every building gets a centroid, a PCA axis and, when an
//! entrance sits on it, an entrance/altar bearing. Those signals are
//! reconciled into one [`OrientationRow`] per building, which feeds the rose
//! histograms and the CSV/GeoJSON exports.
//!
//! # Example
//! ```ignore
//! use church_orientation::SelectionMode;
//!
//! let pass = church_orientation::orient_overpass_file("milan.json", SelectionMode::Altar)?;
//! let csv = church_orientation::rows_to_csv(&pass.rows)?;
//! ```

pub mod config;
pub mod estimate;
pub mod export;
pub mod geometry;
pub mod histogram;
pub mod parsing;
pub mod pipeline;
pub mod query;
pub mod reconcile;
pub mod server;

pub use config::OrientationConfig;
pub use estimate::{
    arrow_endpoint, centroid, east_west_deviation, great_circle_bearing, normalize_deg,
    pca_orientation_deg,
};
pub use export::{export_csv_file, export_geojson_file, rows_to_csv, rows_to_geojson};
pub use geometry::{BuildingFeature, BuildingGeometry, EntranceKind, EntrancePoint, LonLat, Ring};
pub use histogram::{build_histogram, histogram_for_rows, HistogramBin, HistogramField, RoseHistogram};
pub use parsing::{
    convert, import_geojson_file, import_geojson_str, parse_overpass_file, parse_overpass_str,
    Conversion, ConversionStats, RawElement, Tags,
};
pub use pipeline::{
    orient_conversion, orient_geojson_file, orient_geojson_str, orient_overpass_file, orient_overpass_str,
    PassResult,
};
pub use query::{geocode_request, overpass_query, parse_geocode_response, BoundingBox, GeocodeRequest, GeocodeResult};
pub use reconcile::{reconcile, OrientationRow, OrientationSource, SelectionMode};
