//! Export of reconciled rows
//!
//! Exports are pure projections of the rows; nothing is recomputed.
//!
//! # Submodules
//! - `csv` - Fully quoted CSV summary
//! - `geojson` - FeatureCollection with the original footprints

mod csv;
mod geojson;

pub use self::csv::{export_csv_file, rows_to_csv, write_csv, CSV_HEADER};
pub use self::geojson::{export_geojson_file, rows_to_geojson};
