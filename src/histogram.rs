//! Circular histograms over compass angles, for rose diagrams

use crate::estimate::normalize_deg;
use crate::reconcile::OrientationRow;
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BIN_WIDTH_DEG: f64 = 10.0;

/// Narrower bins are rejected to keep the bin count bounded
pub const MIN_BIN_WIDTH_DEG: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start_deg: f64,
    pub end_deg: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoseHistogram {
    pub bin_width_deg: f64,
    pub bins: Vec<HistogramBin>,
    /// Number of angles counted
    pub total: usize,
    /// Largest single bin, for scaling petals
    pub max_count: usize,
}

/// Bin angles into `[i*w, min((i+1)*w, 360))`. `None` and non-finite values are skipped.
pub fn build_histogram<I>(angles: I, bin_width_deg: f64) -> Result<RoseHistogram>
where
    I: IntoIterator<Item = Option<f64>>,
{
    ensure!(
        bin_width_deg.is_finite() && bin_width_deg >= MIN_BIN_WIDTH_DEG,
        "bin width must be a finite number of degrees >= {}, got {}",
        MIN_BIN_WIDTH_DEG,
        bin_width_deg
    );

    let bin_count = ((360.0 / bin_width_deg) - 1e-9).ceil().max(1.0) as usize;
    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            start_deg: i as f64 * bin_width_deg,
            end_deg: ((i + 1) as f64 * bin_width_deg).min(360.0),
            count: 0,
        })
        .collect();

    let mut total = 0;
    for angle in angles.into_iter().flatten().filter(|a| a.is_finite()) {
        let index = ((normalize_deg(angle) / bin_width_deg).floor() as usize).min(bin_count - 1);
        bins[index].count += 1;
        total += 1;
    }

    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);
    Ok(RoseHistogram { bin_width_deg, bins, total, max_count })
}

/// Row value a histogram is built over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistogramField {
    #[default]
    Orientation,
    Deviation,
    Pca,
    Entrance,
    Altar,
}

impl HistogramField {
    pub fn value(self, row: &OrientationRow) -> Option<f64> {
        match self {
            HistogramField::Orientation => Some(row.orientation_deg),
            HistogramField::Deviation => Some(row.deviation_deg),
            HistogramField::Pca => Some(row.pca_deg),
            HistogramField::Entrance => row.entrance_deg,
            HistogramField::Altar => row.altar_deg,
        }
    }
}

pub fn histogram_for_rows(rows: &[OrientationRow], field: HistogramField, bin_width_deg: f64) -> Result<RoseHistogram> {
    build_histogram(rows.iter().map(|row| field.value(row)), bin_width_deg)
}
