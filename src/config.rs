//! Run configuration, loadable from a JSON file

use crate::histogram::{DEFAULT_BIN_WIDTH_DEG, MIN_BIN_WIDTH_DEG};
use crate::reconcile::SelectionMode;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ARROW_LENGTH_M: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    /// Signal used as the canonical orientation
    pub selection_mode: SelectionMode,
    /// Rose diagram bin width in degrees
    pub bin_width_deg: f64,
    /// Length of the orientation arrow drawn from each centroid
    pub arrow_length_m: f64,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::Altar,
            bin_width_deg: DEFAULT_BIN_WIDTH_DEG,
            arrow_length_m: DEFAULT_ARROW_LENGTH_M,
        }
    }
}

impl OrientationConfig {
    /// Load a JSON config; missing keys take their defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self =
            serde_json::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.bin_width_deg.is_finite() && self.bin_width_deg >= MIN_BIN_WIDTH_DEG,
            "bin_width_deg must be >= {}",
            MIN_BIN_WIDTH_DEG
        );
        ensure!(
            self.arrow_length_m.is_finite() && self.arrow_length_m > 0.0,
            "arrow_length_m must be positive"
        );
        Ok(())
    }
}
