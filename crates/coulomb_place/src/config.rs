//! Configuration for the Nesterov base layer.
//!
//! The configuration is a plain value handed to the facade constructor.
//! Every field has a default, so callers can deserialize a partial config
//! (e.g. from a project TOML) or start from [`NesterovConfig::default`].

use crate::error::PlaceError;
use serde::{Deserialize, Serialize};

/// Tuning knobs for bin sizing, filler synthesis, and the wirelength model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NesterovConfig {
    /// Target ratio of cell area to whitespace, in `(0, 1]`. Drives both
    /// filler synthesis and automatic bin sizing.
    pub target_density: f32,
    /// Lower cut of the trimmed mean used to size filler cells.
    pub min_avg_cut: f32,
    /// Upper cut of the trimmed mean used to size filler cells.
    pub max_avg_cut: f32,
    /// Explicit bin count override for the x axis (`None` = auto).
    pub bin_cnt_x: Option<i32>,
    /// Explicit bin count override for the y axis (`None` = auto).
    pub bin_cnt_y: Option<i32>,
    /// Guard threshold below which exponential terms are skipped to avoid
    /// underflow in the wirelength model.
    pub min_wirelength_force_bar: f32,
}

impl Default for NesterovConfig {
    fn default() -> Self {
        Self {
            target_density: 1.0,
            min_avg_cut: 0.1,
            max_avg_cut: 0.9,
            bin_cnt_x: None,
            bin_cnt_y: None,
            min_wirelength_force_bar: -300.0,
        }
    }
}

impl NesterovConfig {
    /// Validates the configuration, returning the first violation found.
    pub fn validate(&self) -> Result<(), PlaceError> {
        if !(self.target_density > 0.0 && self.target_density <= 1.0) {
            return Err(PlaceError::InvalidConfig(format!(
                "target_density must be in (0, 1], got {}",
                self.target_density
            )));
        }
        if !(0.0..=1.0).contains(&self.min_avg_cut)
            || !(0.0..=1.0).contains(&self.max_avg_cut)
            || self.min_avg_cut >= self.max_avg_cut
        {
            return Err(PlaceError::InvalidConfig(format!(
                "average cuts must satisfy 0 <= min < max <= 1, got ({}, {})",
                self.min_avg_cut, self.max_avg_cut
            )));
        }
        for (name, cnt) in [("bin_cnt_x", self.bin_cnt_x), ("bin_cnt_y", self.bin_cnt_y)] {
            if let Some(cnt) = cnt {
                if cnt <= 0 {
                    return Err(PlaceError::InvalidConfig(format!(
                        "{name} must be positive, got {cnt}"
                    )));
                }
            }
        }
        Ok(())
    }
}
