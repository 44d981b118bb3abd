//! Virtual filler g-cell synthesis.
//!
//! Fillers pad the whitespace the target density leaves free, so the density
//! field stays smooth where the design is sparse. They are sized from a
//! trimmed mean of the placeable-instance dimensions and scattered uniformly
//! over the core by a fixed-seed RNG: identical inputs always produce
//! identical filler coordinates.

use crate::config::NesterovConfig;
use crate::data::GCell;
use crate::error::PlaceError;
use coulomb_db::PlacerDb;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed for the filler RNG; fixed so filler synthesis is reproducible.
const FILLER_SEED: u64 = 0;

/// The synthesized filler set plus the common filler dimensions.
#[derive(Debug)]
pub(crate) struct FillerSet {
    /// The filler g-cells, in generation order.
    pub cells: Vec<GCell>,
    /// Filler width (trimmed-mean instance width).
    pub dx: i32,
    /// Filler height (trimmed-mean instance height).
    pub dy: i32,
}

/// Averages the sorted values over `[floor(min_cut*N), floor(max_cut*N))`,
/// falling back to the whole population when that window is empty.
fn trimmed_mean(sorted: &[i32], min_cut: f32, max_cut: f32) -> i64 {
    let n = sorted.len();
    let min_idx = (n as f32 * min_cut) as usize;
    let max_idx = (n as f32 * max_cut) as usize;
    let window = if max_idx > min_idx {
        &sorted[min_idx..max_idx]
    } else {
        sorted
    };
    if window.is_empty() {
        return 0;
    }
    window.iter().map(|&v| i64::from(v)).sum::<i64>() / window.len() as i64
}

/// Synthesizes the filler g-cells for the design.
///
/// The filler budget is the whitespace scaled by the target density, minus
/// the area the movable instances already occupy. A negative budget is
/// unrecoverable: the caller must raise the target density or enlarge the
/// core.
pub(crate) fn synthesize_fillers(
    db: &PlacerDb,
    cfg: &NesterovConfig,
) -> Result<FillerSet, PlaceError> {
    let mut widths: Vec<i32> = db.place_insts().map(|i| i.dx()).collect();
    let mut heights: Vec<i32> = db.place_insts().map(|i| i.dy()).collect();
    widths.sort_unstable();
    heights.sort_unstable();

    let avg_dx = trimmed_mean(&widths, cfg.min_avg_cut, cfg.max_avg_cut) as i32;
    let avg_dy = trimmed_mean(&heights, cfg.min_avg_cut, cfg.max_avg_cut) as i32;
    let filler_area = i64::from(avg_dx) * i64::from(avg_dy);
    if filler_area <= 0 {
        return Err(PlaceError::DegenerateGeometry(
            "filler dimensions collapsed to zero".into(),
        ));
    }

    let core_area = db.die.core_area();
    let white_space_area = core_area - db.non_place_insts_area();
    let movable_area = (white_space_area as f64 * cfg.target_density as f64) as i64;
    let total_filler_area = movable_area - db.place_insts_area();
    if total_filler_area < 0 {
        return Err(PlaceError::InsufficientWhitespace {
            filler_area: total_filler_area,
        });
    }

    let filler_cnt = (total_filler_area / filler_area) as usize;
    let core = db.die.core;

    let mut rng = StdRng::seed_from_u64(FILLER_SEED);
    let mut cells = Vec::with_capacity(filler_cnt);
    for _ in 0..filler_cnt {
        let cx = rng.gen_range(0..core.dx()) + core.lx;
        let cy = rng.gen_range(0..core.dy()) + core.ly;
        cells.push(GCell::filler(cx, cy, avg_dx, avg_dy));
    }

    Ok(FillerSet {
        cells,
        dx: avg_dx,
        dy: avg_dy,
    })
}
