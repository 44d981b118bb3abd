//! Uniform bin grid over the die core.
//!
//! Bins are the unit of density accounting: fixed-instance area is deposited
//! once at init, and placed/filler area is re-deposited every iteration from
//! the g-cells. The grid geometry (counts, sizes, the non-place area) is
//! immutable once built.

use crate::data::GCell;
use crate::error::PlaceError;
use coulomb_common::Rect;
use coulomb_db::PlacerDb;
use serde::{Deserialize, Serialize};

/// One bin of the density grid.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Bin {
    /// Grid x index.
    pub x: i32,
    /// Grid y index.
    pub y: i32,
    /// Absolute box, clipped to the die boundary.
    pub rect: Rect,
    /// Area blocked by fixed instances; immutable after init.
    pub non_place_area: i64,
    /// Area deposited by instance/cluster g-cells this iteration.
    pub placed_area: i64,
    /// Area deposited by filler g-cells this iteration.
    pub filler_area: i64,
    /// Scalar density fed to the Poisson solver.
    pub density: f32,
    /// Potential written back by the Poisson solver.
    pub phi: f32,
    /// Field magnitude written back by the Poisson solver.
    pub electro_force: f32,
}

/// The uniform grid of bins covering the die core, stored row-major with
/// bin `(i, j)` at index `j * cnt_x + i`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BinGrid {
    core: Rect,
    cnt_x: i32,
    cnt_y: i32,
    size_x: i32,
    size_y: i32,
    target_density: f32,
    bins: Vec<Bin>,
}

fn fast_mod(input: i32, ceil: i32) -> i32 {
    if input >= ceil {
        input % ceil
    } else {
        input
    }
}

fn range(l: i32, u: i32, origin: i32, size: i32, cnt: i32) -> (usize, usize) {
    let lo = (l - origin) / size;
    let span = u - origin;
    let hi = if fast_mod(span, size) == 0 {
        span / size
    } else {
        span / size + 1
    };
    let lo = lo.clamp(0, cnt - 1);
    let hi = hi.clamp(lo, cnt - 1);
    (lo as usize, hi as usize)
}

/// Smallest power-of-two count with `k^2 <= ideal < (2k)^2`. When no count
/// in `2..=1024` satisfies both bounds (`ideal < 4` or `ideal >= 4*1024^2`)
/// the doubling runs off the end and settles at 2048.
fn auto_bin_cnt(ideal_bin_cnt: i64) -> i64 {
    let mut k = 2i64;
    while k <= 1024 {
        if k * k <= ideal_bin_cnt && 4 * k * k > ideal_bin_cnt {
            return k;
        }
        k *= 2;
    }
    k
}

fn range_f(l: f32, u: f32, origin: i32, size: i32, cnt: i32) -> (usize, usize) {
    let lo = ((l - origin as f32) / size as f32).floor() as i32;
    let q = (u - origin as f32) / size as f32;
    let hi = if q.fract() == 0.0 { q as i32 } else { q as i32 + 1 };
    let lo = lo.clamp(0, cnt - 1);
    let hi = hi.clamp(lo, cnt - 1);
    (lo as usize, hi as usize)
}

impl BinGrid {
    /// Builds the grid from the die and the placeable-instance statistics.
    ///
    /// The bin count per axis is the smallest power of two `k` in
    /// `2..=1024` with `k^2 <= ideal_bin_cnt < (2k)^2`, where the ideal
    /// count is the die area divided by the average placeable-instance area
    /// over the target density; when no such count exists the doubling runs
    /// off the end to 2048. Explicit overrides win per axis. Fixed
    /// instances are deposited into `non_place_area` here, once.
    pub fn new(
        db: &PlacerDb,
        target_density: f32,
        bin_cnt_x: Option<i32>,
        bin_cnt_y: Option<i32>,
    ) -> Result<Self, PlaceError> {
        let core = db.die.core;
        let die_area = core.area();
        if die_area <= 0 {
            return Err(PlaceError::DegenerateGeometry(
                "die core has zero area".into(),
            ));
        }

        let place_cnt = db.place_insts().count() as i64;
        if place_cnt == 0 {
            return Err(PlaceError::CoreEmpty);
        }
        let avg_inst_area = db.place_insts_area() / place_cnt;

        let ideal_bin_area = (avg_inst_area as f32 / target_density).round() as i64;
        if ideal_bin_area <= 0 {
            return Err(PlaceError::DegenerateGeometry(
                "ideal bin area collapsed to zero".into(),
            ));
        }
        let ideal_bin_cnt = die_area / ideal_bin_area;

        let found = auto_bin_cnt(ideal_bin_cnt);

        let cnt_x = bin_cnt_x.unwrap_or(found as i32);
        let cnt_y = bin_cnt_y.unwrap_or(found as i32);
        let size_x = (core.dx() as f32 / cnt_x as f32).ceil() as i32;
        let size_y = (core.dy() as f32 / cnt_y as f32).ceil() as i32;
        if size_x <= 0 || size_y <= 0 {
            return Err(PlaceError::DegenerateGeometry(
                "bin size collapsed to zero".into(),
            ));
        }

        let mut bins = Vec::with_capacity((cnt_x * cnt_y) as usize);
        for j in 0..cnt_y {
            for i in 0..cnt_x {
                // Rows/columns past the die boundary clip to zero-size bins
                // that never accumulate area.
                let lx = (core.lx + i * size_x).min(core.ux);
                let ly = (core.ly + j * size_y).min(core.uy);
                let rect = Rect::new(lx, ly, (lx + size_x).min(core.ux), (ly + size_y).min(core.uy));
                bins.push(Bin {
                    x: i,
                    y: j,
                    rect,
                    ..Bin::default()
                });
            }
        }

        let mut grid = Self {
            core,
            cnt_x,
            cnt_y,
            size_x,
            size_y,
            target_density,
            bins,
        };
        grid.deposit_non_place_area(db);
        Ok(grid)
    }

    fn deposit_non_place_area(&mut self, db: &PlacerDb) {
        for inst in db.non_place_insts() {
            let (ix0, ix1) = self.bin_range_x(inst.rect.lx, inst.rect.ux);
            let (iy0, iy1) = self.bin_range_y(inst.rect.ly, inst.rect.uy);
            for j in iy0..=iy1 {
                for i in ix0..=ix1 {
                    let bin = &mut self.bins[j * self.cnt_x as usize + i];
                    bin.non_place_area += bin.rect.overlap_area(&inst.rect);
                }
            }
        }
    }

    /// Returns the inclusive bin index range covering `[lx, ux]` on x.
    ///
    /// A box flush with a bin edge does not extend into the next bin: the
    /// extra index the mapping may produce has zero overlap there.
    pub fn bin_range_x(&self, lx: i32, ux: i32) -> (usize, usize) {
        range(lx, ux, self.core.lx, self.size_x, self.cnt_x)
    }

    /// Returns the inclusive bin index range covering `[ly, uy]` on y.
    pub fn bin_range_y(&self, ly: i32, uy: i32) -> (usize, usize) {
        range(ly, uy, self.core.ly, self.size_y, self.cnt_y)
    }

    /// Float variant of [`bin_range_x`](Self::bin_range_x) for density boxes.
    pub fn density_range_x(&self, lx: f32, ux: f32) -> (usize, usize) {
        range_f(lx, ux, self.core.lx, self.size_x, self.cnt_x)
    }

    /// Float variant of [`bin_range_y`](Self::bin_range_y) for density boxes.
    pub fn density_range_y(&self, ly: f32, uy: f32) -> (usize, usize) {
        range_f(ly, uy, self.core.ly, self.size_y, self.cnt_y)
    }

    /// Re-deposits every g-cell's placement-box overlap: instance and
    /// cluster cells into `placed_area`, fillers into `filler_area`.
    pub fn update_area(&mut self, cells: &[GCell]) {
        for bin in &mut self.bins {
            bin.placed_area = 0;
            bin.filler_area = 0;
        }
        for cell in cells {
            let (ix0, ix1) = self.bin_range_x(cell.rect.lx, cell.rect.ux);
            let (iy0, iy1) = self.bin_range_y(cell.rect.ly, cell.rect.uy);
            for j in iy0..=iy1 {
                for i in ix0..=ix1 {
                    let bin = &mut self.bins[j * self.cnt_x as usize + i];
                    let overlap = bin.rect.overlap_area(&cell.rect);
                    if cell.is_filler() {
                        bin.filler_area += overlap;
                    } else {
                        bin.placed_area += overlap;
                    }
                }
            }
        }
    }

    /// Re-deposits every g-cell's **density**-box overlap; the routine the
    /// outer iteration calls. Overlaps are float and rounded per bin, so
    /// each bin carries at most one unit of rounding per deposit.
    pub fn update_density_area(&mut self, cells: &[GCell]) {
        for bin in &mut self.bins {
            bin.placed_area = 0;
            bin.filler_area = 0;
        }
        for cell in cells {
            let (ix0, ix1) = self.density_range_x(cell.drect.lx, cell.drect.ux);
            let (iy0, iy1) = self.density_range_y(cell.drect.ly, cell.drect.uy);
            for j in iy0..=iy1 {
                for i in ix0..=ix1 {
                    let bin = &mut self.bins[j * self.cnt_x as usize + i];
                    let overlap = cell.drect.overlap_area(&bin.rect).round() as i64;
                    if cell.is_filler() {
                        bin.filler_area += overlap;
                    } else {
                        bin.placed_area += overlap;
                    }
                }
            }
        }
    }

    /// Recomputes each bin's scalar density from its area accumulators:
    /// `(placed + filler + non_place) / (bin_area * target_density)`.
    /// Zero-area clipped bins get density 0.
    pub fn update_density(&mut self) {
        for bin in &mut self.bins {
            let area = bin.rect.area() as f32;
            bin.density = if area > 0.0 {
                (bin.placed_area + bin.filler_area + bin.non_place_area) as f32
                    / (area * self.target_density)
            } else {
                0.0
            };
        }
    }

    /// Returns the die core rectangle the grid covers.
    pub fn core(&self) -> Rect {
        self.core
    }

    /// Returns the bin count on x.
    pub fn cnt_x(&self) -> i32 {
        self.cnt_x
    }

    /// Returns the bin count on y.
    pub fn cnt_y(&self) -> i32 {
        self.cnt_y
    }

    /// Returns the bin size on x.
    pub fn size_x(&self) -> i32 {
        self.size_x
    }

    /// Returns the bin size on y.
    pub fn size_y(&self) -> i32 {
        self.size_y
    }

    /// Returns the target density the grid was sized for.
    pub fn target_density(&self) -> f32 {
        self.target_density
    }

    /// Returns all bins, row-major.
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub(crate) fn bins_mut(&mut self) -> &mut [Bin] {
        &mut self.bins
    }

    /// Returns the bin at grid position `(i, j)`.
    pub fn bin_at(&self, i: usize, j: usize) -> &Bin {
        &self.bins[j * self.cnt_x as usize + i]
    }
}
