//! Density model and the Poisson-solver seam.
//!
//! Each g-cell deposits area through a density box: cells smaller than
//! `sqrt(2)` bins per axis are widened to half that threshold and carry a
//! compensating `density_scale`, which keeps the density field smooth enough
//! for the spectral solver. The solver itself is a collaborator behind the
//! [`PoissonSolver`] trait; this layer only feeds it bin densities and reads
//! back potential and field values.

use crate::bins::BinGrid;
use crate::data::GCell;
use coulomb_common::FloatXY;

const SQRT2: f32 = std::f32::consts::SQRT_2;

/// The spectral Poisson solver the density force couples to.
///
/// Implementations are constructed by the caller from the grid shape
/// `(cnt_x, cnt_y, size_x, size_y)`. The core pushes per-bin densities, asks
/// for one solve, and reads back per-bin potential and field values.
pub trait PoissonSolver {
    /// Records the density of bin `(x, y)` for the next solve.
    fn update_density(&mut self, x: i32, y: i32, density: f32);

    /// Runs the solve over the recorded densities.
    fn solve(&mut self);

    /// Returns the potential at bin `(x, y)` from the last solve.
    fn phi(&self, x: i32, y: i32) -> f32;

    /// Returns the field magnitude at bin `(x, y)` from the last solve.
    fn electro_force(&self, x: i32, y: i32) -> f32;
}

/// Assigns each g-cell its density box and mass-preserving scale.
///
/// Per axis: a cell narrower than `sqrt(2) * bin_size` is widened to
/// `sqrt(2) * bin_size / 2` and scaled by `dx / (sqrt(2) * bin_size)`;
/// otherwise the density box matches the placement box and the scale is 1.
/// The density box is centered on the placement box.
pub(crate) fn assign_density_size(cells: &mut [GCell], size_x: i32, size_y: i32) {
    let bound_x = SQRT2 * size_x as f32;
    let bound_y = SQRT2 * size_y as f32;

    for cell in cells.iter_mut() {
        let dx = cell.rect.dx() as f32;
        let dy = cell.rect.dy() as f32;

        let (scale_x, density_dx) = if dx < bound_x {
            (dx / bound_x, bound_x / 2.0)
        } else {
            (1.0, dx)
        };
        let (scale_y, density_dy) = if dy < bound_y {
            (dy / bound_y, bound_y / 2.0)
        } else {
            (1.0, dy)
        };

        cell.drect.set_size(density_dx, density_dy);
        cell.drect
            .set_center(cell.rect.cx() as f32, cell.rect.cy() as f32);
        cell.density_scale = scale_x * scale_y;
    }
}

/// The density gradient for one g-cell: the field integrated over the
/// cell's density box, weighted by its density scale. The solver provides a
/// scalar field per bin, so both axes carry the same value.
pub(crate) fn gradient_cell(cell: &GCell, grid: &BinGrid) -> FloatXY {
    let (ix0, ix1) = grid.density_range_x(cell.drect.lx, cell.drect.ux);
    let (iy0, iy1) = grid.density_range_y(cell.drect.ly, cell.drect.uy);

    let mut force = 0.0f32;
    for j in iy0..=iy1 {
        for i in ix0..=ix1 {
            let bin = grid.bin_at(i, j);
            force += bin.electro_force * cell.drect.overlap_area(&bin.rect);
        }
    }
    let g = force * cell.density_scale;
    FloatXY::new(g, g)
}
