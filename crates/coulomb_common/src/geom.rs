//! Axis-aligned rectangles and coordinate pairs.
//!
//! All die, instance, and bin geometry is expressed in integer manufacturing
//! units through [`Rect`]. Per-cell density boxes need sub-unit resolution
//! and use the float-valued [`RectF`]. [`FloatXY`] is the coordinate/gradient
//! pair exchanged with the optimizer.

use serde::{Deserialize, Serialize};

/// An axis-aligned integer rectangle with `lx <= ux` and `ly <= uy`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Lower-left x coordinate.
    pub lx: i32,
    /// Lower-left y coordinate.
    pub ly: i32,
    /// Upper-right x coordinate.
    pub ux: i32,
    /// Upper-right y coordinate.
    pub uy: i32,
}

impl Rect {
    /// Creates a rectangle from its corner coordinates.
    pub fn new(lx: i32, ly: i32, ux: i32, uy: i32) -> Self {
        Self { lx, ly, ux, uy }
    }

    /// Creates a rectangle of size `dx * dy` centered on `(cx, cy)`.
    pub fn from_center(cx: i32, cy: i32, dx: i32, dy: i32) -> Self {
        Self {
            lx: cx - dx / 2,
            ly: cy - dy / 2,
            ux: cx + dx / 2,
            uy: cy + dy / 2,
        }
    }

    /// Returns the x coordinate of the center.
    pub fn cx(&self) -> i32 {
        (self.lx + self.ux) / 2
    }

    /// Returns the y coordinate of the center.
    pub fn cy(&self) -> i32 {
        (self.ly + self.uy) / 2
    }

    /// Returns the width.
    pub fn dx(&self) -> i32 {
        self.ux - self.lx
    }

    /// Returns the height.
    pub fn dy(&self) -> i32 {
        self.uy - self.ly
    }

    /// Returns the area as a 64-bit integer.
    pub fn area(&self) -> i64 {
        i64::from(self.dx()) * i64::from(self.dy())
    }

    /// Returns the overlap area with `other`, or 0 when the rectangles are
    /// disjoint or merely share an edge.
    pub fn overlap_area(&self, other: &Rect) -> i64 {
        let lx = self.lx.max(other.lx);
        let ly = self.ly.max(other.ly);
        let ux = self.ux.min(other.ux);
        let uy = self.uy.min(other.uy);

        if lx >= ux || ly >= uy {
            0
        } else {
            i64::from(ux - lx) * i64::from(uy - ly)
        }
    }

    /// Moves the rectangle so its lower-left corner is `(lx, ly)`,
    /// preserving its size.
    pub fn set_location(&mut self, lx: i32, ly: i32) {
        self.ux = lx + self.dx();
        self.uy = ly + self.dy();
        self.lx = lx;
        self.ly = ly;
    }

    /// Moves the rectangle so its center is `(cx, cy)`, preserving its size.
    pub fn set_center(&mut self, cx: i32, cy: i32) {
        let half_dx = self.dx() / 2;
        let half_dy = self.dy() / 2;
        self.lx = cx - half_dx;
        self.ly = cy - half_dy;
        self.ux = cx + half_dx;
        self.uy = cy + half_dy;
    }

    /// Resizes the rectangle to `dx * dy`, preserving its center.
    pub fn set_size(&mut self, dx: i32, dy: i32) {
        let cx = self.cx();
        let cy = self.cy();
        self.lx = cx - dx / 2;
        self.ly = cy - dy / 2;
        self.ux = cx + dx / 2;
        self.uy = cy + dy / 2;
    }
}

/// An axis-aligned float rectangle, used for per-cell density boxes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RectF {
    /// Lower-left x coordinate.
    pub lx: f32,
    /// Lower-left y coordinate.
    pub ly: f32,
    /// Upper-right x coordinate.
    pub ux: f32,
    /// Upper-right y coordinate.
    pub uy: f32,
}

impl RectF {
    /// Creates a rectangle from its corner coordinates.
    pub fn new(lx: f32, ly: f32, ux: f32, uy: f32) -> Self {
        Self { lx, ly, ux, uy }
    }

    /// Returns the x coordinate of the center.
    pub fn cx(&self) -> f32 {
        (self.lx + self.ux) / 2.0
    }

    /// Returns the y coordinate of the center.
    pub fn cy(&self) -> f32 {
        (self.ly + self.uy) / 2.0
    }

    /// Returns the width.
    pub fn dx(&self) -> f32 {
        self.ux - self.lx
    }

    /// Returns the height.
    pub fn dy(&self) -> f32 {
        self.uy - self.ly
    }

    /// Returns the area.
    pub fn area(&self) -> f32 {
        self.dx() * self.dy()
    }

    /// Returns the overlap area with an integer rectangle, or 0 when
    /// disjoint or edge-touching.
    pub fn overlap_area(&self, other: &Rect) -> f32 {
        let lx = self.lx.max(other.lx as f32);
        let ly = self.ly.max(other.ly as f32);
        let ux = self.ux.min(other.ux as f32);
        let uy = self.uy.min(other.uy as f32);

        if lx >= ux || ly >= uy {
            0.0
        } else {
            (ux - lx) * (uy - ly)
        }
    }

    /// Moves the rectangle so its lower-left corner is `(lx, ly)`,
    /// preserving its size.
    pub fn set_location(&mut self, lx: f32, ly: f32) {
        self.ux = lx + self.dx();
        self.uy = ly + self.dy();
        self.lx = lx;
        self.ly = ly;
    }

    /// Moves the rectangle so its center is `(cx, cy)`, preserving its size.
    pub fn set_center(&mut self, cx: f32, cy: f32) {
        let half_dx = self.dx() / 2.0;
        let half_dy = self.dy() / 2.0;
        self.lx = cx - half_dx;
        self.ly = cy - half_dy;
        self.ux = cx + half_dx;
        self.uy = cy + half_dy;
    }

    /// Resizes the rectangle to `dx * dy`, preserving its center.
    pub fn set_size(&mut self, dx: f32, dy: f32) {
        let cx = self.cx();
        let cy = self.cy();
        self.lx = cx - dx / 2.0;
        self.ly = cy - dy / 2.0;
        self.ux = cx + dx / 2.0;
        self.uy = cy + dy / 2.0;
    }
}

/// A float coordinate or gradient pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FloatXY {
    /// The x component.
    pub x: f32,
    /// The y component.
    pub y: f32,
}

impl FloatXY {
    /// Creates a pair from its components.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for FloatXY {
    type Output = FloatXY;

    fn add(self, rhs: FloatXY) -> FloatXY {
        FloatXY::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for FloatXY {
    fn add_assign(&mut self, rhs: FloatXY) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_derived_coords() {
        let r = Rect::new(10, 20, 30, 60);
        assert_eq!(r.cx(), 20);
        assert_eq!(r.cy(), 40);
        assert_eq!(r.dx(), 20);
        assert_eq!(r.dy(), 40);
        assert_eq!(r.area(), 800);
    }

    #[test]
    fn rect_from_center() {
        let r = Rect::from_center(50, 50, 20, 10);
        assert_eq!(r, Rect::new(40, 45, 60, 55));
    }

    #[test]
    fn overlap_partial() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 15, 15);
        assert_eq!(a.overlap_area(&b), 25);
        assert_eq!(b.overlap_area(&a), 25);
    }

    #[test]
    fn overlap_disjoint_is_zero() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 30, 30);
        assert_eq!(a.overlap_area(&b), 0);
    }

    #[test]
    fn overlap_shared_edge_is_zero() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 20, 10);
        assert_eq!(a.overlap_area(&b), 0);
    }

    #[test]
    fn overlap_contained() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(40, 40, 60, 60);
        assert_eq!(a.overlap_area(&b), 400);
    }

    #[test]
    fn overlap_large_coords_no_wrap() {
        let a = Rect::new(0, 0, 1_000_000, 1_000_000);
        let b = Rect::new(0, 0, 1_000_000, 1_000_000);
        assert_eq!(a.overlap_area(&b), 1_000_000_000_000);
    }

    #[test]
    fn rect_set_location_preserves_size() {
        let mut r = Rect::new(0, 0, 10, 20);
        r.set_location(100, 200);
        assert_eq!(r, Rect::new(100, 200, 110, 220));
    }

    #[test]
    fn rect_set_center_preserves_size() {
        let mut r = Rect::new(0, 0, 10, 20);
        r.set_center(50, 50);
        assert_eq!(r, Rect::new(45, 40, 55, 60));
    }

    #[test]
    fn rect_set_size_preserves_center() {
        let mut r = Rect::new(40, 40, 60, 60);
        r.set_size(10, 10);
        assert_eq!(r, Rect::new(45, 45, 55, 55));
        assert_eq!(r.cx(), 50);
    }

    #[test]
    fn rectf_overlap_with_rect() {
        let a = RectF::new(0.5, 0.5, 10.5, 10.5);
        let bin = Rect::new(0, 0, 10, 10);
        let overlap = a.overlap_area(&bin);
        assert!((overlap - 90.25).abs() < 1e-4);
    }

    #[test]
    fn rectf_disjoint_is_zero() {
        let a = RectF::new(20.0, 20.0, 30.0, 30.0);
        let bin = Rect::new(0, 0, 10, 10);
        assert_eq!(a.overlap_area(&bin), 0.0);
    }

    #[test]
    fn rectf_set_center() {
        let mut r = RectF::new(0.0, 0.0, 11.0, 11.0);
        r.set_center(100.0, 100.0);
        assert!((r.lx - 94.5).abs() < 1e-6);
        assert!((r.ux - 105.5).abs() < 1e-6);
        assert!((r.cx() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn rectf_set_size_fractional() {
        let mut r = RectF::new(0.0, 0.0, 1.0, 1.0);
        r.set_size(22.627416, 22.627416);
        assert!((r.dx() - 22.627416).abs() < 1e-4);
        assert!((r.cx() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn floatxy_add() {
        let mut g = FloatXY::new(1.0, 2.0);
        g += FloatXY::new(0.5, -0.5);
        assert_eq!(g, FloatXY::new(1.5, 1.5));
        assert_eq!(g + FloatXY::new(0.5, 0.5), FloatXY::new(2.0, 2.0));
    }

    #[test]
    fn serde_roundtrip() {
        let r = Rect::new(1, 2, 3, 4);
        let json = serde_json::to_string(&r).unwrap();
        let restored: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(r, restored);
    }
}
