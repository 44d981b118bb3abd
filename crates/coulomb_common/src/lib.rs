//! Shared foundational types used across the Coulomb analytic placer.
//!
//! This crate provides the 2-D geometry primitives (integer and float
//! rectangles with overlap arithmetic, coordinate pairs) and the numeric
//! helpers that every other crate in the workspace builds on.

#![warn(missing_docs)]

pub mod geom;
pub mod math;

pub use geom::{FloatXY, Rect, RectF};
pub use math::fast_exp;
