//! Routing-congestion tile grid for the Coulomb analytic placer.
//!
//! A coarse grid of tiles, independent of the density bin grid, carrying
//! per-layer routing capacity and per-tile track supply. The grid is
//! initialized from a global-router capacity report (a `.route` file): the
//! parser in [`parser`] produces a [`RouteSpec`], and
//! [`TileGrid::from_spec`] turns it into tiles whose supplies reflect the
//! router's edge-capacity adjustments. The placer reads the per-tile
//! horizontal/vertical supply as its congestion-inflation signal.

#![warn(missing_docs)]

pub mod parser;
pub mod tiles;

pub use parser::{load_route, load_route_file, write_route, EdgeCapacityInfo, RouteError, RouteSpec};
pub use tiles::{Tile, TileGrid};
