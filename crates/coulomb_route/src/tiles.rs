//! The routing-congestion tile grid.
//!
//! Tiles track per-layer capacity and per-tile routing-track supply. The
//! initial supply comes from the track pitch implied by the per-layer
//! capacities; the global router's edge-capacity adjustments then carve
//! supply off the two tiles sharing each adjusted edge. The final
//! horizontal/vertical supply of a tile is the worse of its two edges.

use crate::parser::{EdgeCapacityInfo, RouteError, RouteSpec};
use coulomb_common::Rect;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pitch safety margin applied on top of the raw track pitch.
const G_ROUTE_PITCH_SCALE: f32 = 1.08;

/// One tile of the routing grid.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Tile {
    /// Grid x index.
    pub x: i32,
    /// Grid y index.
    pub y: i32,
    /// Absolute box.
    pub rect: Rect,
    /// Per-layer blockage counts.
    pub blockage: Vec<i32>,
    /// Per-layer capacity.
    pub capacity: Vec<i32>,
    /// Per-layer routed usage.
    pub route: Vec<i32>,
    /// Per-layer usage on the left horizontal edge.
    pub usage_hl: Vec<i32>,
    /// Per-layer usage on the right horizontal edge.
    pub usage_hr: Vec<i32>,
    /// Per-layer usage on the lower vertical edge.
    pub usage_vl: Vec<i32>,
    /// Per-layer usage on the upper vertical edge.
    pub usage_vr: Vec<i32>,
    /// Horizontal supply: the worse of the two horizontal edges.
    pub supply_h: f32,
    /// Vertical supply: the worse of the two vertical edges.
    pub supply_v: f32,
    /// Supply on the left horizontal edge.
    pub supply_hl: f32,
    /// Supply on the right horizontal edge.
    pub supply_hr: f32,
    /// Supply on the lower vertical edge.
    pub supply_vl: f32,
    /// Supply on the upper vertical edge.
    pub supply_vr: f32,
    /// Accumulated horizontal usage.
    pub sum_usage_h: f32,
    /// Accumulated vertical usage.
    pub sum_usage_v: f32,
    /// Horizontal inflation ratio.
    pub inflation_ratio_h: f32,
    /// Vertical inflation ratio.
    pub inflation_ratio_v: f32,
    /// Combined inflation ratio.
    pub inflation_ratio: f32,
    /// Area added by inflation.
    pub inflation_area: f32,
    /// Inflation area change since the last round.
    pub inflation_area_delta: f32,
    /// Ratio actually applied after clamping.
    pub inflated_ratio: f32,
    /// Whether a macro blocks a lower routing layer over this tile.
    pub macro_included: bool,
}

impl Tile {
    /// Creates a tile at grid position `(x, y)` with per-layer vectors sized
    /// for `layers` routing layers.
    pub fn new(x: i32, y: i32, rect: Rect, layers: usize) -> Self {
        Self {
            x,
            y,
            rect,
            blockage: vec![0; layers],
            capacity: vec![0; layers],
            route: vec![0; layers],
            usage_hl: vec![0; layers],
            usage_hr: vec![0; layers],
            usage_vl: vec![0; layers],
            usage_vr: vec![0; layers],
            ..Tile::default()
        }
    }
}

/// The grid of routing tiles, stored row-major with tile `(x, y)` at index
/// `y * cnt_x + x`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TileGrid {
    lx: i32,
    ly: i32,
    cnt_x: i32,
    cnt_y: i32,
    size_x: i32,
    size_y: i32,
    num_layers: usize,
    vertical_capacity: Vec<i32>,
    horizontal_capacity: Vec<i32>,
    min_wire_width: Vec<f32>,
    min_wire_spacing: Vec<f32>,
    blockage_porosity: f32,
    edge_adjustments: Vec<EdgeCapacityInfo>,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Builds the tile grid from a parsed route spec.
    ///
    /// `expected_layers` is the routing-layer count of the technology
    /// database, when known; a disagreement is fatal. Track supplies are
    /// initialized from the per-layer capacities and then reduced by every
    /// edge adjustment.
    pub fn from_spec(
        spec: &RouteSpec,
        expected_layers: Option<usize>,
    ) -> Result<Self, RouteError> {
        let layers = spec.num_layers;
        if let Some(expected) = expected_layers {
            if expected != layers {
                return Err(RouteError::LayerCountMismatch {
                    expected,
                    found: layers,
                });
            }
        }
        for (name, len) in [
            ("VerticalCapacity", spec.vertical_capacity.len()),
            ("HorizontalCapacity", spec.horizontal_capacity.len()),
            ("MinWireWidth", spec.min_wire_width.len()),
            ("MinWireSpacing", spec.min_wire_spacing.len()),
        ] {
            if len != layers {
                return Err(RouteError::DegenerateGrid(format!(
                    "{name} carries {len} layers, grid declares {layers}"
                )));
            }
        }
        if spec.tile_cnt_x <= 0
            || spec.tile_cnt_y <= 0
            || spec.tile_size_x <= 0
            || spec.tile_size_y <= 0
        {
            return Err(RouteError::DegenerateGrid(
                "tile counts and sizes must be positive".into(),
            ));
        }

        let mut grid = Self {
            lx: spec.origin_x,
            ly: spec.origin_y,
            cnt_x: spec.tile_cnt_x,
            cnt_y: spec.tile_cnt_y,
            size_x: spec.tile_size_x,
            size_y: spec.tile_size_y,
            num_layers: layers,
            vertical_capacity: spec.vertical_capacity.clone(),
            horizontal_capacity: spec.horizontal_capacity.clone(),
            min_wire_width: spec.min_wire_width.clone(),
            min_wire_spacing: spec.min_wire_spacing.clone(),
            blockage_porosity: spec.blockage_porosity,
            edge_adjustments: spec.edge_adjustments.clone(),
            tiles: Vec::new(),
        };
        grid.init_tiles()?;
        Ok(grid)
    }

    /// Convenience: parse a route file and build the grid, as the original
    /// report flow does at end of file.
    pub fn from_route_file(
        path: impl AsRef<Path>,
        expected_layers: Option<usize>,
    ) -> Result<Self, RouteError> {
        let spec = crate::parser::load_route_file(path)?;
        Self::from_spec(&spec, expected_layers)
    }

    fn init_tiles(&mut self) -> Result<(), RouteError> {
        let mut tracks_h = 0.0f32;
        let mut tracks_v = 0.0f32;
        for i in 0..self.num_layers {
            let pitch = self.min_wire_width[i] + self.min_wire_spacing[i];
            if pitch <= 0.0 {
                return Err(RouteError::DegenerateGrid(format!(
                    "layer {} has zero wire pitch",
                    i + 1
                )));
            }
            tracks_v += self.vertical_capacity[i] as f32 / pitch;
            tracks_h += self.horizontal_capacity[i] as f32 / pitch;
        }
        if tracks_h <= 0.0 || tracks_v <= 0.0 {
            return Err(RouteError::DegenerateGrid(
                "no routing tracks in either direction".into(),
            ));
        }

        let pitch_h = (self.size_y as f32 / tracks_h * G_ROUTE_PITCH_SCALE).round() as i32;
        let pitch_v = (self.size_x as f32 / tracks_v * G_ROUTE_PITCH_SCALE).round() as i32;
        if pitch_h <= 0 || pitch_v <= 0 {
            return Err(RouteError::DegenerateGrid(
                "track pitch rounded to zero".into(),
            ));
        }

        self.tiles = Vec::with_capacity((self.cnt_x * self.cnt_y) as usize);
        for j in 0..self.cnt_y {
            for i in 0..self.cnt_x {
                let lx = self.lx + i * self.size_x;
                let ly = self.ly + j * self.size_y;
                let rect = Rect::new(lx, ly, lx + self.size_x, ly + self.size_y);
                let mut tile = Tile::new(i, j, rect, self.num_layers);
                tile.supply_hl = rect.area() as f32 / pitch_h as f32;
                tile.supply_hr = tile.supply_hl;
                tile.supply_vl = rect.area() as f32 / pitch_v as f32;
                tile.supply_vr = tile.supply_vl;
                self.tiles.push(tile);
            }
        }

        let adjustments = std::mem::take(&mut self.edge_adjustments);
        for ec in &adjustments {
            self.apply_edge_adjustment(ec)?;
        }
        self.edge_adjustments = adjustments;

        let mut capacity = vec![0i32; self.num_layers];
        for i in 0..self.num_layers {
            capacity[i] = if self.horizontal_capacity[i] > 0 {
                self.horizontal_capacity[i]
            } else {
                self.vertical_capacity[i]
            };
        }
        for tile in &mut self.tiles {
            tile.supply_h = tile.supply_hl.min(tile.supply_hr);
            tile.supply_v = tile.supply_vl.min(tile.supply_vr);
            tile.capacity = capacity.clone();
        }
        Ok(())
    }

    fn apply_edge_adjustment(&mut self, ec: &EdgeCapacityInfo) -> Result<(), RouteError> {
        let horizontal = ec.ly == ec.uy;
        let lx = ec.lx.min(ec.ux);
        let ux = ec.lx.max(ec.ux);
        let ly = ec.ly.min(ec.uy);
        let uy = ec.ly.max(ec.uy);

        let layer = ec.ll;
        if layer < 1 || layer as usize > self.num_layers {
            return Err(RouteError::DegenerateGrid(format!(
                "edge adjustment references layer {layer} of {}",
                self.num_layers
            )));
        }
        if lx < 0 || ux >= self.cnt_x || ly < 0 || uy >= self.cnt_y {
            return Err(RouteError::DegenerateGrid(format!(
                "edge adjustment ({lx},{ly})-({ux},{uy}) outside the grid"
            )));
        }
        let li = layer as usize - 1;
        let wire_pitch = self.min_wire_width[li] + self.min_wire_spacing[li];

        let lower = (ly * self.cnt_x + lx) as usize;
        let upper = (uy * self.cnt_x + ux) as usize;

        if horizontal {
            let delta = (self.horizontal_capacity[li] - ec.capacity) as f32
                / wire_pitch
                / self.size_x as f32;
            self.tiles[lower].supply_hr -= delta;
            self.tiles[upper].supply_hl -= delta;
            if layer <= 5 && self.horizontal_capacity[li] > 0 && (ec.capacity as f32) < 0.01 {
                self.tiles[lower].macro_included = true;
            }
        } else {
            let delta = (self.vertical_capacity[li] - ec.capacity) as f32
                / wire_pitch
                / self.size_y as f32;
            self.tiles[lower].supply_vr -= delta;
            self.tiles[upper].supply_vl -= delta;
            if layer <= 5 && self.vertical_capacity[li] > 0 && (ec.capacity as f32) < 0.01 {
                self.tiles[lower].macro_included = true;
            }
        }
        Ok(())
    }

    /// Returns the grid origin x coordinate.
    pub fn lx(&self) -> i32 {
        self.lx
    }

    /// Returns the grid origin y coordinate.
    pub fn ly(&self) -> i32 {
        self.ly
    }

    /// Returns the grid upper x boundary.
    pub fn ux(&self) -> i32 {
        self.lx + self.cnt_x * self.size_x
    }

    /// Returns the grid upper y boundary.
    pub fn uy(&self) -> i32 {
        self.ly + self.cnt_y * self.size_y
    }

    /// Returns the tile count on x.
    pub fn cnt_x(&self) -> i32 {
        self.cnt_x
    }

    /// Returns the tile count on y.
    pub fn cnt_y(&self) -> i32 {
        self.cnt_y
    }

    /// Returns the tile width.
    pub fn size_x(&self) -> i32 {
        self.size_x
    }

    /// Returns the tile height.
    pub fn size_y(&self) -> i32 {
        self.size_y
    }

    /// Returns the number of routing layers.
    pub fn num_layers(&self) -> usize {
        self.num_layers
    }

    /// Returns the blockage porosity from the route file.
    pub fn blockage_porosity(&self) -> f32 {
        self.blockage_porosity
    }

    /// Returns the edge adjustments the grid was built from.
    pub fn edge_adjustments(&self) -> &[EdgeCapacityInfo] {
        &self.edge_adjustments
    }

    /// Returns all tiles, row-major.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Returns the tile at grid position `(x, y)`.
    pub fn tile_at(&self, x: i32, y: i32) -> &Tile {
        &self.tiles[(y * self.cnt_x + x) as usize]
    }

    /// Returns a mutable reference to the tile at `(x, y)`, for usage and
    /// inflation bookkeeping by the congestion estimator.
    pub fn tile_at_mut(&mut self, x: i32, y: i32) -> &mut Tile {
        &mut self.tiles[(y * self.cnt_x + x) as usize]
    }
}
