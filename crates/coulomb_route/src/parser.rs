//! Parser and writer for global-router capacity reports.
//!
//! The `.route` format is line-oriented with whitespace-separated tokens.
//! Directives are gated by section: `Grid` opens the BEOL section,
//! `NumNiTerminals` closes it, `NumBlockageNodes` opens an ignored blockage
//! section, and `NumEdgeCapacityAdjustments` opens the edge section where
//! every line is one `lx ly ll ux uy ul cap` record. Comment lines (`#`),
//! lines shorter than five characters, and lines starting with the literal
//! `route` are ignored everywhere.

use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading or validating a route file.
#[derive(Debug, Error)]
pub enum RouteError {
    /// An I/O error occurred while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A parse error at a specific line number.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// The 1-based line number where the error occurred.
        line: usize,
        /// Description of the error.
        message: String,
    },
    /// The route file's layer count disagrees with the technology database.
    #[error("route layer count {found} disagrees with technology layer count {expected}")]
    LayerCountMismatch {
        /// The layer count the technology database expects.
        expected: usize,
        /// The layer count the route file declared.
        found: usize,
    },
    /// The routing grid geometry collapsed to nothing.
    #[error("degenerate routing grid: {0}")]
    DegenerateGrid(String),
}

/// One edge-capacity adjustment from the global router: the capacity of the
/// edge between tiles `(lx, ly)` and `(ux, uy)` on layer `ll` (`ll == ul`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeCapacityInfo {
    /// Lower tile x index.
    pub lx: i32,
    /// Lower tile y index.
    pub ly: i32,
    /// Lower layer number (1-based).
    pub ll: i32,
    /// Upper tile x index.
    pub ux: i32,
    /// Upper tile y index.
    pub uy: i32,
    /// Upper layer number (1-based, equal to `ll`).
    pub ul: i32,
    /// The adjusted capacity of the edge.
    pub capacity: i32,
}

/// The parsed state of a route file, sufficient to build a
/// [`TileGrid`](crate::TileGrid).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSpec {
    /// Tile count on x.
    pub tile_cnt_x: i32,
    /// Tile count on y.
    pub tile_cnt_y: i32,
    /// Number of routing layers.
    pub num_layers: usize,
    /// Per-layer vertical capacity.
    pub vertical_capacity: Vec<i32>,
    /// Per-layer horizontal capacity.
    pub horizontal_capacity: Vec<i32>,
    /// Per-layer minimum wire width.
    pub min_wire_width: Vec<f32>,
    /// Per-layer minimum wire spacing.
    pub min_wire_spacing: Vec<f32>,
    /// Grid origin x coordinate.
    pub origin_x: i32,
    /// Grid origin y coordinate.
    pub origin_y: i32,
    /// Tile width.
    pub tile_size_x: i32,
    /// Tile height.
    pub tile_size_y: i32,
    /// Blockage porosity factor.
    pub blockage_porosity: f32,
    /// Edge-capacity adjustments, in file order.
    pub edge_adjustments: Vec<EdgeCapacityInfo>,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Preamble,
    Beol,
    Blockage,
    Edge,
}

fn parse_err(line: usize, message: impl Into<String>) -> RouteError {
    RouteError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_i32(token: &str, line: usize) -> Result<i32, RouteError> {
    token
        .parse::<i32>()
        .map_err(|_| parse_err(line, format!("expected an integer, got '{token}'")))
}

fn parse_f32(token: &str, line: usize) -> Result<f32, RouteError> {
    token
        .parse::<f32>()
        .map_err(|_| parse_err(line, format!("expected a number, got '{token}'")))
}

/// Integer-valued token that may be written as a decimal (e.g. `10.0`).
fn parse_coord(token: &str, line: usize) -> Result<i32, RouteError> {
    token
        .parse::<f64>()
        .map(|v| v as i32)
        .map_err(|_| parse_err(line, format!("expected a number, got '{token}'")))
}

/// Returns the value tokens of a directive line, skipping an optional `:`.
fn values<'a>(tokens: &'a [&'a str]) -> &'a [&'a str] {
    match tokens.get(1) {
        Some(&":") => &tokens[2..],
        _ => &tokens[1..],
    }
}

fn parse_layer_i32(
    tokens: &[&str],
    num_layers: usize,
    line: usize,
) -> Result<Vec<i32>, RouteError> {
    let vals = values(tokens);
    if vals.len() != num_layers {
        return Err(parse_err(
            line,
            format!("expected {} layer values, got {}", num_layers, vals.len()),
        ));
    }
    vals.iter().map(|t| parse_i32(t, line)).collect()
}

fn parse_layer_f32(
    tokens: &[&str],
    num_layers: usize,
    line: usize,
) -> Result<Vec<f32>, RouteError> {
    let vals = values(tokens);
    if vals.len() != num_layers {
        return Err(parse_err(
            line,
            format!("expected {} layer values, got {}", num_layers, vals.len()),
        ));
    }
    vals.iter().map(|t| parse_f32(t, line)).collect()
}

/// Parses a route file from a buffered reader.
///
/// # Errors
///
/// Returns [`RouteError::Parse`] with the 1-based line number on malformed
/// directives or edge records, and [`RouteError::Io`] on read failures.
pub fn load_route<R: BufRead>(reader: R) -> Result<RouteSpec, RouteError> {
    let mut spec = RouteSpec::default();
    let mut section = Section::Preamble;
    let mut line_num = 0usize;

    for line_result in reader.lines() {
        let line = line_result?;
        line_num += 1;
        let line = line.trim_end();

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if line.len() < 5 || tokens.is_empty() {
            continue;
        }
        let directive = tokens[0];
        if directive.starts_with('#') || directive == "route" {
            continue;
        }

        match directive {
            "NumBlockageNodes" => {
                section = Section::Blockage;
                continue;
            }
            "NumEdgeCapacityAdjustments" => {
                section = Section::Edge;
                continue;
            }
            "NumNiTerminals" => {
                section = Section::Preamble;
                continue;
            }
            "Grid" => {
                section = Section::Beol;
            }
            _ => {}
        }

        match section {
            Section::Beol => match directive {
                "Grid" => {
                    let vals = values(&tokens);
                    if vals.len() != 3 {
                        return Err(parse_err(line_num, "Grid expects 'Nx Ny L'"));
                    }
                    spec.tile_cnt_x = parse_i32(vals[0], line_num)?;
                    spec.tile_cnt_y = parse_i32(vals[1], line_num)?;
                    spec.num_layers = parse_i32(vals[2], line_num)? as usize;
                }
                "VerticalCapacity" => {
                    spec.vertical_capacity = parse_layer_i32(&tokens, spec.num_layers, line_num)?;
                }
                "HorizontalCapacity" => {
                    spec.horizontal_capacity = parse_layer_i32(&tokens, spec.num_layers, line_num)?;
                }
                "MinWireWidth" => {
                    spec.min_wire_width = parse_layer_f32(&tokens, spec.num_layers, line_num)?;
                }
                "MinWireSpacing" => {
                    spec.min_wire_spacing = parse_layer_f32(&tokens, spec.num_layers, line_num)?;
                }
                "ViaSpacing" => {
                    // Consumed and discarded.
                }
                "GridOrigin" => {
                    let vals = values(&tokens);
                    if vals.len() != 2 {
                        return Err(parse_err(line_num, "GridOrigin expects 'x y'"));
                    }
                    spec.origin_x = parse_coord(vals[0], line_num)?;
                    spec.origin_y = parse_coord(vals[1], line_num)?;
                }
                "TileSize" => {
                    let vals = values(&tokens);
                    if vals.len() != 2 {
                        return Err(parse_err(line_num, "TileSize expects 'w h'"));
                    }
                    spec.tile_size_x = parse_coord(vals[0], line_num)?;
                    spec.tile_size_y = parse_coord(vals[1], line_num)?;
                }
                "BlockagePorosity" => {
                    let vals = values(&tokens);
                    if vals.len() != 1 {
                        return Err(parse_err(line_num, "BlockagePorosity expects one value"));
                    }
                    spec.blockage_porosity = parse_f32(vals[0], line_num)?;
                }
                _ => {
                    // Unrecognized BEOL directives are ignored.
                }
            },
            Section::Blockage => {
                // Blockage records are consumed and discarded.
            }
            Section::Edge => {
                if tokens.len() != 7 {
                    return Err(parse_err(
                        line_num,
                        "edge adjustment expects 'lx ly ll ux uy ul cap'",
                    ));
                }
                let mut vals = [0i32; 7];
                for (slot, token) in vals.iter_mut().zip(&tokens) {
                    *slot = parse_i32(token, line_num)?;
                }
                let [lx, ly, ll, ux, uy, ul, capacity] = vals;
                if ll != ul {
                    return Err(parse_err(
                        line_num,
                        format!("edge adjustment spans layers {ll} and {ul}"),
                    ));
                }
                spec.edge_adjustments.push(EdgeCapacityInfo {
                    lx,
                    ly,
                    ll,
                    ux,
                    uy,
                    ul,
                    capacity,
                });
            }
            Section::Preamble => {}
        }
    }

    Ok(spec)
}

/// Parses a route file from disk; parse errors carry the file path.
pub fn load_route_file(path: impl AsRef<Path>) -> Result<RouteSpec, RouteError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    load_route(std::io::BufReader::new(file)).map_err(|e| match e {
        RouteError::Parse { line, message } => RouteError::Parse {
            line,
            message: format!("{}: {message}", path.display()),
        },
        other => other,
    })
}

/// Serializes a [`RouteSpec`] back to the route format.
///
/// Parsing the output reproduces the spec exactly; ignored sections are
/// emitted empty.
pub fn write_route<W: std::io::Write>(spec: &RouteSpec, w: &mut W) -> std::io::Result<()> {
    writeln!(
        w,
        "Grid : {} {} {}",
        spec.tile_cnt_x, spec.tile_cnt_y, spec.num_layers
    )?;

    let join_i32 = |v: &[i32]| {
        v.iter()
            .map(|x| x.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    };
    let join_f32 = |v: &[f32]| {
        v.iter()
            .map(|x| x.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    };

    writeln!(w, "VerticalCapacity : {}", join_i32(&spec.vertical_capacity))?;
    writeln!(
        w,
        "HorizontalCapacity : {}",
        join_i32(&spec.horizontal_capacity)
    )?;
    writeln!(w, "MinWireWidth : {}", join_f32(&spec.min_wire_width))?;
    writeln!(w, "MinWireSpacing : {}", join_f32(&spec.min_wire_spacing))?;
    writeln!(w, "GridOrigin : {} {}", spec.origin_x, spec.origin_y)?;
    writeln!(w, "TileSize : {} {}", spec.tile_size_x, spec.tile_size_y)?;
    writeln!(w, "BlockagePorosity : {}", spec.blockage_porosity)?;
    writeln!(w, "NumNiTerminals : 0")?;
    writeln!(w, "NumBlockageNodes : 0")?;
    writeln!(
        w,
        "NumEdgeCapacityAdjustments : {}",
        spec.edge_adjustments.len()
    )?;
    for ec in &spec.edge_adjustments {
        writeln!(
            w,
            "{} {} {} {} {} {} {}",
            ec.lx, ec.ly, ec.ll, ec.ux, ec.uy, ec.ul, ec.capacity
        )?;
    }
    Ok(())
}
