//! Placement-layer mirrors of the netlist entities.
//!
//! [`GCell`], [`GPin`], and [`GNet`] carry the mutable geometry and
//! per-iteration scratch the optimizer works on, while referencing their
//! source database entities by ID. They live in dense arenas owned by
//! [`NesterovBase`](crate::NesterovBase) and cross-reference each other with
//! arena ids, never addresses.

use crate::ids::{GCellId, GNetId, GPinId};
use coulomb_common::{FloatXY, Rect, RectF};
use coulomb_db::{InstanceId, NetId, Pin, PinId};
use serde::{Deserialize, Serialize};

/// What a g-cell stands for: one instance, a cluster of instances, or
/// nothing at all (a virtual filler occupying whitespace).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GCellKind {
    /// Mirrors exactly one database instance.
    Instance(InstanceId),
    /// Mirrors a cluster of database instances.
    Cluster(Vec<InstanceId>),
    /// A virtual filler cell; carries no pins and no source instance.
    Filler,
}

/// A placement g-cell: the unit of geometry the optimizer moves.
///
/// The placement box is what the optimizer mutates each iteration; the
/// density box is the scaled/inflated version used only for density
/// deposition, and may be larger than the placement box for cells smaller
/// than `sqrt(2)` bins.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GCell {
    /// What this g-cell mirrors.
    pub kind: GCellKind,
    /// The placement box.
    pub rect: Rect,
    /// The density box.
    pub drect: RectF,
    /// Mass-preserving scale applied to density-box overlaps.
    pub density_scale: f32,
    /// Transient result of the last gradient call.
    pub gradient: FloatXY,
    /// Pins owned by this g-cell (empty for fillers).
    pub gpins: Vec<GPinId>,
}

impl GCell {
    /// Creates a g-cell mirroring a single instance.
    pub fn from_instance(inst: InstanceId, rect: Rect) -> Self {
        Self {
            kind: GCellKind::Instance(inst),
            rect,
            drect: RectF::default(),
            density_scale: 0.0,
            gradient: FloatXY::default(),
            gpins: Vec::new(),
        }
    }

    /// Creates a filler g-cell of size `dx * dy` centered on `(cx, cy)`.
    pub fn filler(cx: i32, cy: i32, dx: i32, dy: i32) -> Self {
        Self {
            kind: GCellKind::Filler,
            rect: Rect::from_center(cx, cy, dx, dy),
            drect: RectF::default(),
            density_scale: 0.0,
            gradient: FloatXY::default(),
            gpins: Vec::new(),
        }
    }

    /// Returns whether this g-cell mirrors exactly one instance.
    pub fn is_instance(&self) -> bool {
        matches!(self.kind, GCellKind::Instance(_))
    }

    /// Returns whether this g-cell is a virtual filler.
    pub fn is_filler(&self) -> bool {
        matches!(self.kind, GCellKind::Filler)
    }

    /// Returns the mirrored instance, if this is a single-instance g-cell.
    pub fn instance(&self) -> Option<InstanceId> {
        match self.kind {
            GCellKind::Instance(id) => Some(id),
            _ => None,
        }
    }

    /// Sets the transient gradient scratch.
    pub fn set_gradient(&mut self, gradient: FloatXY) {
        self.gradient = gradient;
    }
}

/// A placement g-pin: the per-pin view the wirelength model works on.
///
/// The four exponential-sum caches are valid only between one wirelength
/// update pass and the gradient calls that consume it; `None` means the
/// corresponding exponential underflowed the guard and the pin contributes
/// nothing on that side.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GPin {
    /// The mirrored database pin.
    pub pin: PinId,
    /// The owning g-cell (`None` for pins on fixed instances or floating
    /// terminals).
    pub gcell: Option<GCellId>,
    /// The g-net this pin belongs to (`None` = unconnected).
    pub gnet: Option<GNetId>,
    /// Current absolute x position.
    pub cx: i32,
    /// Current absolute y position.
    pub cy: i32,
    /// Constant x offset from the owning g-cell's center.
    pub offset_cx: i32,
    /// Constant y offset from the owning g-cell's center.
    pub offset_cy: i32,
    /// Cached `exp` term toward the net's min-x edge.
    pub min_exp_sum_x: Option<f32>,
    /// Cached `exp` term toward the net's max-x edge.
    pub max_exp_sum_x: Option<f32>,
    /// Cached `exp` term toward the net's min-y edge.
    pub min_exp_sum_y: Option<f32>,
    /// Cached `exp` term toward the net's max-y edge.
    pub max_exp_sum_y: Option<f32>,
}

impl GPin {
    /// Creates a g-pin mirroring a database pin.
    pub fn from_pin(pin: &Pin) -> Self {
        Self {
            pin: pin.id,
            gcell: None,
            gnet: None,
            cx: pin.cx,
            cy: pin.cy,
            offset_cx: pin.offset_cx,
            offset_cy: pin.offset_cy,
            min_exp_sum_x: None,
            max_exp_sum_x: None,
            min_exp_sum_y: None,
            max_exp_sum_y: None,
        }
    }

    /// Recomputes the pin position from its owning g-cell's center plus the
    /// constant offset.
    pub fn update_location(&mut self, gcell: &GCell) {
        self.cx = gcell.rect.cx() + self.offset_cx;
        self.cy = gcell.rect.cy() + self.offset_cy;
    }

    /// Clears the cached exponential terms ahead of a wirelength pass.
    pub fn clear_wa(&mut self) {
        self.min_exp_sum_x = None;
        self.max_exp_sum_x = None;
        self.min_exp_sum_y = None;
        self.max_exp_sum_y = None;
    }
}

/// A placement g-net: pin bounding box plus the weighted-average
/// exponential-sum accumulators for one wirelength pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GNet {
    /// The mirrored database nets (a single net unless nets were merged).
    pub nets: Vec<NetId>,
    /// The g-pins on this net.
    pub gpins: Vec<GPinId>,
    /// Bounding box over the g-pin positions.
    pub rect: Rect,
    /// Externally supplied net weight.
    pub custom_weight: f32,
    /// Sum of min-x exponentials.
    pub wa_exp_min_sum_x: f32,
    /// Sum of `x * exp` min-x terms.
    pub wa_x_exp_min_sum_x: f32,
    /// Sum of max-x exponentials.
    pub wa_exp_max_sum_x: f32,
    /// Sum of `x * exp` max-x terms.
    pub wa_x_exp_max_sum_x: f32,
    /// Sum of min-y exponentials.
    pub wa_exp_min_sum_y: f32,
    /// Sum of `y * exp` min-y terms.
    pub wa_y_exp_min_sum_y: f32,
    /// Sum of max-y exponentials.
    pub wa_exp_max_sum_y: f32,
    /// Sum of `y * exp` max-y terms.
    pub wa_y_exp_max_sum_y: f32,
    dont_care: bool,
}

impl GNet {
    /// Creates a g-net mirroring a single database net.
    pub fn from_net(net: NetId, custom_weight: f32) -> Self {
        Self {
            nets: vec![net],
            gpins: Vec::new(),
            rect: Rect::default(),
            custom_weight,
            wa_exp_min_sum_x: 0.0,
            wa_x_exp_min_sum_x: 0.0,
            wa_exp_max_sum_x: 0.0,
            wa_x_exp_max_sum_x: 0.0,
            wa_exp_min_sum_y: 0.0,
            wa_y_exp_min_sum_y: 0.0,
            wa_exp_max_sum_y: 0.0,
            wa_y_exp_max_sum_y: 0.0,
            dont_care: false,
        }
    }

    /// Returns the first mirrored database net.
    pub fn net(&self) -> Option<NetId> {
        self.nets.first().copied()
    }

    /// Marks this net as excluded from the wirelength model.
    pub fn set_dont_care(&mut self) {
        self.dont_care = true;
    }

    /// Returns whether this net is excluded from the wirelength model:
    /// it has no pins or was externally flagged.
    pub fn is_dont_care(&self) -> bool {
        self.gpins.is_empty() || self.dont_care
    }

    /// Recomputes the bounding box over the g-pin positions.
    ///
    /// Must not be called on a pin-less net; such nets are don't-care and
    /// skipped by the wirelength pass.
    pub fn update_box(&mut self, gpins: &[GPin]) {
        let mut lx = i32::MAX;
        let mut ly = i32::MAX;
        let mut ux = i32::MIN;
        let mut uy = i32::MIN;
        for &pid in &self.gpins {
            let pin = &gpins[pid.as_raw() as usize];
            lx = lx.min(pin.cx);
            ly = ly.min(pin.cy);
            ux = ux.max(pin.cx);
            uy = uy.max(pin.cy);
        }
        self.rect = Rect::new(lx, ly, ux, uy);
    }

    /// Zeroes all eight accumulators ahead of a wirelength pass.
    pub fn clear_wa(&mut self) {
        self.wa_exp_min_sum_x = 0.0;
        self.wa_x_exp_min_sum_x = 0.0;
        self.wa_exp_max_sum_x = 0.0;
        self.wa_x_exp_max_sum_x = 0.0;
        self.wa_exp_min_sum_y = 0.0;
        self.wa_y_exp_min_sum_y = 0.0;
        self.wa_exp_max_sum_y = 0.0;
        self.wa_y_exp_max_sum_y = 0.0;
    }
}
