//! Core netlist data structures.
//!
//! Defines the design as handed to the placement core: instances (with die
//! geometry and a fixed/movable flag), pins (connection points with constant
//! offsets from the owning instance's center), nets (groups of pins), and the
//! die core region. The [`PlacerDb`] is the central structure the Nesterov
//! base layer mirrors at init.

use crate::ids::{InstanceId, NetId, PinId};
use coulomb_common::Rect;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The die, reduced to its core (placeable) region.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Die {
    /// The core region in manufacturing units.
    pub core: Rect,
}

impl Die {
    /// Creates a die from its core region.
    pub fn new(core: Rect) -> Self {
        Self { core }
    }

    /// Returns the core's lower-left x coordinate.
    pub fn core_lx(&self) -> i32 {
        self.core.lx
    }

    /// Returns the core's lower-left y coordinate.
    pub fn core_ly(&self) -> i32 {
        self.core.ly
    }

    /// Returns the core's upper-right x coordinate.
    pub fn core_ux(&self) -> i32 {
        self.core.ux
    }

    /// Returns the core's upper-right y coordinate.
    pub fn core_uy(&self) -> i32 {
        self.core.uy
    }

    /// Returns the core width.
    pub fn core_dx(&self) -> i32 {
        self.core.dx()
    }

    /// Returns the core height.
    pub fn core_dy(&self) -> i32 {
        self.core.dy()
    }

    /// Returns the core area.
    pub fn core_area(&self) -> i64 {
        self.core.area()
    }
}

/// An instance in the database.
///
/// Movable instances are the placeable set the optimizer relocates; fixed
/// instances (macros, pre-placed blocks, terminals) only contribute blocked
/// area.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Instance {
    /// The unique ID of this instance.
    pub id: InstanceId,
    /// Human-readable instance name (e.g., "u_core/reg_17").
    pub name: String,
    /// Placement box in manufacturing units.
    pub rect: Rect,
    /// Whether this instance's location is fixed.
    pub fixed: bool,
    /// Pins owned by this instance.
    pub pins: Vec<PinId>,
}

impl Instance {
    /// Returns the instance width.
    pub fn dx(&self) -> i32 {
        self.rect.dx()
    }

    /// Returns the instance height.
    pub fn dy(&self) -> i32 {
        self.rect.dy()
    }

    /// Returns the instance area.
    pub fn area(&self) -> i64 {
        self.rect.area()
    }
}

/// A pin on an instance (or a floating terminal when `instance` is `None`).
///
/// The pin's absolute position is the owning instance's center plus the
/// constant `(offset_cx, offset_cy)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pin {
    /// The unique ID of this pin.
    pub id: PinId,
    /// Human-readable pin name (e.g., "D", "Q").
    pub name: String,
    /// The instance owning this pin (`None` = floating terminal).
    pub instance: Option<InstanceId>,
    /// The net this pin connects to (`None` = unconnected).
    pub net: Option<NetId>,
    /// Current absolute x position of the pin.
    pub cx: i32,
    /// Current absolute y position of the pin.
    pub cy: i32,
    /// Constant x offset from the owning instance's center.
    pub offset_cx: i32,
    /// Constant y offset from the owning instance's center.
    pub offset_cy: i32,
}

/// A net connecting one or more pins.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Net {
    /// The unique ID of this net.
    pub id: NetId,
    /// Human-readable net name (e.g., "clk", "data[3]").
    pub name: String,
    /// The pins on this net.
    pub pins: Vec<PinId>,
    /// Net weight applied by the wirelength model.
    pub weight: f32,
}

/// The design database the placement core reads.
///
/// Instances, pins, and nets live in dense arenas addressed by their IDs.
/// Name lookups go through auxiliary indices that are skipped by serde and
/// rebuilt after deserialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlacerDb {
    /// The die core region.
    pub die: Die,
    /// All instances in the design.
    pub insts: Vec<Instance>,
    /// All pins in the design.
    pub pins: Vec<Pin>,
    /// All nets in the design.
    pub nets: Vec<Net>,
    /// Auxiliary index: instance name to ID (rebuilt on deserialization).
    #[serde(skip)]
    pub inst_by_name: HashMap<String, InstanceId>,
    /// Auxiliary index: net name to ID (rebuilt on deserialization).
    #[serde(skip)]
    pub net_by_name: HashMap<String, NetId>,
}

impl PlacerDb {
    /// Creates an empty database for the given die.
    pub fn new(die: Die) -> Self {
        Self {
            die,
            insts: Vec::new(),
            pins: Vec::new(),
            nets: Vec::new(),
            inst_by_name: HashMap::new(),
            net_by_name: HashMap::new(),
        }
    }

    /// Adds an instance and returns its ID.
    pub fn add_instance(&mut self, mut inst: Instance) -> InstanceId {
        let id = InstanceId::from_raw(self.insts.len() as u32);
        inst.id = id;
        self.inst_by_name.insert(inst.name.clone(), id);
        self.insts.push(inst);
        id
    }

    /// Adds a pin, links it into its owning instance, and returns its ID.
    pub fn add_pin(&mut self, mut pin: Pin) -> PinId {
        let id = PinId::from_raw(self.pins.len() as u32);
        pin.id = id;
        if let Some(inst_id) = pin.instance {
            self.insts[inst_id.as_raw() as usize].pins.push(id);
        }
        self.pins.push(pin);
        id
    }

    /// Adds a net, links it into its pins, and returns its ID.
    pub fn add_net(&mut self, mut net: Net) -> NetId {
        let id = NetId::from_raw(self.nets.len() as u32);
        net.id = id;
        self.net_by_name.insert(net.name.clone(), id);
        for &pin_id in &net.pins {
            self.pins[pin_id.as_raw() as usize].net = Some(id);
        }
        self.nets.push(net);
        id
    }

    /// Returns the instance with the given ID.
    pub fn inst(&self, id: InstanceId) -> &Instance {
        &self.insts[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the instance with the given ID.
    pub fn inst_mut(&mut self, id: InstanceId) -> &mut Instance {
        &mut self.insts[id.as_raw() as usize]
    }

    /// Returns the pin with the given ID.
    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id.as_raw() as usize]
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.as_raw() as usize]
    }

    /// Returns the number of instances.
    pub fn inst_count(&self) -> usize {
        self.insts.len()
    }

    /// Returns the number of pins.
    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// Returns the number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Returns an iterator over the movable (placeable) instances.
    pub fn place_insts(&self) -> impl Iterator<Item = &Instance> {
        self.insts.iter().filter(|i| !i.fixed)
    }

    /// Returns an iterator over the fixed (non-placeable) instances.
    pub fn non_place_insts(&self) -> impl Iterator<Item = &Instance> {
        self.insts.iter().filter(|i| i.fixed)
    }

    /// Returns the total area of movable instances.
    pub fn place_insts_area(&self) -> i64 {
        self.place_insts().map(|i| i.area()).sum()
    }

    /// Returns the total area of fixed instances.
    pub fn non_place_insts_area(&self) -> i64 {
        self.non_place_insts().map(|i| i.area()).sum()
    }

    /// Recomputes every owned pin's absolute position from its instance
    /// center plus the constant offset.
    pub fn update_pin_locations(&mut self) {
        for i in 0..self.pins.len() {
            if let Some(inst_id) = self.pins[i].instance {
                let rect = self.insts[inst_id.as_raw() as usize].rect;
                self.pins[i].cx = rect.cx() + self.pins[i].offset_cx;
                self.pins[i].cy = rect.cy() + self.pins[i].offset_cy;
            }
        }
    }

    /// Rebuilds auxiliary name indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.inst_by_name.clear();
        for (i, inst) in self.insts.iter().enumerate() {
            self.inst_by_name
                .insert(inst.name.clone(), InstanceId::from_raw(i as u32));
        }
        self.net_by_name.clear();
        for (i, net) in self.nets.iter().enumerate() {
            self.net_by_name
                .insert(net.name.clone(), NetId::from_raw(i as u32));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_die() -> Die {
        Die::new(Rect::new(0, 0, 1000, 1000))
    }

    fn make_inst(name: &str, rect: Rect, fixed: bool) -> Instance {
        Instance {
            id: InstanceId::from_raw(0),
            name: name.into(),
            rect,
            fixed,
            pins: Vec::new(),
        }
    }

    #[test]
    fn empty_db() {
        let db = PlacerDb::new(unit_die());
        assert_eq!(db.inst_count(), 0);
        assert_eq!(db.pin_count(), 0);
        assert_eq!(db.net_count(), 0);
        assert_eq!(db.place_insts_area(), 0);
    }

    #[test]
    fn die_accessors() {
        let die = Die::new(Rect::new(10, 20, 110, 220));
        assert_eq!(die.core_lx(), 10);
        assert_eq!(die.core_uy(), 220);
        assert_eq!(die.core_dx(), 100);
        assert_eq!(die.core_dy(), 200);
        assert_eq!(die.core_area(), 20_000);
    }

    #[test]
    fn add_instance_assigns_id_and_name_index() {
        let mut db = PlacerDb::new(unit_die());
        let id = db.add_instance(make_inst("u0", Rect::new(0, 0, 10, 10), false));
        assert_eq!(db.inst_count(), 1);
        assert_eq!(db.inst(id).name, "u0");
        assert_eq!(db.inst_by_name["u0"], id);
    }

    #[test]
    fn add_pin_links_into_instance() {
        let mut db = PlacerDb::new(unit_die());
        let inst = db.add_instance(make_inst("u0", Rect::new(0, 0, 10, 10), false));
        let pin = db.add_pin(Pin {
            id: PinId::from_raw(0),
            name: "A".into(),
            instance: Some(inst),
            net: None,
            cx: 0,
            cy: 0,
            offset_cx: 2,
            offset_cy: -1,
        });
        assert_eq!(db.inst(inst).pins, vec![pin]);
        assert_eq!(db.pin(pin).instance, Some(inst));
    }

    #[test]
    fn add_net_links_into_pins() {
        let mut db = PlacerDb::new(unit_die());
        let inst = db.add_instance(make_inst("u0", Rect::new(0, 0, 10, 10), false));
        let p0 = db.add_pin(Pin {
            id: PinId::from_raw(0),
            name: "A".into(),
            instance: Some(inst),
            net: None,
            cx: 0,
            cy: 0,
            offset_cx: 0,
            offset_cy: 0,
        });
        let net = db.add_net(Net {
            id: NetId::from_raw(0),
            name: "n0".into(),
            pins: vec![p0],
            weight: 1.0,
        });
        assert_eq!(db.pin(p0).net, Some(net));
        assert_eq!(db.net_by_name["n0"], net);
    }

    #[test]
    fn place_and_non_place_partitions() {
        let mut db = PlacerDb::new(unit_die());
        db.add_instance(make_inst("mov", Rect::new(0, 0, 10, 10), false));
        db.add_instance(make_inst("fix", Rect::new(0, 0, 30, 30), true));
        assert_eq!(db.place_insts().count(), 1);
        assert_eq!(db.non_place_insts().count(), 1);
        assert_eq!(db.place_insts_area(), 100);
        assert_eq!(db.non_place_insts_area(), 900);
    }

    #[test]
    fn update_pin_locations_follows_instance() {
        let mut db = PlacerDb::new(unit_die());
        let inst = db.add_instance(make_inst("u0", Rect::new(0, 0, 10, 10), false));
        let pin = db.add_pin(Pin {
            id: PinId::from_raw(0),
            name: "A".into(),
            instance: Some(inst),
            net: None,
            cx: 0,
            cy: 0,
            offset_cx: 3,
            offset_cy: 4,
        });
        db.inst_mut(inst).rect.set_center(100, 200);
        db.update_pin_locations();
        assert_eq!(db.pin(pin).cx, 103);
        assert_eq!(db.pin(pin).cy, 204);
    }

    #[test]
    fn serde_roundtrip_rebuilds_indices() {
        let mut db = PlacerDb::new(unit_die());
        db.add_instance(make_inst("u0", Rect::new(0, 0, 10, 10), false));
        db.add_net(Net {
            id: NetId::from_raw(0),
            name: "n0".into(),
            pins: vec![],
            weight: 1.0,
        });

        let json = serde_json::to_string(&db).unwrap();
        let mut restored: PlacerDb = serde_json::from_str(&json).unwrap();
        assert!(restored.inst_by_name.is_empty());
        restored.rebuild_indices();
        assert!(restored.inst_by_name.contains_key("u0"));
        assert!(restored.net_by_name.contains_key("n0"));
        assert_eq!(restored.inst_count(), 1);
    }
}
