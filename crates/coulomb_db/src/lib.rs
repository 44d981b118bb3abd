//! Physical netlist and die geometry database for the Coulomb placer.
//!
//! This crate holds the design as the placement core reads it: instances
//! (rectangular cells, fixed or movable), pins (with constant offsets from
//! their owning instance's center), nets (pin groups), and the die. The
//! [`PlacerDb`] is the single upstream source the Nesterov base layer mirrors
//! into its own geometric entities; the core reads it and never writes it.

#![warn(missing_docs)]

pub mod data;
pub mod ids;

pub use data::{Die, Instance, Net, Pin, PlacerDb};
pub use ids::{InstanceId, NetId, PinId};
