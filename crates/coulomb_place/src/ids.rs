//! Opaque ID newtypes for placement-layer entities.
//!
//! [`GCellId`], [`GPinId`], and [`GNetId`] are thin `u32` wrappers used as
//! arena indices into the [`NesterovBase`](crate::NesterovBase) storage.
//! Cross-references between g-entities are expressed with these ids rather
//! than addresses, so the arenas can live in plain `Vec`s.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a placement g-cell.
    GCellId
);

define_id!(
    /// Opaque, copyable ID for a placement g-pin.
    GPinId
);

define_id!(
    /// Opaque, copyable ID for a placement g-net.
    GNetId
);
