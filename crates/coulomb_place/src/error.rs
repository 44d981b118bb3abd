//! Error types for placement-core initialization.
//!
//! All variants are fatal at init time; the core is never partially
//! constructed. Iteration-phase routines are total and never return errors.

/// Errors that can occur while building the Nesterov base layer.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// The design has no placeable instances.
    #[error("no placeable instances in the core")]
    CoreEmpty,

    /// The filler budget is negative: the movable area already exceeds the
    /// whitespace allowed by the target density.
    #[error(
        "filler area is negative ({filler_area}); raise the target density \
         or re-floorplan with a larger core"
    )]
    InsufficientWhitespace {
        /// The (negative) computed total filler area.
        filler_area: i64,
    },

    /// The die or bin geometry collapsed to nothing.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
