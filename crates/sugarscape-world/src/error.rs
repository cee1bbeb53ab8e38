//! Error types for the `sugarscape-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use sugarscape_types::{Position, TraderId};

/// Errors that can occur during world operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A position lies outside the grid.
    #[error("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        /// The offending position.
        position: Position,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },

    /// The target cell already holds a different trader.
    #[error("cell {position} is occupied by trader {occupant}")]
    CellOccupied {
        /// The occupied cell.
        position: Position,
        /// The trader already standing there.
        occupant: TraderId,
    },

    /// The trader is not standing on the given cell.
    #[error("trader {trader} is not at {position}")]
    TraderNotAtCell {
        /// The trader.
        trader: TraderId,
        /// The cell it was expected on.
        position: Position,
    },

    /// A capacity map token could not be parsed as a number.
    #[error("capacity map line {line}: cannot parse {token:?} as a number")]
    MalformedToken {
        /// One-based line number in the source text.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// A capacity map value is negative, fractional, or not finite.
    #[error("capacity map line {line}: {value} is not a non-negative whole number")]
    InvalidCapacity {
        /// One-based line number in the source text.
        line: usize,
        /// The rejected value.
        value: f64,
    },

    /// Capacity map rows have different lengths.
    #[error("capacity map line {line} has {found} columns, expected {expected}")]
    RaggedRow {
        /// One-based line number in the source text.
        line: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of this row.
        found: usize,
    },

    /// The capacity map has no cells.
    #[error("capacity map is empty")]
    EmptyMap,

    /// Two maps or a map and a grid disagree on dimensions.
    #[error(
        "dimension mismatch: expected {expected_width}x{expected_height}, \
         found {found_width}x{found_height}"
    )]
    DimensionMismatch {
        /// Expected width.
        expected_width: u32,
        /// Expected height.
        expected_height: u32,
        /// Actual width.
        found_width: u32,
        /// Actual height.
        found_height: u32,
    },

    /// A grid must have at least one cell.
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Arithmetic overflow in a world calculation.
    #[error("arithmetic overflow in world calculation")]
    ArithmeticOverflow,
}
