//! Landscape, resources, and spatial index for the Sugarscape simulation.
//!
//! This crate models the physical world: a bounded rectangular lattice of
//! cells, each with a sugar and spice capacity, the current resource amounts
//! that regrow every tick, and the occupancy index that records which trader
//! stands on which cell.
//!
//! # Modules
//!
//! - [`capacity`] -- [`CapacityMap`] parsing from whitespace-delimited text,
//!   mirroring, and the generated two-peak default landscape.
//! - [`error`] -- Error types for world operations.
//! - [`geometry`] -- Euclidean distance and neighborhood membership.
//! - [`grid`] -- [`Grid`] occupancy index with neighborhood queries.
//! - [`resource`] -- [`ResourceField`] regrowth and harvesting.

pub mod capacity;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod resource;

// Re-export primary types at crate root.
pub use capacity::CapacityMap;
pub use error::WorldError;
pub use geometry::{distance, within_radius};
pub use grid::Grid;
pub use resource::{ResourceField, ResourceTotals};
