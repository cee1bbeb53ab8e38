//! Shared type definitions for the Sugarscape trade simulation.
//!
//! This crate is the single source of truth for the plain data types used
//! across the workspace: identifiers, grid coordinates, role and
//! neighborhood enumerations, and the per-tick records handed to reporting.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe numeric identifier wrappers
//! - [`enums`] -- Enumeration types (trade roles, neighborhoods)
//! - [`structs`] -- Positions, trade history, and report records

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Neighborhood, TradeRole};
pub use ids::TraderId;
pub use structs::{AgentRecord, ModelRecord, Position, ResourcePair, TickHistory, TradeRecord};
