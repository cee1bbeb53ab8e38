//! Traders and their behavior for the Sugarscape trade simulation.
//!
//! This crate contains the logic layer for traders -- everything that
//! operates on trader state without touching I/O. It sits between
//! `sugarscape-world` (landscape and grid) and `sugarscape-core` (scheduling
//! and reporting).
//!
//! # Modules
//!
//! - [`death`] -- Starvation check and removal ([`DeathCause`], [`DeathRecord`])
//! - [`error`] -- Error types for all trader operations ([`AgentError`])
//! - [`movement`] -- Welfare-maximising foraging move
//! - [`registry`] -- Trader creation and lookup ([`TraderRegistry`])
//! - [`trade`] -- Bilateral trade protocol ([`TradeSession`], [`StopReason`])
//! - [`trader`] -- The [`Trader`] entity
//! - [`vitals`] -- Eating: harvest and metabolism
//! - [`welfare`] -- Cobb-Douglas welfare, MRS, price, and unit quantities

pub mod death;
pub mod error;
pub mod movement;
pub mod registry;
pub mod trade;
pub mod trader;
pub mod vitals;
pub mod welfare;

// Re-export primary types at crate root for convenience.
pub use death::{DeathCause, DeathRecord, check_death, process_death};
pub use error::AgentError;
pub use movement::{choose_destination, move_trader};
pub use registry::TraderRegistry;
pub use trade::{StopReason, TradeSession, trade_pair};
pub use trader::{NewTrader, Trader};
pub use vitals::eat;
pub use welfare::{
    DEFAULT_MRS_TOLERANCE, approx_eq, marginal_rate_of_substitution, trade_price,
    unit_trade_quantities, welfare,
};
