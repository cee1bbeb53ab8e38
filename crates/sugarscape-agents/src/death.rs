//! Starvation and removal of dead traders.
//!
//! A trader dies as soon as either holding is zero or below after eating.
//! Removal takes it off the grid and out of the registry for good.

use serde::{Deserialize, Serialize};
use sugarscape_types::{Position, TraderId};
use sugarscape_world::Grid;
use tracing::debug;

use crate::error::AgentError;
use crate::registry::TraderRegistry;
use crate::trader::Trader;

/// Which resource ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// Sugar is exhausted, spice is not.
    SugarStarvation,
    /// Spice is exhausted, sugar is not.
    SpiceStarvation,
    /// Both are exhausted.
    TotalStarvation,
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SugarStarvation => write!(f, "sugar_starvation"),
            Self::SpiceStarvation => write!(f, "spice_starvation"),
            Self::TotalStarvation => write!(f, "total_starvation"),
        }
    }
}

/// Check whether a trader meets the death condition.
///
/// Only inspects state; nothing is mutated.
pub const fn check_death(trader: &Trader) -> Option<DeathCause> {
    match (trader.sugar <= 0, trader.spice <= 0) {
        (true, true) => Some(DeathCause::TotalStarvation),
        (true, false) => Some(DeathCause::SugarStarvation),
        (false, true) => Some(DeathCause::SpiceStarvation),
        (false, false) => None,
    }
}

/// A trader that died, as reported in the tick summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathRecord {
    /// The trader that died.
    pub trader_id: TraderId,
    /// Where it died.
    pub position: Position,
    /// Why it died.
    pub cause: DeathCause,
}

/// Remove `id` from the grid and registry if it is starving.
///
/// Returns the death record when the trader died, `None` when it lives on.
///
/// # Errors
///
/// Returns [`AgentError::TraderNotFound`] for an unknown id, or a wrapped
/// world error if the grid does not hold the trader where it claims to be.
pub fn process_death(
    registry: &mut TraderRegistry,
    grid: &mut Grid,
    id: TraderId,
) -> Result<Option<DeathRecord>, AgentError> {
    let trader = registry.get(id).ok_or(AgentError::TraderNotFound(id))?;
    let Some(cause) = check_death(trader) else {
        return Ok(None);
    };
    let position = trader.position;

    grid.remove(id, position)?;
    registry.remove(id);
    debug!(trader = %id, %position, %cause, "trader died");

    Ok(Some(DeathRecord {
        trader_id: id,
        position,
        cause,
    }))
}
