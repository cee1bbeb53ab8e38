//! Error types for the sugarscape-agents crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! Most of these signal a scheduling bug (a trader entering trade with an
//! empty larder, a trader with nowhere to stand) and are treated as fatal by
//! the tick scheduler.

use sugarscape_types::{Position, TraderId};
use sugarscape_world::WorldError;

/// Errors that can occur during trader operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A trader entered the trade protocol without strictly positive holdings.
    #[error("trader {trader} cannot trade with sugar {sugar} and spice {spice}")]
    NonPositiveBalance {
        /// The offending trader.
        trader: TraderId,
        /// Its sugar holdings.
        sugar: i64,
        /// Its spice holdings.
        spice: i64,
    },

    /// The movement rule found no cell to stand on.
    #[error("trader {trader} at {position} has no candidate cells")]
    NoCandidateCells {
        /// The trader that tried to move.
        trader: TraderId,
        /// Where it was standing.
        position: Position,
    },

    /// Trader with the given ID was not found in the registry.
    #[error("trader not found: {0}")]
    TraderNotFound(TraderId),

    /// A trader was paired with itself.
    #[error("trader {0} cannot trade with itself")]
    SelfTrade(TraderId),

    /// An arithmetic overflow occurred in a holdings computation.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// A grid or resource field operation failed.
    #[error(transparent)]
    World(#[from] WorldError),
}

impl AgentError {
    pub(crate) fn overflow(context: &str) -> Self {
        Self::ArithmeticOverflow {
            context: String::from(context),
        }
    }
}
